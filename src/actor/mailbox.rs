//! Mailboxes: bounded, payload-free signal channels.
//!
//! Every actor input is a `bounded(capacity)` channel of `()`. Senders never
//! block: a full queue drops the new signal (the actor will still see the
//! ones already queued), and a disconnected receiver is ignored.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, trace};

/// Sending side of one signal channel.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: Sender<()>,
    actor: &'static str,
    signal: &'static str,
}

impl Notifier {
    /// Fire and forget.
    ///
    /// Returns `true` if the signal was queued.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => {
                debug!(actor = self.actor, signal = self.signal, "signal_sent");
                true
            }
            Err(TrySendError::Full(())) => {
                trace!(actor = self.actor, signal = self.signal, "signal_dropped_full");
                false
            }
            Err(TrySendError::Disconnected(())) => {
                debug!(actor = self.actor, signal = self.signal, "signal_dropped_disconnected");
                false
            }
        }
    }

    /// Number of signals waiting to be received.
    #[inline]
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

/// Create one signal channel.
///
/// A capacity of zero is raised to one: a rendezvous channel would make
/// `notify` fail whenever the actor is not parked in `select!`.
pub fn signal(actor: &'static str, signal: &'static str, capacity: usize) -> (Notifier, Receiver<()>) {
    let (tx, rx) = bounded(capacity.max(1));
    (Notifier { tx, actor, signal }, rx)
}
