//! Renderer Actor: Dedicated thread for drawing to the terminal.
//!
//! Owns stdout. Each [`RenderCommand::Draw`] is turned into one ANSI frame
//! and flushed in a single write.

use super::messages::RenderCommand;
use crate::error::{GameError, Result};
use crate::terminal::OutputBuffer;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Renderer actor that handles terminal output.
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Total bytes written to terminal.
    pub bytes_written: u64,
}

impl RendererActor {
    /// Spawn the renderer actor thread.
    pub fn spawn(receiver: Receiver<RenderCommand>) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("gridwalk-render".to_string())
            .spawn(move || {
                let mut stdout = io::stdout();
                match Self::run_loop(&receiver, &mut stdout) {
                    Ok(stats) => debug!(frames = stats.frames, bytes = stats.bytes_written, "renderer_stopped"),
                    Err(e) => error!(error = %e, "render_failed"),
                }
            })
            .map_err(|source| GameError::Spawn { name: "render", source })?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the render thread to finish.
    ///
    /// Send [`RenderCommand::Shutdown`] (or drop the sender) first.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Draw every received frame into `out` until shutdown.
    pub fn run_loop<W: Write>(receiver: &Receiver<RenderCommand>, out: &mut W) -> io::Result<RenderStats> {
        let mut frame = OutputBuffer::new();
        let mut stats = RenderStats::default();

        // A closed channel ends the loop like an explicit shutdown.
        while let Ok(command) = receiver.recv() {
            match command {
                RenderCommand::Draw(snapshot) => {
                    frame.clear();
                    frame.draw_snapshot(&snapshot);
                    frame.flush_to(out)?;
                    stats.frames += 1;
                    stats.bytes_written += frame.len() as u64;
                }
                RenderCommand::Shutdown => break,
            }
        }

        Ok(stats)
    }
}
