//! Terminal session: raw mode, the input and render actors, and the main
//! loop that feeds input to the game and redraws on every frame tick.

use crate::actor::{InputActor, InputEvent, RenderCommand, RendererActor};
use crate::config::GameConfig;
use crate::dispatch::Flow;
use crate::error::Result;
use crate::game::Game;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use crossterm::{
    cursor, execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use tracing::{debug, info, trace};

/// Raw mode plus alternate screen, undone on drop.
struct TerminalMode;

impl TerminalMode {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mode = Self;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), cursor::Hide)?;
        Ok(mode)
    }
}

impl Drop for TerminalMode {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Owns the terminal and the two I/O actors for the length of a game.
pub struct Session {
    input_rx: Receiver<InputEvent>,
    render_tx: Sender<RenderCommand>,
    input: Option<InputActor>,
    renderer: Option<RendererActor>,
    frames_skipped: u64,
    // Dropped last, after both actors are joined.
    _mode: TerminalMode,
}

impl Session {
    /// Enter raw mode and start the input and render actors.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails or a thread cannot be
    /// spawned. The terminal is restored in either case.
    pub fn open(config: &GameConfig) -> Result<Self> {
        let mode = TerminalMode::enter()?;

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        // Two frames in flight at most; newer snapshots are dropped while
        // the renderer catches up.
        let (render_tx, render_rx) = bounded::<RenderCommand>(2);

        let renderer = RendererActor::spawn(render_rx)?;
        let input = InputActor::spawn(input_tx, config.timing.input_poll)?;

        info!("session_started");
        Ok(Self {
            input_rx,
            render_tx,
            input: Some(input),
            renderer: Some(renderer),
            frames_skipped: 0,
            _mode: mode,
        })
    }

    /// Queue a frame for drawing without waiting for the renderer.
    pub fn draw(&mut self, game: &Game) {
        let frame = RenderCommand::Draw(Box::new(game.snapshot()));
        match self.render_tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.frames_skipped += 1;
                trace!("frame_skipped");
            }
            Err(TrySendError::Disconnected(_)) => debug!("renderer_gone"),
        }
    }

    /// Input events from the terminal.
    #[inline]
    pub const fn input(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Unblocks an input thread stuck on a full queue.
        self.input_rx = crossbeam_channel::never();
        if let Some(input) = self.input.take() {
            input.join();
        }
        let _ = self.render_tx.send(RenderCommand::Shutdown);
        if let Some(renderer) = self.renderer.take() {
            renderer.join();
        }
        info!(frames_skipped = self.frames_skipped, "session_stopped");
    }
}

/// Run the game in the terminal until the player quits.
///
/// # Errors
///
/// Returns an error if the terminal session cannot be opened.
pub fn run(game: &mut Game, config: &GameConfig) -> Result<()> {
    let mut session = Session::open(config)?;
    let frames = tick(config.timing.frame);
    let input = session.input().clone();

    session.draw(game);
    loop {
        select! {
            recv(input) -> event => match event {
                Ok(event) => {
                    if game.dispatch(&event) == Flow::Quit {
                        debug!("quit_requested");
                        break;
                    }
                }
                Err(_) => break,
            },
            recv(frames) -> _ => {}
        }
        session.draw(game);
    }

    Ok(())
}
