use glam::Vec2;
use smallvec::SmallVec;

use crate::events::GameCommand;

/// Everything the host polled since the previous tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Click positions in arrival order, in play-field pixels.
    pub clicks: SmallVec<[Vec2; 4]>,
    pub quit: bool,
    pub audio_finished: bool,
}

impl TickInput {
    /// Input for a tick with nothing to report.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Input holding a single click.
    pub fn click(position: Vec2) -> Self {
        let mut input = Self::default();
        input.clicks.push(position);
        input
    }

    pub fn push_click(&mut self, position: Vec2) {
        self.clicks.push(position);
    }

    pub fn apply(&mut self, command: GameCommand) {
        match command {
            GameCommand::Exit => self.quit = true,
            GameCommand::MusicFinished => self.audio_finished = true,
        }
    }
}

impl From<GameCommand> for TickInput {
    fn from(command: GameCommand) -> Self {
        let mut input = Self::default();
        input.apply(command);
        input
    }
}
