use bevy_ecs::{resource::Resource, system::Res};
use strum_macros::Display;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EndReason {
    #[strum(to_string = "audio finished")]
    AudioFinished,
    #[strum(to_string = "quit")]
    Quit,
    #[strum(to_string = "video ended")]
    VideoEnded,
}

/// The overall stage of the session.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStage {
    #[default]
    Playing,
    /// Nothing advances any more; only the summary remains.
    Ended(EndReason),
}

impl SessionStage {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionStage::Playing)
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            SessionStage::Playing => None,
            SessionStage::Ended(reason) => Some(*reason),
        }
    }

    /// Ends the session unless it already ended; the first reason sticks.
    pub fn end(&mut self, reason: EndReason) {
        if self.is_playing() {
            *self = SessionStage::Ended(reason);
        }
    }
}

/// Run condition for the gameplay systems.
pub fn session_active(stage: Res<SessionStage>) -> bool {
    stage.is_playing()
}
