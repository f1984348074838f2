use bevy_ecs::{entity::Entity, event::Event};
use glam::Vec2;

use crate::systems::{NoteId, Tier};

/// Fired once per note, when it is resolved by a click or by expiry.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct NoteJudged {
    pub entity: Entity,
    pub id: NoteId,
    pub tier: Tier,
    pub position: Vec2,
}

/// High-level requests the host loop turns into [`crate::systems::TickInput`] flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Stop the session and go straight to the summary.
    Exit,
    /// The audio track finished playing.
    MusicFinished,
}
