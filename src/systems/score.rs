use bevy_ecs::{event::EventReader, system::ResMut};
use tracing::debug;

use crate::events::NoteJudged;
use crate::systems::SessionState;

/// Adds the weight of every judged tier to the score.
pub fn scoring_system(mut session: ResMut<SessionState>, mut judged: EventReader<NoteJudged>) {
    for event in judged.read() {
        session.score += event.tier.weight();
        debug!(id = event.id.0, tier = %event.tier, score = session.score, "Score updated");
    }
}
