use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::constants::note;
use crate::events::NoteJudged;
use crate::systems::note::{is_expired, tier_at};
use crate::systems::{Note, NoteId, NoteState, PendingClicks, Position, TickTime};

/// Whether `click` lands inside the click region of a note centered at `center`.
///
/// The region is the note's maximum radius, however far it has grown.
pub fn hits_note(click: Vec2, center: Vec2) -> bool {
    click.distance_squared(center) <= note::MAX_RADIUS * note::MAX_RADIUS
}

/// Resolves this tick's clicks against the growing notes.
///
/// Each click resolves at most one note and each note at most one click. When a click covers
/// several notes, the oldest one wins.
pub fn judge_system(
    time: Res<TickTime>,
    mut clicks: ResMut<PendingClicks>,
    mut notes: Query<(Entity, &Position, &mut Note)>,
    mut judged: EventWriter<NoteJudged>,
) {
    if clicks.0.is_empty() {
        return;
    }

    let mut candidates: Vec<(NoteId, Entity, Vec2)> = notes
        .iter()
        .filter(|(_, _, note)| note.is_growing() && !is_expired(time.now - note.spawned_at))
        .map(|(entity, position, note)| (note.id, entity, position.0))
        .collect();
    candidates.sort_by_key(|(id, _, _)| *id);

    for click in clicks.0.drain(..) {
        let Some(index) = candidates.iter().position(|(_, _, center)| hits_note(click, *center)) else {
            trace!(x = click.x, y = click.y, "Click hit nothing");
            continue;
        };

        let (id, entity, center) = candidates.remove(index);
        let Ok((_, _, mut note)) = notes.get_mut(entity) else {
            continue;
        };

        let elapsed = time.now - note.spawned_at;
        let tier = tier_at(elapsed);
        note.tier = tier;
        note.state = NoteState::Judged { at: time.now };
        debug!(id = id.0, %tier, elapsed, "Note clicked");

        judged.write(NoteJudged {
            entity,
            id,
            tier,
            position: center,
        });
    }
}
