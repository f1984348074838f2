//! The note lifecycle: `Growing -> Judged(tier) -> despawned`.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    system::{Commands, Query, Res},
};
use tracing::{debug, trace};

use crate::constants::{badge, note};
use crate::events::NoteJudged;
use crate::systems::{Note, NoteState, Position, TickTime, Tier};

/// Radius of a note whose normalized growth is `fraction`.
///
/// Interpolates from the minimum to the maximum radius and clamps outside `[0, 1]`.
pub fn radius_at(fraction: f64) -> f32 {
    let t = fraction.clamp(0.0, 1.0) as f32;
    note::MIN_RADIUS + (note::MAX_RADIUS - note::MIN_RADIUS) * t
}

/// Normalized growth of a note `elapsed` seconds after it spawned.
pub fn growth_fraction(elapsed: f64) -> f64 {
    elapsed * note::GROWTH_RATE
}

/// The tier a click earns `elapsed` seconds after the note spawned.
pub fn tier_at(elapsed: f64) -> Tier {
    if growth_fraction(elapsed) >= note::EXCELLENT_FRACTION {
        Tier::Excellent
    } else {
        Tier::Good
    }
}

/// Whether a note `elapsed` seconds old has outlived its click window.
pub fn is_expired(elapsed: f64) -> bool {
    elapsed > note::LIFE_CYCLE
}

/// Badge scale `since` seconds after judgment, growing from 0 to 1.
pub fn badge_scale(since: f64) -> f32 {
    (since / badge::SCALE_IN).clamp(0.0, 1.0) as f32
}

/// Badge opacity `since` seconds after judgment, fading from 1 to 0.
pub fn badge_alpha(since: f64) -> f32 {
    (1.0 - since / badge::LIFETIME).clamp(0.0, 1.0) as f32
}

/// Grows live notes, expires the ones nobody clicked, and removes notes whose badge has faded.
pub fn note_lifecycle_system(
    mut commands: Commands,
    time: Res<TickTime>,
    mut notes: Query<(Entity, &Position, &mut Note)>,
    mut judged: EventWriter<NoteJudged>,
) {
    for (entity, position, mut note) in notes.iter_mut() {
        match note.state {
            NoteState::Growing => {
                let elapsed = time.now - note.spawned_at;
                let radius = radius_at(growth_fraction(elapsed));
                if radius > note.radius {
                    note.radius = radius;
                }

                if is_expired(elapsed) {
                    note.tier = Tier::Miss;
                    note.state = NoteState::Judged { at: time.now };
                    debug!(id = note.id.0, elapsed, "Note expired unclicked");
                    judged.write(NoteJudged {
                        entity,
                        id: note.id,
                        tier: Tier::Miss,
                        position: position.0,
                    });
                } else if tier_at(elapsed) == Tier::Excellent && note.tier != Tier::Excellent {
                    trace!(id = note.id.0, "Note entered the excellent window");
                    note.tier = Tier::Excellent;
                }
            }
            NoteState::Judged { at } => {
                if time.now - at >= badge::LIFETIME {
                    trace!(id = note.id.0, "Badge faded, despawning note");
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}
