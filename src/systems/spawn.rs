//! Beat cursor and note spawning.
//!
//! The beat cursor walks the [`BeatTrack`] as the session clock passes each onset. A note is
//! spawned for the beat under the cursor once its onset has arrived, provided the beat is
//! loud enough and the previous spawn is more than `note_interval` in the past. An onset keeps
//! spawning until the cursor moves past it, so short intervals put several notes on one beat.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::beat::BeatTrack;
use crate::config::SessionConfig;
use crate::constants::{field, note};
use crate::error::{GameError, PlacementError};
use crate::systems::render::Color;
use crate::systems::{GameRng, Note, NoteState, Position, SessionState, TickTime, Tier};

/// The rectangle notes are placed in: the central third of the field on both axes.
pub fn spawn_region() -> (Vec2, Vec2) {
    (field::SIZE / 3.0, field::SIZE * (2.0 / 3.0))
}

/// Minimum distance between the centers of two simultaneous notes.
pub fn min_note_spacing(margin: f32) -> f32 {
    2.0 * (note::MAX_RADIUS + margin)
}

/// Picks a uniformly random position in the spawn region at least `min_distance` away from
/// every point in `occupied`.
///
/// # Errors
///
/// Returns [`PlacementError::Exhausted`] if no candidate out of `attempts` is free.
pub fn find_placement<R: Rng + ?Sized>(
    rng: &mut R,
    occupied: &[Vec2],
    min_distance: f32,
    attempts: u32,
) -> Result<Vec2, PlacementError> {
    let (min, max) = spawn_region();
    let min_distance_squared = min_distance * min_distance;

    for attempt in 0..attempts {
        let candidate = Vec2::new(rng.random_range(min.x..=max.x), rng.random_range(min.y..=max.y));
        if occupied
            .iter()
            .all(|other| candidate.distance_squared(*other) >= min_distance_squared)
        {
            trace!(attempt, x = candidate.x, y = candidate.y, "Placement found");
            return Ok(candidate);
        }
    }

    Err(PlacementError::Exhausted { attempts })
}

/// A random pastel color for a fresh note.
pub fn random_note_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::rgb(
        rng.random_range(note::COLOR_CHANNEL_MIN..=u8::MAX),
        rng.random_range(note::COLOR_CHANNEL_MIN..=u8::MAX),
        rng.random_range(note::COLOR_CHANNEL_MIN..=u8::MAX),
    )
}

/// Moves the beat cursor past onsets that are too old to spawn a note.
pub fn beat_cursor_system(
    time: Res<TickTime>,
    track: Res<BeatTrack>,
    config: Res<SessionConfig>,
    mut session: ResMut<SessionState>,
) {
    let elapsed = session.elapsed(time.now);
    while let Some(beat) = track.get(session.beat_index) {
        if elapsed - beat.time < config.onset_stale_after {
            break;
        }

        session.beat_index += 1;
        trace!(beat_index = session.beat_index, elapsed, "Beat cursor advanced");
    }
}

/// Spawns a note for the beat under the cursor when the spawn gate opens.
pub fn spawn_system(
    mut commands: Commands,
    time: Res<TickTime>,
    track: Res<BeatTrack>,
    config: Res<SessionConfig>,
    mut session: ResMut<SessionState>,
    mut rng: ResMut<GameRng>,
    notes: Query<&Position, With<Note>>,
    mut errors: EventWriter<GameError>,
) {
    let beat_index = session.beat_index;
    let Some(beat) = track.get(beat_index) else {
        return;
    };

    let elapsed = session.elapsed(time.now);
    if elapsed < beat.time || session.skipped_beat == Some(beat_index) {
        return;
    }
    if let Some(last) = session.last_spawn_time {
        if time.now - last <= config.note_interval {
            return;
        }
    }
    if beat.amplitude <= config.amplitude_threshold {
        return;
    }

    let occupied: Vec<Vec2> = notes.iter().map(|position| position.0).collect();
    let spacing = min_note_spacing(config.placement_margin);
    let position = match find_placement(&mut rng.0, &occupied, spacing, config.placement_attempts) {
        Ok(position) => position,
        Err(error) => {
            // A crowded field would fail again next tick.
            session.skipped_beat = Some(beat_index);
            warn!(beat_index, live_notes = occupied.len(), "Note placement failed");
            errors.write(error.into());
            return;
        }
    };

    let id = session.allocate_note_id();
    let color = random_note_color(&mut rng.0);
    commands.spawn((
        Position(position),
        Note {
            id,
            spawned_at: time.now,
            radius: note::MIN_RADIUS,
            color,
            state: NoteState::Growing,
            tier: Tier::Good,
        },
    ));

    session.total_notes_spawned += 1;
    session.last_spawn_time = Some(time.now);

    debug!(
        id = id.0,
        beat_index,
        onset = beat.time,
        amplitude = beat.amplitude,
        x = position.x,
        y = position.y,
        "Note spawned"
    );
}
