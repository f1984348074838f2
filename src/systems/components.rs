use bevy_ecs::{component::Component, resource::Resource};
use glam::Vec2;
use rand::rngs::SmallRng;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};

use crate::constants::scoring;
use crate::systems::render::Color;

/// Position on the play field, in pixels. Notes never move once spawned.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Per-tick displacement, in pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Spawn-order sequence number of a note. Lower ids were spawned earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(pub u64);

/// The accuracy classification of a judged note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum Tier {
    Miss,
    Good,
    Excellent,
}

impl Tier {
    /// Points this tier adds to the score.
    pub fn weight(&self) -> u32 {
        match self {
            Tier::Miss => 0,
            Tier::Good => scoring::UNIT,
            Tier::Excellent => 2 * scoring::UNIT,
        }
    }

    /// The largest weight any tier can award.
    pub fn max_weight() -> u32 {
        Tier::iter().map(|tier| tier.weight()).max().unwrap_or(0)
    }

    /// Plain color used for this tier's badge and particle burst.
    pub fn color(&self) -> Color {
        match self {
            Tier::Miss => Color::rgb(200, 60, 60),
            Tier::Good => Color::rgb(120, 200, 255),
            Tier::Excellent => Color::rgb(255, 215, 0),
        }
    }
}

/// Where a note is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteState {
    /// Radius is interpolating towards the maximum; the note accepts clicks.
    Growing,
    /// Resolved by a click or by expiry; only the badge is shown now.
    Judged { at: f64 },
}

/// A timed click target.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub spawned_at: f64,
    pub radius: f32,
    pub color: Color,
    pub state: NoteState,
    pub tier: Tier,
}

impl Note {
    pub fn is_growing(&self) -> bool {
        matches!(self.state, NoteState::Growing)
    }

    pub fn judged_at(&self) -> Option<f64> {
        match self.state {
            NoteState::Growing => None,
            NoteState::Judged { at } => Some(at),
        }
    }
}

/// A decorative particle; lifetime is tracked by [`crate::systems::lifetime::TimeToLive`].
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub color: Color,
    pub size: f32,
}

/// The time of the current tick, injected once per tick and read by every system.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct TickTime {
    /// Seconds, on the same clock as [`SessionState::session_start`].
    pub now: f64,
}

impl TickTime {
    pub fn new(now: f64) -> Self {
        Self { now }
    }
}

/// Counters and cursors of one play session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionState {
    pub score: u32,
    pub total_notes_spawned: u32,
    pub session_start: f64,
    /// Cursor into the beat track.
    pub beat_index: usize,
    pub last_spawn_time: Option<f64>,
    /// A beat whose note could not be placed; it spawns nothing more.
    pub skipped_beat: Option<usize>,
    pub next_note_id: u64,
}

impl SessionState {
    pub fn new(session_start: f64) -> Self {
        Self {
            score: 0,
            total_notes_spawned: 0,
            session_start,
            beat_index: 0,
            last_spawn_time: None,
            skipped_beat: None,
            next_note_id: 0,
        }
    }

    /// Seconds since the session started.
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.session_start
    }

    /// Hands out the next note id.
    pub fn allocate_note_id(&mut self) -> NoteId {
        let id = NoteId(self.next_note_id);
        self.next_note_id += 1;
        id
    }

    /// Share of the best possible score reached, as a truncated percentage.
    ///
    /// A session that spawned no notes is at 0%.
    pub fn completion_percent(&self) -> u32 {
        let possible = self.total_notes_spawned as u64 * Tier::max_weight() as u64;
        if possible == 0 {
            return 0;
        }

        (self.score as u64 * 100 / possible) as u32
    }
}

/// Clicks received this tick, in arrival order.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PendingClicks(pub SmallVec<[Vec2; 4]>);

/// The session's random source. Seeded once, so a seeded session replays identically.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub SmallRng);
