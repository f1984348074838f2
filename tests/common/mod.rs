#![allow(dead_code)]

use beatdrop::{
    beat::BeatTrack,
    config::SessionConfig,
    events::NoteJudged,
    error::GameError,
    game::Game,
    systems::{
        DrawList, GameRng, Note, NoteId, NoteState, PendingClicks, Position, SessionStage, SessionState, TickInput,
        TickTime, Tier, VideoCursor, VideoInfo,
    },
};
use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};

pub const SEED: u64 = 0x5EED;

/// Frame time the tests tick at.
pub const TICK: f64 = 1.0 / 30.0;

pub fn test_rng() -> SmallRng {
    SmallRng::seed_from_u64(SEED)
}

/// A world with every resource the systems expect, at session time zero.
pub fn create_test_world() -> World {
    let mut world = World::new();

    world.insert_resource(SessionConfig::default());
    world.insert_resource(BeatTrack::empty());
    world.insert_resource(VideoCursor::new(VideoInfo::none()));
    world.insert_resource(SessionState::new(0.0));
    world.insert_resource(SessionStage::Playing);
    world.insert_resource(TickTime::new(0.0));
    world.insert_resource(PendingClicks::default());
    world.insert_resource(GameRng(test_rng()));
    world.insert_resource(DrawList::default());
    world.insert_resource(Events::<NoteJudged>::default());
    world.insert_resource(Events::<GameError>::default());

    world
}

pub fn set_time(world: &mut World, now: f64) {
    world.insert_resource(TickTime::new(now));
}

/// Spawns a growing note the way the spawner does.
pub fn spawn_test_note(world: &mut World, position: Vec2, spawned_at: f64) -> Entity {
    let id = world.resource_mut::<SessionState>().allocate_note_id();
    world.resource_mut::<SessionState>().total_notes_spawned += 1;
    world
        .spawn((
            Position(position),
            Note {
                id,
                spawned_at,
                radius: beatdrop::constants::note::MIN_RADIUS,
                color: beatdrop::systems::Color::WHITE,
                state: NoteState::Growing,
                tier: Tier::Good,
            },
        ))
        .id()
}

pub fn click(world: &mut World, position: Vec2) {
    world.resource_mut::<PendingClicks>().0.push(position);
}

pub fn note(world: &World, entity: Entity) -> Option<Note> {
    world.get::<Note>(entity).copied()
}

pub fn judged_events(world: &World) -> Vec<NoteJudged> {
    let events = world.resource::<Events<NoteJudged>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).copied().collect()
}

pub fn count<C: bevy_ecs::component::Component>(world: &mut World) -> usize {
    world.query::<&C>().iter(world).count()
}

pub fn note_positions(world: &mut World) -> Vec<(NoteId, Vec2)> {
    let mut notes: Vec<(NoteId, Vec2)> = world
        .query::<(&Note, &Position)>()
        .iter(world)
        .map(|(note, position)| (note.id, position.0))
        .collect();
    notes.sort_by_key(|(id, _)| *id);
    notes
}

/// A game over `track` with default config and no video, started at time zero.
pub fn create_test_game(track: BeatTrack) -> Game {
    create_test_game_with(track, SessionConfig::default(), VideoInfo::none())
}

pub fn create_test_game_with(track: BeatTrack, config: SessionConfig, video: VideoInfo) -> Game {
    Game::new(config, track, video, test_rng(), 0.0).expect("Game should be created")
}

/// Ticks `game` at every frame boundary in `(from, to]`, returning the last tick time.
pub fn run_until(game: &mut Game, from: f64, to: f64) -> f64 {
    let mut now = from;
    let mut frame = (from / TICK).round() as u64;
    loop {
        frame += 1;
        let next = frame as f64 * TICK;
        if next > to + 1e-9 {
            break;
        }
        now = next;
        game.tick(now, TickInput::idle());
    }
    now
}

/// Spawn times of every note currently in the world.
pub fn spawn_times(game: &mut Game) -> Vec<f64> {
    let mut times: Vec<(NoteId, f64)> = game
        .world
        .query::<&Note>()
        .iter(&game.world)
        .map(|note| (note.id, note.spawned_at))
        .collect();
    times.sort_by_key(|(id, _)| *id);
    times.into_iter().map(|(_, at)| at).collect()
}
