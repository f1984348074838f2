use std::f32::consts::TAU;

use bevy_ecs::{
    event::EventReader,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::constants::particle;
use crate::events::NoteJudged;
use crate::systems::render::Color;
use crate::systems::{GameRng, Particle, Position, TickTime, Tier, TimeToLive, Velocity};

/// Stops of the hue cycle used by excellent bursts.
const RAINBOW: [Color; 7] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 127, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(75, 0, 130),
    Color::rgb(148, 0, 211),
];

/// Color at `fraction` along the rainbow, interpolated between the two nearest stops.
pub fn rainbow_at(fraction: f32) -> Color {
    let scaled = fraction.clamp(0.0, 1.0) * (RAINBOW.len() - 1) as f32;
    let index = (scaled.floor() as usize).min(RAINBOW.len() - 2);
    RAINBOW[index].lerp(RAINBOW[index + 1], scaled - index as f32)
}

/// Color of particle `index` out of `count` in a burst for `tier`.
pub fn burst_color(tier: Tier, index: usize, count: usize) -> Color {
    match tier {
        Tier::Excellent => rainbow_at(index as f32 / count.max(1) as f32),
        Tier::Good | Tier::Miss => tier.color(),
    }
}

/// A random velocity with a uniform direction and a speed in the configured range.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    let speed = rng.random_range(particle::MIN_SPEED..=particle::MAX_SPEED);
    Vec2::from_angle(angle) * speed
}

/// Spawns a burst of particles for every judgment this tick.
pub fn particle_burst_system(
    mut commands: Commands,
    time: Res<TickTime>,
    mut rng: ResMut<GameRng>,
    mut judged: EventReader<NoteJudged>,
) {
    for event in judged.read() {
        trace!(id = event.id.0, tier = %event.tier, "Spawning particle burst");
        for i in 0..particle::BURST_COUNT {
            commands.spawn((
                Position(event.position),
                Velocity(random_velocity(&mut rng.0)),
                Particle {
                    color: burst_color(event.tier, i, particle::BURST_COUNT),
                    size: particle::SIZE,
                },
                TimeToLive::new(time.now, particle::LIFETIME),
            ));
        }
    }
}

/// Moves particles by their velocity once per tick.
pub fn particle_motion_system(mut particles: Query<(&mut Position, &Velocity), With<Particle>>) {
    for (mut position, velocity) in particles.iter_mut() {
        position.0 += velocity.0;
    }
}
