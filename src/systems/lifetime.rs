use bevy_ecs::{
    component::Component,
    entity::Entity,
    system::{Commands, Query, Res},
};

use crate::systems::TickTime;

/// Component for entities that are despawned once the session clock passes a deadline
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TimeToLive {
    pub expires_at: f64,
}

impl TimeToLive {
    /// Lives for `seconds` starting at `now`.
    pub fn new(now: f64, seconds: f64) -> Self {
        Self {
            expires_at: now + seconds,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }
}

/// Despawns every entity whose [`TimeToLive`] has run out
pub fn time_to_live_system(mut commands: Commands, time: Res<TickTime>, query: Query<(Entity, &TimeToLive)>) {
    for (entity, ttl) in query.iter() {
        if ttl.is_expired(time.now) {
            commands.entity(entity).despawn();
        }
    }
}
