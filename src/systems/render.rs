//! Turns the world into a flat list of draw intents.
//!
//! The core never touches a renderer. Each tick [`render_system`] rebuilds [`DrawList`],
//! back to front, and the host rasterizes it however it likes.

use bevy_ecs::{
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::Vec2;

use crate::constants::field;
use crate::systems::note::{badge_alpha, badge_scale};
use crate::systems::{Note, Particle, Position, SessionState, TickTime, Tier, VideoCursor};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation per channel; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// A single thing to draw, in play-field pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A decoded background video frame, by index.
    Background { frame: usize },
    /// A black rectangle over the whole field.
    Overlay { alpha: u8 },
    /// A growing note.
    Note { position: Vec2, radius: f32, color: Color },
    /// The tier badge of a judged note. `scale` and `alpha` are in `[0, 1]`.
    Badge {
        position: Vec2,
        tier: Tier,
        scale: f32,
        alpha: f32,
    },
    Particle { position: Vec2, color: Color, size: f32 },
    Text { text: String, position: Vec2, color: Color },
}

/// The draw intents of the latest tick, back to front.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DrawList(pub Vec<DrawCommand>);

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.0
    }
}

/// The HUD line showing the running score.
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

pub fn render_system(
    time: Res<TickTime>,
    session: Res<SessionState>,
    cursor: Res<VideoCursor>,
    notes: Query<(&Position, &Note)>,
    particles: Query<(&Position, &Particle)>,
    mut draw_list: ResMut<DrawList>,
) {
    let commands = &mut draw_list.0;
    commands.clear();

    if let Some(frame) = cursor.current_frame() {
        commands.push(DrawCommand::Background { frame });
    }
    commands.push(DrawCommand::Overlay {
        alpha: field::OVERLAY_ALPHA,
    });

    // Older notes first, so newer ones land on top.
    let mut sorted: Vec<(&Position, &Note)> = notes.iter().collect();
    sorted.sort_by_key(|(_, note)| note.id);

    for (position, note) in sorted {
        match note.judged_at() {
            None => commands.push(DrawCommand::Note {
                position: position.0,
                radius: note.radius,
                color: note.color,
            }),
            Some(judged_at) => {
                let since = time.now - judged_at;
                commands.push(DrawCommand::Badge {
                    position: position.0,
                    tier: note.tier,
                    scale: badge_scale(since),
                    alpha: badge_alpha(since),
                });
            }
        }
    }

    for (position, particle) in particles.iter() {
        commands.push(DrawCommand::Particle {
            position: position.0,
            color: particle.color,
            size: particle.size,
        });
    }

    commands.push(DrawCommand::Text {
        text: score_text(session.score),
        position: field::SCORE_TEXT_POSITION,
        color: Color::WHITE,
    });
}
