//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod components;
pub mod input;
pub mod judge;
pub mod lifetime;
pub mod note;
pub mod particle;
pub mod render;
pub mod score;
pub mod spawn;
pub mod state;
pub mod video;

pub use self::components::*;
pub use self::input::*;
pub use self::judge::*;
pub use self::lifetime::*;
pub use self::note::*;
pub use self::particle::*;
pub use self::render::*;
pub use self::score::*;
pub use self::spawn::*;
pub use self::state::*;
pub use self::video::*;
