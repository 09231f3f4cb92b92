//! SpacePortals core - menu/session glue for a portal arcade game
//!
//! Core modules:
//! - `game`: engine-free event-driven core (model, view seam, presenter)
//! - `timer`: second-elapsed and fixed-update notification sources
//! - `spawn`: headless ball/effect/portal world
//! - `audio`: mixer seam (Web Audio backend on wasm)
//! - `settings`: persisted player preferences
//! - `records`: persisted session records

pub mod audio;
pub mod game;
pub mod records;
pub mod settings;
pub mod spawn;
pub mod timer;

pub use game::model::{BallKind, Model, ModelInit, Screen};
pub use game::presenter::{Links, Presenter};
pub use records::Records;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena radius (the playfield is a disc centred on the origin)
    pub const ARENA_RADIUS: f32 = 400.0;
    /// Balls further than this from the centre are lost
    pub const BALL_LOSS_RADIUS: f32 = 440.0;
    /// Margin kept between a spawned effect and the arena wall
    pub const EFFECT_SPAWN_MARGIN: f32 = 40.0;

    /// Portal anchor positions, mirrored across the centre
    pub const PORTAL_HOME_A: (f32, f32) = (-250.0, 0.0);
    pub const PORTAL_HOME_B: (f32, f32) = (250.0, 0.0);
    /// Minimum separation of a shuffled portal pair
    pub const PORTAL_MIN_SEPARATION: f32 = 200.0;

    /// Seconds between swap-portals events in a round
    pub const SWAP_PORTALS_PERIOD: f32 = 3.0;
    /// Seconds between collectible-effect spawns in a round
    pub const EFFECT_SPAWN_PERIOD: f32 = 2.0;

    /// Downward acceleration applied to free balls (pixels/s²)
    pub const BALL_GRAVITY: f32 = 60.0;
    /// Sideways impulse applied per fixed update while an arrow is held
    pub const ARROW_IMPULSE: f32 = 14.0;

    /// Fixed update step driven by the frame clock
    pub const FIXED_DT: f32 = 1.0 / 60.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
