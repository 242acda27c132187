//! Player configuration and lifecycle models shared across hlsview crates.
#![allow(missing_docs)]

pub mod controls;
pub mod player;
mod raw;
pub mod source;
pub mod state;

pub use controls::PlayerControls;
pub use player::{
    DEFAULT_ERROR_MESSAGE, DEFAULT_HEIGHT, DEFAULT_WIDTH, PlayerModel,
};
pub use source::PlayerSource;
pub use state::PlayerState;
