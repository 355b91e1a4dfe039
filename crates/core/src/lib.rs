//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod events;
pub mod rng;
pub mod state;
pub mod store;

pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use rng::*;
pub use state::*;
pub use store::*;
