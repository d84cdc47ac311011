//! HTTP adapters - REST API implementations.
//!
//! `game` exposes the session operations; `layers` holds the cross-cutting
//! tower middleware applied by the binary.

pub mod game;
mod layers;

pub use game::{game_router, GameAppState};
pub use layers::{cors_layer, with_middleware};
