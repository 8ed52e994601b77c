//! HTTP API handlers for fq-server

pub mod game;
pub mod health;
pub mod robots;

pub use game::game_routes;
pub use health::health_routes;
pub use robots::robots_routes;
