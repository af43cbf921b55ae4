pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod security;
pub mod services;

// Seeding helpers shared by unit and integration tests
#[doc(hidden)]
pub mod testing;

pub use app::{app, AppState};
