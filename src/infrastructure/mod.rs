//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema (db)
//! - Reference data seeding (seed)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Password hashing and tokens (auth)
//! - Repository implementations and the unit of work
//! - Application state (state)

pub mod auth;
pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;
pub mod unit_of_work;

pub use repositories::*;
pub use state::AppState;
pub use unit_of_work::{SeaOrmTransaction, SeaOrmUnitOfWork};
