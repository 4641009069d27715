//! Core: configuration, shared state, server and bootstrap errors
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - state shared by every handler
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup and serve errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
