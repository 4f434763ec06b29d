//! REST API module.
//!
//! Contains all API routes and handlers.

mod admin;
mod auth;
mod content;
mod feed;
mod interactions;
mod tags;

pub use admin::*;
pub use auth::*;
pub use content::*;
pub use feed::*;
pub use interactions::*;
pub use tags::*;
