//! Data models for the Pulsync content platform.
//!
//! Domain structs plus the request/response DTOs exposed over the REST API.

mod content;
mod feed;
mod interest;
mod tag;
mod user;

pub use content::*;
pub use feed::*;
pub use interest::*;
pub use tag::*;
pub use user::*;
