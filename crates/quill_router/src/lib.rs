//! Client for the bring-your-own-key model router.
//!
//! Every client is scoped to a single user connection. The router forwards
//! requests to the provider named in the model ID, using the credentials the
//! user attached to that connection.

mod client;
mod error;
pub mod types;

pub use client::{CONNECTION_HEADER, ChunkStream, Client};
pub use error::Error;
