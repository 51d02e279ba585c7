//! Model resolution and incremental generation.
//!
//! A [`ModelResolver`] turns a session and a `<provider>/<model>` ID into a
//! [`ModelHandle`], either through the router on behalf of the session's user,
//! or from a fixed registry of scripted models. A handle streams text
//! fragments or partial structured objects.

mod auth;
pub mod error;
pub mod model;
pub mod partial;
pub mod provider;
mod registry;
mod resolve;
pub mod router;
pub mod smooth;

pub use auth::ConnectionAuthorizer;
pub use error::{Error, ErrorKind};
pub use model::{
    Chunking, LanguageModel, ModelHandle, ObjectRequest, ObjectStream, TextRequest, TextStream,
};
pub use registry::ModelRegistry;
pub use resolve::{
    ModelResolver, RegistryResolver, RoutedResolver, resolve_model_handle, resolver_for,
};
