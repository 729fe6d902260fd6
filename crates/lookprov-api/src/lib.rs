// lookprov-api: async Rust client for the Looker 4.0 REST API

pub mod api_credentials;
pub mod auth;
pub mod client;
pub mod error;
pub mod folders;
pub mod model_sets;
pub mod models;
pub mod nullable;
pub mod setting;
pub mod transport;

pub use auth::{AuthStrategy, Credentials};
pub use client::{API_VERSION, ApiResponse, ListOptions, LookerClient};
pub use error::{Error, FieldError};
pub use nullable::Nullable;
pub use transport::{TlsMode, TransportConfig};
