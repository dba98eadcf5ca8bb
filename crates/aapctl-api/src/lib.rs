// aapctl-api: Async Rust client for the automation controller REST API

pub mod classify;
pub mod client;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{ControllerClient, Deleted};
pub use error::{Error, ErrorClass};
pub use model::{ForeignRef, Resource, ResourceId, ResourceKind};
pub use reqwest::Method;
pub use transport::{Auth, HttpTransport, RawResponse, TlsMode, TransportConfig};
