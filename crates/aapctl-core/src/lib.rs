//! Declarative reconciliation of automation controller resources.
//!
//! This crate sits between `aapctl-api` (typed CRUD over HTTP) and whatever
//! drives it (a CLI, an operator, a provisioning tool):
//!
//! - **[`Reconciler`]** sequences create / read / update / delete for one
//!   [`ManagedObject`] at a time, hydrating the local record from every
//!   response and treating a 404 on read as drift rather than failure.
//!   [`Reconciler::ensure`] runs a full pass toward desired state.
//!
//! - **[`ReferenceResolver`]** turns symbolic foreign references into
//!   remote identities and rejects malformed ones with
//!   [`CoreError::InvalidReference`].
//!
//! - **[`ControllerConfig`]** is the explicit connection description handed
//!   to a reconciler. No configuration is global.
//!
//! Ordering between dependent objects (an inventory before the job template
//! that points at it) is the caller's job; the engine keeps no graph.

pub mod config;
pub mod error;
pub mod reconciler;
pub mod resolver;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use reconciler::{Action, ManagedObject, ObjectState, Observation, Reconciler};
pub use resolver::ReferenceResolver;

pub use aapctl_api::model;
pub use aapctl_api::{ControllerClient, Deleted, ForeignRef, Resource, ResourceId, ResourceKind};
