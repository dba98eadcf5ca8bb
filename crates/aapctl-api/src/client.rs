// Typed CRUD executor over the controller REST API.
//
// One call = one logical operation on one object = one HTTP exchange.
// Preconditions (identity, required fields, references) are checked before
// anything is sent; responses are hydrated back into the record type.

use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::classify::{check_status, decode};
use crate::error::Error;
use crate::model::{Resource, ResourceId};
use crate::transport::{Auth, HttpTransport, TransportConfig};

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    /// The controller removed the object.
    Removed,
    /// The object was already gone (HTTP 404).
    AlreadyAbsent,
}

/// CRUD client for every [`Resource`] type.
///
/// Holds no state beyond the transport; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    transport: HttpTransport,
}

impl ControllerClient {
    /// Build a client for the controller at `base_url`.
    pub fn new(base_url: &Url, auth: &Auth, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: HttpTransport::new(base_url, auth, config)?,
        })
    }

    pub fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    // ── CRUD ─────────────────────────────────────────────────────────

    /// Fetch one object by identity.
    pub async fn get<T: Resource>(&self, id: ResourceId) -> Result<T, Error> {
        let path = T::KIND.object_path(id);
        require_positive(&Method::GET, &path, id)?;

        let resp = self.transport.execute(Method::GET, &path, None).await?;
        let body = check_status(&Method::GET, &path, resp)?;
        let mut record: T = decode(&Method::GET, &path, body)?;
        record.set_id(Some(id));
        Ok(record)
    }

    /// Create `record` and return the server's view of it, identity included.
    pub async fn create<T: Resource>(&self, record: &T) -> Result<T, Error> {
        let path = T::KIND.collection_path();
        if let Some(id) = record.id() {
            return Err(invalid(
                &Method::POST,
                &path,
                format!("{} already has identity {id}", T::KIND),
            ));
        }
        let payload = request_body(&Method::POST, &path, record)?;

        let resp = self
            .transport
            .execute(Method::POST, &path, Some(&payload))
            .await?;
        let body = check_status(&Method::POST, &path, resp)?;
        let created: T = decode(&Method::POST, &path, body.clone())?;

        match created.id() {
            Some(id) if id > 0 => {
                debug!(kind = %T::KIND, id, "created");
                Ok(created)
            }
            _ => Err(Error::Decode {
                method: Method::POST,
                path,
                message: "response carries no identity".into(),
                body,
            }),
        }
    }

    /// Send `record` as a partial update to its own address.
    ///
    /// Only fields that are set go on the wire. The returned record keeps
    /// the identity it was addressed by.
    pub async fn update<T: Resource>(&self, record: &T) -> Result<T, Error> {
        let Some(id) = record.id() else {
            return Err(invalid(
                &Method::PATCH,
                &T::KIND.collection_path(),
                format!("{} has no identity; create it first", T::KIND),
            ));
        };
        let path = T::KIND.object_path(id);
        require_positive(&Method::PATCH, &path, id)?;
        let payload = request_body(&Method::PATCH, &path, record)?;

        let resp = self
            .transport
            .execute(Method::PATCH, &path, Some(&payload))
            .await?;
        let body = check_status(&Method::PATCH, &path, resp)?;
        let mut updated: T = decode(&Method::PATCH, &path, body)?;
        updated.set_id(Some(id));
        Ok(updated)
    }

    /// Delete by identity. A 404 counts as success.
    pub async fn delete<T: Resource>(&self, id: ResourceId) -> Result<Deleted, Error> {
        let path = T::KIND.object_path(id);
        require_positive(&Method::DELETE, &path, id)?;

        let resp = self.transport.execute(Method::DELETE, &path, None).await?;
        match check_status(&Method::DELETE, &path, resp) {
            Ok(_) => Ok(Deleted::Removed),
            Err(Error::NotFound { .. }) => {
                warn!(kind = %T::KIND, id, "delete target already absent");
                Ok(Deleted::AlreadyAbsent)
            }
            Err(e) => Err(e),
        }
    }
}

// ── Preconditions ────────────────────────────────────────────────────

fn invalid(method: &Method, path: &str, message: String) -> Error {
    Error::InvalidRequest {
        method: method.clone(),
        path: path.to_owned(),
        message,
    }
}

fn require_positive(method: &Method, path: &str, id: ResourceId) -> Result<(), Error> {
    if id > 0 {
        Ok(())
    } else {
        Err(invalid(method, path, format!("identity must be positive, got {id}")))
    }
}

/// Validate `record` and build its JSON body.
fn request_body<T: Resource>(
    method: &Method,
    path: &str,
    record: &T,
) -> Result<serde_json::Value, Error> {
    let gaps = record.missing_required();
    if !gaps.is_empty() {
        return Err(invalid(
            method,
            path,
            format!("missing required field(s): {}", gaps.join(", ")),
        ));
    }
    if let Some((field, raw)) = record
        .references()
        .into_iter()
        .find(|(_, r)| r.is_invalid())
    {
        return Err(invalid(
            method,
            path,
            format!("invalid reference in `{field}`: \"{raw}\""),
        ));
    }
    serde_json::to_value(record).map_err(|e| invalid(method, path, e.to_string()))
}
