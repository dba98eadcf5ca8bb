// ── Reconciler ──
//
// Drives one managed object through its lifetime:
//
//   Unmanaged --create--> Managed --update*--> Managed --delete--> Unmanaged
//   Managed --read (404)--> Unmanaged   (drift)
//
// After every successful call the local record is replaced by the server's
// view, so server defaults are picked up. Identity is set only by create or
// adopt and cleared only by delete or drift. Every operation takes the
// object by `&mut`, so two calls can never race on the same object.
// Nothing is retried and nothing is rolled back.

use aapctl_api::{ControllerClient, Deleted, Resource, ResourceId};
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::resolver::ReferenceResolver;

/// Lifecycle state of a managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Never created, deleted, or gone remotely.
    Unmanaged,
    /// Backed by a remote object with this identity.
    Managed(ResourceId),
}

/// Result of a `read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The object exists; the local record was refreshed.
    Present,
    /// The object no longer exists remotely; the local identity was cleared.
    Gone,
}

/// What one `ensure` pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    /// The object had disappeared remotely and was created again.
    Recreated,
}

/// A locally held record plus the identity of its remote counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedObject<T> {
    record: T,
}

impl<T: Resource> ManagedObject<T> {
    /// Wrap caller-constructed desired state.
    pub fn new(record: T) -> Self {
        Self { record }
    }

    pub fn state(&self) -> ObjectState {
        match self.record.id() {
            Some(id) => ObjectState::Managed(id),
            None => ObjectState::Unmanaged,
        }
    }

    pub fn id(&self) -> Option<ResourceId> {
        self.record.id()
    }

    /// Last known state.
    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn into_record(self) -> T {
        self.record
    }

    fn require_id(&self) -> Result<ResourceId, CoreError> {
        self.record
            .id()
            .ok_or(CoreError::NotManaged { kind: T::KIND })
    }

    fn forget(&mut self) {
        self.record.set_id(None);
    }
}

/// Sequences CRUD calls for managed objects against one controller.
#[derive(Debug, Clone)]
pub struct Reconciler {
    client: ControllerClient,
}

impl Reconciler {
    pub fn new(client: ControllerClient) -> Self {
        Self { client }
    }

    /// Build a reconciler from explicit connection settings.
    pub fn connect(config: &ControllerConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_client()?))
    }

    pub fn client(&self) -> &ControllerClient {
        &self.client
    }

    // ── Lifecycle primitives ─────────────────────────────────────────

    /// Create the object remotely and hydrate it from the response.
    pub async fn create<T: Resource>(&self, obj: &mut ManagedObject<T>) -> Result<(), CoreError> {
        if let Some(id) = obj.id() {
            return Err(CoreError::AlreadyManaged { kind: T::KIND, id });
        }
        ReferenceResolver::check(&obj.record)?;

        let created = self.client.create(&obj.record).await?;
        info!(kind = %T::KIND, id = ?created.id(), "created");
        obj.record = created;
        Ok(())
    }

    /// Refresh from the controller. A 404 means drift, not failure.
    pub async fn read<T: Resource>(
        &self,
        obj: &mut ManagedObject<T>,
    ) -> Result<Observation, CoreError> {
        let id = obj.require_id()?;
        match self.client.get::<T>(id).await {
            Ok(fetched) => {
                debug!(kind = %T::KIND, id, "refreshed");
                obj.record = fetched;
                Ok(Observation::Present)
            }
            Err(e) if e.is_not_found() => {
                warn!(kind = %T::KIND, id, "object disappeared remotely");
                obj.forget();
                Ok(Observation::Gone)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overlay `declared` on the last known record, send it, and hydrate.
    ///
    /// On failure the local record is left as it was; call `read` to
    /// resynchronize with whatever the controller applied.
    pub async fn update<T: Resource>(
        &self,
        obj: &mut ManagedObject<T>,
        declared: &T,
    ) -> Result<(), CoreError> {
        let id = obj.require_id()?;
        let mut merged = obj.record.clone();
        merged.overlay(declared);
        ReferenceResolver::check(&merged)?;

        let updated = self.client.update(&merged).await?;
        info!(kind = %T::KIND, id, "updated");
        obj.record = updated;
        Ok(())
    }

    /// Delete remotely. The local identity is cleared whatever the outcome.
    pub async fn delete<T: Resource>(
        &self,
        obj: &mut ManagedObject<T>,
    ) -> Result<Deleted, CoreError> {
        let id = obj.require_id()?;
        let result = self.client.delete::<T>(id).await;
        obj.forget();
        let outcome = result?;
        info!(kind = %T::KIND, id, ?outcome, "deleted");
        Ok(outcome)
    }

    // ── Higher-level passes ──────────────────────────────────────────

    /// Start managing an object that already exists remotely.
    pub async fn adopt<T: Resource>(&self, id: ResourceId) -> Result<ManagedObject<T>, CoreError> {
        let record = self.client.get::<T>(id).await?;
        info!(kind = %T::KIND, id, "adopted");
        Ok(ManagedObject::new(record))
    }

    /// One reconciliation pass toward `desired`.
    ///
    /// Creates when unmanaged, re-creates on drift, otherwise applies
    /// `desired` as an update.
    pub async fn ensure<T: Resource>(
        &self,
        obj: &mut ManagedObject<T>,
        desired: &T,
    ) -> Result<Action, CoreError> {
        if obj.id().is_none() {
            self.create_from(obj, desired).await?;
            return Ok(Action::Created);
        }
        match self.read(obj).await? {
            Observation::Gone => {
                self.create_from(obj, desired).await?;
                Ok(Action::Recreated)
            }
            Observation::Present => {
                self.update(obj, desired).await?;
                Ok(Action::Updated)
            }
        }
    }

    async fn create_from<T: Resource>(
        &self,
        obj: &mut ManagedObject<T>,
        desired: &T,
    ) -> Result<(), CoreError> {
        let mut fresh = desired.clone();
        fresh.set_id(None);
        let mut candidate = ManagedObject::new(fresh);
        self.create(&mut candidate).await?;
        *obj = candidate;
        Ok(())
    }
}
