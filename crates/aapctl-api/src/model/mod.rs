//! Wire records for the objects the controller manages.
//!
//! Every record carries an optional remote identity, its required fields,
//! and its optional fields as explicit `Option`s. Absent optionals are
//! omitted from request bodies, so an update only touches what was set.

mod credential;
mod credential_type;
mod inventory;
mod inventory_script;
mod inventory_source;
mod job_template;
mod organization;
mod project;
mod reference;

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, IntoStaticStr};

pub use credential::{
    Credential, CredentialInputs, MACHINE_CREDENTIAL_TYPE, SCM_CREDENTIAL_TYPE,
};
pub use credential_type::CredentialType;
pub use inventory::Inventory;
pub use inventory_script::InventoryScript;
pub use inventory_source::InventorySource;
pub use job_template::JobTemplate;
pub use organization::Organization;
pub use project::Project;
pub use reference::ForeignRef;

/// Remote-assigned object identity.
pub type ResourceId = i64;

/// The object types the controller exposes as collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Organization,
    Inventory,
    Project,
    Credential,
    CredentialType,
    InventorySource,
    JobTemplate,
    InventoryScript,
}

impl ResourceKind {
    /// Path segment of the collection, e.g. `inventories`.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Organization => "organizations",
            Self::Inventory => "inventories",
            Self::Project => "projects",
            Self::Credential => "credentials",
            Self::CredentialType => "credential_types",
            Self::InventorySource => "inventory_sources",
            Self::JobTemplate => "job_templates",
            Self::InventoryScript => "inventory_scripts",
        }
    }

    /// `/{collection}/`
    pub fn collection_path(self) -> String {
        format!("/{}/", self.collection())
    }

    /// `/{collection}/{id}/`
    pub fn object_path(self, id: ResourceId) -> String {
        format!("/{}/{id}/", self.collection())
    }
}

/// A record the CRUD executor can send to and hydrate from the controller.
pub trait Resource: Serialize + DeserializeOwned + Clone + Debug + Send + Sync {
    const KIND: ResourceKind;

    /// Remote identity; `None` until created.
    fn id(&self) -> Option<ResourceId>;

    fn set_id(&mut self, id: Option<ResourceId>);

    /// Foreign reference fields by wire name.
    fn references(&self) -> Vec<(&'static str, &ForeignRef)>;

    /// Wire names of required fields that are empty or unset.
    fn missing_required(&self) -> Vec<&'static str>;

    /// Apply the caller's declared fields on top of the last known record.
    ///
    /// Set values win; unset ones keep what `self` already holds. Identity
    /// is never touched.
    fn overlay(&mut self, declared: &Self);
}

// ── Field helpers ────────────────────────────────────────────────────

/// Per-field overlay of a declared value onto a known one.
pub(crate) trait Overlay {
    fn overlay_from(&mut self, declared: &Self);
}

impl<T: Clone> Overlay for Option<T> {
    fn overlay_from(&mut self, declared: &Self) {
        if declared.is_some() {
            self.clone_from(declared);
        }
    }
}

impl Overlay for String {
    fn overlay_from(&mut self, declared: &Self) {
        if !declared.is_empty() {
            self.clone_from(declared);
        }
    }
}

impl Overlay for ForeignRef {
    fn overlay_from(&mut self, declared: &Self) {
        if !declared.is_unset() {
            self.clone_from(declared);
        }
    }
}

/// Collect the names whose emptiness flag is set.
pub(crate) fn missing(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn paths_follow_collection_names() {
        assert_eq!(ResourceKind::JobTemplate.collection_path(), "/job_templates/");
        assert_eq!(ResourceKind::Inventory.object_path(3), "/inventories/3/");
        assert_eq!(
            ResourceKind::CredentialType.object_path(11),
            "/credential_types/11/"
        );
    }

    #[test]
    fn every_kind_has_a_distinct_collection() {
        let mut seen: Vec<&str> = ResourceKind::iter().map(ResourceKind::collection).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ResourceKind::InventorySource.to_string(), "inventory_source");
        let name: &'static str = ResourceKind::Organization.into();
        assert_eq!(name, "organization");
    }

    #[test]
    fn option_overlay_keeps_known_value_when_undeclared() {
        let mut known = Some(5);
        known.overlay_from(&None);
        assert_eq!(known, Some(5));
        known.overlay_from(&Some(8));
        assert_eq!(known, Some(8));
    }
}
