use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Organization (`/organizations/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Host limit; `0` on the server means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hosts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_virtualenv: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for Organization {
    const KIND: ResourceKind = ResourceKind::Organization;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        Vec::new()
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[("name", self.name.is_empty())])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.description.overlay_from(&declared.description);
        self.max_hosts.overlay_from(&declared.max_hosts);
        self.custom_virtualenv
            .overlay_from(&declared.custom_virtualenv);
    }
}
