use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Custom inventory script (`/inventory_scripts/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryScript {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub organization: ForeignRef,
    /// Script body, starting with a shebang line.
    #[serde(default)]
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for InventoryScript {
    const KIND: ResourceKind = ResourceKind::InventoryScript;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        vec![("organization", &self.organization)]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[
            ("name", self.name.is_empty()),
            ("organization", self.organization.is_unset()),
            ("script", self.script.is_empty()),
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.organization.overlay_from(&declared.organization);
        self.script.overlay_from(&declared.script);
        self.description.overlay_from(&declared.description);
    }
}
