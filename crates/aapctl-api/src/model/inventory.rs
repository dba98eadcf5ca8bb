use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Inventory (`/inventories/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub organization: ForeignRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `""` for a normal inventory, `smart` or `constructed` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_filter: Option<String>,
    /// JSON or YAML text, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
}

impl Inventory {
    pub fn new(name: impl Into<String>, organization: impl Into<ForeignRef>) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            ..Self::default()
        }
    }
}

impl Resource for Inventory {
    const KIND: ResourceKind = ResourceKind::Inventory;

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
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.organization.overlay_from(&declared.organization);
        self.description.overlay_from(&declared.description);
        self.kind.overlay_from(&declared.kind);
        self.host_filter.overlay_from(&declared.host_filter);
        self.variables.overlay_from(&declared.variables);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn organization_is_required() {
        let inv = Inventory::new("web", 0);
        assert_eq!(inv.missing_required(), vec!["organization"]);
    }

    #[test]
    fn variables_stay_opaque() {
        let inv = Inventory {
            variables: Some("---\nhttp_port: 80\n".into()),
            ..Inventory::new("web", 2)
        };
        assert_eq!(
            serde_json::to_value(&inv).unwrap(),
            json!({ "name": "web", "organization": 2, "variables": "---\nhttp_port: 80\n" })
        );
    }

    #[test]
    fn overlay_keeps_server_defaults() {
        let mut known: Inventory = serde_json::from_value(json!({
            "id": 8, "name": "web", "organization": 2, "kind": "", "description": "old"
        }))
        .unwrap();
        let declared = Inventory {
            description: Some("new".into()),
            ..Inventory::default()
        };
        known.overlay(&declared);
        assert_eq!(known.id, Some(8));
        assert_eq!(known.name, "web");
        assert_eq!(known.kind.as_deref(), Some(""));
        assert_eq!(known.description.as_deref(), Some("new"));
    }
}
