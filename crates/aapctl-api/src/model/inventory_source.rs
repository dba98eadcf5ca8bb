use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Inventory source (`/inventory_sources/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySource {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub inventory: ForeignRef,
    /// `scm`, `ec2`, `gce`, `azure_rm`, `vmware`, ...
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inventory file inside the source project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_vars: Option<String>,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub credential: ForeignRef,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub source_project: ForeignRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_on_launch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_cache_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite_vars: Option<bool>,
}

impl InventorySource {
    pub fn new(
        name: impl Into<String>,
        inventory: impl Into<ForeignRef>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            inventory: inventory.into(),
            source: source.into(),
            ..Self::default()
        }
    }
}

impl Resource for InventorySource {
    const KIND: ResourceKind = ResourceKind::InventorySource;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        vec![
            ("inventory", &self.inventory),
            ("credential", &self.credential),
            ("source_project", &self.source_project),
        ]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[
            ("name", self.name.is_empty()),
            ("inventory", self.inventory.is_unset()),
            ("source", self.source.is_empty()),
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.inventory.overlay_from(&declared.inventory);
        self.source.overlay_from(&declared.source);
        self.description.overlay_from(&declared.description);
        self.source_path.overlay_from(&declared.source_path);
        self.source_vars.overlay_from(&declared.source_vars);
        self.credential.overlay_from(&declared.credential);
        self.source_project.overlay_from(&declared.source_project);
        self.update_on_launch
            .overlay_from(&declared.update_on_launch);
        self.update_cache_timeout
            .overlay_from(&declared.update_cache_timeout);
        self.overwrite.overlay_from(&declared.overwrite);
        self.overwrite_vars.overlay_from(&declared.overwrite_vars);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn optional_references_are_omitted_when_unset() {
        let src = InventorySource {
            source_path: Some("inventory/hosts.yml".into()),
            source_project: ForeignRef::Ref(6),
            ..InventorySource::new("from git", 4, "scm")
        };
        assert_eq!(
            serde_json::to_value(&src).unwrap(),
            json!({
                "name": "from git",
                "inventory": 4,
                "source": "scm",
                "source_path": "inventory/hosts.yml",
                "source_project": 6
            })
        );
        let names: Vec<_> = src.references().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["inventory", "credential", "source_project"]);
    }

    #[test]
    fn null_credential_hydrates_as_unset() {
        let src: InventorySource = serde_json::from_value(json!({
            "id": 12, "name": "ec2", "inventory": 4, "source": "ec2",
            "credential": null, "source_project": null, "overwrite": false
        }))
        .unwrap();
        assert!(src.credential.is_unset());
        assert_eq!(src.overwrite, Some(false));
    }
}
