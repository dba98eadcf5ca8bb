use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Playbook source project (`/projects/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub organization: ForeignRef,
    /// `git`, `svn`, `insights`, `archive`, ...
    #[serde(default)]
    pub scm_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_branch: Option<String>,
    /// SCM credential.
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub credential: ForeignRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_clean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_delete_on_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_update_on_launch: Option<bool>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scm_update_cache_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<ForeignRef>,
        scm_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            scm_type: scm_type.into(),
            ..Self::default()
        }
    }
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        vec![
            ("organization", &self.organization),
            ("credential", &self.credential),
        ]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[
            ("name", self.name.is_empty()),
            ("organization", self.organization.is_unset()),
            ("scm_type", self.scm_type.is_empty()),
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.organization.overlay_from(&declared.organization);
        self.scm_type.overlay_from(&declared.scm_type);
        self.description.overlay_from(&declared.description);
        self.scm_url.overlay_from(&declared.scm_url);
        self.scm_branch.overlay_from(&declared.scm_branch);
        self.credential.overlay_from(&declared.credential);
        self.scm_clean.overlay_from(&declared.scm_clean);
        self.scm_delete_on_update
            .overlay_from(&declared.scm_delete_on_update);
        self.scm_update_on_launch
            .overlay_from(&declared.scm_update_on_launch);
        self.scm_update_cache_timeout
            .overlay_from(&declared.scm_update_cache_timeout);
        self.local_path.overlay_from(&declared.local_path);
    }
}
