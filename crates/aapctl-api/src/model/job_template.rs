use serde::{Deserialize, Serialize};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Job template (`/job_templates/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTemplate {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    /// `run` or `check`.
    #[serde(default)]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub inventory: ForeignRef,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub project: ForeignRef,
    /// Playbook path relative to the project root.
    #[serde(default)]
    pub playbook: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    /// 0 (normal) through 5 (WinRM debug).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_vars: Option<String>,
}

impl JobTemplate {
    pub fn new(
        name: impl Into<String>,
        job_type: impl Into<String>,
        inventory: impl Into<ForeignRef>,
        project: impl Into<ForeignRef>,
        playbook: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            job_type: job_type.into(),
            inventory: inventory.into(),
            project: project.into(),
            playbook: playbook.into(),
            ..Self::default()
        }
    }
}

impl Resource for JobTemplate {
    const KIND: ResourceKind = ResourceKind::JobTemplate;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        vec![("inventory", &self.inventory), ("project", &self.project)]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[
            ("name", self.name.is_empty()),
            ("job_type", self.job_type.is_empty()),
            ("inventory", self.inventory.is_unset()),
            ("project", self.project.is_unset()),
            ("playbook", self.playbook.is_empty()),
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.job_type.overlay_from(&declared.job_type);
        self.inventory.overlay_from(&declared.inventory);
        self.project.overlay_from(&declared.project);
        self.playbook.overlay_from(&declared.playbook);
        self.description.overlay_from(&declared.description);
        self.forks.overlay_from(&declared.forks);
        self.limit.overlay_from(&declared.limit);
        self.verbosity.overlay_from(&declared.verbosity);
        self.extra_vars.overlay_from(&declared.extra_vars);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn explicit_zero_verbosity_is_sent() {
        let jt = JobTemplate {
            verbosity: Some(0),
            ..JobTemplate::new("deploy", "run", 3, 5, "site.yml")
        };
        let body = serde_json::to_value(&jt).unwrap();
        assert_eq!(body["verbosity"], json!(0));
        assert!(body.get("forks").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn missing_required_lists_every_gap() {
        let jt = JobTemplate::new("deploy", "", 0, 5, "");
        assert_eq!(jt.missing_required(), vec!["job_type", "inventory", "playbook"]);
    }
}
