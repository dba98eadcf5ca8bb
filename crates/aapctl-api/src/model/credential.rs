use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Built-in "Machine" credential type.
pub const MACHINE_CREDENTIAL_TYPE: ResourceId = 1;
/// Built-in "Source Control" credential type.
pub const SCM_CREDENTIAL_TYPE: ResourceId = 2;

/// Credential (`/credentials/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub organization: ForeignRef,
    #[serde(default, skip_serializing_if = "ForeignRef::is_unset")]
    pub credential_type: ForeignRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<CredentialInputs>,
}

impl Credential {
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<ForeignRef>,
        credential_type: impl Into<ForeignRef>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            credential_type: credential_type.into(),
            ..Self::default()
        }
    }

    /// SSH / privilege escalation credential.
    pub fn machine(
        name: impl Into<String>,
        organization: impl Into<ForeignRef>,
        inputs: CredentialInputs,
    ) -> Self {
        Self {
            inputs: Some(inputs),
            ..Self::new(name, organization, MACHINE_CREDENTIAL_TYPE)
        }
    }

    /// Source control credential, referenced by projects.
    pub fn scm(
        name: impl Into<String>,
        organization: impl Into<ForeignRef>,
        inputs: CredentialInputs,
    ) -> Self {
        Self {
            inputs: Some(inputs),
            ..Self::new(name, organization, SCM_CREDENTIAL_TYPE)
        }
    }
}

impl Resource for Credential {
    const KIND: ResourceKind = ResourceKind::Credential;

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn set_id(&mut self, id: Option<ResourceId>) {
        self.id = id;
    }

    fn references(&self) -> Vec<(&'static str, &ForeignRef)> {
        vec![
            ("organization", &self.organization),
            ("credential_type", &self.credential_type),
        ]
    }

    fn missing_required(&self) -> Vec<&'static str> {
        missing(&[
            ("name", self.name.is_empty()),
            ("organization", self.organization.is_unset()),
            ("credential_type", self.credential_type.is_unset()),
        ])
    }

    fn overlay(&mut self, declared: &Self) {
        self.name.overlay_from(&declared.name);
        self.organization.overlay_from(&declared.organization);
        self.credential_type
            .overlay_from(&declared.credential_type);
        self.description.overlay_from(&declared.description);
        self.inputs.overlay_from(&declared.inputs);
    }
}

// ── Inputs ───────────────────────────────────────────────────────────

/// Credential input values, keyed by the credential type's input ids.
///
/// Contents are never interpreted here; the controller validates them
/// against the type's schema. `Debug` prints keys only.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialInputs(Map<String, Value>);

impl CredentialInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one input, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CredentialInputs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Debug for CredentialInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn machine_credential_body() {
        let inputs = CredentialInputs::new()
            .with("username", "deploy")
            .with("password", "hunter2")
            .with("become_method", "sudo");
        let cred = Credential::machine("ssh", 3, inputs);
        assert_eq!(
            serde_json::to_value(&cred).unwrap(),
            json!({
                "name": "ssh",
                "organization": 3,
                "credential_type": 1,
                "inputs": { "username": "deploy", "password": "hunter2", "become_method": "sudo" }
            })
        );
    }

    #[test]
    fn debug_hides_secret_values() {
        let inputs = CredentialInputs::new().with("password", "hunter2");
        let shown = format!("{:?}", Credential::scm("git", 3, inputs));
        assert!(shown.contains("password"));
        assert!(!shown.contains("hunter2"), "{shown}");
    }

    #[test]
    fn credential_type_is_required() {
        let cred = Credential::new("x", 3, 0);
        assert_eq!(cred.missing_required(), vec!["credential_type"]);
    }
}
