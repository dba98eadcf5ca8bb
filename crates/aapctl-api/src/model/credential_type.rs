use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ForeignRef, Overlay, Resource, ResourceId, ResourceKind, missing};

/// Custom credential type (`/credential_types/`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialType {
    #[serde(default, skip_serializing)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    /// `cloud` or `net` for user-defined types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input schema (`{"fields": [...], "required": [...]}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Value>,
    /// Injector templates (`{"env": {...}, "extra_vars": {...}}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injectors: Option<Value>,
}

impl CredentialType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for CredentialType {
    const KIND: ResourceKind = ResourceKind::CredentialType;

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
        self.kind.overlay_from(&declared.kind);
        self.description.overlay_from(&declared.description);
        self.inputs.overlay_from(&declared.inputs);
        self.injectors.overlay_from(&declared.injectors);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn schema_blobs_pass_through() {
        let inputs = json!({ "fields": [{ "id": "api_token", "type": "string", "secret": true }] });
        let injectors = json!({ "env": { "API_TOKEN": "{{ api_token }}" } });
        let ct = CredentialType {
            kind: Some("cloud".into()),
            inputs: Some(inputs.clone()),
            injectors: Some(injectors.clone()),
            ..CredentialType::new("Vault token")
        };
        let body = serde_json::to_value(&ct).unwrap();
        assert_eq!(body["inputs"], inputs);
        assert_eq!(body["injectors"], injectors);
        assert!(body.get("description").is_none());
    }
}
