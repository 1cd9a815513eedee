use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ExperimentId;

/// An experiment groups pipeline runs.
///
/// `id` and `created_at` are assigned by the server and are left empty when
/// creating a new experiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExperimentId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_references: Vec<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_state: Option<StorageState>,
}

impl Experiment {
    pub fn new(name: impl Into<String>) -> Self {
        Experiment {
            name: name.into(),
            ..Experiment::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the experiment as owned by `namespace`, which multi-user
    /// deployments require on creation.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.resource_references.push(ResourceReference {
            key: ResourceKey {
                resource_type: ResourceType::Namespace,
                id: namespace.into(),
            },
            name: None,
            relationship: Relationship::Owner,
        });
        self
    }

    /// The namespace owning this experiment, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.resource_references
            .iter()
            .find(|r| r.key.resource_type == ResourceType::Namespace)
            .map(|r| r.key.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    pub key: ResourceKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub relationship: Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceKey {
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "UNKNOWN_RESOURCE_TYPE")]
    Unknown,
    #[serde(rename = "EXPERIMENT")]
    Experiment,
    #[serde(rename = "JOB")]
    Job,
    #[serde(rename = "PIPELINE")]
    Pipeline,
    #[serde(rename = "PIPELINE_VERSION")]
    PipelineVersion,
    #[serde(rename = "NAMESPACE")]
    Namespace,
}

impl Default for ResourceType {
    fn default() -> Self {
        ResourceType::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "UNKNOWN_RELATIONSHIP")]
    Unknown,
    #[serde(rename = "OWNER")]
    Owner,
    #[serde(rename = "CREATOR")]
    Creator,
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageState {
    #[serde(rename = "STORAGESTATE_AVAILABLE")]
    Available,
    #[serde(rename = "STORAGESTATE_ARCHIVED")]
    Archived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_experiment() {
        let body = r#"
        {
            "id": "5f1c2a",
            "name": "exp-1",
            "description": "first",
            "created_at": "2021-03-04T10:20:30Z",
            "resource_references": [
                { "key": { "type": "NAMESPACE", "id": "alice" }, "relationship": "OWNER" }
            ],
            "storage_state": "STORAGESTATE_AVAILABLE"
        }
        "#;
        let experiment = serde_json::from_str::<Experiment>(body).unwrap();
        assert_eq!(experiment.id, Some(ExperimentId::from("5f1c2a")));
        assert_eq!(experiment.name, "exp-1");
        assert_eq!(experiment.namespace(), Some("alice"));
        assert_eq!(experiment.storage_state, Some(StorageState::Available));
        assert_eq!(experiment.created_at.unwrap().to_rfc3339(), "2021-03-04T10:20:30+00:00");
    }

    #[test]
    fn new_experiment_omits_server_fields() {
        let experiment = Experiment::new("exp-1").in_namespace("alice");
        let json = serde_json::to_value(&experiment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "exp-1",
                "resource_references": [
                    { "key": { "type": "NAMESPACE", "id": "alice" }, "relationship": "OWNER" }
                ]
            })
        );
    }
}
