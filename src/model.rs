//! Wire types returned by the `dag` endpoint.

use serde::{Deserialize, Serialize};

/// One pipeline stage or repo and the ids it reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    #[serde(rename = "parentIds", default)]
    pub parent_ids: Vec<String>,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, parent_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            parent_ids: parent_ids.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// A node with no parents (a source repo).
    pub fn root(id: impl Into<String>) -> Self {
        Self::new(id, &[])
    }
}

/// Decode a JSON array of node descriptors.
pub fn descriptors_from_json(body: &str) -> Result<Vec<NodeDescriptor>, serde_json::Error> {
    serde_json::from_str(body)
}
