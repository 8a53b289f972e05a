//! Infrastructure inventory: nodes, applications and databases.

use serde::{Deserialize, Serialize};

use crate::wire::{AppDocument, DatabaseDocument, ServerDocument};

/// SSH node registered with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Revision of the node record; stable key for the sync pass.
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub hostname: String,
}

impl From<ServerDocument> for Node {
    fn from(doc: ServerDocument) -> Self {
        Self {
            id: doc.metadata.revision,
            name: doc.metadata.name,
            namespace: doc.metadata.namespace,
            hostname: doc.hostname,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub uri: String,
}

impl From<AppDocument> for App {
    /// The legacy numeric id is used when set, the revision otherwise.
    fn from(doc: AppDocument) -> Self {
        let id = if doc.metadata.id != 0 {
            doc.metadata.id.to_string()
        } else {
            doc.metadata.revision
        };
        Self {
            id,
            name: doc.metadata.name,
            uri: doc.uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub protocol: String,
}

impl From<DatabaseDocument> for Database {
    fn from(doc: DatabaseDocument) -> Self {
        Self {
            id: doc.metadata.revision,
            name: doc.metadata.name,
            protocol: doc.protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{KIND_APP, Metadata};

    #[test]
    fn app_id_falls_back_to_revision() {
        let doc = |id: i64| AppDocument {
            kind: KIND_APP.into(),
            version: "v3".into(),
            metadata: Metadata {
                id,
                revision: "rev-7".into(),
                ..Metadata::named("grafana")
            },
            uri: "http://localhost:3000".into(),
        };

        assert_eq!(App::from(doc(42)).id, "42");
        assert_eq!(App::from(doc(0)).id, "rev-7");
    }
}
