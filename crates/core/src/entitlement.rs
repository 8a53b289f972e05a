use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;
use crate::resource::{Resource, ResourceType};
use crate::value_object::ValueObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    #[default]
    Assignment,
    Permission,
}

/// A capability attached to a resource, identified by `(resource, slug)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub resource: Resource,
    pub slug: String,
    pub purpose: EntitlementPurpose,
    pub display_name: String,
    pub description: String,
    pub grantable_to: Vec<String>,
    pub annotations: Annotations,
}

impl ValueObject for Entitlement {}

impl Entitlement {
    /// `"<type>:<resource>:<slug>"`
    pub fn entitlement_id(resource: &Resource, slug: &str) -> String {
        format!("{}:{}", resource.id, slug)
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_grantable_to(mut self, resource_type: &ResourceType) -> Self {
        if !self.grantable_to.iter().any(|t| t == resource_type.id) {
            self.grantable_to.push(resource_type.id.to_string());
        }
        self
    }

    pub fn is_grantable_to(&self, resource_type: &str) -> bool {
        self.grantable_to.iter().any(|t| t == resource_type)
    }
}

/// Build an assignment (membership) entitlement on `resource`.
pub fn new_assignment_entitlement(resource: &Resource, slug: &str) -> Entitlement {
    Entitlement {
        id: Entitlement::entitlement_id(resource, slug),
        resource: resource.clone(),
        slug: slug.to_string(),
        purpose: EntitlementPurpose::Assignment,
        display_name: slug.to_string(),
        description: String::new(),
        grantable_to: Vec::new(),
        annotations: Annotations::new(),
    }
}
