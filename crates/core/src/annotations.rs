//! Annotations attached to resources, entitlements and grants.
//!
//! Resource traits (user/role shape) travel as annotations, the same way the
//! governance platform carries them.

use serde::{Deserialize, Serialize};

use crate::resource::{RoleTrait, UserTrait};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    UserTrait(UserTrait),
    RoleTrait(RoleTrait),
    /// The driver must not ask for entitlements or grants of this resource type.
    SkipEntitlementsAndGrants,
    /// Grant requested for an edge that already held; nothing was written.
    GrantAlreadyExists,
    /// Revoke requested for an edge that did not hold; nothing was written.
    GrantAlreadyRevoked,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, annotation: Annotation) -> Self {
        self.0.push(annotation);
        self
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn user_trait(&self) -> Option<&UserTrait> {
        self.0.iter().find_map(|a| match a {
            Annotation::UserTrait(t) => Some(t),
            _ => None,
        })
    }

    pub fn role_trait(&self) -> Option<&RoleTrait> {
        self.0.iter().find_map(|a| match a {
            Annotation::RoleTrait(t) => Some(t),
            _ => None,
        })
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.0.iter().any(|a| a == annotation)
    }

    pub fn skips_entitlements_and_grants(&self) -> bool {
        self.0
            .iter()
            .any(|a| matches!(a, Annotation::SkipEntitlementsAndGrants))
    }
}
