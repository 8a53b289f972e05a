//! `gatesync-core`: governance-platform value types.
//!
//! Resources, entitlements, grants and their construction helpers. This crate
//! is pure data: no IO, no upstream knowledge.

pub mod annotations;
pub mod entitlement;
pub mod error;
pub mod grant;
pub mod id;
pub mod metadata;
pub mod pagination;
pub mod resource;
pub mod value_object;

pub use annotations::{Annotation, Annotations};
pub use entitlement::{Entitlement, EntitlementPurpose, new_assignment_entitlement};
pub use error::{ConnectorError, ConnectorResult, ResourceError};
pub use grant::{Grant, new_grant};
pub use id::{ResourceId, SessionId};
pub use metadata::{
    AccountCreationSchema, AccountField, AccountInfo, AccountProvisioningDetails,
    ConnectorMetadata, CreateAccountResponse, CredentialOption,
};
pub use pagination::{Page, PaginationToken};
pub use resource::{
    AccountType, Email, PlaintextData, Profile, Resource, ResourceType, RoleTrait, TraitKind,
    UserStatus, UserTrait, new_role_resource, new_user_resource,
};
pub use value_object::ValueObject;
