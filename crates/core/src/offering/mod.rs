//! Offerings: the raw backend product shape and its projection into listing
//! and detail models.

pub mod model;
pub mod project;
pub mod raw;

pub use model::{BillingPeriod, Category, Offering, OfferingDetail, Plan};
pub use project::{default_credit_grant, project, project_detail, resolve_category};
pub use raw::{AttributeValue, MetadataEntry, RawAttribute, RawProduct, RawVariant};
