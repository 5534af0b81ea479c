//! Bidirectional mapping between domain entities and flat models.
//!
//! # Invariants
//! - `to_model` is pure and total.
//! - `from_model` resolves every reference or fails as a whole; no partial
//!   entity is ever returned.
//! - `from_model(to_model(e)) == e` whenever every reference of `e` resolves.

use crate::error::RepoResult;
use crate::store::StoredModel;

mod data_source_converter;
mod task_converter;
mod version_converter;

pub use data_source_converter::DataSourceConverter;
pub use task_converter::TaskConverter;
pub use version_converter::VersionConverter;

pub trait ModelConverter {
    type Entity;
    type Model: StoredModel;

    fn to_model(&self, entity: &Self::Entity) -> Self::Model;

    fn from_model(&self, model: Self::Model) -> RepoResult<Self::Entity>;
}
