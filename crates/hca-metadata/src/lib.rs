//! Typed entity graph for HCA metadata bundles.
//!
//! A bundle is a versioned snapshot of an experiment's metadata: donors,
//! specimens, cell suspensions, processes, protocols and data files, plus the
//! link records that connect them. [`Bundle`] turns the raw JSON documents
//! of a bundle into typed [`Entity`] values and wires them into a graph that
//! can be queried without touching the JSON again.
//!
//! Property values are read with the schema-version aware resolver from
//! [`hca_lookup`].

pub mod age;
pub mod bundle;
pub mod entity;
pub mod error;
pub mod link;
pub mod manifest;
pub mod registry;
pub mod traversal;

mod fields;

#[cfg(test)]
mod fixtures;

pub use bundle::{Bundle, BundleLoader, DeprecationPolicy, Layout};
pub use entity::{Entity, EntityBody};
pub use error::{BundleError, EntityError, LinkError, TypeLookupError};
pub use link::{Direction, Link};
pub use manifest::ManifestEntry;
pub use registry::{Category, EntityKind};
pub use traversal::EntityVisitor;
