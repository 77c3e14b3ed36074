//! Cartograph Core Library
//!
//! Shared types for the cartograph resource recorder.
//!
//! # Modules
//!
//! - [`ids`] - Stable external identifiers ([`LogicalId`])
//! - [`resource_type`] - The closed set of recorded resource types
//! - [`graph`] - The declared resource dependency graph and its
//!   topological order
//! - [`scope`] - Isolation boundaries for reconciliation ([`Scope`])
//! - [`error`] - Standardized error types ([`CoreError`])

pub mod error;
pub mod graph;
pub mod ids;
pub mod resource_type;
pub mod scope;

pub use error::{CoreError, Result};
pub use graph::{recorder_graph, DependencyGraph};
pub use ids::LogicalId;
pub use resource_type::ResourceType;
pub use scope::Scope;
