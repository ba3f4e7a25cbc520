//! polyalg-core: shared types for the PolyAlgebra layer.
//!
//! Everything here is pure data: data types and models, multi-model values,
//! the scalar expression tree (`RexNode`), identifiers, render configuration
//! and stable hashing. Rendering lives in `polyalg-digest`, operator schemas in
//! `polyalg-registry`.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod rex;
pub mod schema;
pub mod value;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use hash::Fingerprint;
pub use id::{ConventionId, CorrelationId, OperatorId};
pub use rex::{Kind, Operator, RexNode, Syntax};
pub use schema::{AlgDataType, DataModel, PolyType, TypeField};
pub use value::{EdgeDirection, GraphElement, PolyEdge, PolyNode, PolyPath, PolyValue};
