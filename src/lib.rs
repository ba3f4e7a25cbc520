#![forbid(unsafe_code)]
//! polyalg: the PolyAlgebra layer of a multi-model query engine.
//!
//! Re-exports the member crates under one roof:
//! - `polyalg_core`: data types, values, expressions, config, errors
//! - `polyalg_digest`: canonical expression text
//! - `polyalg_registry`: operator schemas and the operator registry
//! - `polyalg_serialize`: plan text/JSON rendering and display metadata

pub use polyalg_core;
pub use polyalg_digest;
pub use polyalg_registry;
pub use polyalg_serialize;

pub use polyalg_core::{Error, RenderConfig, Result};
pub use polyalg_registry::{AlgNode, NodeRef, OperatorRegistry, RegistryBuilder};
pub use polyalg_serialize::{render_to_text, serialize_plan};
