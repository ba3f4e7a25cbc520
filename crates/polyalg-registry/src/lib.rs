#![forbid(unsafe_code)]
//! polyalg-registry: declarative operator schemas and the registry that maps
//! operator implementations to them.
//!
//! Lifecycle:
//! - A `RegistryBuilder` is populated once (built-ins plus engine-specific
//!   operators and creators) and consumed by `build()`.
//! - The resulting `OperatorRegistry` is immutable and shared across threads;
//!   its JSON schema export is computed lazily and memoized.

pub mod args;
pub mod builtin;
pub mod declaration;
pub mod enums;
pub mod export;
pub mod node;
pub mod param;
pub mod registry;

pub use args::{
    AggregateCall, ArgumentValue, CollationDirection, EntityRef, FieldCollation, LaxAggregateCall,
    ListArg, PolyAlgArgs, RenderContext,
};
pub use declaration::{Arity, NodeCreator, OperatorSchema, OperatorSpec, OperatorTag};
pub use enums::{DistributionType, EnumValue, JoinAlgType, ModifyOperation, SemiJoinType};
pub use node::{input_field_names, AlgCluster, AlgNode, NodeRef};
pub use param::{ParamTag, ParamType, ParameterSchema, ParameterSpec, SimpleType};
pub use registry::{OperatorRegistry, RegistryBuilder};
