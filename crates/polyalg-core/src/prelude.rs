//! Convenient re-exports for downstream crates.

pub use crate::config::RenderConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::{fingerprint_serde, fingerprint_str, Fingerprint};
pub use crate::id::{ConventionId, CorrelationId, OperatorId};
pub use crate::rex::{
    Kind, NullDirection, Operator, RexCall, RexFieldCollation, RexLiteral, RexNode, RexOver,
    RexWindow, Syntax, WindowBound,
};
pub use crate::schema::{AlgDataType, DataModel, PolyType, TypeField};
pub use crate::value::{EdgeDirection, GraphElement, PolyEdge, PolyNode, PolyPath, PolyValue};
