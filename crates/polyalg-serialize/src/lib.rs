#![forbid(unsafe_code)]
//! polyalg-serialize: renders operator trees as PolyAlg text or as JSON for
//! plan visualizations.
//!
//! Cost figures come from an engine-provided `CostAccessor`; whole-plan maxima
//! (`GlobalStats`) are computed once per rendering and drive the per-node
//! badges and edge widths in `PlanNodeMetadata`.

pub mod auxiliary;
pub mod cost;
pub mod json;
pub mod metadata;
pub mod text;

pub use auxiliary::{get_aux_projections, AuxProjection};
pub use cost::{AlgCost, CostAccessor, NoCosts};
pub use json::{serialize_node, serialize_plan, SerializeContext};
pub use metadata::{Badge, BadgeLevel, GlobalStats, OutEdge, PlanNodeMetadata, TableRow};
pub use text::{plan_fingerprint, render_expression, render_to_text};
