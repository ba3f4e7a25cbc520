//! Implicit rename projections.
//!
//! Operators with several inputs see the concatenation of their inputs'
//! field names, made unique. When a child's own names differ from its slice
//! of that list, the child is wrapped in a projection that renames it.

use polyalg_registry::{AlgNode, ArgumentValue, ListArg};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxProjection {
    /// Field names as produced by the child.
    pub sources: Vec<String>,
    /// Names the parent refers to them by.
    pub targets: Vec<String>,
}

impl AuxProjection {
    /// Field-name arguments aliased to their target names.
    pub fn to_list_arg(&self) -> ListArg {
        ListArg::with_aliases(
            self.sources.iter().map(ArgumentValue::str).collect(),
            self.targets.clone(),
        )
    }
}

/// Projection renaming all of `child`'s fields to
/// `input_field_names[start..]`, or `None` if no field needs renaming.
pub fn get_aux_projections(
    child: &dyn AlgNode,
    input_field_names: &[String],
    start: usize,
) -> Option<AuxProjection> {
    let sources = child.output_field_names();
    let targets: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(i, own)| input_field_names.get(start + i).unwrap_or(own).clone())
        .collect();
    if sources == targets {
        None
    } else {
        Some(AuxProjection { sources, targets })
    }
}
