//! PolyAlg text rendering.
//!
//! ```text
//! REL_JOIN[=(id, id0)](
//!   REL_SCAN[public.emps],
//!   REL_PROJECT#[id AS id0, name AS name0](
//!     REL_SCAN[public.depts]))
//! ```

use polyalg_core::config::RenderConfig;
use polyalg_core::error::Result;
use polyalg_core::hash::{fingerprint_str, Fingerprint};
use polyalg_core::rex::RexNode;
use polyalg_digest::digest_with_names;
use polyalg_registry::{input_field_names, AlgNode, OperatorRegistry, RenderContext};

use crate::auxiliary::get_aux_projections;
use crate::json::rename_operator;

pub fn render_to_text(
    node: &dyn AlgNode,
    registry: &OperatorRegistry,
    config: &RenderConfig,
) -> Result<String> {
    let mut sb = String::new();
    build(node, registry, config, 0, &mut sb)?;
    Ok(sb)
}

fn build(
    node: &dyn AlgNode,
    registry: &OperatorRegistry,
    config: &RenderConfig,
    depth: usize,
    sb: &mut String,
) -> Result<()> {
    let inputs = node.inputs();
    let schema = registry.lookup_by_identity(&node.operator_id(), node.data_model(), inputs.len());
    let field_names = input_field_names(node, config.uniquify_input_names);
    let ctx = RenderContext::new(field_names.clone());
    let args = node
        .bind_arguments()
        .to_polyalg(&schema, &ctx, config.elide_default_keywords)?;

    sb.push_str(&config.indent_str(depth));
    sb.push_str(schema.op_name());
    sb.push_str(&args);
    if inputs.is_empty() {
        return Ok(());
    }

    sb.push_str("(\n");
    let mut start = 0;
    for (i, child) in inputs.iter().enumerate() {
        let projection = if schema.might_require_auxiliary_project() {
            get_aux_projections(child.as_ref(), &field_names, start)
        } else {
            None
        };
        start += child.output_field_names().len();
        match projection {
            Some(p) => {
                let (op_name, _) = rename_operator(registry);
                let renames = p.to_list_arg().render(&RenderContext::empty(), true)?;
                sb.push_str(&config.indent_str(depth + 1));
                sb.push_str(&format!("{}[{}](\n", op_name, renames));
                build(child.as_ref(), registry, config, depth + 2, sb)?;
                sb.push(')');
            }
            None => build(child.as_ref(), registry, config, depth + 1, sb)?,
        }
        if i + 1 < inputs.len() {
            sb.push_str(",\n");
        }
    }
    sb.push(')');
    Ok(())
}

/// Text of a lone expression over the given field names.
pub fn render_expression(rex: &RexNode, field_names: &[String]) -> Result<String> {
    digest_with_names(rex, field_names)
}

pub fn plan_fingerprint(text: &str) -> Fingerprint {
    fingerprint_str(text)
}
