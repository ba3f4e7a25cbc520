//! JSON form of operator trees for plan visualizations.

use polyalg_core::config::RenderConfig;
use polyalg_core::error::Result;
use polyalg_core::id::OperatorId;
use polyalg_core::schema::DataModel;
use polyalg_registry::{input_field_names, AlgNode, OperatorRegistry, ParamType, RenderContext};
use serde_json::{json, Map, Value};

use crate::auxiliary::{get_aux_projections, AuxProjection};
use crate::cost::{AlgCost, CostAccessor};
use crate::metadata::{GlobalStats, PlanNodeMetadata};

/// Identity whose schema names the implicit rename projection.
pub(crate) const RENAME_PROJECT: OperatorId = OperatorId::new("LogicalRelProject");

pub struct SerializeContext<'a> {
    pub registry: &'a OperatorRegistry,
    pub costs: &'a dyn CostAccessor,
    pub stats: &'a GlobalStats,
    pub config: &'a RenderConfig,
}

/// `(op name, first positional parameter name)` of the rename projection.
pub(crate) fn rename_operator(registry: &OperatorRegistry) -> (String, String) {
    let schema = registry.lookup_by_identity(&RENAME_PROJECT, DataModel::Relational, 1);
    let param = schema
        .get_positional(0)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "projects".to_string());
    (format!("{}#", schema.op_name()), param)
}

/// Computes `GlobalStats` for the tree, then serializes it.
pub fn serialize_plan(
    root: &dyn AlgNode,
    registry: &OperatorRegistry,
    costs: &dyn CostAccessor,
    config: &RenderConfig,
) -> Result<Value> {
    let stats = GlobalStats::compute(root, costs);
    let ctx = SerializeContext {
        registry,
        costs,
        stats: &stats,
        config,
    };
    serialize_node(root, &ctx)
}

/// `{opName, arguments, metadata, inputs}` for `node` and its subtree.
pub fn serialize_node(node: &dyn AlgNode, ctx: &SerializeContext<'_>) -> Result<Value> {
    serialize_subtree(node, ctx).map(|(json, _)| json)
}

/// Serializes `node` and returns its cumulative cost alongside, so each
/// node's cost is read once.
fn serialize_subtree(node: &dyn AlgNode, ctx: &SerializeContext<'_>) -> Result<(Value, AlgCost)> {
    let inputs = node.inputs();
    let schema = ctx
        .registry
        .lookup_by_identity(&node.operator_id(), node.data_model(), inputs.len());
    let field_names = input_field_names(node, ctx.config.uniquify_input_names);
    let render_ctx = RenderContext::new(field_names.clone());
    let arguments = node.bind_arguments().to_json(&schema, &render_ctx)?;

    let mut children = Vec::with_capacity(inputs.len());
    let mut inputs_cumulative = AlgCost::default();
    let mut start = 0;
    for child in inputs {
        let (child_json, child_cumulative) = serialize_subtree(child.as_ref(), ctx)?;
        inputs_cumulative = inputs_cumulative.plus(child_cumulative);
        let projection = if schema.might_require_auxiliary_project() {
            get_aux_projections(child.as_ref(), &field_names, start)
        } else {
            None
        };
        start += child.output_field_names().len();
        children.push(match projection {
            Some(p) => wrap_in_rename(child_json, &p, ctx)?,
            None => child_json,
        });
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(op = %schema.op_name(), inputs = children.len(), "serialized node");

    let mut out = Map::new();
    out.insert("opName".into(), json!(schema.op_name()));
    out.insert("arguments".into(), arguments);
    let mut cumulative = AlgCost::default();
    if ctx.config.include_metadata {
        cumulative = ctx.costs.cumulative_cost_from(node, inputs_cumulative);
        let mut metadata = PlanNodeMetadata::new(node.is_auxiliary());
        metadata.add_costs(
            ctx.costs.non_cumulative_cost(node),
            cumulative,
            ctx.costs.tuple_count(node).unwrap_or(0.0),
            ctx.stats,
            ctx.config.badge_epsilon,
        );
        out.insert("metadata".into(), metadata.to_json());
    }
    out.insert("inputs".into(), Value::Array(children));
    Ok((Value::Object(out), cumulative))
}

fn wrap_in_rename(child: Value, projection: &AuxProjection, ctx: &SerializeContext<'_>) -> Result<Value> {
    let (op_name, param) = rename_operator(ctx.registry);
    let value = projection.to_list_arg().to_json(&RenderContext::empty())?;
    let mut arguments = Map::new();
    arguments.insert(
        param,
        json!({
            "type": ParamType::List.name(),
            "innerType": ParamType::String.name(),
            "value": value,
        }),
    );

    let mut out = Map::new();
    out.insert("opName".into(), json!(op_name));
    out.insert("arguments".into(), Value::Object(arguments));
    if ctx.config.include_metadata {
        out.insert("metadata".into(), PlanNodeMetadata::new(true).to_json());
    }
    out.insert("inputs".into(), json!([child]));
    Ok(Value::Object(out))
}
