//! JSON description of a registry, consumed by UIs to offer operators,
//! parameters and enum choices.

use polyalg_core::error::Result;
use serde_json::{json, Map, Value};

use crate::args::RenderContext;
use crate::declaration::OperatorSchema;
use crate::enums::AGG_FUNCTIONS;
use crate::param::{ParamType, ParameterSchema};
use crate::registry::OperatorRegistry;

pub(crate) fn build_export(registry: &OperatorRegistry) -> Value {
    let mut declarations = Map::new();
    for (_, schema) in registry.iter() {
        declarations.insert(schema.op_name().to_string(), declaration_json(schema));
    }

    let mut enums = Map::new();
    for ty in ParamType::ENUM_TYPES {
        if let Some(values) = ty.enum_values() {
            enums.insert(ty.name().to_string(), json!(values));
        }
    }
    enums.insert("AggFunctionOperator".to_string(), json!(AGG_FUNCTIONS));

    json!({ "declarations": declarations, "enums": enums })
}

pub fn declaration_json(schema: &OperatorSchema) -> Value {
    let can_unpack = schema.can_unpack_values();
    let pos: Vec<Value> = schema
        .positional_params()
        .iter()
        .enumerate()
        .map(|(i, p)| parameter_json(p, i == 0 && can_unpack))
        .collect();
    let kw: Vec<Value> = schema
        .keyword_params()
        .iter()
        .map(|p| parameter_json(p, false))
        .collect();
    let tags: Vec<&str> = schema.tags().iter().map(|t| t.name()).collect();

    let mut out = Map::new();
    out.insert("name".into(), json!(schema.op_name()));
    out.insert("aliases".into(), json!(schema.op_aliases()));
    out.insert("model".into(), json!(schema.data_model().map(|m| m.name())));
    if let Some(c) = schema.convention() {
        out.insert("convention".into(), json!(c.as_str()));
    }
    out.insert("numInputs".into(), json!(schema.arity().num_inputs()));
    out.insert("tags".into(), json!(tags));
    out.insert("posParams".into(), Value::Array(pos));
    out.insert("kwParams".into(), Value::Array(kw));
    if !schema.has_creator() {
        out.insert("notRegistered".into(), json!(true));
    }
    if schema.is_not_fully_implemented() {
        out.insert("notFullyImplemented".into(), json!(true));
    }
    Value::Object(out)
}

fn default_json(param: &ParameterSchema) -> Option<Result<Value>> {
    param
        .default_value()
        .map(|d| d.to_json(&RenderContext::empty()))
}

pub fn parameter_json(param: &ParameterSchema, can_unpack_values: bool) -> Value {
    let tags: Vec<&str> = param.tags().iter().map(|t| t.name()).collect();
    let mut out = Map::new();
    out.insert("name".into(), json!(param.name()));
    out.insert("aliases".into(), json!(param.aliases()));
    out.insert("tags".into(), json!(tags));
    out.insert("type".into(), json!(param.param_type().name()));
    if let Some(simple) = param.simple_type() {
        out.insert("simpleType".into(), json!(simple.name()));
    }
    out.insert("multiValued".into(), json!(param.multiplicity()));
    out.insert("requiresAlias".into(), json!(param.requires_alias()));
    if let Some(Ok(value)) = default_json(param) {
        out.insert("defaultValue".into(), value);
    }
    if let Some(text) = param.default_polyalg() {
        out.insert("defaultPolyAlg".into(), json!(text));
    }
    out.insert("isEnum".into(), json!(param.param_type().is_enum()));
    if can_unpack_values {
        out.insert("canUnpackValues".into(), json!(true));
    }
    Value::Object(out)
}
