//! Registry population, lookup and schema export.


use std::sync::Arc;

use plan_fixtures::*;
use polyalg_core::error::{Error, Result};
use polyalg_core::id::OperatorId;
use polyalg_core::schema::DataModel;
use polyalg_registry::{
    AlgCluster, Arity, ArgumentValue, NodeCreator, NodeRef, OperatorRegistry, OperatorSchema,
    OperatorSpec, ParamType, ParameterSpec, PolyAlgArgs, RegistryBuilder,
};

fn filter_creator() -> NodeCreator {
    Arc::new(
        |args: &PolyAlgArgs, children: Vec<NodeRef>, _cluster: &AlgCluster| -> Result<NodeRef> {
            let fields = children
                .first()
                .map(|c| c.output_field_names())
                .unwrap_or_default();
            Ok(node("LogicalRelFilter", children, fields, args.clone()))
        },
    )
}

#[test]
fn global_registry_holds_all_builtins() {
    let r = OperatorRegistry::global();
    assert_eq!(r.len(), 34);
    for name in ["REL_SCAN", "REL_FILTER", "DOC_UNWIND", "LPG_MATCH", "BATCH_ITERATOR"] {
        assert!(r.contains_name(name), "{name} missing");
    }
    assert!(std::ptr::eq(r, OperatorRegistry::global()));
}

#[test]
fn names_and_identities_stay_in_sync() {
    let r = RegistryBuilder::with_builtins().build();
    for (name, identity) in r.names() {
        let schema = r
            .lookup_schema_by_name(name)
            .unwrap_or_else(|| panic!("{name} has no schema"));
        assert!(
            schema.op_name() == name || schema.op_aliases().iter().any(|a| a == name),
            "{name} resolves to {identity}, declared as {}",
            schema.op_name()
        );
    }
    for (identity, schema) in r.iter() {
        assert_eq!(r.lookup_by_name(schema.op_name()), Some(identity));
    }
}

#[test]
fn aliases_resolve_to_the_same_identity() {
    let r = RegistryBuilder::with_builtins().build();
    assert_eq!(r.lookup_by_name("FILTER"), r.lookup_by_name("REL_FILTER"));
    assert_eq!(r.lookup_by_name("REL_PROJECT#"), r.lookup_by_name("P"));
    assert_eq!(
        r.lookup_by_name("REL_FILTER"),
        Some(&OperatorId::new("LogicalRelFilter"))
    );
}

#[test]
#[should_panic(expected = "already used")]
fn duplicate_names_are_rejected() {
    let mut b = RegistryBuilder::with_builtins();
    b.register(
        OperatorId::new("MyFilter"),
        OperatorSchema::new(OperatorSpec::new("MY_FILTER", Some(DataModel::Relational), Arity::Exact(1)).alias("FILTER")),
    );
}

#[test]
#[should_panic(expected = "registered twice")]
fn duplicate_identities_are_rejected() {
    let mut b = RegistryBuilder::with_builtins();
    b.register(
        OperatorId::new("LogicalRelFilter"),
        OperatorSchema::new(OperatorSpec::new("OTHER_FILTER", Some(DataModel::Relational), Arity::Exact(1))),
    );
}

#[test]
fn unregistered_identities_get_a_synthesized_schema() {
    let r = RegistryBuilder::with_builtins().build();
    let schema = r.lookup_by_identity(
        &OperatorId::new("engine::rel::EnumerableHashJoin"),
        DataModel::Relational,
        2,
    );
    assert_eq!(schema.op_name(), "EnumerableHashJoin");
    assert_eq!(schema.arity(), Arity::Exact(2));
    assert_eq!(schema.data_model(), Some(DataModel::Relational));
    assert!(schema.parameters().next().is_none());
}

#[test]
fn export_is_computed_once() {
    let r = RegistryBuilder::with_builtins().build();
    let first = r.export_schema();
    let second = r.export_schema();
    assert!(std::ptr::eq(first, second));
    assert_eq!(r.export_fingerprint().unwrap(), r.export_fingerprint().unwrap());
}

#[test]
fn export_lists_declarations_and_enums() {
    let r = RegistryBuilder::with_builtins().build();
    let export = r.export_schema();

    let filter = &export["declarations"]["REL_FILTER"];
    assert_eq!(filter["numInputs"], 1);
    assert_eq!(filter["model"], "RELATIONAL");
    assert_eq!(filter["posParams"][0]["name"], "condition");
    assert_eq!(filter["kwParams"][0]["name"], "variables");
    assert!(filter.get("notRegistered").is_none());
    assert_eq!(export["declarations"]["REL_CALC"]["notRegistered"], true);

    assert_eq!(export["declarations"]["REL_UNION"]["numInputs"], -1);
    assert!(export["enums"]["JOIN_TYPE_ENUM"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "INNER"));
    assert!(export["enums"]["AggFunctionOperator"].is_array());
}

#[test]
fn export_computed_before_extension_stays_stale() {
    let r = RegistryBuilder::with_builtins().build();
    let before = r.export_schema().clone();

    let mut b = r.extend();
    b.register(
        OperatorId::new("LogicalRelSample"),
        OperatorSchema::new(OperatorSpec::new("REL_SAMPLE", Some(DataModel::Relational), Arity::Exact(1))),
    );
    let r = b.build();

    assert!(r.contains_name("REL_SAMPLE"));
    assert_eq!(r.export_schema(), &before);
    assert!(r.export_schema()["declarations"].get("REL_SAMPLE").is_none());
}

#[test]
fn export_computed_after_extension_includes_new_operators() {
    let mut b = RegistryBuilder::with_builtins().build().extend();
    b.register(
        OperatorId::new("LogicalRelSample"),
        OperatorSchema::new(OperatorSpec::new("REL_SAMPLE", Some(DataModel::Relational), Arity::Exact(1))),
    );
    let r = b.build();
    assert!(r.export_schema()["declarations"].get("REL_SAMPLE").is_some());
}

#[test]
fn creators_build_nodes_through_the_schema() {
    let mut b = RegistryBuilder::with_builtins();
    b.register_creator("FILTER", filter_creator()).unwrap();
    let r = b.build();
    let schema = r.lookup_schema_by_name("REL_FILTER").unwrap();
    assert!(schema.has_creator());
    assert!(r.export_schema()["declarations"]["REL_FILTER"]
        .get("notRegistered")
        .is_none());

    let args = PolyAlgArgs::new().with("condition", ArgumentValue::rex(greater_than(0, 10)));
    let cluster = AlgCluster::new(DataModel::Relational);
    let built = schema
        .create_node(&args, vec![scan("emps", &["id", "name"])], &cluster)
        .unwrap();
    assert_eq!(built.operator_id(), OperatorId::new("LogicalRelFilter"));
    assert_eq!(built.output_field_names(), names(&["id", "name"]));

    let err = schema.create_node(&args, vec![], &cluster).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = schema
        .create_node(&PolyAlgArgs::new(), vec![scan("emps", &["id"])], &cluster)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn creating_without_a_creator_is_not_implemented() {
    let r = RegistryBuilder::with_builtins().build();
    let calc = r.lookup_schema_by_name("REL_CALC").unwrap();
    let err = calc
        .create_node(&PolyAlgArgs::new(), vec![scan("emps", &["id"])], &AlgCluster::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)));
}

#[test]
fn creator_for_unknown_operator_fails() {
    let mut b = RegistryBuilder::new();
    let err = b.register_creator("NOPE", filter_creator()).unwrap_err();
    assert!(matches!(err, Error::UnknownOperator(ref n) if n == "NOPE"));
}

#[test]
fn custom_schemas_keep_parameter_order() {
    let schema = OperatorSchema::new(
        OperatorSpec::new("WINDOWED", Some(DataModel::Relational), Arity::Exact(1))
            .param(ParameterSpec::new("size", ParamType::Integer))
            .param(ParameterSpec::new("step", ParamType::Integer))
            .param(ParameterSpec::new("lenient", ParamType::Boolean).default_value(ArgumentValue::FALSE)),
    );
    let pos: Vec<&str> = schema.positional_params().iter().map(|p| p.name()).collect();
    assert_eq!(pos, ["size", "step"]);
    assert_eq!(schema.keyword_params()[0].name(), "lenient");
    assert!(!schema.can_unpack_values());
}
