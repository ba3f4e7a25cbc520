//! Built-in operator declarations for the relational, document and graph
//! models. Each comes with a creator building a `GenericNode`, except
//! `REL_CALC`; engines replace creators with `register_creator`.

use std::sync::Arc;

use polyalg_core::error::Result;
use polyalg_core::id::OperatorId;
use polyalg_core::schema::DataModel;

use crate::args::{ArgumentValue, ListArg, PolyAlgArgs};
use crate::declaration::{Arity, NodeCreator, OperatorSchema, OperatorSpec, OperatorTag};
use crate::enums::{EnumValue, JoinAlgType};
use crate::node::{AlgCluster, GenericNode, NodeRef};
use crate::param::{ParamTag, ParamType, ParameterSpec, SimpleType};
use crate::registry::RegistryBuilder;

// Logical operators double as allocation operators.
const LOG_ALL: &[OperatorTag] = &[OperatorTag::Logical, OperatorTag::Allocation];
const LOG_ALL_PRO: &[OperatorTag] = &[
    OperatorTag::Logical,
    OperatorTag::Allocation,
    OperatorTag::Advanced,
];

const REL: Option<DataModel> = Some(DataModel::Relational);
const DOC: Option<DataModel> = Some(DataModel::Document);
const LPG: Option<DataModel> = Some(DataModel::Graph);

fn p(name: &str, ty: ParamType) -> ParameterSpec {
    ParameterSpec::new(name, ty)
}

fn empty() -> ArgumentValue {
    ArgumentValue::empty_list()
}

/// A list holding one empty group.
fn nested_empty() -> ArgumentValue {
    ArgumentValue::List(ListArg::new(vec![empty()]))
}

fn sort_param() -> ParameterSpec {
    p("sort", ParamType::Collation)
        .alias("collation")
        .alias("order")
        .simple(SimpleType::SimpleCollation)
        .multi(1)
}

fn all_param() -> ParameterSpec {
    p("all", ParamType::Boolean)
        .simple(SimpleType::Hidden)
        .default_value(ArgumentValue::FALSE)
}

fn variables_param() -> ParameterSpec {
    p("variables", ParamType::CorrId)
        .simple(SimpleType::Hidden)
        .multi(1)
        .default_value(empty())
}

fn generic_creator(identity: &'static str, model: Option<DataModel>) -> NodeCreator {
    Arc::new(
        move |args: &PolyAlgArgs, children: Vec<NodeRef>, cluster: &AlgCluster| -> Result<NodeRef> {
            Ok(Arc::new(GenericNode::new(
                OperatorId::new(identity),
                model.unwrap_or(cluster.default_model),
                args.clone(),
                children,
            )))
        },
    )
}

fn add(b: &mut RegistryBuilder, identity: &'static str, spec: OperatorSpec) {
    let model = spec.data_model;
    add_without_creator(b, identity, spec.creator(generic_creator(identity, model)));
}

fn add_without_creator(b: &mut RegistryBuilder, identity: &'static str, spec: OperatorSpec) {
    b.register(OperatorId::new(identity), OperatorSchema::new(spec));
}

pub fn register_builtins(b: &mut RegistryBuilder) {
    register_relational(b);
    register_document(b);
    register_graph(b);

    add(
        b,
        "LogicalBatchIterator",
        OperatorSpec::new("BATCH_ITERATOR", None, Arity::Exact(1))
            .alias("BATCH")
            .tags(LOG_ALL_PRO),
    );
}

fn register_relational(b: &mut RegistryBuilder) {
    add(
        b,
        "LogicalRelProject",
        OperatorSpec::new("REL_PROJECT", REL, Arity::Exact(1))
            .alias("PROJECT")
            .alias("P")
            .alias("REL_PROJECT#")
            .alias("PROJECT#")
            .tags(LOG_ALL)
            .param(
                p("projects", ParamType::Rex)
                    .tag(ParamTag::Alias)
                    .tag(ParamTag::HideTrivial)
                    .multi(1),
            ),
    );
    for (identity, name, alias) in [
        ("LogicalRelScan", "REL_SCAN", "SCAN"),
        ("LogicalRelViewScan", "REL_VIEW_SCAN", "VIEW_SCAN"),
    ] {
        add(
            b,
            identity,
            OperatorSpec::new(name, REL, Arity::Exact(0))
                .alias(alias)
                .tags(LOG_ALL)
                .param(p("entity", ParamType::Entity).alias("table")),
        );
    }
    add(
        b,
        "LogicalRelFilter",
        OperatorSpec::new("REL_FILTER", REL, Arity::Exact(1))
            .alias("FILTER")
            .tags(LOG_ALL)
            .param(p("condition", ParamType::Rex).simple(SimpleType::RexPredicate))
            .param(variables_param()),
    );
    add(
        b,
        "LogicalRelAggregate",
        OperatorSpec::new("REL_AGGREGATE", REL, Arity::Exact(1))
            .alias("AGGREGATE")
            .alias("AGG")
            .tags(LOG_ALL)
            // a global aggregate has no group
            .param(p("group", ParamType::Field).multi(1).default_value(empty()))
            .param(
                p("groups", ParamType::Field)
                    .simple(SimpleType::Hidden)
                    .multi(2)
                    .default_value(nested_empty()),
            )
            .param(
                p("aggregates", ParamType::Aggregate)
                    .alias("aggs")
                    .simple(SimpleType::SimpleAgg)
                    .multi(1)
                    .default_value(empty()),
            ),
    );
    for (identity, name, alias, tags) in [
        ("LogicalRelMinus", "REL_MINUS", "MINUS", LOG_ALL),
        ("LogicalRelUnion", "REL_UNION", "UNION", LOG_ALL),
        ("LogicalRelIntersect", "REL_INTERSECT", "INTERSECT", LOG_ALL),
        ("LogicalModifyCollect", "REL_MODIFY_COLLECT", "MODIFY_COLLECT", LOG_ALL_PRO),
    ] {
        add(
            b,
            identity,
            OperatorSpec::new(name, REL, Arity::Any)
                .alias(alias)
                .tags(tags)
                .param(all_param()),
        );
    }
    add(
        b,
        "LogicalRelSort",
        OperatorSpec::new("REL_SORT", REL, Arity::Exact(1))
            .alias("SORT")
            .tags(LOG_ALL)
            .param(sort_param().default_value(empty()))
            .param(
                p("limit", ParamType::Rex)
                    .alias("fetch")
                    .simple(SimpleType::RexUint)
                    .default_value(ArgumentValue::null_rex()),
            )
            .param(
                p("offset", ParamType::Rex)
                    .simple(SimpleType::Hidden)
                    .default_value(ArgumentValue::null_rex()),
            ),
    );
    add(
        b,
        "LogicalRelJoin",
        OperatorSpec::new("REL_JOIN", REL, Arity::Exact(2))
            .alias("JOIN")
            .tags(LOG_ALL)
            .param(
                p("condition", ParamType::Rex)
                    .alias("on")
                    .simple(SimpleType::RexPredicate),
            )
            .param(
                p("type", ParamType::JoinTypeEnum)
                    .default_value(ArgumentValue::Enum(EnumValue::Join(JoinAlgType::Inner))),
            )
            .param(variables_param())
            .param(
                p("semiJoinDone", ParamType::Boolean)
                    .simple(SimpleType::Hidden)
                    .default_value(ArgumentValue::FALSE),
            ),
    );
    add_without_creator(
        b,
        "LogicalCalc",
        OperatorSpec::new("REL_CALC", REL, Arity::Exact(1))
            .alias("CALC")
            .tags(LOG_ALL_PRO)
            .param(p("exps", ParamType::Rex).multi(1))
            .param(p("projects", ParamType::Rex).tag(ParamTag::Alias).multi(1))
            .param(
                p("condition", ParamType::Rex)
                    .simple(SimpleType::RexPredicate)
                    .default_value(ArgumentValue::null_rex()),
            ),
    );
    add(
        b,
        "LogicalRelModify",
        OperatorSpec::new("REL_MODIFY", REL, Arity::Exact(1))
            .alias("MODIFY")
            .tags(LOG_ALL_PRO)
            .param(p("table", ParamType::Entity).alias("target"))
            .param(p("operation", ParamType::ModifyOpEnum))
            .param(
                p("targets", ParamType::String)
                    .alias("columns")
                    .multi(1)
                    .default_value(empty()),
            )
            .param(p("sources", ParamType::Rex).multi(1).default_value(empty()))
            .param(p("flattened", ParamType::Boolean).default_value(ArgumentValue::FALSE)),
    );
    add(
        b,
        "LogicalRelValues",
        OperatorSpec::new("REL_VALUES", REL, Arity::Exact(0))
            .alias("VALUES")
            .tags(LOG_ALL_PRO)
            .param(p("names", ParamType::String).multi(1))
            .param(p("tuples", ParamType::Rex).multi(2)),
    );
    add(
        b,
        "LogicalRelCorrelate",
        OperatorSpec::new("REL_CORRELATE", REL, Arity::Exact(2))
            .alias("CORRELATE")
            .tags(LOG_ALL_PRO)
            .param(p("id", ParamType::CorrId))
            .param(p("columns", ParamType::Rex))
            .param(p("joinType", ParamType::SemiJoinTypeEnum).alias("type")),
    );
    add(
        b,
        "LogicalRelExchange",
        OperatorSpec::new("REL_EXCHANGE", REL, Arity::Exact(1))
            .alias("EXCHANGE")
            .tags(LOG_ALL_PRO)
            .param(p("distributionType", ParamType::DistributionTypeEnum).alias("type"))
            .param(p("numbers", ParamType::Rex).multi(1).default_value(empty())),
    );
    add(
        b,
        "LogicalSortExchange",
        OperatorSpec::new("REL_SORT_EXCHANGE", REL, Arity::Exact(1))
            .alias("SORT_EXCHANGE")
            .tags(LOG_ALL_PRO)
            .param(sort_param())
            .param(p("distributionType", ParamType::DistributionTypeEnum).alias("type"))
            .param(p("numbers", ParamType::Rex).multi(1).default_value(empty())),
    );
}

fn register_document(b: &mut RegistryBuilder) {
    add(
        b,
        "LogicalDocumentScan",
        OperatorSpec::new("DOC_SCAN", DOC, Arity::Exact(0))
            .tags(LOG_ALL)
            .param(p("entity", ParamType::Entity)),
    );
    add(
        b,
        "LogicalDocumentFilter",
        OperatorSpec::new("DOC_FILTER", DOC, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(p("condition", ParamType::Rex).simple(SimpleType::RexPredicate)),
    );
    add(
        b,
        "LogicalDocumentSort",
        OperatorSpec::new("DOC_SORT", DOC, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(sort_param().default_value(empty()))
            .param(p("targets", ParamType::Rex).multi(1).default_value(empty()))
            .param(
                p("limit", ParamType::Rex)
                    .alias("fetch")
                    .simple(SimpleType::RexUint)
                    .default_value(ArgumentValue::null_rex()),
            )
            .param(
                p("offset", ParamType::Rex)
                    .simple(SimpleType::Hidden)
                    .default_value(ArgumentValue::null_rex()),
            ),
    );
    add(
        b,
        "LogicalDocumentUnwind",
        OperatorSpec::new("DOC_UNWIND", DOC, Arity::Exact(1))
            .tags(LOG_ALL_PRO)
            .param(p("path", ParamType::String)),
    );
    add(
        b,
        "LogicalDocumentProject",
        OperatorSpec::new("DOC_PROJECT", DOC, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(
                p("includes", ParamType::Rex)
                    .tag(ParamTag::Alias)
                    .requires_alias()
                    .multi(1)
                    .default_value(empty()),
            )
            .param(p("excludes", ParamType::String).multi(1).default_value(empty())),
    );
    add(
        b,
        "LogicalDocumentAggregate",
        OperatorSpec::new("DOC_AGGREGATE", DOC, Arity::Exact(1))
            .alias("DOC_AGG")
            .tags(LOG_ALL)
            .param(p("group", ParamType::Rex).default_value(ArgumentValue::null_rex()))
            .param(
                p("aggregates", ParamType::LaxAggregate)
                    .alias("aggs")
                    .multi(1)
                    .default_value(empty()),
            ),
    );
    add(
        b,
        "LogicalDocumentModify",
        OperatorSpec::new("DOC_MODIFY", DOC, Arity::Exact(1))
            .tags(LOG_ALL_PRO)
            .param(p("entity", ParamType::Entity))
            .param(p("operation", ParamType::ModifyOpEnum))
            .param(
                p("updates", ParamType::Rex)
                    .tag(ParamTag::Alias)
                    .requires_alias()
                    .multi(1)
                    .default_value(empty()),
            )
            .param(p("removes", ParamType::String).multi(1).default_value(empty()))
            .param(
                p("renames", ParamType::String)
                    .tag(ParamTag::Alias)
                    .requires_alias()
                    .multi(1)
                    .default_value(empty()),
            ),
    );
}

fn register_graph(b: &mut RegistryBuilder) {
    add(
        b,
        "LogicalLpgScan",
        OperatorSpec::new("LPG_SCAN", LPG, Arity::Exact(0))
            .tags(LOG_ALL)
            .param(p("entity", ParamType::Entity)),
    );
    add(
        b,
        "LogicalLpgMatch",
        OperatorSpec::new("LPG_MATCH", LPG, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(p("matches", ParamType::Rex).tag(ParamTag::Alias).multi(1)),
    );
    add(
        b,
        "LogicalLpgFilter",
        OperatorSpec::new("LPG_FILTER", LPG, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(p("condition", ParamType::Rex).simple(SimpleType::RexPredicate)),
    );
    add(
        b,
        "LogicalLpgProject",
        OperatorSpec::new("LPG_PROJECT", LPG, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(p("projects", ParamType::Rex).tag(ParamTag::Alias).multi(1)),
    );
    add(
        b,
        "LogicalLpgSort",
        OperatorSpec::new("LPG_SORT", LPG, Arity::Exact(1))
            .tags(LOG_ALL)
            .param(sort_param().default_value(empty()))
            .param(
                p("limit", ParamType::Integer)
                    .alias("fetch")
                    .tag(ParamTag::NonNegative)
                    .default_value(ArgumentValue::Int(None)),
            )
            .param(
                p("skip", ParamType::Integer)
                    .alias("offset")
                    .tag(ParamTag::NonNegative)
                    .simple(SimpleType::Hidden)
                    .default_value(ArgumentValue::Int(None)),
            ),
    );
    add(
        b,
        "LogicalLpgUnion",
        OperatorSpec::new("LPG_UNION", LPG, Arity::Any)
            .tags(LOG_ALL)
            .param(all_param()),
    );
    add(
        b,
        "LogicalLpgUnwind",
        OperatorSpec::new("LPG_UNWIND", LPG, Arity::Exact(1))
            .tags(LOG_ALL_PRO)
            .param(p("index", ParamType::Integer).tag(ParamTag::NonNegative))
            .param(p("alias", ParamType::String).default_value(ArgumentValue::Str(None))),
    );
    add(
        b,
        "LogicalLpgAggregate",
        OperatorSpec::new("LPG_AGGREGATE", LPG, Arity::Exact(1))
            .alias("LPG_AGG")
            .tags(LOG_ALL)
            .param(p("groups", ParamType::Rex).multi(1).default_value(empty()))
            .param(
                p("aggregates", ParamType::LaxAggregate)
                    .alias("aggs")
                    .multi(1)
                    .default_value(empty()),
            ),
    );
    add(
        b,
        "LogicalLpgModify",
        OperatorSpec::new("LPG_MODIFY", LPG, Arity::Exact(1))
            .tags(LOG_ALL_PRO)
            .param(p("entity", ParamType::Entity))
            .param(p("operation", ParamType::ModifyOpEnum))
            .param(
                p("updates", ParamType::Rex)
                    .alias("operations")
                    .multi(1)
                    .default_value(empty()),
            )
            .param(p("ids", ParamType::String).multi(1).default_value(empty())),
    );
}
