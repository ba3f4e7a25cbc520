//! The plan-node surface the renderer needs from an engine's operators.

use std::fmt;
use std::sync::Arc;

use polyalg_core::id::OperatorId;
use polyalg_core::schema::DataModel;
use polyalg_digest::uniquify;

use crate::args::{ArgumentValue, PolyAlgArgs};

/// An algebra operator instance as seen by the PolyAlg layer.
pub trait AlgNode: Send + Sync + fmt::Debug {
    /// Identity of the implementation, used to look up its schema.
    fn operator_id(&self) -> OperatorId;

    fn inputs(&self) -> &[NodeRef];

    fn output_field_names(&self) -> Vec<String>;

    fn data_model(&self) -> DataModel {
        DataModel::Relational
    }

    /// Current argument values, keyed by parameter name.
    fn bind_arguments(&self) -> PolyAlgArgs {
        PolyAlgArgs::default()
    }

    fn is_auxiliary(&self) -> bool {
        false
    }
}

pub type NodeRef = Arc<dyn AlgNode>;

/// Planning context handed to node creators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgCluster {
    pub default_model: DataModel,
}

impl AlgCluster {
    pub fn new(default_model: DataModel) -> Self {
        Self { default_model }
    }
}

/// Node built by the built-in creators. It keeps the parsed arguments as
/// given and exposes the unique input fields, or the `names` argument of a
/// leaf such as `REL_VALUES`.
#[derive(Debug, Clone)]
pub struct GenericNode {
    identity: OperatorId,
    model: DataModel,
    inputs: Vec<NodeRef>,
    fields: Vec<String>,
    args: PolyAlgArgs,
}

impl GenericNode {
    pub fn new(identity: OperatorId, model: DataModel, args: PolyAlgArgs, inputs: Vec<NodeRef>) -> Self {
        let fields = if inputs.is_empty() {
            leaf_field_names(&args)
        } else {
            let names: Vec<String> = inputs.iter().flat_map(|i| i.output_field_names()).collect();
            uniquify(&names)
        };
        Self {
            identity,
            model,
            inputs,
            fields,
            args,
        }
    }
}

fn leaf_field_names(args: &PolyAlgArgs) -> Vec<String> {
    match args.get_by_name("names") {
        Some(ArgumentValue::List(list)) => list
            .args
            .iter()
            .filter_map(|a| match a {
                ArgumentValue::Str(Some(s)) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl AlgNode for GenericNode {
    fn operator_id(&self) -> OperatorId {
        self.identity.clone()
    }

    fn inputs(&self) -> &[NodeRef] {
        &self.inputs
    }

    fn output_field_names(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn data_model(&self) -> DataModel {
        self.model
    }

    fn bind_arguments(&self) -> PolyAlgArgs {
        self.args.clone()
    }
}

/// Output field names of all inputs, concatenated left to right and
/// optionally made unique.
pub fn input_field_names(node: &dyn AlgNode, make_unique: bool) -> Vec<String> {
    let names: Vec<String> = node
        .inputs()
        .iter()
        .flat_map(|i| i.output_field_names())
        .collect();
    if make_unique {
        uniquify(&names)
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_leaf_takes_its_names_argument() {
        let args = PolyAlgArgs::new().with(
            "names",
            ArgumentValue::list(vec![ArgumentValue::str("a"), ArgumentValue::str("b")]),
        );
        let leaf = GenericNode::new(OperatorId::new("LogicalRelValues"), DataModel::Relational, args, vec![]);
        assert_eq!(leaf.output_field_names(), vec!["a", "b"]);
        assert!(leaf.inputs().is_empty());
    }

    #[test]
    fn generic_node_uniquifies_input_fields() {
        let names = |n: &[&str]| {
            PolyAlgArgs::new().with(
                "names",
                ArgumentValue::list(n.iter().map(|s| ArgumentValue::str(*s)).collect()),
            )
        };
        let values = OperatorId::new("LogicalRelValues");
        let left: NodeRef = Arc::new(GenericNode::new(values.clone(), DataModel::Relational, names(&["id", "x"]), vec![]));
        let right: NodeRef = Arc::new(GenericNode::new(values, DataModel::Relational, names(&["id"]), vec![]));
        let join = GenericNode::new(
            OperatorId::new("LogicalRelJoin"),
            DataModel::Relational,
            PolyAlgArgs::new(),
            vec![left, right],
        );
        assert_eq!(join.output_field_names(), vec!["id", "x", "id0"]);
        assert_eq!(join.data_model(), DataModel::Relational);
    }
}
