//! Operator schemas: name, aliases, arity, tags and the ordered parameters of
//! one algebra operator.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use polyalg_core::error::{Error, Result};
use polyalg_core::id::ConventionId;
use polyalg_core::schema::DataModel;
use serde::{Deserialize, Serialize};

use crate::args::PolyAlgArgs;
use crate::node::{AlgCluster, NodeRef};
use crate::param::{ParameterSchema, ParameterSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorTag {
    Logical,
    Physical,
    Allocation,
    /// Only shown to advanced users.
    Advanced,
}

impl OperatorTag {
    pub fn name(&self) -> &'static str {
        match self {
            OperatorTag::Logical => "LOGICAL",
            OperatorTag::Physical => "PHYSICAL",
            OperatorTag::Allocation => "ALLOCATION",
            OperatorTag::Advanced => "ADVANCED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    Any,
}

impl Arity {
    /// `-1` for any number of inputs.
    pub fn num_inputs(&self) -> i64 {
        match self {
            Arity::Exact(n) => *n as i64,
            Arity::Any => -1,
        }
    }
}

/// Builds an operator node from parsed arguments and already-built children.
pub type NodeCreator =
    Arc<dyn Fn(&PolyAlgArgs, Vec<NodeRef>, &AlgCluster) -> Result<NodeRef> + Send + Sync>;

/// Plain description of an operator, validated by `OperatorSchema::new`.
#[derive(Clone)]
pub struct OperatorSpec {
    pub op_name: String,
    pub op_aliases: Vec<String>,
    /// `None` when the operator works on any data model.
    pub data_model: Option<DataModel>,
    pub convention: Option<ConventionId>,
    pub op_tags: Vec<OperatorTag>,
    pub arity: Arity,
    pub params: Vec<ParameterSpec>,
    pub creator: Option<NodeCreator>,
    pub not_fully_implemented: bool,
}

impl Default for OperatorSpec {
    fn default() -> Self {
        Self {
            op_name: String::new(),
            op_aliases: Vec::new(),
            data_model: None,
            convention: None,
            op_tags: Vec::new(),
            arity: Arity::Exact(1),
            params: Vec::new(),
            creator: None,
            not_fully_implemented: false,
        }
    }
}

impl OperatorSpec {
    pub fn new(op_name: impl Into<String>, data_model: Option<DataModel>, arity: Arity) -> Self {
        Self {
            op_name: op_name.into(),
            data_model,
            arity,
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.op_aliases.push(alias.into());
        self
    }

    pub fn tags(mut self, tags: &[OperatorTag]) -> Self {
        self.op_tags.extend_from_slice(tags);
        self
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn convention(mut self, convention: ConventionId) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn creator(mut self, creator: NodeCreator) -> Self {
        self.creator = Some(creator);
        self
    }
}

impl fmt::Debug for OperatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorSpec")
            .field("op_name", &self.op_name)
            .field("op_aliases", &self.op_aliases)
            .field("arity", &self.arity)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamSlot {
    Positional(usize),
    Keyword(usize),
}

#[derive(Clone)]
pub struct OperatorSchema {
    op_name: String,
    op_aliases: Vec<String>,
    data_model: Option<DataModel>,
    convention: Option<ConventionId>,
    op_tags: BTreeSet<OperatorTag>,
    arity: Arity,
    positional: Vec<ParameterSchema>,
    keyword: Vec<ParameterSchema>,
    lookup: HashMap<String, ParamSlot>,
    creator: Option<NodeCreator>,
    not_fully_implemented: bool,
}

impl OperatorSchema {
    /// Validates `spec` and splits its parameters into positional and keyword
    /// ones, keeping declaration order. Panics on an inconsistent declaration.
    pub fn new(spec: OperatorSpec) -> Self {
        let op_name = spec.op_name;
        let op_tags: BTreeSet<OperatorTag> = spec.op_tags.into_iter().collect();
        if spec.convention.is_some() && !op_tags.contains(&OperatorTag::Physical) {
            panic!("{op_name}: an operator with a convention must be tagged PHYSICAL");
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut positional = Vec::new();
        let mut keyword = Vec::new();
        let mut lookup = HashMap::new();
        for param_spec in spec.params {
            let param = match ParameterSchema::try_new(param_spec) {
                Ok(p) => p,
                Err(e) => panic!("{op_name}: {e}"),
            };
            for n in param.all_names() {
                if !seen.insert(n.to_string()) {
                    panic!("{op_name}: parameter name or alias '{n}' is declared twice");
                }
            }
            let slot = if param.is_positional() {
                positional.push(param);
                ParamSlot::Positional(positional.len() - 1)
            } else {
                keyword.push(param);
                ParamSlot::Keyword(keyword.len() - 1)
            };
            let names: Vec<String> = match slot {
                ParamSlot::Positional(i) => positional[i].all_names().map(str::to_string).collect(),
                ParamSlot::Keyword(i) => keyword[i].all_names().map(str::to_string).collect(),
            };
            for n in names {
                lookup.insert(n, slot);
            }
        }

        Self {
            op_name,
            op_aliases: spec.op_aliases,
            data_model: spec.data_model,
            convention: spec.convention,
            op_tags,
            arity: spec.arity,
            positional,
            keyword,
            lookup,
            creator: spec.creator,
            not_fully_implemented: spec.not_fully_implemented,
        }
    }

    /// Schema for an unregistered operator: named after it, no parameters.
    pub fn synthesized(op_name: impl Into<String>, data_model: DataModel, arity: usize) -> Self {
        Self::new(OperatorSpec::new(op_name, Some(data_model), Arity::Exact(arity)))
    }

    pub fn op_name(&self) -> &str {
        &self.op_name
    }

    pub fn op_aliases(&self) -> &[String] {
        &self.op_aliases
    }

    pub fn data_model(&self) -> Option<DataModel> {
        self.data_model
    }

    pub fn convention(&self) -> Option<&ConventionId> {
        self.convention.as_ref()
    }

    pub fn tags(&self) -> &BTreeSet<OperatorTag> {
        &self.op_tags
    }

    pub fn has_tag(&self, tag: OperatorTag) -> bool {
        self.op_tags.contains(&tag)
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn positional_params(&self) -> &[ParameterSchema] {
        &self.positional
    }

    pub fn keyword_params(&self) -> &[ParameterSchema] {
        &self.keyword
    }

    pub fn get_positional(&self, i: usize) -> Option<&ParameterSchema> {
        self.positional.get(i)
    }

    pub fn get_parameter(&self, name_or_alias: &str) -> Option<&ParameterSchema> {
        match self.lookup.get(name_or_alias)? {
            ParamSlot::Positional(i) => self.positional.get(*i),
            ParamSlot::Keyword(i) => self.keyword.get(*i),
        }
    }

    /// Positional parameters first, then keyword parameters.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterSchema> {
        self.positional.iter().chain(self.keyword.iter())
    }

    /// Exactly one positional parameter, and it takes a list.
    pub fn can_unpack_values(&self) -> bool {
        self.positional.len() == 1 && self.positional[0].is_multi_valued()
    }

    /// Whether children may need an implicit rename projection to keep the
    /// concatenated input names unique.
    pub fn might_require_auxiliary_project(&self) -> bool {
        self.arity != Arity::Exact(1)
            && !self.has_tag(OperatorTag::Physical)
            && matches!(self.data_model, None | Some(DataModel::Relational))
    }

    pub fn supports_number_of_children(&self, n: usize) -> bool {
        match self.arity {
            Arity::Exact(k) => k == n,
            Arity::Any => true,
        }
    }

    pub fn has_creator(&self) -> bool {
        self.creator.is_some()
    }

    pub fn is_not_fully_implemented(&self) -> bool {
        self.not_fully_implemented
    }

    pub(crate) fn set_creator(&mut self, creator: NodeCreator) {
        self.creator = Some(creator);
    }

    pub fn create_node(
        &self,
        args: &PolyAlgArgs,
        children: Vec<NodeRef>,
        cluster: &AlgCluster,
    ) -> Result<NodeRef> {
        let creator = self.creator.as_ref().ok_or_else(|| {
            Error::NotImplemented(format!("creating {} nodes", self.op_name))
        })?;
        if !self.supports_number_of_children(children.len()) {
            return Err(Error::InvalidArgument(format!(
                "{} expects {} inputs, got {}",
                self.op_name,
                self.arity.num_inputs(),
                children.len()
            )));
        }
        if !args.validate(self, true) {
            return Err(Error::InvalidArgument(format!(
                "{} is missing positional arguments",
                self.op_name
            )));
        }
        creator(args, children, cluster)
    }
}

impl fmt::Debug for OperatorSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorSchema")
            .field("op_name", &self.op_name)
            .field("op_aliases", &self.op_aliases)
            .field("data_model", &self.data_model)
            .field("arity", &self.arity)
            .field("positional", &self.positional)
            .field("keyword", &self.keyword)
            .field("has_creator", &self.creator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgumentValue;
    use crate::param::{ParamTag, ParamType, SimpleType};

    fn sort_spec() -> OperatorSpec {
        OperatorSpec::new("REL_SORT", Some(DataModel::Relational), Arity::Exact(1))
            .alias("SORT")
            .param(
                ParameterSpec::new("sort", ParamType::Collation)
                    .alias("collation")
                    .alias("order")
                    .simple(SimpleType::SimpleCollation)
                    .multi(1)
                    .default_value(ArgumentValue::empty_list()),
            )
            .param(
                ParameterSpec::new("limit", ParamType::Rex)
                    .alias("fetch")
                    .simple(SimpleType::RexUint)
                    .default_value(ArgumentValue::null_rex()),
            )
    }

    #[test]
    fn partition_follows_defaults() {
        let schema = OperatorSchema::new(
            OperatorSpec::new("X", None, Arity::Any)
                .param(ParameterSpec::new("a", ParamType::Rex))
                .param(ParameterSpec::new("b", ParamType::Boolean).default_value(ArgumentValue::FALSE))
                .param(ParameterSpec::new("c", ParamType::Field)),
        );
        let pos: Vec<&str> = schema.positional_params().iter().map(|p| p.name()).collect();
        let kw: Vec<&str> = schema.keyword_params().iter().map(|p| p.name()).collect();
        assert_eq!(pos, vec!["a", "c"]);
        assert_eq!(kw, vec!["b"]);
        let all: Vec<&str> = schema.parameters().map(|p| p.name()).collect();
        assert_eq!(all, vec!["a", "c", "b"]);
    }

    #[test]
    fn lookup_by_alias() {
        let schema = OperatorSchema::new(sort_spec());
        assert_eq!(schema.get_parameter("order").map(|p| p.name()), Some("sort"));
        assert_eq!(schema.get_parameter("fetch").map(|p| p.name()), Some("limit"));
        assert!(schema.get_parameter("offset").is_none());
        assert!(!schema.can_unpack_values());
    }

    #[test]
    fn single_multi_valued_positional_can_unpack() {
        let schema = OperatorSchema::new(
            OperatorSpec::new("REL_PROJECT", Some(DataModel::Relational), Arity::Exact(1)).param(
                ParameterSpec::new("projects", ParamType::Rex)
                    .tag(ParamTag::Alias)
                    .multi(1),
            ),
        );
        assert!(schema.can_unpack_values());
        assert!(!schema.might_require_auxiliary_project());
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicate_alias_panics() {
        OperatorSchema::new(
            OperatorSpec::new("X", None, Arity::Exact(1))
                .param(ParameterSpec::new("a", ParamType::Rex).alias("b"))
                .param(ParameterSpec::new("b", ParamType::Rex)),
        );
    }

    #[test]
    #[should_panic(expected = "PHYSICAL")]
    fn convention_requires_physical_tag() {
        OperatorSchema::new(
            OperatorSpec::new("ENUMERABLE_X", None, Arity::Exact(1))
                .convention(ConventionId::new("ENUMERABLE")),
        );
    }

    #[test]
    fn missing_creator_is_not_implemented() {
        let schema = OperatorSchema::synthesized("LogicalCalc", DataModel::Relational, 1);
        let err = schema
            .create_node(&PolyAlgArgs::new(), vec![], &AlgCluster::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
        assert!(schema.supports_number_of_children(1));
        assert!(!schema.supports_number_of_children(2));
    }
}
