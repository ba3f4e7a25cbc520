//! Parameter schemas: what an operator argument is called, what it holds and
//! how it defaults.

use std::collections::BTreeSet;

use polyalg_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::args::{ArgumentValue, RenderContext};
use crate::enums::{DistributionType, JoinAlgType, ModifyOperation, SemiJoinType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    Any,
    Integer,
    Boolean,
    String,
    Rex,
    Aggregate,
    LaxAggregate,
    Entity,
    JoinTypeEnum,
    SemiJoinTypeEnum,
    ModifyOpEnum,
    DistributionTypeEnum,
    Field,
    EmptyList,
    Collation,
    CorrId,
    List,
}

impl ParamType {
    pub const ENUM_TYPES: [ParamType; 4] = [
        ParamType::JoinTypeEnum,
        ParamType::SemiJoinTypeEnum,
        ParamType::ModifyOpEnum,
        ParamType::DistributionTypeEnum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Any => "ANY",
            ParamType::Integer => "INTEGER",
            ParamType::Boolean => "BOOLEAN",
            ParamType::String => "STRING",
            ParamType::Rex => "REX",
            ParamType::Aggregate => "AGGREGATE",
            ParamType::LaxAggregate => "LAX_AGGREGATE",
            ParamType::Entity => "ENTITY",
            ParamType::JoinTypeEnum => "JOIN_TYPE_ENUM",
            ParamType::SemiJoinTypeEnum => "SEMI_JOIN_TYPE_ENUM",
            ParamType::ModifyOpEnum => "MODIFY_OP_ENUM",
            ParamType::DistributionTypeEnum => "DISTRIBUTION_TYPE_ENUM",
            ParamType::Field => "FIELD",
            ParamType::EmptyList => "EMPTY_LIST",
            ParamType::Collation => "COLLATION",
            ParamType::CorrId => "CORR_ID",
            ParamType::List => "LIST",
        }
    }

    pub fn is_enum(&self) -> bool {
        self.enum_values().is_some()
    }

    pub fn enum_values(&self) -> Option<&'static [&'static str]> {
        match self {
            ParamType::JoinTypeEnum => Some(JoinAlgType::VALUES),
            ParamType::SemiJoinTypeEnum => Some(SemiJoinType::VALUES),
            ParamType::ModifyOpEnum => Some(ModifyOperation::VALUES),
            ParamType::DistributionTypeEnum => Some(DistributionType::VALUES),
            _ => None,
        }
    }
}

/// Presentation hint for UIs. Does not change the PolyAlg text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimpleType {
    Hidden,
    RexPredicate,
    RexUint,
    SimpleAgg,
    SimpleCollation,
}

impl SimpleType {
    pub fn name(&self) -> &'static str {
        match self {
            SimpleType::Hidden => "HIDDEN",
            SimpleType::RexPredicate => "REX_PREDICATE",
            SimpleType::RexUint => "REX_UINT",
            SimpleType::SimpleAgg => "SIMPLE_AGG",
            SimpleType::SimpleCollation => "SIMPLE_COLLATION",
        }
    }

    pub fn is_compatible(&self, ty: ParamType) -> bool {
        match self {
            SimpleType::Hidden => true,
            SimpleType::RexPredicate | SimpleType::RexUint => ty == ParamType::Rex,
            SimpleType::SimpleAgg => ty == ParamType::Aggregate,
            SimpleType::SimpleCollation => ty == ParamType::Collation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamTag {
    /// Values may carry an `AS name` alias.
    Alias,
    /// Aliases equal to the rendered value are not shown.
    HideTrivial,
    NonNegative,
}

impl ParamTag {
    pub fn name(&self) -> &'static str {
        match self {
            ParamTag::Alias => "ALIAS",
            ParamTag::HideTrivial => "HIDE_TRIVIAL",
            ParamTag::NonNegative => "NON_NEGATIVE",
        }
    }
}

/// Plain description of a parameter, validated by `ParameterSchema::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub tags: Vec<ParamTag>,
    pub simple_type: Option<SimpleType>,
    pub param_type: ParamType,
    /// 0 for a scalar, otherwise the list nesting depth.
    pub multiplicity: u8,
    pub requires_alias: bool,
    /// `None` makes the parameter positional.
    pub default: Option<ArgumentValue>,
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            aliases: Vec::new(),
            tags: Vec::new(),
            simple_type: None,
            param_type: ParamType::Any,
            multiplicity: 0,
            requires_alias: false,
            default: None,
        }
    }
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn tag(mut self, tag: ParamTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn simple(mut self, simple_type: SimpleType) -> Self {
        self.simple_type = Some(simple_type);
        self
    }

    pub fn multi(mut self, multiplicity: u8) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn requires_alias(mut self) -> Self {
        self.requires_alias = true;
        self
    }

    pub fn default_value(mut self, value: ArgumentValue) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema {
    name: String,
    aliases: Vec<String>,
    tags: BTreeSet<ParamTag>,
    simple_type: Option<SimpleType>,
    param_type: ParamType,
    multiplicity: u8,
    requires_alias: bool,
    default: Option<ArgumentValue>,
}

impl ParameterSchema {
    /// Validates `spec`. Panics on an inconsistent declaration; parameter
    /// schemas are only built while populating a registry.
    pub fn new(spec: ParameterSpec) -> Self {
        match Self::try_new(spec) {
            Ok(p) => p,
            Err(e) => panic!("invalid parameter declaration: {e}"),
        }
    }

    pub(crate) fn try_new(spec: ParameterSpec) -> Result<Self> {
        if spec.name.is_empty() {
            return Err(Error::InvalidArgument("parameter name must not be empty".into()));
        }
        if let Some(default) = &spec.default {
            let compatible = default.param_type() == spec.param_type
                || (spec.multiplicity > 0 && matches!(default, ArgumentValue::List(_)));
            if !compatible {
                return Err(Error::InvalidArgument(format!(
                    "default of '{}' is {} but the parameter is {}",
                    spec.name,
                    default.param_type().name(),
                    spec.param_type.name()
                )));
            }
        }
        if let Some(simple) = spec.simple_type {
            if !simple.is_compatible(spec.param_type) {
                return Err(Error::InvalidArgument(format!(
                    "simple type {} does not fit {} on '{}'",
                    simple.name(),
                    spec.param_type.name(),
                    spec.name
                )));
            }
            if simple == SimpleType::Hidden && spec.default.is_none() {
                return Err(Error::InvalidArgument(format!(
                    "positional parameter '{}' cannot be hidden",
                    spec.name
                )));
            }
        }
        let tags: BTreeSet<ParamTag> = spec.tags.into_iter().collect();
        let needs_alias = tags.contains(&ParamTag::HideTrivial) || spec.requires_alias;
        if needs_alias && !tags.contains(&ParamTag::Alias) {
            return Err(Error::InvalidArgument(format!(
                "'{}' hides trivial aliases or requires one but is not alias-tagged",
                spec.name
            )));
        }
        Ok(Self {
            name: spec.name,
            aliases: spec.aliases,
            tags,
            simple_type: spec.simple_type,
            param_type: spec.param_type,
            multiplicity: spec.multiplicity,
            requires_alias: spec.requires_alias,
            default: spec.default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The name followed by every alias.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn tags(&self) -> &BTreeSet<ParamTag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: ParamTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn simple_type(&self) -> Option<SimpleType> {
        self.simple_type
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    pub fn multiplicity(&self) -> u8 {
        self.multiplicity
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multiplicity > 0
    }

    pub fn requires_alias(&self) -> bool {
        self.requires_alias
    }

    pub fn default_value(&self) -> Option<&ArgumentValue> {
        self.default.as_ref()
    }

    pub fn is_positional(&self) -> bool {
        self.default.is_none()
    }

    /// PolyAlg text of the default, rendered without input fields.
    pub fn default_polyalg(&self) -> Option<String> {
        self.default
            .as_ref()
            .and_then(|d| d.to_polyalg(&RenderContext::empty()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ListArg;

    #[test]
    fn positional_iff_no_default() {
        let p = ParameterSchema::new(ParameterSpec::new("condition", ParamType::Rex));
        assert!(p.is_positional());
        let k = ParameterSchema::new(
            ParameterSpec::new("all", ParamType::Boolean).default_value(ArgumentValue::Bool(false)),
        );
        assert!(!k.is_positional());
        assert_eq!(k.default_polyalg().as_deref(), Some("false"));
    }

    #[test]
    fn list_default_fits_multi_valued() {
        let p = ParameterSchema::new(
            ParameterSpec::new("variables", ParamType::CorrId)
                .simple(SimpleType::Hidden)
                .multi(1)
                .default_value(ArgumentValue::List(ListArg::empty())),
        );
        assert!(p.is_multi_valued());
        assert_eq!(p.default_polyalg().as_deref(), Some("[]"));
    }

    #[test]
    fn rejects_mistyped_default() {
        let spec = ParameterSpec::new("all", ParamType::Boolean).default_value(ArgumentValue::Int(Some(1)));
        assert!(matches!(ParameterSchema::try_new(spec), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_hidden_positional() {
        let spec = ParameterSpec::new("x", ParamType::Rex).simple(SimpleType::Hidden);
        assert!(ParameterSchema::try_new(spec).is_err());
    }

    #[test]
    fn rejects_incompatible_simple_type() {
        let spec = ParameterSpec::new("x", ParamType::Field).simple(SimpleType::RexPredicate);
        assert!(ParameterSchema::try_new(spec).is_err());
    }

    #[test]
    #[should_panic(expected = "not alias-tagged")]
    fn hide_trivial_requires_alias_tag() {
        ParameterSchema::new(ParameterSpec::new("projects", ParamType::Rex).tag(ParamTag::HideTrivial));
    }
}
