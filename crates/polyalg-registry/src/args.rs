//! Argument values bound to operator parameters, and their PolyAlg/JSON forms.

use std::collections::BTreeMap;

use polyalg_core::error::{Error, Result};
use polyalg_core::id::CorrelationId;
use polyalg_core::rex::{NullDirection, RexNode};
use polyalg_core::schema::DataModel;
use polyalg_digest::{append_alias, digest_with_names, join_multi_valued, sanitize_identifier};
use serde_json::{json, Map, Value};

use crate::declaration::OperatorSchema;
use crate::enums::EnumValue;
use crate::param::{ParamType, ParameterSchema};

/// Input field names an operator's arguments are rendered against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    field_names: Vec<String>,
}

impl RenderContext {
    pub fn new(field_names: Vec<String>) -> Self {
        Self { field_names }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn field_name(&self, index: usize) -> Result<&str> {
        self.field_names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                Error::Render(format!(
                    "field index {} out of range for {} input fields",
                    index,
                    self.field_names.len()
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub function: String,
    pub distinct: bool,
    pub approximate: bool,
    /// Input field indexes.
    pub args: Vec<usize>,
    pub filter: Option<usize>,
    pub name: Option<String>,
}

impl AggregateCall {
    pub fn new(function: impl Into<String>, args: Vec<usize>) -> Self {
        Self {
            function: function.into(),
            distinct: false,
            approximate: false,
            args,
            filter: None,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn call_text(&self, ctx: &RenderContext) -> Result<String> {
        let args = self
            .args
            .iter()
            .map(|i| ctx.field_name(*i).map(sanitize_identifier))
            .collect::<Result<Vec<_>>>()?;
        let mut s = format!(
            "{}({}{})",
            self.function,
            if self.distinct { "DISTINCT " } else { "" },
            args.join(", ")
        );
        if self.approximate {
            s.push_str(" APPROXIMATE");
        }
        if let Some(f) = self.filter {
            s.push_str(" FILTER ");
            s.push_str(&sanitize_identifier(ctx.field_name(f)?));
        }
        Ok(s)
    }
}

/// Aggregate over an arbitrary expression, used by the document and graph models.
#[derive(Debug, Clone, PartialEq)]
pub struct LaxAggregateCall {
    pub function: String,
    pub input: Option<RexNode>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub namespace: String,
    pub name: String,
    pub model: DataModel,
}

impl EntityRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            model: DataModel::Relational,
        }
    }

    pub fn with_model(mut self, model: DataModel) -> Self {
        self.model = model;
        self
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            sanitize_identifier(&self.name)
        } else {
            format!(
                "{}.{}",
                sanitize_identifier(&self.namespace),
                sanitize_identifier(&self.name)
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollationDirection {
    Ascending,
    Descending,
}

/// Sort key: `[field, direction, null direction]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCollation {
    pub field: usize,
    pub direction: CollationDirection,
    pub nulls: NullDirection,
}

impl FieldCollation {
    pub fn asc(field: usize) -> Self {
        Self {
            field,
            direction: CollationDirection::Ascending,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn desc(field: usize) -> Self {
        Self {
            direction: CollationDirection::Descending,
            ..Self::asc(field)
        }
    }

    pub fn with_nulls(mut self, nulls: NullDirection) -> Self {
        self.nulls = nulls;
        self
    }

    fn to_polyalg(self, ctx: &RenderContext) -> Result<String> {
        let mut s = sanitize_identifier(ctx.field_name(self.field)?);
        let dir = match self.direction {
            CollationDirection::Ascending => "ASC",
            CollationDirection::Descending => "DESC",
        };
        match self.nulls {
            NullDirection::Unspecified => {
                if self.direction == CollationDirection::Descending {
                    s.push(' ');
                    s.push_str(dir);
                }
            }
            NullDirection::First => s.push_str(&format!(" {} FIRST", dir)),
            NullDirection::Last => s.push_str(&format!(" {} LAST", dir)),
        }
        Ok(s)
    }
}

fn null_direction_name(nulls: NullDirection) -> &'static str {
    match nulls {
        NullDirection::First => "FIRST",
        NullDirection::Last => "LAST",
        NullDirection::Unspecified => "UNSPECIFIED",
    }
}

/// Possibly nested list of arguments. `aliases` are per element and only set
/// for alias-tagged parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListArg {
    pub args: Vec<ArgumentValue>,
    pub aliases: Option<Vec<String>>,
    pub unpack_values: bool,
}

impl ListArg {
    pub fn new(args: Vec<ArgumentValue>) -> Self {
        Self {
            args,
            aliases: None,
            unpack_values: false,
        }
    }

    pub fn with_aliases(args: Vec<ArgumentValue>, aliases: Vec<String>) -> Self {
        Self {
            args,
            aliases: Some(aliases),
            unpack_values: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    fn alias(&self, i: usize) -> Option<&str> {
        self.aliases.as_ref().and_then(|a| a.get(i)).map(String::as_str)
    }

    /// Renders the elements; `omit_brackets` drops the outer brackets.
    pub fn render(&self, ctx: &RenderContext, omit_brackets: bool) -> Result<String> {
        let values = self
            .args
            .iter()
            .enumerate()
            .map(|(i, a)| Ok(append_alias(&a.to_polyalg(ctx)?, self.alias(i))))
            .collect::<Result<Vec<_>>>()?;
        if values.is_empty() {
            return Ok(if omit_brackets { String::new() } else { "[]".to_string() });
        }
        let nested = self.args.iter().any(|a| matches!(a, ArgumentValue::List(_)));
        if nested && !omit_brackets {
            Ok(format!("[{}]", values.join(", ")))
        } else {
            Ok(join_multi_valued(&values, omit_brackets))
        }
    }

    pub fn to_json(&self, ctx: &RenderContext) -> Result<Value> {
        let mut items = Vec::with_capacity(self.args.len());
        for (i, a) in self.args.iter().enumerate() {
            let v = a.to_json(ctx)?;
            items.push(match self.alias(i) {
                Some(alias) => json!({ "arg": v, "alias": alias }),
                None => v,
            });
        }
        Ok(Value::Array(items))
    }

    /// Inner lists as plain vectors; empty inner lists are kept as empty
    /// vectors and a non-list element becomes a one-element vector.
    pub fn flatten_nested_keeping_empty(&self) -> Vec<Vec<ArgumentValue>> {
        self.args
            .iter()
            .map(|a| match a {
                ArgumentValue::List(inner) => inner.args.clone(),
                other => vec![other.clone()],
            })
            .collect()
    }

    /// Inner lists mapped element-wise; empty inner lists are dropped.
    pub fn flatten_nested_dropping_empty<T, F>(&self, mut mapper: F) -> Vec<Vec<T>>
    where
        F: FnMut(&ArgumentValue) -> T,
    {
        self.args
            .iter()
            .filter_map(|a| match a {
                ArgumentValue::List(inner) if inner.is_empty() => None,
                ArgumentValue::List(inner) => Some(inner.args.iter().map(&mut mapper).collect()),
                other => Some(vec![mapper(other)]),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Free-form text rendered verbatim.
    Any(String),
    Int(Option<i64>),
    Bool(bool),
    Str(Option<String>),
    Rex {
        node: Option<RexNode>,
        alias: Option<String>,
    },
    Agg(AggregateCall),
    LaxAgg(LaxAggregateCall),
    Entity(EntityRef),
    Enum(EnumValue),
    /// Input field index.
    Field(usize),
    Collation(FieldCollation),
    CorrId(CorrelationId),
    List(ListArg),
}

impl ArgumentValue {
    pub const FALSE: ArgumentValue = ArgumentValue::Bool(false);

    pub fn rex(node: RexNode) -> Self {
        ArgumentValue::Rex {
            node: Some(node),
            alias: None,
        }
    }

    pub fn aliased_rex(node: RexNode, alias: impl Into<String>) -> Self {
        ArgumentValue::Rex {
            node: Some(node),
            alias: Some(alias.into()),
        }
    }

    pub fn null_rex() -> Self {
        ArgumentValue::Rex {
            node: None,
            alias: None,
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        ArgumentValue::Str(Some(s.into()))
    }

    pub fn list(args: Vec<ArgumentValue>) -> Self {
        ArgumentValue::List(ListArg::new(args))
    }

    pub fn empty_list() -> Self {
        ArgumentValue::List(ListArg::empty())
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            ArgumentValue::Any(_) => ParamType::Any,
            ArgumentValue::Int(_) => ParamType::Integer,
            ArgumentValue::Bool(_) => ParamType::Boolean,
            ArgumentValue::Str(_) => ParamType::String,
            ArgumentValue::Rex { .. } => ParamType::Rex,
            ArgumentValue::Agg(_) => ParamType::Aggregate,
            ArgumentValue::LaxAgg(_) => ParamType::LaxAggregate,
            ArgumentValue::Entity(_) => ParamType::Entity,
            ArgumentValue::Enum(e) => e.param_type(),
            ArgumentValue::Field(_) => ParamType::Field,
            ArgumentValue::Collation(_) => ParamType::Collation,
            ArgumentValue::CorrId(_) => ParamType::CorrId,
            ArgumentValue::List(_) => ParamType::List,
        }
    }

    pub fn to_polyalg(&self, ctx: &RenderContext) -> Result<String> {
        Ok(match self {
            ArgumentValue::Any(s) => s.clone(),
            ArgumentValue::Int(Some(i)) => i.to_string(),
            ArgumentValue::Int(None) | ArgumentValue::Str(None) => "null".to_string(),
            ArgumentValue::Bool(b) => b.to_string(),
            ArgumentValue::Str(Some(s)) => sanitize_identifier(s),
            ArgumentValue::Rex { node: None, .. } => "null".to_string(),
            ArgumentValue::Rex {
                node: Some(node),
                alias,
            } => append_alias(&digest_with_names(node, ctx.field_names())?, alias.as_deref()),
            ArgumentValue::Agg(agg) => append_alias(&agg.call_text(ctx)?, agg.name.as_deref()),
            ArgumentValue::LaxAgg(agg) => {
                let input = match &agg.input {
                    Some(rex) => digest_with_names(rex, ctx.field_names())?,
                    None => String::new(),
                };
                append_alias(&format!("{}({})", agg.function, input), Some(agg.name.as_str()))
            }
            ArgumentValue::Entity(e) => e.qualified_name(),
            ArgumentValue::Enum(e) => e.name().to_string(),
            ArgumentValue::Field(i) => sanitize_identifier(ctx.field_name(*i)?),
            ArgumentValue::Collation(c) => c.to_polyalg(ctx)?,
            ArgumentValue::CorrId(id) => id.to_string(),
            ArgumentValue::List(list) => list.render(ctx, list.unpack_values)?,
        })
    }

    pub fn to_json(&self, ctx: &RenderContext) -> Result<Value> {
        Ok(match self {
            ArgumentValue::Any(s) => json!(s),
            ArgumentValue::Int(i) => json!(i),
            ArgumentValue::Bool(b) => json!(b),
            ArgumentValue::Str(s) => json!(s),
            ArgumentValue::Rex { node, alias } => {
                let rex = match node {
                    Some(n) => Some(digest_with_names(n, ctx.field_names())?),
                    None => None,
                };
                json!({ "rex": rex, "alias": alias })
            }
            ArgumentValue::Agg(agg) => {
                let args = agg
                    .args
                    .iter()
                    .map(|i| ctx.field_name(*i).map(str::to_string))
                    .collect::<Result<Vec<_>>>()?;
                let filter = match agg.filter {
                    Some(f) => Some(ctx.field_name(f)?.to_string()),
                    None => None,
                };
                json!({
                    "function": agg.function,
                    "distinct": agg.distinct,
                    "approximate": agg.approximate,
                    "args": args,
                    "filter": filter,
                    "alias": agg.name,
                })
            }
            ArgumentValue::LaxAgg(agg) => {
                let input = match &agg.input {
                    Some(rex) => Some(digest_with_names(rex, ctx.field_names())?),
                    None => None,
                };
                json!({ "function": agg.function, "input": input, "alias": agg.name })
            }
            ArgumentValue::Entity(e) => json!({
                "namespace": e.namespace,
                "name": e.name,
                "model": e.model.name(),
                "fullName": e.qualified_name(),
            }),
            ArgumentValue::Enum(e) => json!({ "enum": e.param_type().name(), "arg": e.name() }),
            ArgumentValue::Field(i) => json!({ "field": ctx.field_name(*i)?, "index": i }),
            ArgumentValue::Collation(c) => json!({
                "field": ctx.field_name(c.field)?,
                "direction": match c.direction {
                    CollationDirection::Ascending => "ASCENDING",
                    CollationDirection::Descending => "DESCENDING",
                },
                "nullDirection": null_direction_name(c.nulls),
            }),
            ArgumentValue::CorrId(id) => json!(id.as_str()),
            ArgumentValue::List(list) => list.to_json(ctx)?,
        })
    }
}

/// Arguments of one operator instance, keyed by parameter name or alias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyAlgArgs {
    args: BTreeMap<String, ArgumentValue>,
}

impl PolyAlgArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, value: ArgumentValue) -> &mut Self {
        self.args.insert(name.into(), value);
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.put(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Value bound to `param` under its name or any alias.
    pub fn get(&self, param: &ParameterSchema) -> Option<&ArgumentValue> {
        param.all_names().find_map(|n| self.args.get(n))
    }

    /// Bound value, else the parameter's default.
    pub fn get_or_default<'a>(&'a self, param: &'a ParameterSchema) -> Option<&'a ArgumentValue> {
        self.get(param).or(param.default_value())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ArgumentValue> {
        self.args.get(name)
    }

    /// Every positional parameter is bound. Unless `positional_only`, every
    /// bound name must also belong to a parameter of `schema`.
    pub fn validate(&self, schema: &OperatorSchema, positional_only: bool) -> bool {
        let positional_bound = schema
            .positional_params()
            .iter()
            .all(|p| self.get(p).is_some());
        if positional_only || !positional_bound {
            return positional_bound;
        }
        self.args.keys().all(|k| schema.get_parameter(k).is_some())
    }

    fn require<'a>(&'a self, schema: &OperatorSchema, param: &'a ParameterSchema) -> Result<&'a ArgumentValue> {
        self.get_or_default(param).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{} is missing positional argument '{}'",
                schema.op_name(),
                param.name()
            ))
        })
    }

    /// `[pos1, pos2, kw=value]`, or an empty string without arguments.
    /// With `elide_defaults`, keyword arguments rendering like their default
    /// are omitted.
    pub fn to_polyalg(
        &self,
        schema: &OperatorSchema,
        ctx: &RenderContext,
        elide_defaults: bool,
    ) -> Result<String> {
        let mut parts = Vec::new();
        let unpack = schema.can_unpack_values();
        for param in schema.positional_params() {
            let arg = self.require(schema, param)?;
            let text = match arg {
                ArgumentValue::List(list) if unpack => list.render(ctx, true)?,
                other => other.to_polyalg(ctx)?,
            };
            parts.push(text);
        }
        for param in schema.keyword_params() {
            let Some(arg) = self.get(param) else {
                continue;
            };
            let text = arg.to_polyalg(ctx)?;
            if elide_defaults && param.default_polyalg().as_deref() == Some(text.as_str()) {
                continue;
            }
            parts.push(format!("{}={}", param.name(), text));
        }
        if parts.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("[{}]", parts.join(", ")))
        }
    }

    /// `{param: {type, value}}` for every parameter, keyword parameters
    /// falling back to their default.
    pub fn to_json(&self, schema: &OperatorSchema, ctx: &RenderContext) -> Result<Value> {
        let mut out = Map::new();
        for param in schema.parameters() {
            let arg = self.require(schema, param)?;
            let mut entry = Map::new();
            if param.is_multi_valued() {
                entry.insert("type".into(), json!(ParamType::List.name()));
                entry.insert("innerType".into(), json!(param.param_type().name()));
            } else {
                entry.insert("type".into(), json!(param.param_type().name()));
            }
            entry.insert("value".into(), arg.to_json(ctx)?);
            out.insert(param.name().to_string(), Value::Object(entry));
        }
        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyalg_core::rex::Operator;
    use polyalg_core::schema::{AlgDataType, PolyType};

    fn ctx(names: &[&str]) -> RenderContext {
        RenderContext::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn scalar_renderings() {
        let c = ctx(&["id", "name"]);
        assert_eq!(ArgumentValue::Int(None).to_polyalg(&c).unwrap(), "null");
        assert_eq!(ArgumentValue::Field(1).to_polyalg(&c).unwrap(), "name");
        assert_eq!(ArgumentValue::str("a b").to_polyalg(&c).unwrap(), "\"a b\"");
        assert_eq!(
            ArgumentValue::Entity(EntityRef::new("public", "emps")).to_polyalg(&c).unwrap(),
            "public.emps"
        );
        assert_eq!(
            ArgumentValue::Collation(FieldCollation::desc(0)).to_polyalg(&c).unwrap(),
            "id DESC"
        );
        assert_eq!(
            ArgumentValue::Collation(FieldCollation::asc(0).with_nulls(NullDirection::Last))
                .to_polyalg(&c)
                .unwrap(),
            "id ASC LAST"
        );
    }

    #[test]
    fn aggregate_rendering() {
        let c = ctx(&["dept", "salary"]);
        let mut agg = AggregateCall::new("SUM", vec![1]).named("total");
        assert_eq!(ArgumentValue::Agg(agg.clone()).to_polyalg(&c).unwrap(), "SUM(salary) AS total");
        agg.distinct = true;
        agg.name = None;
        assert_eq!(ArgumentValue::Agg(agg).to_polyalg(&c).unwrap(), "SUM(DISTINCT salary)");
        let count = AggregateCall::new("COUNT", vec![]).named("c");
        assert_eq!(ArgumentValue::Agg(count).to_polyalg(&c).unwrap(), "COUNT() AS c");
    }

    #[test]
    fn list_brackets() {
        let c = ctx(&["a", "b"]);
        let one = ArgumentValue::list(vec![ArgumentValue::Field(0)]);
        assert_eq!(one.to_polyalg(&c).unwrap(), "a");
        let two = ArgumentValue::list(vec![ArgumentValue::Field(0), ArgumentValue::Field(1)]);
        assert_eq!(two.to_polyalg(&c).unwrap(), "[a, b]");
        assert_eq!(ArgumentValue::empty_list().to_polyalg(&c).unwrap(), "[]");
        let nested = ArgumentValue::list(vec![one.clone()]);
        assert_eq!(nested.to_polyalg(&c).unwrap(), "[a]");
    }

    #[test]
    fn list_aliases_are_elided_when_trivial() {
        let c = ctx(&[]);
        let list = ListArg::with_aliases(
            vec![ArgumentValue::str("a"), ArgumentValue::str("b")],
            vec!["a".into(), "x".into()],
        );
        assert_eq!(list.render(&c, false).unwrap(), "[a, b AS x]");
    }

    #[test]
    fn aliased_rex() {
        let c = ctx(&["x"]);
        let plus = RexNode::call(
            Operator::plus(),
            vec![
                RexNode::index_ref(0, AlgDataType::new(PolyType::Integer)),
                RexNode::int(1),
            ],
            AlgDataType::new(PolyType::Integer),
        );
        assert_eq!(
            ArgumentValue::aliased_rex(plus, "y").to_polyalg(&c).unwrap(),
            "+(x, 1) AS y"
        );
    }

    #[test]
    fn flatten_variants_differ_on_empty_inner_lists() {
        let nested = ListArg::new(vec![
            ArgumentValue::list(vec![ArgumentValue::Field(0), ArgumentValue::Field(1)]),
            ArgumentValue::empty_list(),
            ArgumentValue::list(vec![ArgumentValue::Field(2)]),
        ]);
        let kept = nested.flatten_nested_keeping_empty();
        assert_eq!(kept.len(), 3);
        assert!(kept[1].is_empty());
        let dropped = nested.flatten_nested_dropping_empty(|a| match a {
            ArgumentValue::Field(i) => *i,
            _ => usize::MAX,
        });
        assert_eq!(dropped, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn out_of_range_field_is_an_error() {
        let err = ArgumentValue::Field(5).to_polyalg(&ctx(&["a"])).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
