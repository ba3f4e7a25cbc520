//! Expression visitor producing canonical PolyAlg text.
//!
//! Field indexes are replaced by the (sanitized) names of the input fields;
//! everything else follows the expression digest format, with literal types
//! elided wherever the surrounding call already determines them.

use polyalg_core::error::{Error, Result};
use polyalg_core::rex::{
    Kind, NullDirection, RexCall, RexFieldCollation, RexLiteral, RexNode, RexOver, RexWindow,
    Syntax, WindowBound,
};
use polyalg_core::schema::PolyType;
use polyalg_core::value::PolyValue;

use crate::graph::{edge_digest, node_digest, path_digest};
use crate::literal::{literal_digest, should_include_type, DigestIncludeType};
use crate::util::sanitize_identifier;

pub struct NameReplacer<'a> {
    names: &'a [String],
}

impl<'a> NameReplacer<'a> {
    pub fn new(names: &'a [String]) -> Self {
        Self { names }
    }

    pub fn visit(&self, node: &RexNode) -> Result<String> {
        match node {
            RexNode::IndexRef { index, .. } => self
                .names
                .get(*index)
                .map(|n| sanitize_identifier(n))
                .ok_or_else(|| {
                    Error::Render(format!(
                        "field index {} out of range for {} input fields",
                        index,
                        self.names.len()
                    ))
                }),
            RexNode::LocalRef { index, ty } => {
                let ty = if ty.poly_type.is_structured() {
                    ty.poly_type.name().to_string()
                } else {
                    ty.full_type_string()
                };
                Ok(format!("$t{}:{}", index, ty))
            }
            RexNode::Literal(lit) => Ok(self.visit_literal(lit, DigestIncludeType::Optional)),
            RexNode::Call(call) => self.visit_call(call),
            RexNode::Over(over) => self.visit_over(over),
            RexNode::CorrelVariable { id, .. } => Ok(id.to_string()),
            RexNode::DynamicParam { index, .. } => Ok(format!("?{}", index)),
            RexNode::FieldAccess { expr, field, .. } => {
                Ok(format!("{}.{}", self.visit(expr)?, field))
            }
            RexNode::NameRef { names, .. } => Ok(names.join(".")),
            RexNode::ElementRef { collection, .. } => {
                Ok(format!("ELEMENT_REF({})", self.visit(collection)?))
            }
            RexNode::RangeRef { .. } => Err(Error::NotImplemented("RexRangeRef".into())),
            RexNode::SubQuery { .. } => Err(Error::NotImplemented("RexSubQuery".into())),
            RexNode::TableIndexRef { .. } => {
                Err(Error::NotImplemented("RexTableIndexRef".into()))
            }
            RexNode::PatternFieldRef { .. } => {
                Err(Error::NotImplemented("RexPatternFieldRef".into()))
            }
        }
    }

    /// Graph and collection literals render their value only; scalars follow
    /// the literal digest rules.
    pub fn visit_literal(&self, lit: &RexLiteral, include: DigestIncludeType) -> String {
        match &lit.value {
            PolyValue::Node(n) => node_digest(n, true),
            PolyValue::Edge(e) => edge_digest(e, true),
            PolyValue::Path(p) => path_digest(p, true),
            PolyValue::List(_) | PolyValue::Document(_) => lit.value.digest(),
            _ => literal_digest(lit, include),
        }
    }

    fn visit_call(&self, call: &RexCall) -> Result<String> {
        let mut sb = call.op.name.clone();
        if call.operands.is_empty() && call.op.syntax == Syntax::FunctionId {
            return Ok(sb);
        }
        sb.push('(');
        self.append_operands(call, &mut sb)?;
        if call.op.kind.is_cast_like() {
            sb.push_str(" AS ");
            sb.push_str(&call.ty.full_type_string());
        }
        sb.push(')');
        Ok(sb)
    }

    fn append_operands(&self, call: &RexCall, sb: &mut String) -> Result<()> {
        let kind = call.op.kind;
        for (i, operand) in call.operands.iter().enumerate() {
            if i > 0 {
                sb.push_str(", ");
            }
            let Some(lit) = operand.as_literal() else {
                sb.push_str(&self.visit(operand)?);
                continue;
            };
            let mut include = DigestIncludeType::Optional;
            if matches!(kind, Kind::And | Kind::Or) && lit.ty.poly_type == PolyType::Boolean {
                include = DigestIncludeType::NoType;
            } else if kind.is_cast_like() {
                include = DigestIncludeType::NoType;
            } else if kind.is_simple_binary() && call.operands.len() == 2 {
                let other = &call.operands[1 - i];
                let other_skips_type = match other.as_literal() {
                    None => true,
                    Some(o) => should_include_type(o) == DigestIncludeType::NoType,
                };
                if other_skips_type && lit.ty.equal_sans_nullability(other.ty()) {
                    include = DigestIncludeType::NoType;
                }
            }
            sb.push_str(&self.visit_literal(lit, include));
        }
        Ok(())
    }

    fn visit_over(&self, over: &RexOver) -> Result<String> {
        let call = &over.call;
        let mut sb = call.op.name.clone();
        sb.push('(');
        if over.distinct {
            sb.push_str("DISTINCT ");
        }
        self.append_operands(call, &mut sb)?;
        sb.push(')');
        if call.op.kind.is_cast_like() {
            sb.push(':');
            sb.push_str(&call.ty.full_type_string());
        }
        sb.push_str(" OVER (");
        sb.push_str(&self.visit_window(&over.window)?);
        sb.push(')');
        Ok(sb)
    }

    fn visit_window(&self, window: &RexWindow) -> Result<String> {
        let mut clauses: Vec<String> = Vec::new();
        if !window.partition_keys.is_empty() {
            let keys = window
                .partition_keys
                .iter()
                .map(|k| self.visit(k))
                .collect::<Result<Vec<_>>>()?;
            clauses.push(format!("PARTITION BY {}", keys.join(", ")));
        }
        if !window.order_keys.is_empty() {
            let keys = window
                .order_keys
                .iter()
                .map(|k| self.visit_collation(k))
                .collect::<Result<Vec<_>>>()?;
            clauses.push(format!("ORDER BY {}", keys.join(", ")));
        }
        let unit = if window.is_rows { "ROWS" } else { "RANGE" };
        match (&window.lower_bound, &window.upper_bound) {
            (None, _) => {}
            (Some(lower), None) => {
                clauses.push(format!("{} {}", unit, self.visit_bound(lower)?));
            }
            (Some(lower), Some(upper)) => clauses.push(format!(
                "{} BETWEEN {} AND {}",
                unit,
                self.visit_bound(lower)?,
                self.visit_bound(upper)?
            )),
        }
        Ok(clauses.join(" "))
    }

    fn visit_bound(&self, bound: &WindowBound) -> Result<String> {
        Ok(match bound {
            WindowBound::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
            WindowBound::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
            WindowBound::CurrentRow => "CURRENT ROW".to_string(),
            WindowBound::Preceding(offset) => format!("{} PRECEDING", self.visit(offset)?),
            WindowBound::Following(offset) => format!("{} FOLLOWING", self.visit(offset)?),
        })
    }

    fn visit_collation(&self, collation: &RexFieldCollation) -> Result<String> {
        let mut s = self.visit(&collation.expr)?;
        if collation.descending {
            s.push_str(" DESC");
        }
        match collation.nulls {
            NullDirection::First => s.push_str(" NULLS FIRST"),
            NullDirection::Last => s.push_str(" NULLS LAST"),
            NullDirection::Unspecified => {}
        }
        Ok(s)
    }
}

/// Renders `node` with field indexes resolved against `names`.
pub fn digest_with_names(node: &RexNode, names: &[String]) -> Result<String> {
    NameReplacer::new(names).visit(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyalg_core::rex::Operator;
    use polyalg_core::schema::AlgDataType;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn int_ref(i: usize) -> RexNode {
        RexNode::index_ref(i, AlgDataType::new(PolyType::Integer))
    }

    fn boolean() -> AlgDataType {
        AlgDataType::new(PolyType::Boolean)
    }

    #[test]
    fn comparison_against_field_drops_literal_type() {
        let gt = RexNode::call(Operator::greater_than(), vec![int_ref(0), RexNode::int(10)], boolean());
        assert_eq!(digest_with_names(&gt, &names(&["age"])).unwrap(), ">(age, 10)");
    }

    #[test]
    fn mismatched_types_keep_literal_type() {
        let big = RexNode::literal(PolyValue::Integer(10), AlgDataType::new(PolyType::Bigint));
        let gt = RexNode::call(Operator::greater_than(), vec![int_ref(0), big], boolean());
        assert_eq!(digest_with_names(&gt, &names(&["age"])).unwrap(), ">(age, 10:BIGINT)");
    }

    #[test]
    fn nullable_literal_against_matching_field_drops_type() {
        let lit = RexNode::literal(PolyValue::Integer(3), AlgDataType::nullable(PolyType::Integer));
        let eq = RexNode::call(Operator::equals(), vec![int_ref(0), lit], boolean());
        assert_eq!(digest_with_names(&eq, &names(&["x"])).unwrap(), "=(x, 3)");
    }

    #[test]
    fn and_of_boolean_literals_has_no_types() {
        let null_bool = RexNode::literal(PolyValue::Null, AlgDataType::nullable(PolyType::Boolean));
        let cast = RexNode::call(
            Operator::cast(),
            vec![null_bool],
            AlgDataType::nullable(PolyType::Boolean),
        );
        let and = RexNode::call(Operator::and(), vec![RexNode::boolean(true), cast], boolean());
        assert_eq!(
            digest_with_names(&and, &[]).unwrap(),
            "AND(true, CAST(null AS BOOLEAN))"
        );
    }

    #[test]
    fn function_id_without_operands_has_no_parens() {
        let op = Operator::new("CURRENT_DATE", Kind::Other, Syntax::FunctionId);
        let call = RexNode::call(op, vec![], AlgDataType::new(PolyType::Date));
        assert_eq!(digest_with_names(&call, &[]).unwrap(), "CURRENT_DATE");
        let f = RexNode::call(Operator::function("RAND"), vec![], AlgDataType::new(PolyType::Double));
        assert_eq!(digest_with_names(&f, &[]).unwrap(), "RAND()");
    }

    #[test]
    fn out_of_range_index_is_a_render_error() {
        let err = digest_with_names(&int_ref(3), &names(&["a"])).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn unsupported_constructs_report_not_implemented() {
        let range = RexNode::RangeRef {
            offset: 0,
            ty: AlgDataType::new(PolyType::Row),
        };
        let wrapped = RexNode::call(Operator::function("F"), vec![range], boolean());
        let err = digest_with_names(&wrapped, &[]).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(ref c) if c == "RexRangeRef"));
    }

    #[test]
    fn local_ref_uses_poly_type_for_structured() {
        let l = RexNode::LocalRef {
            index: 2,
            ty: AlgDataType::row(vec![]),
        };
        assert_eq!(digest_with_names(&l, &[]).unwrap(), "$t2:ROW");
        let i = RexNode::LocalRef {
            index: 0,
            ty: AlgDataType::new(PolyType::Integer),
        };
        assert_eq!(digest_with_names(&i, &[]).unwrap(), "$t0:INTEGER NOT NULL");
    }

    #[test]
    fn quoted_field_names() {
        let eq = RexNode::call(Operator::equals(), vec![int_ref(0), int_ref(1)], boolean());
        assert_eq!(
            digest_with_names(&eq, &names(&["first name", "id"])).unwrap(),
            "=(\"first name\", id)"
        );
    }
}
