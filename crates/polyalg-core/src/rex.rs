//! Scalar expression tree embedded in operator arguments.
//!
//! Field references are positional (`IndexRef`); names are only attached
//! when an expression is rendered against its input field names.

use crate::id::CorrelationId;
use crate::schema::{AlgDataType, PolyType};
use crate::value::PolyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Plus,
    Minus,
    Times,
    Divide,
    Cast,
    NewSpecification,
    IsNull,
    IsNotNull,
    Like,
    Item,
    Other,
}

impl Kind {
    /// Arithmetic and comparison operators whose literal operands may drop
    /// their type when it matches the other operand.
    pub fn is_simple_binary(&self) -> bool {
        matches!(
            self,
            Kind::Plus
                | Kind::Minus
                | Kind::Times
                | Kind::Divide
                | Kind::Equals
                | Kind::NotEquals
                | Kind::LessThan
                | Kind::LessThanOrEqual
                | Kind::GreaterThan
                | Kind::GreaterThanOrEqual
        )
    }

    pub fn is_cast_like(&self) -> bool {
        matches!(self, Kind::Cast | Kind::NewSpecification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    Function,
    /// Function that may be called without parentheses, e.g. `CURRENT_DATE`.
    FunctionId,
    Binary,
    Prefix,
    Postfix,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    pub name: String,
    pub kind: Kind,
    pub syntax: Syntax,
}

impl Operator {
    pub fn new(name: impl Into<String>, kind: Kind, syntax: Syntax) -> Self {
        Self {
            name: name.into(),
            kind,
            syntax,
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Other, Syntax::Function)
    }

    pub fn and() -> Self {
        Self::new("AND", Kind::And, Syntax::Binary)
    }

    pub fn or() -> Self {
        Self::new("OR", Kind::Or, Syntax::Binary)
    }

    pub fn equals() -> Self {
        Self::new("=", Kind::Equals, Syntax::Binary)
    }

    pub fn greater_than() -> Self {
        Self::new(">", Kind::GreaterThan, Syntax::Binary)
    }

    pub fn less_than() -> Self {
        Self::new("<", Kind::LessThan, Syntax::Binary)
    }

    pub fn plus() -> Self {
        Self::new("+", Kind::Plus, Syntax::Binary)
    }

    pub fn in_list() -> Self {
        Self::new("IN", Kind::In, Syntax::Binary)
    }

    pub fn cast() -> Self {
        Self::new("CAST", Kind::Cast, Syntax::Special)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RexLiteral {
    pub value: PolyValue,
    pub ty: AlgDataType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RexCall {
    pub op: Operator,
    pub operands: Vec<RexNode>,
    pub ty: AlgDataType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullDirection {
    First,
    Last,
    Unspecified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RexFieldCollation {
    pub expr: RexNode,
    pub descending: bool,
    pub nulls: NullDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<RexNode>),
    Following(Box<RexNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RexWindow {
    pub partition_keys: Vec<RexNode>,
    pub order_keys: Vec<RexFieldCollation>,
    pub lower_bound: Option<WindowBound>,
    pub upper_bound: Option<WindowBound>,
    /// ROWS when true, RANGE otherwise.
    pub is_rows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RexOver {
    pub call: RexCall,
    pub window: RexWindow,
    pub distinct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RexNode {
    IndexRef {
        index: usize,
        ty: AlgDataType,
    },
    LocalRef {
        index: usize,
        ty: AlgDataType,
    },
    Literal(RexLiteral),
    Call(RexCall),
    Over(RexOver),
    CorrelVariable {
        id: CorrelationId,
        ty: AlgDataType,
    },
    DynamicParam {
        index: usize,
        ty: AlgDataType,
    },
    RangeRef {
        offset: usize,
        ty: AlgDataType,
    },
    FieldAccess {
        expr: Box<RexNode>,
        field: String,
        ty: AlgDataType,
    },
    SubQuery {
        call: RexCall,
    },
    TableIndexRef {
        table: String,
        index: usize,
        ty: AlgDataType,
    },
    PatternFieldRef {
        alpha: String,
        index: usize,
        ty: AlgDataType,
    },
    /// Document field path such as `address.city`.
    NameRef {
        names: Vec<String>,
        ty: AlgDataType,
    },
    ElementRef {
        collection: Box<RexNode>,
        ty: AlgDataType,
    },
}

impl RexNode {
    pub fn index_ref(index: usize, ty: AlgDataType) -> Self {
        RexNode::IndexRef { index, ty }
    }

    pub fn literal(value: PolyValue, ty: AlgDataType) -> Self {
        RexNode::Literal(RexLiteral { value, ty })
    }

    pub fn int(v: i64) -> Self {
        Self::literal(PolyValue::Integer(v), AlgDataType::new(PolyType::Integer))
    }

    pub fn boolean(v: bool) -> Self {
        Self::literal(PolyValue::Boolean(v), AlgDataType::new(PolyType::Boolean))
    }

    pub fn call(op: Operator, operands: Vec<RexNode>, ty: AlgDataType) -> Self {
        RexNode::Call(RexCall { op, operands, ty })
    }

    pub fn ty(&self) -> &AlgDataType {
        match self {
            RexNode::IndexRef { ty, .. }
            | RexNode::LocalRef { ty, .. }
            | RexNode::CorrelVariable { ty, .. }
            | RexNode::DynamicParam { ty, .. }
            | RexNode::RangeRef { ty, .. }
            | RexNode::FieldAccess { ty, .. }
            | RexNode::TableIndexRef { ty, .. }
            | RexNode::PatternFieldRef { ty, .. }
            | RexNode::NameRef { ty, .. }
            | RexNode::ElementRef { ty, .. } => ty,
            RexNode::Literal(l) => &l.ty,
            RexNode::Call(c) => &c.ty,
            RexNode::Over(o) => &o.call.ty,
            RexNode::SubQuery { call } => &call.ty,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            RexNode::Call(c) => c.op.kind,
            RexNode::Over(o) => o.call.op.kind,
            _ => Kind::Other,
        }
    }

    pub fn as_literal(&self) -> Option<&RexLiteral> {
        match self {
            RexNode::Literal(l) => Some(l),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_is_not_simple_binary() {
        assert!(Kind::GreaterThan.is_simple_binary());
        assert!(Kind::Divide.is_simple_binary());
        assert!(!Kind::In.is_simple_binary());
        assert!(!Kind::And.is_simple_binary());
    }

    #[test]
    fn call_type_and_kind() {
        let gt = RexNode::call(
            Operator::greater_than(),
            vec![RexNode::int(1), RexNode::int(2)],
            AlgDataType::new(PolyType::Boolean),
        );
        assert_eq!(gt.kind(), Kind::GreaterThan);
        assert_eq!(gt.ty().poly_type, PolyType::Boolean);
        assert!(gt.as_literal().is_none());
    }
}
