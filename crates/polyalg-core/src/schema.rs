//! Data models and algebra data types. Pure data; no rendering logic here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The data model an operator works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataModel {
    #[default]
    Relational,
    Document,
    Graph,
}

impl DataModel {
    pub fn name(&self) -> &'static str {
        match self {
            DataModel::Relational => "RELATIONAL",
            DataModel::Document => "DOCUMENT",
            DataModel::Graph => "GRAPH",
        }
    }
}

impl fmt::Display for DataModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolyType {
    Boolean,
    Tinyint,
    Smallint,
    Integer,
    Bigint,
    Decimal,
    Real,
    Double,
    Char,
    Varchar,
    Binary,
    Date,
    Time,
    Timestamp,
    Null,
    Any,
    Symbol,
    Array,
    Map,
    Document,
    Node,
    Edge,
    Path,
    Graph,
    Row,
}

impl PolyType {
    pub fn name(&self) -> &'static str {
        match self {
            PolyType::Boolean => "BOOLEAN",
            PolyType::Tinyint => "TINYINT",
            PolyType::Smallint => "SMALLINT",
            PolyType::Integer => "INTEGER",
            PolyType::Bigint => "BIGINT",
            PolyType::Decimal => "DECIMAL",
            PolyType::Real => "REAL",
            PolyType::Double => "DOUBLE",
            PolyType::Char => "CHAR",
            PolyType::Varchar => "VARCHAR",
            PolyType::Binary => "BINARY",
            PolyType::Date => "DATE",
            PolyType::Time => "TIME",
            PolyType::Timestamp => "TIMESTAMP",
            PolyType::Null => "NULL",
            PolyType::Any => "ANY",
            PolyType::Symbol => "SYMBOL",
            PolyType::Array => "ARRAY",
            PolyType::Map => "MAP",
            PolyType::Document => "DOCUMENT",
            PolyType::Node => "NODE",
            PolyType::Edge => "EDGE",
            PolyType::Path => "PATH",
            PolyType::Graph => "GRAPH",
            PolyType::Row => "ROW",
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            PolyType::Row
                | PolyType::Array
                | PolyType::Map
                | PolyType::Document
                | PolyType::Graph
                | PolyType::Node
                | PolyType::Edge
                | PolyType::Path
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, PolyType::Date | PolyType::Time | PolyType::Timestamp)
    }
}

impl fmt::Display for PolyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    pub ty: AlgDataType,
}

impl TypeField {
    pub fn new(name: impl Into<String>, ty: AlgDataType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Type of an expression or a field: a `PolyType` plus nullability and
/// optional precision/scale. Rows carry fields, arrays a component type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgDataType {
    pub poly_type: PolyType,
    pub nullable: bool,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TypeField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Box<AlgDataType>>,
}

impl AlgDataType {
    /// A NOT NULL type without precision.
    pub fn new(poly_type: PolyType) -> Self {
        Self {
            poly_type,
            nullable: false,
            precision: None,
            scale: None,
            fields: Vec::new(),
            component: None,
        }
    }

    pub fn nullable(poly_type: PolyType) -> Self {
        Self::new(poly_type).with_nullable(true)
    }

    pub fn row(fields: Vec<TypeField>) -> Self {
        Self {
            fields,
            ..Self::new(PolyType::Row)
        }
    }

    pub fn array(component: AlgDataType) -> Self {
        Self {
            component: Some(Box::new(component)),
            ..Self::new(PolyType::Array)
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Type string without the nullability suffix.
    pub fn type_string(&self) -> String {
        match self.poly_type {
            PolyType::Row => {
                let fields: Vec<String> = self
                    .fields
                    .iter()
                    .map(|f| format!("{} {}", f.ty.full_type_string(), f.name))
                    .collect();
                format!("RecordType({})", fields.join(", "))
            }
            PolyType::Array => match &self.component {
                Some(c) => format!("{} ARRAY", c.full_type_string()),
                None => "ARRAY".to_string(),
            },
            t => match (self.precision, self.scale) {
                (Some(p), Some(s)) => format!("{}({}, {})", t.name(), p, s),
                (Some(p), None) => format!("{}({})", t.name(), p),
                _ => t.name().to_string(),
            },
        }
    }

    /// Type string including ` NOT NULL` for non-nullable types.
    pub fn full_type_string(&self) -> String {
        if self.nullable {
            self.type_string()
        } else {
            format!("{} NOT NULL", self.type_string())
        }
    }

    pub fn equal_sans_nullability(&self, other: &AlgDataType) -> bool {
        self.poly_type == other.poly_type
            && self.precision == other.precision
            && self.scale == other.scale
            && self.fields == other.fields
            && self.component == other.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_type_strings() {
        assert_eq!(
            AlgDataType::new(PolyType::Integer).full_type_string(),
            "INTEGER NOT NULL"
        );
        assert_eq!(
            AlgDataType::nullable(PolyType::Varchar)
                .with_precision(39)
                .full_type_string(),
            "VARCHAR(39)"
        );
        assert_eq!(
            AlgDataType::new(PolyType::Decimal)
                .with_precision(10)
                .with_scale(2)
                .full_type_string(),
            "DECIMAL(10, 2) NOT NULL"
        );
        let row = AlgDataType::row(vec![
            TypeField::new("id", AlgDataType::nullable(PolyType::Integer)),
            TypeField::new("name", AlgDataType::nullable(PolyType::Varchar)),
        ])
        .with_nullable(true);
        assert_eq!(row.full_type_string(), "RecordType(INTEGER id, VARCHAR name)");
    }

    #[test]
    fn nullability_is_ignored_by_sans_comparison() {
        let a = AlgDataType::new(PolyType::Integer);
        let b = AlgDataType::nullable(PolyType::Integer);
        assert!(a.equal_sans_nullability(&b));
        assert_ne!(a, b);
        assert!(!a.equal_sans_nullability(&AlgDataType::new(PolyType::Bigint)));
    }
}
