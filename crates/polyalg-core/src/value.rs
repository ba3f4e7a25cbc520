//! Multi-model values carried by literals: scalars, lists, documents and
//! graph elements.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    /// Date, time or timestamp in its canonical text form.
    Temporal(String),
    Binary(Vec<u8>),
    Symbol(String),
    List(Vec<PolyValue>),
    Document(BTreeMap<String, PolyValue>),
    Node(PolyNode),
    Edge(PolyEdge),
    Path(PolyPath),
}

impl PolyValue {
    pub fn string(s: impl Into<String>) -> Self {
        PolyValue::String(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PolyValue::Null)
    }

    pub fn to_json(&self) -> Value {
        match self {
            PolyValue::Null => Value::Null,
            PolyValue::Boolean(b) => Value::Bool(*b),
            PolyValue::Integer(i) => json!(i),
            PolyValue::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PolyValue::String(s) | PolyValue::Temporal(s) | PolyValue::Symbol(s) => {
                Value::String(s.clone())
            }
            PolyValue::Binary(bytes) => Value::String(hex(bytes)),
            PolyValue::List(items) => Value::Array(items.iter().map(PolyValue::to_json).collect()),
            PolyValue::Document(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            PolyValue::Node(n) => n.to_json(),
            PolyValue::Edge(e) => e.to_json(),
            PolyValue::Path(p) => p.to_json(),
        }
    }

    /// Literal text of a scalar value as it appears in a digest.
    /// Multi-model values render with a type prefix and their JSON form.
    pub fn digest(&self) -> String {
        match self {
            PolyValue::Null => "null".to_string(),
            PolyValue::Boolean(b) => b.to_string(),
            PolyValue::Integer(i) => i.to_string(),
            PolyValue::Double(d) => format!("{:?}", d),
            PolyValue::String(s) => format!("'{}'", s.replace('\'', "''")),
            PolyValue::Temporal(s) | PolyValue::Symbol(s) => s.clone(),
            PolyValue::Binary(bytes) => format!("X'{}'", hex(bytes)),
            PolyValue::List(_) => format!("PolyList {}", self.to_json()),
            PolyValue::Document(_) => format!("PolyDocument {}", self.to_json()),
            PolyValue::Node(_) => format!("PolyNode {}", self.to_json()),
            PolyValue::Edge(_) => format!("PolyEdge {}", self.to_json()),
            PolyValue::Path(_) => format!("PolyPath {}", self.to_json()),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn properties_json(properties: &BTreeMap<String, PolyValue>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    LeftToRight,
    RightToLeft,
    None,
}

impl EdgeDirection {
    pub fn name(&self) -> &'static str {
        match self {
            EdgeDirection::LeftToRight => "LEFT_TO_RIGHT",
            EdgeDirection::RightToLeft => "RIGHT_TO_LEFT",
            EdgeDirection::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyNode {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, PolyValue>,
    pub variable_name: Option<String>,
}

impl PolyNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            properties: BTreeMap::new(),
            variable_name: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PolyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn named(mut self, variable_name: impl Into<String>) -> Self {
        self.variable_name = Some(variable_name.into());
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "labels": self.labels,
            "properties": properties_json(&self.properties),
            "variableName": self.variable_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyEdge {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, PolyValue>,
    pub variable_name: Option<String>,
    pub source: String,
    pub target: String,
    pub direction: EdgeDirection,
}

impl PolyEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            properties: BTreeMap::new(),
            variable_name: None,
            source: source.into(),
            target: target.into(),
            direction: EdgeDirection::LeftToRight,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PolyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn named(mut self, variable_name: impl Into<String>) -> Self {
        self.variable_name = Some(variable_name.into());
        self
    }

    pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "labels": self.labels,
            "properties": properties_json(&self.properties),
            "variableName": self.variable_name,
            "source": self.source,
            "target": self.target,
            "direction": self.direction.name(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphElement {
    Node(PolyNode),
    Edge(PolyEdge),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyPath {
    pub elements: Vec<GraphElement>,
    pub variable_name: Option<String>,
}

impl PolyPath {
    pub fn new(elements: Vec<GraphElement>) -> Self {
        Self {
            elements,
            variable_name: None,
        }
    }

    pub fn to_json(&self) -> Value {
        let elements: Vec<Value> = self
            .elements
            .iter()
            .map(|e| match e {
                GraphElement::Node(n) => n.to_json(),
                GraphElement::Edge(e) => e.to_json(),
            })
            .collect();
        json!({ "elements": elements, "variableName": self.variable_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_digests() {
        assert_eq!(PolyValue::Null.digest(), "null");
        assert_eq!(PolyValue::Integer(42).digest(), "42");
        assert_eq!(PolyValue::Double(2.0).digest(), "2.0");
        assert_eq!(PolyValue::string("it's").digest(), "'it''s'");
        assert_eq!(PolyValue::Binary(vec![0x0a, 0xff]).digest(), "X'0AFF'");
    }

    #[test]
    fn document_json_is_key_ordered() {
        let mut doc = BTreeMap::new();
        doc.insert("b".to_string(), PolyValue::Integer(2));
        doc.insert("a".to_string(), PolyValue::Boolean(true));
        let v = PolyValue::Document(doc);
        assert_eq!(v.digest(), r#"PolyDocument {"a":true,"b":2}"#);
    }

    #[test]
    fn nan_becomes_json_null() {
        assert_eq!(PolyValue::Double(f64::NAN).to_json(), Value::Null);
    }
}
