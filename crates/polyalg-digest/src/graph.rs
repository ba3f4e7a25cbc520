//! Cypher-like rendering of graph literals.
//!
//! Top-level elements carry a `PolyNode`/`PolyEdge`/`PolyPath` prefix; elements
//! nested in a path are rendered bare and edges drop their endpoints.

use std::collections::BTreeMap;

use polyalg_core::value::{EdgeDirection, GraphElement, PolyEdge, PolyNode, PolyPath, PolyValue};

fn label_props(
    variable_name: Option<&str>,
    labels: &[String],
    properties: &BTreeMap<String, PolyValue>,
) -> String {
    let mut s = variable_name.unwrap_or_default().to_string();
    let labels = match labels.len() {
        0 => String::new(),
        1 => labels[0].clone(),
        _ => format!("[{}]", labels.join(", ")),
    };
    if !labels.is_empty() {
        s.push(':');
        s.push_str(&labels);
    }
    if !properties.is_empty() {
        if !s.is_empty() {
            s.push(' ');
        }
        s.push_str(&PolyValue::Document(properties.clone()).to_json().to_string());
    }
    s
}

pub fn node_digest(node: &PolyNode, with_prefix: bool) -> String {
    let body = format!(
        "({})",
        label_props(node.variable_name.as_deref(), &node.labels, &node.properties)
    );
    if with_prefix {
        format!("PolyNode {}", body)
    } else {
        body
    }
}

pub fn edge_digest(edge: &PolyEdge, with_prefix: bool) -> String {
    let (left, right) = match edge.direction {
        EdgeDirection::LeftToRight => ("-", "->"),
        EdgeDirection::RightToLeft => ("<-", "-"),
        EdgeDirection::None => ("-", "-"),
    };
    let body = format!(
        "{}[{}]{}",
        left,
        label_props(edge.variable_name.as_deref(), &edge.labels, &edge.properties),
        right
    );
    if with_prefix {
        format!("PolyEdge ({}){}({})", edge.source, body, edge.target)
    } else {
        body
    }
}

pub fn path_digest(path: &PolyPath, with_prefix: bool) -> String {
    let body: String = path
        .elements
        .iter()
        .map(|e| match e {
            GraphElement::Node(n) => node_digest(n, false),
            GraphElement::Edge(e) => edge_digest(e, false),
        })
        .collect();
    if with_prefix {
        format!("PolyPath {}", body)
    } else {
        body
    }
}
