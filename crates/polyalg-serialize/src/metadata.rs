//! Display metadata for plan visualizations: per-node cost tables, badges
//! for plan-wide maxima and relative edge widths.

use std::collections::BTreeMap;

use polyalg_registry::AlgNode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::cost::{AlgCost, CostAccessor};

pub const TUPLE_COUNT: &str = "tupleCount";
pub const ROWS_COST: &str = "rowsCost";
pub const CPU_COST: &str = "cpuCost";

fn display_name(key: &str) -> &'static str {
    match key {
        TUPLE_COUNT => "Tuple Count",
        ROWS_COST => "Processed Tuples",
        CPU_COST => "CPU Cost",
        _ => "",
    }
}

/// Negative, NaN and infinite figures count as 0.
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Plan-wide maxima of per-node figures, plus the root's cumulative costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    max_values: BTreeMap<String, f64>,
    max_cumulative_values: BTreeMap<String, f64>,
}

impl GlobalStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(root: &dyn AlgNode, costs: &dyn CostAccessor) -> Self {
        let mut stats = Self::new();
        let cumulative = stats.visit(root, costs);
        stats.update_cumulative_max(ROWS_COST, cumulative.rows);
        stats.update_cumulative_max(CPU_COST, cumulative.cpu);
        stats
    }

    /// Post-order; returns the cumulative cost of `node`.
    fn visit(&mut self, node: &dyn AlgNode, costs: &dyn CostAccessor) -> AlgCost {
        let mut inputs = AlgCost::default();
        for child in node.inputs() {
            inputs = inputs.plus(self.visit(child.as_ref(), costs));
        }
        let cost = costs.non_cumulative_cost(node);
        self.update_max(TUPLE_COUNT, costs.tuple_count(node).unwrap_or(0.0));
        self.update_max(ROWS_COST, cost.rows);
        self.update_max(CPU_COST, cost.cpu);
        costs.cumulative_cost_from(node, inputs)
    }

    /// Never lowers a stored maximum.
    pub fn update_max(&mut self, key: &str, value: f64) {
        let slot = self.max_values.entry(key.to_string()).or_insert(0.0);
        *slot = slot.max(sanitize(value));
    }

    pub fn update_cumulative_max(&mut self, key: &str, value: f64) {
        let slot = self
            .max_cumulative_values
            .entry(key.to_string())
            .or_insert(0.0);
        *slot = slot.max(sanitize(value));
    }

    /// 0 for keys never seen.
    pub fn max(&self, key: &str) -> f64 {
        self.max_values.get(key).copied().unwrap_or(0.0)
    }

    pub fn max_cumulative(&self, key: &str) -> f64 {
        self.max_cumulative_values.get(key).copied().unwrap_or(0.0)
    }

    /// A positive value within `epsilon` of the maximum for `key`.
    pub fn is_global_max(&self, key: &str, value: f64, epsilon: f64) -> bool {
        let max = self.max(key);
        max > 0.0 && sanitize(value) >= max - epsilon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeLevel {
    Info,
    Warn,
    Danger,
}

impl BadgeLevel {
    pub fn name(&self) -> &'static str {
        match self {
            BadgeLevel::Info => "INFO",
            BadgeLevel::Warn => "WARN",
            BadgeLevel::Danger => "DANGER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    pub display_name: String,
    pub value: f64,
    pub cumulative_value: Option<f64>,
    pub is_calculated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub content: String,
    pub for_key: String,
    pub level: BadgeLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutEdge {
    /// Relative to the plan's largest tuple count, in `[0, 1]`.
    pub width: f64,
    pub for_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanNodeMetadata {
    pub table_rows: BTreeMap<String, TableRow>,
    pub badges: Vec<Badge>,
    pub out_edge: Option<OutEdge>,
    pub is_auxiliary: bool,
}

impl PlanNodeMetadata {
    pub fn new(is_auxiliary: bool) -> Self {
        Self {
            is_auxiliary,
            ..Self::default()
        }
    }

    pub fn add_table_row(&mut self, row: TableRow) -> &mut Self {
        self.table_rows.insert(row.key.clone(), row);
        self
    }

    pub fn add_badge(&mut self, content: impl Into<String>, for_key: impl Into<String>, level: BadgeLevel) -> &mut Self {
        self.badges.push(Badge {
            content: content.into(),
            for_key: for_key.into(),
            level,
        });
        self
    }

    pub fn table_row(&self, key: &str) -> Option<&TableRow> {
        self.table_rows.get(key)
    }

    /// Adds the tuple count and cost rows, a `MAX` badge for each cost the
    /// node holds the plan-wide maximum of, and the outgoing edge width.
    pub fn add_costs(
        &mut self,
        non_cumulative: AlgCost,
        cumulative: AlgCost,
        tuple_count: f64,
        stats: &GlobalStats,
        epsilon: f64,
    ) -> &mut Self {
        let figures = [
            (TUPLE_COUNT, sanitize(tuple_count), None),
            (ROWS_COST, sanitize(non_cumulative.rows), Some(sanitize(cumulative.rows))),
            (CPU_COST, sanitize(non_cumulative.cpu), Some(sanitize(cumulative.cpu))),
        ];
        for (key, value, cumulative_value) in figures {
            self.add_table_row(TableRow {
                key: key.to_string(),
                display_name: display_name(key).to_string(),
                value,
                cumulative_value,
                is_calculated: true,
            });
            if key != TUPLE_COUNT && stats.is_global_max(key, value, epsilon) {
                self.add_badge("MAX", key, BadgeLevel::Warn);
            }
        }

        let max_tuples = stats.max(TUPLE_COUNT);
        if max_tuples > 1.0 {
            self.out_edge = Some(OutEdge {
                width: sanitize(tuple_count) / max_tuples,
                for_key: TUPLE_COUNT.to_string(),
            });
        }
        self
    }

    pub fn to_json(&self) -> Value {
        let mut table = Map::new();
        for (key, row) in &self.table_rows {
            let mut entry = Map::new();
            entry.insert("displayName".into(), json!(row.display_name));
            entry.insert("value".into(), json!(row.value));
            if let Some(c) = row.cumulative_value {
                entry.insert("cumulativeValue".into(), json!(c));
            }
            entry.insert("calculated".into(), json!(row.is_calculated));
            table.insert(key.clone(), Value::Object(entry));
        }
        let badges: Vec<Value> = self
            .badges
            .iter()
            .map(|b| json!({ "content": b.content, "forKey": b.for_key, "level": b.level.name() }))
            .collect();

        let mut out = Map::new();
        out.insert("table".into(), Value::Object(table));
        out.insert("badges".into(), Value::Array(badges));
        if let Some(edge) = &self.out_edge {
            out.insert(
                "outConnection".into(),
                json!({ "width": edge.width, "forKey": edge.for_key }),
            );
        }
        out.insert("isAuxiliary".into(), json!(self.is_auxiliary));
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_max_never_decreases() {
        let mut s = GlobalStats::new();
        s.update_max(ROWS_COST, 10.0);
        s.update_max(ROWS_COST, 3.0);
        s.update_max(ROWS_COST, -5.0);
        s.update_max(ROWS_COST, f64::NAN);
        assert_eq!(s.max(ROWS_COST), 10.0);
        assert_eq!(s.max(CPU_COST), 0.0);
    }

    #[test]
    fn badge_and_edge_for_the_maximum_node() {
        let mut s = GlobalStats::new();
        s.update_max(TUPLE_COUNT, 100.0);
        s.update_max(ROWS_COST, 50.0);
        s.update_max(CPU_COST, 7.0);

        let mut m = PlanNodeMetadata::new(false);
        m.add_costs(AlgCost::new(50.0, 1.0), AlgCost::new(80.0, 2.0), 25.0, &s, 1e-7);
        assert_eq!(m.badges.len(), 1);
        assert_eq!(m.badges[0].for_key, ROWS_COST);
        assert_eq!(m.out_edge.as_ref().map(|e| e.width), Some(0.25));
        assert_eq!(m.table_row(ROWS_COST).and_then(|r| r.cumulative_value), Some(80.0));
        assert_eq!(m.table_row(TUPLE_COUNT).map(|r| r.display_name.as_str()), Some("Tuple Count"));
    }

    #[test]
    fn no_edge_when_every_count_is_at_most_one() {
        let mut s = GlobalStats::new();
        s.update_max(TUPLE_COUNT, 1.0);
        let mut m = PlanNodeMetadata::new(false);
        m.add_costs(AlgCost::default(), AlgCost::default(), 1.0, &s, 1e-7);
        assert!(m.out_edge.is_none());
        assert!(m.badges.is_empty());
    }

    #[test]
    fn tuple_count_maximum_earns_no_badge() {
        let mut s = GlobalStats::new();
        s.update_max(TUPLE_COUNT, 100.0);
        s.update_max(ROWS_COST, 1000.0);
        s.update_max(CPU_COST, 1000.0);
        let mut m = PlanNodeMetadata::new(false);
        m.add_costs(AlgCost::new(1.0, 1.0), AlgCost::new(1.0, 1.0), 100.0, &s, 1e-7);
        assert!(m.badges.is_empty());
        assert_eq!(m.out_edge.as_ref().map(|e| e.width), Some(1.0));
    }

    #[test]
    fn json_shape() {
        let mut m = PlanNodeMetadata::new(true);
        m.add_badge("slow", CPU_COST, BadgeLevel::Danger);
        let v = m.to_json();
        assert_eq!(v["isAuxiliary"], json!(true));
        assert_eq!(v["badges"][0]["level"], json!("DANGER"));
        assert!(v.get("outConnection").is_none());
    }
}
