//! Cost figures the engine's cost model exposes to the renderer.

use polyalg_registry::AlgNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgCost {
    pub rows: f64,
    pub cpu: f64,
}

impl AlgCost {
    pub fn new(rows: f64, cpu: f64) -> Self {
        Self { rows, cpu }
    }

    pub fn plus(self, other: AlgCost) -> AlgCost {
        AlgCost::new(self.rows + other.rows, self.cpu + other.cpu)
    }
}

pub trait CostAccessor {
    /// Cost of the node alone.
    fn non_cumulative_cost(&self, node: &dyn AlgNode) -> AlgCost;

    /// Cost of the node and its whole subtree, given the summed cumulative
    /// cost of its inputs. Plan walks call this once per node.
    fn cumulative_cost_from(&self, node: &dyn AlgNode, inputs_cumulative: AlgCost) -> AlgCost {
        self.non_cumulative_cost(node).plus(inputs_cumulative)
    }

    /// Cost of the node and its whole subtree.
    fn cumulative_cost(&self, node: &dyn AlgNode) -> AlgCost {
        let inputs = node
            .inputs()
            .iter()
            .fold(AlgCost::default(), |acc, child| acc.plus(self.cumulative_cost(child.as_ref())));
        self.cumulative_cost_from(node, inputs)
    }

    /// Estimated output rows, if known.
    fn tuple_count(&self, node: &dyn AlgNode) -> Option<f64>;
}

/// Accessor for plans rendered without a cost model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCosts;

impl CostAccessor for NoCosts {
    fn non_cumulative_cost(&self, _node: &dyn AlgNode) -> AlgCost {
        AlgCost::default()
    }

    fn tuple_count(&self, _node: &dyn AlgNode) -> Option<f64> {
        None
    }
}
