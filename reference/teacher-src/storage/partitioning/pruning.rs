// Partition Pruning Optimization

use super::types::*;
use super::manager::PartitionManager;
use std::collections::HashMap;

// Partition pruning optimizer
// Eliminates partitions that don't match query predicates
pub struct PartitionPruner;

impl PartitionPruner {
    // Prune partitions based on query predicate
    pub fn prune_partitions(
        metadata: &PartitionMetadata,
        predicate: &QueryPredicate,
    ) -> Vec<String> {
        match &metadata.strategy {
            PartitionStrategy::Range { column, ranges } => {
                Self::prune_range_partitions(column, ranges, predicate)
            }
            PartitionStrategy::Hash { column, num_partitions } => {
                Self::prune_hash_partitions(column, *num_partitions, predicate)
            }
            PartitionStrategy::List { column, lists } => {
                Self::prune_list_partitions(column, lists, predicate)
            }
            PartitionStrategy::Composite { primary, secondary } => {
                let _ = secondary;
                match primary.as_ref() {
                    PartitionStrategy::Range { column, ranges } => {
                        Self::prune_range_partitions(column, ranges, predicate)
                    }
                    PartitionStrategy::Hash { column, num_partitions } => {
                        Self::prune_hash_partitions(column, *num_partitions, predicate)
                    }
                    PartitionStrategy::List { column, lists } => {
                        Self::prune_list_partitions(column, lists, predicate)
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    fn prune_range_partitions(
        column: &str,
        ranges: &[RangePartition],
        predicate: &QueryPredicate,
    ) -> Vec<String> {
        if predicate.column != column {
            return ranges.iter().map(|p| p.name.clone()).collect();
        }

        ranges
            .iter()
            .filter(|range| {
                Self::range_matches_predicate(
                    &range.lower_bound,
                    &range.upper_bound,
                    predicate,
                )
            })
            .map(|p| p.name.clone())
            .collect()
    }

    fn range_matches_predicate(
        lower: &Option<String>,
        upper: &Option<String>,
        predicate: &QueryPredicate,
    ) -> bool {
        match predicate.operator {
            PredicateOperator::Equal => {
                match (lower, upper) {
                    (None, None) => true,
                    (None, Some(u)) => &predicate.value < u,
                    (Some(l), None) => &predicate.value >= l,
                    (Some(l), Some(u)) => {
                        &predicate.value >= l && &predicate.value < u
                    }
                }
            }
            PredicateOperator::GreaterThan => {
                upper.as_ref().map(|u| u > &predicate.value).unwrap_or(true)
            }
            PredicateOperator::LessThan => {
                lower.as_ref().map(|l| l < &predicate.value).unwrap_or(true)
            }
            PredicateOperator::Between { upper: ref pred_upper_bound } => {
                let pred_lower = &predicate.value;
                let pred_upper = pred_upper_bound;

                match (lower, upper) {
                    (None, None) => true,
                    (None, Some(u)) => pred_lower.as_str() < u.as_str(),
                    (Some(l), None) => pred_upper.as_str() >= l.as_str(),
                    (Some(l), Some(u)) => {
                        pred_lower.as_str() < u.as_str() && pred_upper.as_str() >= l.as_str()
                    }
                }
            }
        }
    }

    fn prune_hash_partitions(
        column: &str,
        num_partitions: usize,
        predicate: &QueryPredicate,
    ) -> Vec<String> {
        if predicate.column != column {
            return (0..num_partitions)
                .map(|i| format!("partition_{}", i))
                .collect();
        }

        match predicate.operator {
            PredicateOperator::Equal => {
                let partition = PartitionManager::hash_partition(
                    &predicate.value,
                    num_partitions,
                );
                vec![partition]
            }
            _ => {
                (0..num_partitions)
                    .map(|i| format!("partition_{}", i))
                    .collect()
            }
        }
    }

    fn prune_list_partitions(
        column: &str,
        lists: &[ListPartition],
        predicate: &QueryPredicate,
    ) -> Vec<String> {
        if predicate.column != column {
            return lists.iter().map(|p| p.name.clone()).collect();
        }

        match predicate.operator {
            PredicateOperator::Equal => {
                lists
                    .iter()
                    .filter(|list| list.values.contains(&predicate.value))
                    .map(|p| p.name.clone())
                    .collect()
            }
            _ => {
                lists.iter().map(|p| p.name.clone()).collect()
            }
        }
    }
}

// Advanced Partition Pruning Engine
pub mod advanced {
    use super::*;

    // Partition pruning optimizer
    pub struct PartitionPruningOptimizer {
        statistics: HashMap<String, PartitionStatistics>,
        #[allow(dead_code)]
        pruning_rules: Vec<PruningRule>,
    }

    #[derive(Debug, Clone)]
    pub struct PruningRule {
        pub column: String,
        pub operator: ComparisonOperator,
        pub value: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum ComparisonOperator {
        Equal,
        NotEqual,
        LessThan,
        LessThanOrEqual,
        GreaterThan,
        GreaterThanOrEqual,
        In,
        NotIn,
        Between,
    }

    impl PartitionPruningOptimizer {
        pub fn new() -> Self {
            Self {
                statistics: HashMap::new(),
                pruning_rules: Vec::new(),
            }
        }

        pub fn add_statistics(&mut self, table: String, partition: String, stats: PartitionStatistics) {
            let key = format!("{}:{}", table, partition);
            self.statistics.insert(key, stats);
        }

        pub fn prune_partitions(
            &self,
            table: &str,
            all_partitions: &[String],
            predicates: &[PruningRule],
        ) -> Vec<String> {
            let mut result = all_partitions.to_vec();

            for predicate in predicates {
                result = self.apply_pruning_rule(&result, table, predicate);
            }

            result
        }

        fn apply_pruning_rule(
            &self,
            partitions: &[String],
            table: &str,
            rule: &PruningRule,
        ) -> Vec<String> {
            partitions
                .iter()
                .filter(|partition| {
                    self.partition_matches_rule(table, partition, rule)
                })
                .cloned()
                .collect()
        }

        fn partition_matches_rule(&self, table: &str, partition: &str, rule: &PruningRule) -> bool {
            let key = format!("{}:{}", table, partition);

            if let Some(stats) = self.statistics.get(&key) {
                match rule.operator {
                    ComparisonOperator::Equal => {
                        self.value_in_range(&rule.value, &stats.min_value, &stats.max_value)
                    }
                    ComparisonOperator::GreaterThan | ComparisonOperator::GreaterThanOrEqual => {
                        stats.max_value >= rule.value
                    }
                    ComparisonOperator::LessThan | ComparisonOperator::LessThanOrEqual => {
                        stats.min_value <= rule.value
                    }
                    _ => true,
                }
            } else {
                true
            }
        }

        fn value_in_range(&self, value: &str, min: &str, max: &str) -> bool {
            value >= min && value <= max
        }

        pub fn estimate_pruned_rows(
            &self,
            table: &str,
            partitions: &[String],
        ) -> usize {
            partitions
                .iter()
                .filter_map(|p| {
                    let key = format!("{}:{}", table, p);
                    self.statistics.get(&key).map(|s| s.row_count)
                })
                .sum()
        }
    }

    impl Default for PartitionPruningOptimizer {
        fn default() -> Self {
            Self::new()
        }
    }
}
