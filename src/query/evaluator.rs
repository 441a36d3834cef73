//! Filter tree evaluation
//!
//! Evaluates a filter tree against the full record set of a dataset,
//! producing the positions of matching sections. Matching uses set
//! semantics: AND intersects, OR unions, NOT complements against the full
//! input set. Position identity stands in for record identity, so union
//! de-duplication and complement need no record comparison.
//!
//! Evaluation is pure, synchronous recursion. Sibling nodes are
//! independent, and AND/OR results are order-normalized, so no execution
//! order is observable.

use std::collections::HashSet;

use crate::dataset::Section;

use super::ast::{Filter, LogicOp};

/// Evaluates filter trees against section slices
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Returns the positions of sections the tree matches: dataset order
    /// for leaves and NOT, first-child order for AND, first-seen order for
    /// OR. `None` is the match-all tree.
    pub fn evaluate(filter: Option<&Filter>, sections: &[Section]) -> Vec<usize> {
        match filter {
            None => (0..sections.len()).collect(),
            Some(node) => Self::evaluate_node(node, sections),
        }
    }

    fn evaluate_node(node: &Filter, sections: &[Section]) -> Vec<usize> {
        match node {
            Filter::Numeric { op, field, value } => sections
                .iter()
                .enumerate()
                .filter(|(_, section)| op.compare(section.numeric(*field), *value))
                .map(|(index, _)| index)
                .collect(),
            Filter::Text { field, pattern } => sections
                .iter()
                .enumerate()
                .filter(|(_, section)| pattern.matches(section.string(*field)))
                .map(|(index, _)| index)
                .collect(),
            Filter::Logic {
                op: LogicOp::And,
                children,
            } => Self::intersect(children, sections),
            Filter::Logic {
                op: LogicOp::Or,
                children,
            } => Self::union(children, sections),
            Filter::Not(child) => {
                let excluded: HashSet<usize> =
                    Self::evaluate_node(child, sections).into_iter().collect();
                (0..sections.len())
                    .filter(|index| !excluded.contains(index))
                    .collect()
            }
        }
    }

    /// Intersection of all children, in the order of the first child's
    /// result.
    fn intersect(children: &[Filter], sections: &[Section]) -> Vec<usize> {
        let mut iter = children.iter();
        let mut kept = match iter.next() {
            Some(first) => Self::evaluate_node(first, sections),
            None => return Vec::new(),
        };
        for child in iter {
            let matches: HashSet<usize> =
                Self::evaluate_node(child, sections).into_iter().collect();
            kept.retain(|index| matches.contains(index));
        }
        kept
    }

    /// Union of all children, preserving first-seen order.
    fn union(children: &[Filter], sections: &[Section]) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for child in children {
            for index in Self::evaluate_node(child, sections) {
                if seen.insert(index) {
                    merged.push(index);
                }
            }
        }
        merged
    }
}
