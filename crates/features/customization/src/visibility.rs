//! # Visibility Resolver
//!
//! A group without a dependency is always visible. A dependent group is visible iff its
//! parent is visible **and** the parent's selection is (single choice) or contains
//! (multi choice) the required option. Walking the graph in topological order means
//! every parent is resolved before its children, so one pass over the groups suffices.

use crate::graph::DependencyGraph;
use crate::selection::SelectionState;

/// The set of currently visible groups of one product.
#[derive(Debug, Clone)]
pub struct Visibility<'g> {
    graph: &'g DependencyGraph,
    flags: Vec<bool>,
}

impl<'g> Visibility<'g> {
    #[must_use]
    pub fn is_visible(&self, group: &str) -> bool {
        self.graph.index_of(group).is_some_and(|i| self.flags[i])
    }

    #[must_use]
    pub fn is_visible_at(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Visible group names in product order.
    pub fn iter(&self) -> impl Iterator<Item = &'g str> + '_ {
        let graph = self.graph;
        self.indices().map(move |i| graph.name(i))
    }

    /// Visible group indices in product order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags.iter().enumerate().filter_map(|(i, &visible)| visible.then_some(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&visible| visible).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.flags.contains(&true)
    }

    #[must_use]
    pub fn to_names(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

/// Computes which groups are visible under `selections`. Pure, O(groups + edges).
#[must_use]
pub fn resolve_visibility<'g>(
    graph: &'g DependencyGraph,
    selections: &SelectionState,
) -> Visibility<'g> {
    let mut flags = vec![false; graph.len()];

    for &index in graph.order() {
        flags[index] = graph.parent(index).is_none_or(|edge| {
            flags[edge.parent]
                && selections.get(graph.name(edge.parent)).contains_option(&edge.required_option)
        });
    }

    Visibility { graph, flags }
}
