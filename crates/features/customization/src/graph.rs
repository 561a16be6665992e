//! # Dependency Graph
//!
//! Every group names at most one parent (`dependsOn`), so the edges `parent -> child`
//! form a forest once cycles are excluded. The builder indexes groups by name, links
//! children to parents and runs a three-color depth-first traversal that both detects
//! cycles and emits a topological order (parents always precede their dependents).
//!
//! The order is deterministic: roots are visited in product order and the children of a
//! group in product order, so the same product always yields the same ordering.

use crate::error::SchemaError;
use bindery_kernel::domain::catalog::{GroupKind, Product};
use fxhash::FxHashMap;

/// The edge from a dependent group to the group it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEdge {
    /// Index of the parent group in product order.
    pub parent: usize,
    /// Option that must be selected in the parent for the child to be visible.
    pub required_option: String,
}

/// Adjacency structure and topological order over the groups of one product.
///
/// Group indices are positions in `Product::groups`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
    parents: Vec<Option<ParentEdge>>,
    children: Vec<Vec<usize>>,
    order: Vec<usize>,
    depth: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl DependencyGraph {
    /// Builds the graph for `product`.
    ///
    /// Schema validation rejects cycles before a product can be used, so this normally
    /// succeeds; it still refuses rather than loops when handed an unvalidated product.
    ///
    /// # Errors
    /// * [`SchemaError::DuplicateGroupName`] if two groups share a name (edges would be ambiguous).
    /// * [`SchemaError::UnknownDependencyTarget`] if a dependency names a missing group.
    /// * [`SchemaError::CyclicDependency`] with the cycle path if the edges are not acyclic.
    pub fn build(product: &Product) -> Result<Self, SchemaError> {
        let count = product.groups.len();
        let mut index = FxHashMap::default();
        index.reserve(count);

        for (i, group) in product.groups.iter().enumerate() {
            if index.insert(group.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateGroupName { group: group.name.clone() });
            }
        }

        let mut parents = Vec::with_capacity(count);
        let mut children = vec![Vec::new(); count];

        for (i, group) in product.groups.iter().enumerate() {
            let Some(dependency) = &group.depends_on else {
                parents.push(None);
                continue;
            };
            let Some(&parent) = index.get(&dependency.parent_group) else {
                return Err(SchemaError::UnknownDependencyTarget {
                    group: group.name.clone(),
                    parent: dependency.parent_group.clone(),
                });
            };
            children[parent].push(i);
            parents.push(Some(ParentEdge {
                parent,
                required_option: dependency.required_option.clone(),
            }));
        }

        let names = product.groups.iter().map(|g| g.name.clone()).collect();
        let mut graph =
            Self { names, index, parents, children, order: Vec::new(), depth: vec![0; count] };
        graph.sort()?;

        Ok(graph)
    }

    /// Three-color DFS over `parent -> child` edges. Roots first, then any group left
    /// unvisited (which can only happen when a cycle exists).
    fn sort(&mut self) -> Result<(), SchemaError> {
        let count = self.names.len();
        let mut color = vec![Color::White; count];
        let mut order = Vec::with_capacity(count);

        let (roots, rest): (Vec<usize>, Vec<usize>) =
            (0..count).partition(|&i| self.parents[i].is_none());

        for start in roots.into_iter().chain(rest) {
            if color[start] != Color::White {
                continue;
            }
            self.visit(start, &mut color, &mut order)?;
        }

        if order.len() != count {
            // Unreachable for well-formed input; kept so a broken invariant surfaces as an error.
            let path = (0..count)
                .filter(|&i| !order.contains(&i))
                .map(|i| self.names[i].clone())
                .collect();
            return Err(SchemaError::CyclicDependency { path });
        }

        self.order = order;
        Ok(())
    }

    /// Iterative DFS so arbitrarily deep chains cannot overflow the stack.
    fn visit(
        &mut self,
        start: usize,
        color: &mut [Color],
        order: &mut Vec<usize>,
    ) -> Result<(), SchemaError> {
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        color[start] = Color::Gray;
        order.push(start);
        self.depth[start] = self.parents[start]
            .as_ref()
            .filter(|edge| color[edge.parent] == Color::Black)
            .map_or(0, |edge| self.depth[edge.parent] + 1);

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let Some(&child) = self.children[node].get(top.1) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            top.1 += 1;

            match color[child] {
                Color::White => {
                    color[child] = Color::Gray;
                    self.depth[child] = self.depth[node] + 1;
                    order.push(child);
                    stack.push((child, 0));
                },
                Color::Gray => {
                    let from = stack.iter().position(|&(n, _)| n == child).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[from..].iter().map(|&(n, _)| self.names[n].clone()).collect();
                    path.push(self.names[child].clone());
                    return Err(SchemaError::CyclicDependency { path });
                },
                Color::Black => {},
            }
        }

        Ok(())
    }

    /// Number of groups (nodes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Group indices, parents before dependents.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Group names in topological order.
    pub fn ordered_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&i| self.names[i].as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the group at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    #[must_use]
    pub fn parent(&self, index: usize) -> Option<&ParentEdge> {
        self.parents.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Distance from the group to the root of its dependency chain (roots are 0).
    #[must_use]
    pub fn depth(&self, index: usize) -> usize {
        self.depth.get(index).copied().unwrap_or(0)
    }

    /// Groups without a dependency, in product order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&i| self.parents[i].is_none())
    }

    /// Walks from `index` up to its root, nearest ancestor first.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let mut current = self.parent(index).map(|edge| edge.parent);
        let mut remaining = self.len();
        std::iter::from_fn(move || {
            let node = current?;
            // Bounded so a corrupted graph cannot spin forever.
            remaining = remaining.checked_sub(1)?;
            current = self.parent(node).map(|edge| edge.parent);
            Some(node)
        })
    }
}

/// Builds the dependency graph of a product, for authoring tools that want to warn about
/// cycles while an operator is still editing.
///
/// # Errors
/// See [`DependencyGraph::build`].
pub fn build_dependency_graph(product: &Product) -> Result<DependencyGraph, SchemaError> {
    DependencyGraph::build(product)
}

/// True when a dependency on `kind` could ever be satisfied.
pub(crate) const fn is_selectable(kind: &GroupKind) -> bool {
    !matches!(kind, GroupKind::FreeText { .. })
}
