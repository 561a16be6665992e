//! # Schema Validator
//!
//! Structural checks that gate every product definition before a shopper may see it.
//! Violations are collected rather than reported one at a time so an operator can fix a
//! definition in a single pass.

use crate::error::SchemaError;
use crate::graph::{self, DependencyGraph};
use bindery_kernel::domain::catalog::{Group, Product};
use fxhash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{info, warn};

/// A product definition that passed validation, together with its dependency graph.
///
/// Shopper-time operations only accept this type, so they never have to re-check names,
/// options or acyclicity. Cloning is cheap and the value can be shared between threads.
#[derive(Debug, Clone)]
pub struct Schema {
    product: Arc<Product>,
    graph: Arc<DependencyGraph>,
}

impl Schema {
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The shared product definition, for snapshots that outlive the schema.
    #[must_use]
    pub fn product_arc(&self) -> Arc<Product> {
        Arc::clone(&self.product)
    }

    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Looks a group up by name, returning its index alongside it.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<(usize, &Group)> {
        let index = self.graph.index_of(name)?;
        Some((index, &self.product.groups[index]))
    }

    /// Group at `index` in product order.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn group_at(&self, index: usize) -> &Group {
        &self.product.groups[index]
    }

    /// Groups in topological order (parents before dependents).
    pub fn ordered_groups(&self) -> impl Iterator<Item = &Group> {
        self.graph.order().iter().map(|&i| &self.product.groups[i])
    }
}

impl TryFrom<Product> for Schema {
    type Error = Vec<SchemaError>;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        validate_schema(product)
    }
}

/// Validates a candidate product definition.
///
/// # Errors
/// Returns every violation found. Cycle detection needs unambiguous group names, so it is
/// skipped while duplicate names are present; dependencies on unknown groups are ignored
/// for cycle detection only.
pub fn validate_schema(product: Product) -> Result<Schema, Vec<SchemaError>> {
    let mut errors = Vec::new();

    if product.base_price.is_negative() {
        errors.push(SchemaError::NegativeBasePrice { amount: product.base_price });
    }

    let names = check_groups(&product, &mut errors);
    check_dependencies(&product, &names, &mut errors);

    let unique_names = !errors.iter().any(|e| matches!(e, SchemaError::DuplicateGroupName { .. }));
    let graph = unique_names.then(|| build_graph(&product, &names, &mut errors)).flatten();

    if let Some(graph) = &graph {
        check_families(&product, graph, &mut errors);
    }

    match graph {
        Some(graph) if errors.is_empty() => {
            info!(groups = product.groups.len(), "Product schema accepted");
            Ok(Schema { product: Arc::new(product), graph: Arc::new(graph) })
        },
        _ => {
            warn!(violations = errors.len(), "Product schema rejected");
            Err(errors)
        },
    }
}

/// Per-group checks: unique names and ids, non-empty select groups, unique options.
/// Returns the first index of every group name.
fn check_groups<'p>(product: &'p Product, errors: &mut Vec<SchemaError>) -> FxHashMap<&'p str, usize> {
    let mut names = FxHashMap::default();
    let mut ids = FxHashSet::default();
    let mut reported = FxHashSet::default();

    for (index, group) in product.groups.iter().enumerate() {
        // Dependencies resolve to the first group carrying a name.
        match names.entry(group.name.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            },
            Entry::Occupied(_) => {
                if reported.insert(group.name.as_str()) {
                    errors.push(SchemaError::DuplicateGroupName { group: group.name.clone() });
                }
            },
        }
        if !ids.insert(group.id.as_str()) {
            errors.push(SchemaError::DuplicateGroupId { id: group.id.to_string() });
        }

        if graph::is_selectable(&group.kind) && group.options().is_empty() {
            errors.push(SchemaError::NoOptions { group: group.name.clone() });
        }

        let mut option_names = FxHashSet::default();
        let mut option_ids = FxHashSet::default();
        for option in group.options() {
            if !option_names.insert(option.name.as_str()) {
                errors.push(SchemaError::DuplicateOptionName {
                    group: group.name.clone(),
                    option: option.name.clone(),
                });
            }
            if !option_ids.insert(option.id.as_str()) {
                errors.push(SchemaError::DuplicateOptionId {
                    group: group.name.clone(),
                    id: option.id.to_string(),
                });
            }
        }
    }

    names
}

fn check_dependencies(
    product: &Product,
    names: &FxHashMap<&str, usize>,
    errors: &mut Vec<SchemaError>,
) {
    for group in &product.groups {
        let Some(dependency) = &group.depends_on else { continue };

        let Some(&parent_index) = names.get(dependency.parent_group.as_str()) else {
            errors.push(SchemaError::UnknownDependencyTarget {
                group: group.name.clone(),
                parent: dependency.parent_group.clone(),
            });
            continue;
        };

        let parent = &product.groups[parent_index];
        if !graph::is_selectable(&parent.kind) {
            errors.push(SchemaError::DependencyOnFreeTextGroup {
                group: group.name.clone(),
                parent: parent.name.clone(),
            });
        } else if parent.option(&dependency.required_option).is_none() {
            errors.push(SchemaError::UnknownDependencyOption {
                group: group.name.clone(),
                parent: parent.name.clone(),
                option: dependency.required_option.clone(),
            });
        }
    }
}

/// Builds the graph, treating dependencies on unknown groups as absent so that cycles
/// elsewhere are still reported. Returns `None` if the product cannot be used.
fn build_graph(
    product: &Product,
    names: &FxHashMap<&str, usize>,
    errors: &mut Vec<SchemaError>,
) -> Option<DependencyGraph> {
    let dangling = product.groups.iter().any(|g| {
        g.depends_on.as_ref().is_some_and(|d| !names.contains_key(d.parent_group.as_str()))
    });

    let result = if dangling {
        let mut resolvable = product.clone();
        for group in &mut resolvable.groups {
            if group.depends_on.as_ref().is_some_and(|d| !names.contains_key(d.parent_group.as_str()))
            {
                group.depends_on = None;
            }
        }
        DependencyGraph::build(&resolvable)
    } else {
        DependencyGraph::build(product)
    };

    match result {
        Ok(graph) => Some(graph),
        Err(err) => {
            errors.push(err);
            None
        },
    }
}

/// A group may not depend, directly or transitively, on a group of its own exclusivity
/// family: answering it would clear the ancestor that makes it visible.
fn check_families(product: &Product, graph: &DependencyGraph, errors: &mut Vec<SchemaError>) {
    for (index, group) in product.groups.iter().enumerate() {
        let Some(family) = group.family() else { continue };

        let conflict = graph
            .ancestors(index)
            .find(|&ancestor| product.groups[ancestor].family() == Some(family));

        if let Some(ancestor) = conflict {
            errors.push(SchemaError::FamilyDependencyConflict {
                group: group.name.clone(),
                ancestor: product.groups[ancestor].name.clone(),
                family: family.to_owned(),
            });
        }
    }
}
