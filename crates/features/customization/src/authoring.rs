//! # Authoring Editor
//!
//! Immutable edits over a product definition, addressed by stable [`GroupId`]/[`OptionId`]
//! rather than array positions or display names. Every edit returns a new draft; the
//! original stays usable, which gives authoring tools undo for free.
//!
//! Dependencies are stored by name (that is what the catalog publishes), so renames are
//! propagated into every dependency that points at the renamed group or option, and
//! removals are refused while something still depends on the target.

use crate::error::{AuthoringError, SchemaError};
use crate::graph::{self, DependencyGraph};
use crate::schema::{Schema, validate_schema};
use bindery_kernel::domain::catalog::{
    Dependency, Group, GroupId, GroupKind, OptionId, Product, ProductOption,
};
use bindery_kernel::domain::money::Money;
use bindery_kernel::ids::{new_group_id, new_option_id};

/// A product definition under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    product: Product,
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self { product }
    }
}

impl ProductDraft {
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { product: Product::new(base_price) }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn into_product(self) -> Product {
        self.product
    }

    /// Appends a group and returns its freshly minted id.
    #[must_use]
    pub fn add_group(&self, name: impl Into<String>, kind: GroupKind) -> (Self, GroupId) {
        let id = new_group_id();
        let next = self.edit(|product| {
            product.groups.push(Group::new(id.clone(), name, kind));
        });
        (next, id)
    }

    /// Appends an option to a select group and returns its freshly minted id.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`], or [`AuthoringError::NotSelectable`] for free text.
    pub fn add_option(
        &self,
        group: &GroupId,
        name: impl Into<String>,
        price_modifier: Money,
    ) -> Result<(Self, OptionId), AuthoringError> {
        let id = new_option_id();
        let option = ProductOption::new(id.clone(), name, price_modifier);
        let next = self.try_edit(|product| {
            let target = group_mut(product, group)?;
            let name = target.name.clone();
            target
                .kind
                .options_mut()
                .ok_or(AuthoringError::NotSelectable { group: name })?
                .push(option);
            Ok(())
        })?;
        Ok((next, id))
    }

    /// Renames a group and every dependency on it.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`].
    pub fn rename_group(&self, id: &GroupId, name: impl Into<String>) -> Result<Self, AuthoringError> {
        let name = name.into();
        self.try_edit(|product| {
            let target = group_mut(product, id)?;
            let old = std::mem::replace(&mut target.name, name.clone());

            for dependency in dependencies_mut(product) {
                if dependency.parent_group == old {
                    dependency.parent_group.clone_from(&name);
                }
            }
            Ok(())
        })
    }

    /// Renames an option and every dependency requiring it.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`] or [`AuthoringError::UnknownOption`].
    pub fn rename_option(
        &self,
        group: &GroupId,
        option: &OptionId,
        name: impl Into<String>,
    ) -> Result<Self, AuthoringError> {
        let name = name.into();
        self.try_edit(|product| {
            let target = option_mut(product, group, option)?;
            let old = std::mem::replace(&mut target.name, name.clone());
            let group_name = group_ref(product, group)?.name.clone();

            for dependency in dependencies_mut(product) {
                if dependency.parent_group == group_name && dependency.required_option == old {
                    dependency.required_option.clone_from(&name);
                }
            }
            Ok(())
        })
    }

    /// Makes `id` visible only while `parent` has `option` selected.
    ///
    /// Cycles are not checked here; [`ProductDraft::finish`] reports them.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`], [`AuthoringError::UnknownOption`], or
    /// [`AuthoringError::NotSelectable`] when the parent is free text.
    pub fn set_dependency(
        &self,
        id: &GroupId,
        parent: &GroupId,
        option: &OptionId,
    ) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            let parent_group = group_ref(product, parent)?;
            if !graph::is_selectable(&parent_group.kind) {
                return Err(AuthoringError::NotSelectable { group: parent_group.name.clone() });
            }
            let required = parent_group
                .options()
                .iter()
                .find(|o| &o.id == option)
                .ok_or_else(|| AuthoringError::UnknownOption { group: parent.clone(), id: option.clone() })?;
            let dependency = Dependency::new(parent_group.name.clone(), required.name.clone());

            group_mut(product, id)?.depends_on = Some(dependency);
            Ok(())
        })
    }

    /// # Errors
    /// [`AuthoringError::UnknownGroup`].
    pub fn clear_dependency(&self, id: &GroupId) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            group_mut(product, id)?.depends_on = None;
            Ok(())
        })
    }

    /// # Errors
    /// [`AuthoringError::UnknownGroup`] or [`AuthoringError::UnknownOption`].
    pub fn set_price(
        &self,
        group: &GroupId,
        option: &OptionId,
        price_modifier: Money,
    ) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            option_mut(product, group, option)?.price_modifier = price_modifier;
            Ok(())
        })
    }

    /// Tags a group with an exclusivity family; `None` or a blank tag removes it.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`].
    pub fn set_exclusivity_family(
        &self,
        id: &GroupId,
        family: Option<&str>,
    ) -> Result<Self, AuthoringError> {
        let family = family.map(str::trim).filter(|f| !f.is_empty()).map(str::to_owned);
        self.try_edit(|product| {
            group_mut(product, id)?.exclusivity_family = family;
            Ok(())
        })
    }

    #[must_use]
    pub fn set_base_price(&self, base_price: Money) -> Self {
        self.edit(|product| product.base_price = base_price)
    }

    /// Moves a group to `index` (clamped to the end). Dependencies are unaffected.
    ///
    /// # Errors
    /// [`AuthoringError::UnknownGroup`].
    pub fn move_group(&self, id: &GroupId, index: usize) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            let from = position(product, id)?;
            let group = product.groups.remove(from);
            let to = index.min(product.groups.len());
            product.groups.insert(to, group);
            Ok(())
        })
    }

    /// # Errors
    /// [`AuthoringError::UnknownGroup`], or [`AuthoringError::StillReferenced`] naming the
    /// groups that depend on it.
    pub fn remove_group(&self, id: &GroupId) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            let index = position(product, id)?;
            let name = product.groups[index].name.clone();
            let dependents = dependents(product, |d| d.parent_group == name, index);
            if !dependents.is_empty() {
                return Err(AuthoringError::StillReferenced { target: name, dependents });
            }

            product.groups.remove(index);
            Ok(())
        })
    }

    /// # Errors
    /// [`AuthoringError::UnknownGroup`], [`AuthoringError::UnknownOption`], or
    /// [`AuthoringError::StillReferenced`] naming the groups requiring it.
    pub fn remove_option(&self, group: &GroupId, option: &OptionId) -> Result<Self, AuthoringError> {
        self.try_edit(|product| {
            let index = position(product, group)?;
            let group_name = product.groups[index].name.clone();
            let option_name = option_mut(product, group, option)?.name.clone();

            let dependents = dependents(
                product,
                |d| d.parent_group == group_name && d.required_option == option_name,
                usize::MAX,
            );
            if !dependents.is_empty() {
                return Err(AuthoringError::StillReferenced {
                    target: format!("{group_name}/{option_name}"),
                    dependents,
                });
            }

            if let Some(options) = product.groups[index].kind.options_mut() {
                options.retain(|o| &o.id != option);
            }
            Ok(())
        })
    }

    /// Current violations without consuming the draft, for live feedback while editing.
    #[must_use]
    pub fn violations(&self) -> Vec<SchemaError> {
        validate_schema(self.product.clone()).err().unwrap_or_default()
    }

    /// Dependency graph of the draft as it stands.
    ///
    /// # Errors
    /// The first structural problem that prevents building the graph.
    pub fn dependency_graph(&self) -> Result<DependencyGraph, SchemaError> {
        graph::build_dependency_graph(&self.product)
    }

    /// Validates the draft and turns it into a usable [`Schema`].
    ///
    /// # Errors
    /// [`AuthoringError::InvalidSchema`] with every violation.
    pub fn finish(self) -> Result<Schema, AuthoringError> {
        validate_schema(self.product).map_err(|errors| AuthoringError::InvalidSchema { errors })
    }

    fn edit(&self, apply: impl FnOnce(&mut Product)) -> Self {
        let mut product = self.product.clone();
        apply(&mut product);
        Self { product }
    }

    fn try_edit(
        &self,
        apply: impl FnOnce(&mut Product) -> Result<(), AuthoringError>,
    ) -> Result<Self, AuthoringError> {
        let mut product = self.product.clone();
        apply(&mut product)?;
        Ok(Self { product })
    }
}

fn position(product: &Product, id: &GroupId) -> Result<usize, AuthoringError> {
    product
        .groups
        .iter()
        .position(|g| &g.id == id)
        .ok_or_else(|| AuthoringError::UnknownGroup { id: id.clone() })
}

fn group_ref<'p>(product: &'p Product, id: &GroupId) -> Result<&'p Group, AuthoringError> {
    product.group_by_id(id).ok_or_else(|| AuthoringError::UnknownGroup { id: id.clone() })
}

fn group_mut<'p>(product: &'p mut Product, id: &GroupId) -> Result<&'p mut Group, AuthoringError> {
    product
        .groups
        .iter_mut()
        .find(|g| &g.id == id)
        .ok_or_else(|| AuthoringError::UnknownGroup { id: id.clone() })
}

fn option_mut<'p>(
    product: &'p mut Product,
    group: &GroupId,
    option: &OptionId,
) -> Result<&'p mut ProductOption, AuthoringError> {
    let target = group_mut(product, group)?;
    let name = target.name.clone();
    target
        .kind
        .options_mut()
        .ok_or(AuthoringError::NotSelectable { group: name })?
        .iter_mut()
        .find(|o| &o.id == option)
        .ok_or_else(|| AuthoringError::UnknownOption { group: group.clone(), id: option.clone() })
}

fn dependencies_mut(product: &mut Product) -> impl Iterator<Item = &mut Dependency> {
    product.groups.iter_mut().filter_map(|g| g.depends_on.as_mut())
}

/// Names of groups (other than the one at `skip`) whose dependency matches.
fn dependents(product: &Product, matches: impl Fn(&Dependency) -> bool, skip: usize) -> Vec<String> {
    product
        .groups
        .iter()
        .enumerate()
        .filter(|&(i, g)| i != skip && g.depends_on.as_ref().is_some_and(&matches))
        .map(|(_, g)| g.name.clone())
        .collect()
}
