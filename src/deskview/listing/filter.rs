//! Filter stage.
//!
//! A [`FilterCriteria`] is a conjunction of four predicates: search text,
//! category, flag and tab. A predicate at its default value is inactive and
//! passes everything, so `FilterCriteria::default()` is the identity filter.

use super::{CriteriaFor, Listable, TabContext};
use serde::{Deserialize, Serialize};

/// Boolean flags a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Flag {
    Starred,
    Shared,
}

/// Selected state of the flag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    Any,
    Only(Flag),
    Without(Flag),
}

impl FlagFilter {
    pub fn accepts<L: Listable>(self, item: &L) -> bool {
        match self {
            FlagFilter::Any => true,
            FlagFilter::Only(flag) => item.has_flag(flag),
            FlagFilter::Without(flag) => !item.has_flag(flag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<C, T> {
    /// Free text; matched case-insensitively against the record's search fields.
    pub search: String,
    /// `None` means every category.
    pub category: Option<C>,
    pub flag: FlagFilter,
    pub tab: T,
}

impl<C, T: Default> Default for FilterCriteria<C, T> {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            flag: FlagFilter::Any,
            tab: T::default(),
        }
    }
}

impl<C: Copy + Eq, T: Copy + Eq + Default> FilterCriteria<C, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: C) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_flag(mut self, flag: FlagFilter) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_tab(mut self, tab: T) -> Self {
        self.tab = tab;
        self
    }

    /// The normalized search term, or `None` when search is inactive.
    pub fn search_term(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.search_term().is_none()
            && self.category.is_none()
            && self.flag == FlagFilter::Any
            && self.tab == T::default()
    }
}

/// Whether a single item passes every active predicate.
pub fn matches<L: Listable>(item: &L, criteria: &CriteriaFor<L>, ctx: &TabContext) -> bool {
    matches_term(item, criteria, criteria.search_term().as_deref(), ctx)
}

fn matches_term<L: Listable>(
    item: &L,
    criteria: &CriteriaFor<L>,
    term: Option<&str>,
    ctx: &TabContext,
) -> bool {
    if !item.in_tab(criteria.tab, ctx) {
        return false;
    }
    if let Some(category) = criteria.category {
        if item.category() != category {
            return false;
        }
    }
    if !criteria.flag.accepts(item) {
        return false;
    }
    match term {
        None => true,
        Some(term) => item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(term)),
    }
}

/// Returns the items passing all active predicates, in their original order.
pub fn filter_items<'a, L: Listable>(
    items: &'a [L],
    criteria: &CriteriaFor<L>,
    ctx: &TabContext,
) -> Vec<&'a L> {
    let term = criteria.search_term();
    let kept: Vec<&L> = items
        .iter()
        .filter(|item| matches_term(*item, criteria, term.as_deref(), ctx))
        .collect();
    tracing::trace!(total = items.len(), kept = kept.len(), "filtered list");
    kept
}
