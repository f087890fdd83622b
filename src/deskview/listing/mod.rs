//! # List Pipeline
//!
//! Every list view in the dashboard (Drive, SMS templates, documents, projects)
//! runs the same one-directional pipeline:
//!
//! ```text
//! item store ──► filter ──► sort ──► paginate ──► render
//! ```
//!
//! Each stage is a pure function of its inputs:
//!
//! - [`filter::filter_items`]: keeps items matching **all** active predicates
//!   of a [`FilterCriteria`]. Predicates at their default value pass everything.
//! - [`sort::sort_items`]: orders by a [`SortSpec`], after the record's fixed
//!   group rank (folders before files), with a stable sort.
//! - [`paginate::paginate`]: slices `[(page-1)*size, page*size)`, clamping the
//!   requested page into range.
//!
//! [`ListView`] is the view-model that owns the store plus the current
//! criteria, sort and page, and composes the stages on demand. Nothing is
//! recomputed implicitly: callers mutate state through its setters and ask
//! for [`ListView::current_page`] when they need to render.
//!
//! ## The `Listable` Seam
//!
//! Records plug into the pipeline by implementing [`Listable`]. The trait is
//! deliberately narrow: which text fields search looks at, which category and
//! flags the record carries, which tabs it belongs to, and how two records
//! compare under a sort key.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::fmt::Debug;
use uuid::Uuid;

pub mod filter;
pub mod paginate;
pub mod sort;
mod view;

pub use filter::{filter_items, matches, FilterCriteria, Flag, FlagFilter};
pub use paginate::{clamp_page, paginate, total_pages, Page, Paged};
pub use sort::{compare_items, compare_text, sort_items, Direction, SortSpec};
pub use view::ListView;

/// Filter criteria specialised to a record type.
pub type CriteriaFor<L> = FilterCriteria<<L as Listable>::Category, <L as Listable>::Tab>;

/// A record that can flow through the list pipeline.
pub trait Listable {
    type Category: Copy + Eq + Debug;
    type Tab: Copy + Eq + Default + Debug;
    type SortKey: Copy + Eq + Default + Debug;

    fn id(&self) -> Uuid;

    /// Text fields the search predicate looks at.
    fn search_fields(&self) -> Vec<&str>;

    fn category(&self) -> Self::Category;

    fn has_flag(&self, flag: Flag) -> bool;

    /// Whether the record belongs to a tab. The default tab must accept everything.
    fn in_tab(&self, tab: Self::Tab, ctx: &TabContext) -> bool;

    /// Primary ordering applied before the sort key, regardless of direction.
    fn group_rank(&self) -> u8 {
        0
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering;
}

/// Time reference for tabs that depend on "now" (e.g. Recent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabContext {
    pub now: DateTime<Utc>,
    pub recent_window: Duration,
}

impl TabContext {
    pub const DEFAULT_RECENT_DAYS: i64 = 7;

    pub fn new(now: DateTime<Utc>, recent_days: i64) -> Self {
        Self {
            now,
            recent_window: Duration::try_days(recent_days.max(0)).unwrap_or(Duration::MAX),
        }
    }

    pub fn is_recent(&self, at: DateTime<Utc>) -> bool {
        at <= self.now && self.now - at <= self.recent_window
    }
}

impl Default for TabContext {
    fn default() -> Self {
        Self::new(Utc::now(), Self::DEFAULT_RECENT_DAYS)
    }
}
