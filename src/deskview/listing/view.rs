use super::{
    clamp_page, filter_items, paginate, sort_items, CriteriaFor, FlagFilter, Listable, Page,
    Paged, SortSpec, TabContext,
};
use crate::error::{DeskError, Result};

/// View-model for one list page.
///
/// Owns the item store and the user's current criteria, sort and page.
/// Filter and sort setters always return to page 1 so a shrinking result set
/// can never strand the view on a page that no longer exists.
#[derive(Debug, Clone)]
pub struct ListView<L: Listable> {
    items: Vec<L>,
    criteria: CriteriaFor<L>,
    sort: SortSpec<L::SortKey>,
    page: usize,
    page_size: usize,
    clock: TabContext,
}

impl<L: Listable> ListView<L> {
    pub fn new(items: Vec<L>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(DeskError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            items,
            criteria: CriteriaFor::<L>::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size,
            clock: TabContext::default(),
        })
    }

    pub fn with_clock(mut self, clock: TabContext) -> Self {
        self.clock = clock;
        self
    }

    pub fn items(&self) -> &[L] {
        &self.items
    }

    pub fn into_items(self) -> Vec<L> {
        self.items
    }

    pub fn criteria(&self) -> &CriteriaFor<L> {
        &self.criteria
    }

    pub fn sort(&self) -> SortSpec<L::SortKey> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn clock(&self) -> &TabContext {
        &self.clock
    }

    pub fn set_clock(&mut self, clock: TabContext) {
        self.clock = clock;
    }

    /// Swaps the whole store (refresh or local mutation). Criteria and sort
    /// survive; the page is re-clamped against the new result count.
    pub fn replace_items(&mut self, items: Vec<L>) {
        tracing::debug!(count = items.len(), "replacing list store");
        self.items = items;
        self.page = clamp_page(self.page, self.filtered_count(), self.page_size);
    }

    /// Returns to defaults, as when the store's scope changes.
    pub fn reset(&mut self) {
        self.criteria = CriteriaFor::<L>::default();
        self.sort = SortSpec::default();
        self.page = 1;
    }

    pub fn set_criteria(&mut self, criteria: CriteriaFor<L>) {
        self.criteria = criteria;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<L::Category>) {
        self.criteria.category = category;
        self.page = 1;
    }

    pub fn set_flag(&mut self, flag: FlagFilter) {
        self.criteria.flag = flag;
        self.page = 1;
    }

    pub fn set_tab(&mut self, tab: L::Tab) {
        self.criteria.tab = tab;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortSpec<L::SortKey>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Header-click behaviour: same key flips direction, a new key starts ascending.
    pub fn toggle_sort(&mut self, key: L::SortKey) {
        let next = if self.sort.key == key {
            SortSpec {
                key,
                direction: self.sort.direction.reversed(),
            }
        } else {
            SortSpec::ascending(key)
        };
        self.set_sort(next);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(DeskError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Moves to `page`, clamped into the valid range. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = clamp_page(page, self.filtered_count(), self.page_size);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn filtered_count(&self) -> usize {
        filter_items(&self.items, &self.criteria, &self.clock).len()
    }

    /// Filter then sort, without pagination.
    pub fn arranged(&self) -> Vec<&L> {
        let mut visible = filter_items(&self.items, &self.criteria, &self.clock);
        sort_items(&mut visible, self.sort);
        visible
    }

    /// The full pipeline: filter → sort → paginate.
    pub fn current_page(&self) -> Paged<&L> {
        let arranged = self.arranged();
        paginate(arranged, Page::saturating(self.page, self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Direction, Flag};
    use crate::model::{DriveEntry, DriveKind, DriveSortKey, DriveTab};
    use crate::test_utils::{drive_file, drive_folder};

    fn store(n: usize) -> Vec<DriveEntry> {
        (0..n)
            .map(|i| drive_file(&format!("file-{:03}.txt", i), i as u64).with_shared(i % 2 == 0))
            .collect()
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(ListView::<DriveEntry>::new(vec![], 0).is_err());
    }

    #[test]
    fn current_page_runs_the_full_pipeline() {
        let mut view = ListView::new(store(30), 5).unwrap();
        view.set_flag(FlagFilter::Only(Flag::Shared));
        view.set_sort(SortSpec::descending(DriveSortKey::Size));
        let page = view.current_page();
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].name, "file-028.txt");
        assert!(page.items.iter().all(|e| e.shared));
    }

    #[test]
    fn filter_and_sort_changes_reset_to_first_page() {
        let mut view = ListView::new(store(30), 5).unwrap();
        assert_eq!(view.go_to_page(4), 4);
        view.set_search("file");
        assert_eq!(view.page(), 1);

        view.go_to_page(3);
        view.set_sort(SortSpec::descending(DriveSortKey::Name));
        assert_eq!(view.page(), 1);

        view.go_to_page(3);
        view.set_category(Some(DriveKind::Document));
        assert_eq!(view.page(), 1);

        view.go_to_page(2);
        view.set_tab(DriveTab::Shared);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut view = ListView::new(store(12), 5).unwrap();
        assert_eq!(view.prev_page(), 1);
        assert_eq!(view.next_page(), 2);
        assert_eq!(view.next_page(), 3);
        assert_eq!(view.next_page(), 3);
        assert_eq!(view.go_to_page(100), 3);
    }

    #[test]
    fn toggle_sort_flips_then_restarts() {
        let mut view = ListView::new(store(3), 5).unwrap();
        view.toggle_sort(DriveSortKey::Name);
        assert_eq!(view.sort().direction, Direction::Descending);
        view.toggle_sort(DriveSortKey::Name);
        assert_eq!(view.sort().direction, Direction::Ascending);
        view.toggle_sort(DriveSortKey::Size);
        assert_eq!(view.sort(), SortSpec::ascending(DriveSortKey::Size));
    }

    #[test]
    fn replace_items_reclamps_page() {
        let mut view = ListView::new(store(30), 5).unwrap();
        view.go_to_page(6);
        view.replace_items(store(7));
        assert_eq!(view.page(), 2);
        assert_eq!(view.current_page().items.len(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = ListView::new(vec![drive_folder("a"), drive_file("b", 1)], 5).unwrap();
        view.set_search("a");
        view.set_sort(SortSpec::descending(DriveSortKey::Size));
        view.reset();
        assert!(view.criteria().is_neutral());
        assert_eq!(view.sort(), SortSpec::default());
        assert_eq!(view.current_page().total_items, 2);
    }

    #[test]
    fn page_size_change_validates_and_resets() {
        let mut view = ListView::new(store(30), 5).unwrap();
        view.go_to_page(3);
        assert!(view.set_page_size(0).is_err());
        view.set_page_size(10).unwrap();
        assert_eq!(view.page(), 1);
        assert_eq!(view.current_page().total_pages, 3);
    }
}
