//! Sort stage.
//!
//! Ordering is two-level: the record's [`Listable::group_rank`] first (so
//! folders stay above files whichever way the user sorts), then the selected
//! key in the selected direction. The sort is stable, so items with equal
//! keys keep their filtered order.

use super::Listable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: Direction,
}

impl<K> SortSpec<K> {
    pub fn ascending(key: K) -> Self {
        Self {
            key,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(key: K) -> Self {
        Self {
            key,
            direction: Direction::Descending,
        }
    }
}

/// Locale-style text ordering: case-folded first, raw bytes as the final tie-break.
///
/// `"apple" < "Banana" < "banana"`; the raw comparison keeps the order total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn compare_items<L: Listable>(a: &L, b: &L, spec: SortSpec<L::SortKey>) -> Ordering {
    a.group_rank()
        .cmp(&b.group_rank())
        .then_with(|| spec.direction.apply(a.compare_by(b, spec.key)))
}

/// Sorts in place. Stable: equal items keep their relative order.
pub fn sort_items<L: Listable>(items: &mut [&L], spec: SortSpec<L::SortKey>) {
    items.sort_by(|a, b| compare_items(*a, *b, spec));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DriveEntry, DriveSortKey, SmsTemplate, TemplateCategory, TemplateSortKey};
    use crate::test_utils::{drive_file, drive_folder};
    use chrono::{Duration, Utc};

    fn names<L>(items: &[&L], name: impl Fn(&L) -> &str) -> Vec<String> {
        items.iter().map(|i| name(i).to_string()).collect()
    }

    #[test]
    fn compare_text_folds_case() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Banana", "banana"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn folders_precede_files_in_both_directions() {
        // Interleave 5 folders and 10 files.
        let mut entries: Vec<DriveEntry> = Vec::new();
        let folders = ["Echo", "alpha", "Delta", "charlie", "Bravo"];
        let files = [
            "j.txt", "B.txt", "h.txt", "a.txt", "f.txt", "C.txt", "i.txt", "e.txt", "g.txt",
            "d.txt",
        ];
        for (i, file) in files.iter().enumerate() {
            entries.push(drive_file(file, 10));
            if let Some(folder) = folders.get(i) {
                entries.push(drive_folder(folder));
            }
        }

        let mut refs: Vec<&DriveEntry> = entries.iter().collect();
        sort_items(&mut refs, SortSpec::ascending(DriveSortKey::Name));
        let got = names(&refs, |e: &DriveEntry| e.name.as_str());
        assert_eq!(
            got,
            vec![
                "alpha", "Bravo", "charlie", "Delta", "Echo", "a.txt", "B.txt", "C.txt", "d.txt",
                "e.txt", "f.txt", "g.txt", "h.txt", "i.txt", "j.txt"
            ]
        );

        sort_items(&mut refs, SortSpec::descending(DriveSortKey::Name));
        assert!(refs[..5].iter().all(|e| e.is_folder()));
        assert_eq!(refs[0].name, "Echo");
        assert_eq!(refs[5].name, "j.txt");
    }

    #[test]
    fn descending_reverses_ascending_without_duplicates() {
        let templates: Vec<SmsTemplate> = ["delta", "Alpha", "charlie", "Bravo", "echo"]
            .iter()
            .map(|n| SmsTemplate::new(*n, "Hello", TemplateCategory::Other))
            .collect();

        let mut asc: Vec<&SmsTemplate> = templates.iter().collect();
        sort_items(&mut asc, SortSpec::ascending(TemplateSortKey::Name));
        let mut desc = asc.clone();
        sort_items(&mut desc, SortSpec::descending(TemplateSortKey::Name));

        let mut reversed = asc.clone();
        reversed.reverse();
        let ids = |v: &[&SmsTemplate]| v.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&desc[..]), ids(&reversed[..]));
    }

    #[test]
    fn numeric_keys_compare_numerically() {
        let entries = vec![
            drive_file("big", 10_000),
            drive_file("small", 9),
            drive_file("medium", 100),
        ];
        let mut refs: Vec<&DriveEntry> = entries.iter().collect();
        sort_items(&mut refs, SortSpec::ascending(DriveSortKey::Size));
        assert_eq!(names(&refs, |e: &DriveEntry| e.name.as_str()), vec!["small", "medium", "big"]);
    }

    #[test]
    fn dates_compare_by_instant() {
        let now = Utc::now();
        let entries = vec![
            drive_file("old", 1).with_modified(now - Duration::days(3)),
            drive_file("new", 1).with_modified(now),
            drive_file("mid", 1).with_modified(now - Duration::days(1)),
        ];
        let mut refs: Vec<&DriveEntry> = entries.iter().collect();
        sort_items(&mut refs, SortSpec::descending(DriveSortKey::Modified));
        assert_eq!(names(&refs, |e: &DriveEntry| e.name.as_str()), vec!["new", "mid", "old"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let entries = vec![
            drive_file("first", 5),
            drive_file("second", 5),
            drive_file("third", 5),
        ];
        let mut refs: Vec<&DriveEntry> = entries.iter().collect();
        sort_items(&mut refs, SortSpec::descending(DriveSortKey::Size));
        assert_eq!(
            names(&refs, |e: &DriveEntry| e.name.as_str()),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn direction_reversal_is_involutive() {
        assert_eq!(Direction::Ascending.reversed().reversed(), Direction::Ascending);
        assert_eq!(Direction::Descending.apply(Ordering::Less), Ordering::Greater);
    }
}
