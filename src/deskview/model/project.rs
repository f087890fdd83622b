use crate::listing::{compare_text, Flag, Listable, TabContext};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

labeled_enum! {
    "project status",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum ProjectStatus {
        #[default]
        ToComplete => "to-complete",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

labeled_enum! {
    "project tab",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum ProjectTab {
        #[default]
        All => "all",
        ToComplete => "to-complete",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

labeled_enum! {
    "sort key",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum ProjectSortKey {
        #[default]
        Name => "name",
        Modified => "modified",
        DueDate => "due-date",
        Progress => "progress",
    }
}

/// A technician work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub starred: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client: client.into(),
            address: String::new(),
            status: ProjectStatus::ToComplete,
            progress: 0,
            due_date: None,
            starred: false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Values above 100 are capped.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    pub fn with_modified(mut self, at: DateTime<Utc>) -> Self {
        self.modified_at = at;
        if self.created_at > at {
            self.created_at = at;
        }
        self
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(
            self.status,
            ProjectStatus::ToComplete | ProjectStatus::InProgress
        ) && self.due_date.is_some_and(|due| due < today)
    }
}

impl Listable for Project {
    type Category = ProjectStatus;
    type Tab = ProjectTab;
    type SortKey = ProjectSortKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.client.as_str(),
            self.address.as_str(),
        ]
    }

    fn category(&self) -> ProjectStatus {
        self.status
    }

    fn has_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Starred => self.starred,
            Flag::Shared => false,
        }
    }

    fn in_tab(&self, tab: ProjectTab, _ctx: &TabContext) -> bool {
        match tab {
            ProjectTab::All => true,
            ProjectTab::ToComplete => self.status == ProjectStatus::ToComplete,
            ProjectTab::InProgress => self.status == ProjectStatus::InProgress,
            ProjectTab::Completed => self.status == ProjectStatus::Completed,
        }
    }

    fn compare_by(&self, other: &Self, key: ProjectSortKey) -> Ordering {
        match key {
            ProjectSortKey::Name => compare_text(&self.name, &other.name),
            ProjectSortKey::Modified => self.modified_at.cmp(&other.modified_at),
            // Undated projects sort after dated ones when ascending.
            ProjectSortKey::DueDate => match (self.due_date, other.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ProjectSortKey::Progress => self.progress.cmp(&other.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(Project::new("p", "c").with_progress(250).progress, 100);
    }

    #[test]
    fn overdue_only_for_open_projects() {
        let today = date(2024, 6, 1);
        let open = Project::new("a", "c").with_due_date(date(2024, 5, 1));
        let done = open.clone().with_status(ProjectStatus::Completed);
        let undated = Project::new("b", "c");
        assert!(open.is_overdue(today));
        assert!(!done.is_overdue(today));
        assert!(!undated.is_overdue(today));
    }

    #[test]
    fn undated_projects_sort_last() {
        let dated = Project::new("a", "c").with_due_date(date(2030, 1, 1));
        let undated = Project::new("b", "c");
        assert_eq!(
            dated.compare_by(&undated, ProjectSortKey::DueDate),
            Ordering::Less
        );
    }

    #[test]
    fn to_complete_tab_matches_status() {
        let ctx = TabContext::default();
        let p = Project::new("a", "c");
        assert!(p.in_tab(ProjectTab::ToComplete, &ctx));
        assert!(!p.in_tab(ProjectTab::Completed, &ctx));
    }
}
