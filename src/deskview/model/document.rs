use crate::listing::{compare_text, Flag, Listable, TabContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

labeled_enum! {
    "document kind",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DocumentKind {
        Report => "report",
        Invoice => "invoice",
        Quote => "quote",
        Contract => "contract",
        Photo => "photo",
        Plan => "plan",
        Other => "other",
    }
}

labeled_enum! {
    "document status",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DocumentStatus {
        #[default]
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

labeled_enum! {
    "document tab",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DocumentTab {
        #[default]
        All => "all",
        SharedWithMe => "shared-with-me",
        Starred => "starred",
        Recent => "recent",
    }
}

labeled_enum! {
    "sort key",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DocumentSortKey {
        #[default]
        Name => "name",
        Modified => "modified",
        Size => "size",
        Kind => "kind",
    }
}

/// A technician document, attached to a project by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub shared: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Document {
    pub fn new(name: impl Into<String>, kind: DocumentKind, project: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            project: project.into(),
            size: 0,
            status: DocumentStatus::Draft,
            starred: false,
            shared: false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    pub fn with_modified(mut self, at: DateTime<Utc>) -> Self {
        self.modified_at = at;
        if self.created_at > at {
            self.created_at = at;
        }
        self
    }
}

impl Listable for Document {
    type Category = DocumentKind;
    type Tab = DocumentTab;
    type SortKey = DocumentSortKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.project.as_str()]
    }

    fn category(&self) -> DocumentKind {
        self.kind
    }

    fn has_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Starred => self.starred,
            Flag::Shared => self.shared,
        }
    }

    fn in_tab(&self, tab: DocumentTab, ctx: &TabContext) -> bool {
        match tab {
            DocumentTab::All => true,
            DocumentTab::SharedWithMe => self.shared,
            DocumentTab::Starred => self.starred,
            DocumentTab::Recent => ctx.is_recent(self.modified_at),
        }
    }

    fn compare_by(&self, other: &Self, key: DocumentSortKey) -> Ordering {
        match key {
            DocumentSortKey::Name => compare_text(&self.name, &other.name),
            DocumentSortKey::Modified => self.modified_at.cmp(&other.modified_at),
            DocumentSortKey::Size => self.size.cmp(&other.size),
            DocumentSortKey::Kind => self.kind.as_str().cmp(other.kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_covers_project_name() {
        let doc = Document::new("Site survey", DocumentKind::Report, "Rue de la Paix");
        assert!(doc.search_fields().contains(&"Rue de la Paix"));
    }

    #[test]
    fn shared_with_me_tab_uses_shared_flag() {
        let ctx = TabContext::default();
        let doc = Document::new("Quote 12", DocumentKind::Quote, "Villa").with_shared(true);
        assert!(doc.in_tab(DocumentTab::SharedWithMe, &ctx));
        assert!(!doc.in_tab(DocumentTab::Starred, &ctx));
    }
}
