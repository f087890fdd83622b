use crate::listing::{compare_text, Flag, Listable, TabContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

labeled_enum! {
    "drive kind",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DriveKind {
        Folder => "folder",
        Document => "document",
        Spreadsheet => "spreadsheet",
        Presentation => "presentation",
        Pdf => "pdf",
        Image => "image",
        Video => "video",
        Archive => "archive",
        Other => "other",
    }
}

impl DriveKind {
    /// Guesses a file kind from its extension. Never returns `Folder`.
    pub fn from_file_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => return DriveKind::Other,
        };
        match ext.as_str() {
            "doc" | "docx" | "odt" | "txt" | "md" | "rtf" => DriveKind::Document,
            "xls" | "xlsx" | "ods" | "csv" => DriveKind::Spreadsheet,
            "ppt" | "pptx" | "odp" | "key" => DriveKind::Presentation,
            "pdf" => DriveKind::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "heic" => DriveKind::Image,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => DriveKind::Video,
            "zip" | "rar" | "7z" | "tar" | "gz" => DriveKind::Archive,
            _ => DriveKind::Other,
        }
    }
}

labeled_enum! {
    "drive tab",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DriveTab {
        #[default]
        MyDrive => "my-drive",
        Starred => "starred",
        Shared => "shared",
        Recent => "recent",
    }
}

labeled_enum! {
    "sort key",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum DriveSortKey {
        #[default]
        Name => "name",
        Modified => "modified",
        Size => "size",
        Kind => "kind",
    }
}

/// A file or folder in the Drive browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveEntry {
    pub id: Uuid,
    pub name: String,
    pub kind: DriveKind,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Bytes; `None` for folders.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub shared: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl DriveEntry {
    pub fn folder(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self::new(name.into(), DriveKind::Folder, parent_id, None)
    }

    pub fn file(name: impl Into<String>, parent_id: Option<Uuid>, size: u64) -> Self {
        let name = name.into();
        let kind = DriveKind::from_file_name(&name);
        Self::new(name, kind, parent_id, Some(size))
    }

    fn new(name: String, kind: DriveKind, parent_id: Option<Uuid>, size: Option<u64>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            parent_id,
            size,
            owner: String::new(),
            starred: false,
            shared: false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
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

    pub fn is_folder(&self) -> bool {
        self.kind == DriveKind::Folder
    }
}

impl Listable for DriveEntry {
    type Category = DriveKind;
    type Tab = DriveTab;
    type SortKey = DriveSortKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.owner.as_str()]
    }

    fn category(&self) -> DriveKind {
        self.kind
    }

    fn has_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Starred => self.starred,
            Flag::Shared => self.shared,
        }
    }

    fn in_tab(&self, tab: DriveTab, ctx: &TabContext) -> bool {
        match tab {
            // Folder scoping for My Drive happens in the browser, not here.
            DriveTab::MyDrive => true,
            DriveTab::Starred => self.starred,
            DriveTab::Shared => self.shared,
            DriveTab::Recent => !self.is_folder() && ctx.is_recent(self.modified_at),
        }
    }

    fn group_rank(&self) -> u8 {
        if self.is_folder() {
            0
        } else {
            1
        }
    }

    fn compare_by(&self, other: &Self, key: DriveSortKey) -> Ordering {
        match key {
            DriveSortKey::Name => compare_text(&self.name, &other.name),
            DriveSortKey::Modified => self.modified_at.cmp(&other.modified_at),
            DriveSortKey::Size => self.size.cmp(&other.size),
            DriveSortKey::Kind => self.kind.as_str().cmp(other.kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn kind_from_extension() {
        assert_eq!(DriveKind::from_file_name("Budget.XLSX"), DriveKind::Spreadsheet);
        assert_eq!(DriveKind::from_file_name("photo.jpeg"), DriveKind::Image);
        assert_eq!(DriveKind::from_file_name("contract.pdf"), DriveKind::Pdf);
        assert_eq!(DriveKind::from_file_name("README"), DriveKind::Other);
        assert_eq!(DriveKind::from_file_name(".bashrc"), DriveKind::Other);
    }

    #[test]
    fn folders_have_no_size() {
        let folder = DriveEntry::folder("Invoices", None);
        assert!(folder.is_folder());
        assert_eq!(folder.size, None);
        assert_eq!(folder.group_rank(), 0);

        let file = DriveEntry::file("a.pdf", Some(folder.id), 42);
        assert_eq!(file.size, Some(42));
        assert_eq!(file.parent_id, Some(folder.id));
        assert_eq!(file.group_rank(), 1);
    }

    #[test]
    fn recent_tab_excludes_folders() {
        let now = Utc::now();
        let ctx = TabContext::new(now, 7);
        let folder = DriveEntry::folder("New", None).with_modified(now);
        let file = DriveEntry::file("new.txt", None, 1).with_modified(now - Duration::days(2));
        assert!(!folder.in_tab(DriveTab::Recent, &ctx));
        assert!(file.in_tab(DriveTab::Recent, &ctx));
    }

    #[test]
    fn deserializes_camel_case_blob() {
        let json = r#"{
            "id": "6f1c1f0e-8a41-4c3b-9d7e-2a3b4c5d6e7f",
            "name": "Plans",
            "kind": "folder",
            "createdAt": "2024-03-01T09:00:00Z",
            "modifiedAt": "2024-03-02T09:00:00Z"
        }"#;
        let entry: DriveEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_folder());
        assert!(!entry.starred);
        assert_eq!(entry.parent_id, None);
    }
}
