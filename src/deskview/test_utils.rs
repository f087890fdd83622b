//! Fixtures shared by unit tests and, behind the `test_utils` feature, by
//! downstream crates.

use crate::model::{
    Document, DocumentKind, DriveEntry, Project, ProjectStatus, SmsTemplate, TemplateCategory,
};
use crate::store::memory::InMemoryStore;
use crate::store::KeyValueStore;
use serde::Serialize;

/// A root-level file with the given size.
pub fn drive_file(name: &str, size: u64) -> DriveEntry {
    DriveEntry::file(name, None, size)
}

/// A root-level folder.
pub fn drive_folder(name: &str) -> DriveEntry {
    DriveEntry::folder(name, None)
}

pub fn template(name: &str, content: &str) -> SmsTemplate {
    SmsTemplate::new(name, content, TemplateCategory::Other)
}

pub fn document(name: &str, size: u64) -> Document {
    Document::new(name, DocumentKind::Report, "Test project").with_size(size)
}

pub fn project(name: &str, status: ProjectStatus) -> Project {
    Project::new(name, "Test client").with_status(status)
}

/// Builds an [`InMemoryStore`] pre-populated with JSON blobs.
pub struct StoreFixture {
    pub store: InMemoryStore,
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreFixture {
    pub fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
        }
    }

    pub fn with_json<T: Serialize>(mut self, key: &str, value: &T) -> Self {
        let json = serde_json::to_value(value).expect("fixture serializes");
        self.store.set(key, json).expect("in-memory set");
        self
    }

    pub fn with_drive(self, entries: &[DriveEntry]) -> Self {
        self.with_json(crate::api::DRIVE_KEY, &entries)
    }

    pub fn with_templates(self, templates: &[SmsTemplate]) -> Self {
        self.with_json(crate::api::TEMPLATES_KEY, &templates)
    }

    pub fn with_documents(self, documents: &[Document]) -> Self {
        self.with_json(crate::api::DOCUMENTS_KEY, &documents)
    }

    pub fn with_projects(self, projects: &[Project]) -> Self {
        self.with_json(crate::api::PROJECTS_KEY, &projects)
    }
}
