//! # Drive Browser
//!
//! Drive entries form a tree through `parent_id` (`None` is the root). The
//! browser keeps the whole tree plus a cursor on the current folder, and feeds
//! a [`ListView`] with the slice the active tab should see:
//!
//! - **My Drive**: the current folder's direct children
//! - **Starred / Shared / Recent**: matching entries from every folder
//!
//! Navigation (`open_folder`, `go_up`, `go_root`) changes the scope, so it
//! resets search, filters, sort and page. Mutations rebuild the entry array
//! and swap it in; criteria survive a mutation and the page is re-clamped.

use crate::error::{DeskError, Result};
use crate::listing::{FlagFilter, ListView, Paged, SortSpec, TabContext};
use crate::model::{DriveEntry, DriveKind, DriveSortKey, DriveTab};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

pub const ROOT_LABEL: &str = "My Drive";

/// One step of the path shown above the list. `id` is `None` for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DriveBrowser {
    entries: Vec<DriveEntry>,
    current: Option<Uuid>,
    view: ListView<DriveEntry>,
}

impl DriveBrowser {
    pub fn new(entries: Vec<DriveEntry>, page_size: usize) -> Result<Self> {
        let mut browser = Self {
            entries,
            current: None,
            view: ListView::new(Vec::new(), page_size)?,
        };
        browser.rescope();
        Ok(browser)
    }

    pub fn with_clock(mut self, clock: TabContext) -> Self {
        self.view.set_clock(clock);
        self
    }

    pub fn entries(&self) -> &[DriveEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DriveEntry> {
        self.entries
    }

    pub fn view(&self) -> &ListView<DriveEntry> {
        &self.view
    }

    pub fn current_folder_id(&self) -> Option<Uuid> {
        self.current
    }

    pub fn get(&self, id: Uuid) -> Result<&DriveEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| DeskError::NotFound(format!("drive entry {}", id)))
    }

    pub fn current_page(&self) -> Paged<&DriveEntry> {
        self.view.current_page()
    }

    // --- Navigation ---

    pub fn open_folder(&mut self, id: Uuid) -> Result<()> {
        let entry = self.get(id)?;
        if !entry.is_folder() {
            return Err(DeskError::Validation(format!(
                "'{}' is not a folder",
                entry.name
            )));
        }
        tracing::debug!(folder = %entry.name, "opening folder");
        self.navigate(Some(id));
        Ok(())
    }

    /// Moves to the parent folder. Returns `false` when already at the root.
    pub fn go_up(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let parent = self
            .entries
            .iter()
            .find(|e| e.id == current)
            .and_then(|e| e.parent_id);
        self.navigate(parent);
        true
    }

    pub fn go_root(&mut self) {
        self.navigate(None);
    }

    /// Path from the root to the current folder, root first.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut trail = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.current;
        while let Some(id) = cursor {
            // A corrupted tree could loop; stop at the first revisit.
            if !seen.insert(id) {
                break;
            }
            match self.entries.iter().find(|e| e.id == id) {
                Some(folder) => {
                    trail.push(Breadcrumb {
                        id: Some(folder.id),
                        name: folder.name.clone(),
                    });
                    cursor = folder.parent_id;
                }
                None => break,
            }
        }
        trail.push(Breadcrumb {
            id: None,
            name: ROOT_LABEL.to_string(),
        });
        trail.reverse();
        trail
    }

    fn navigate(&mut self, folder: Option<Uuid>) {
        self.current = folder;
        self.view.reset();
        self.rescope();
    }

    // --- View state ---

    pub fn set_tab(&mut self, tab: DriveTab) {
        self.view.set_tab(tab);
        self.rescope();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.set_search(search);
    }

    pub fn set_kind(&mut self, kind: Option<DriveKind>) {
        self.view.set_category(kind);
    }

    pub fn set_flag(&mut self, flag: FlagFilter) {
        self.view.set_flag(flag);
    }

    pub fn set_sort(&mut self, sort: SortSpec<DriveSortKey>) {
        self.view.set_sort(sort);
    }

    pub fn toggle_sort(&mut self, key: DriveSortKey) {
        self.view.toggle_sort(key);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.view.set_page_size(page_size)
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.view.go_to_page(page)
    }

    pub fn next_page(&mut self) -> usize {
        self.view.next_page()
    }

    pub fn prev_page(&mut self) -> usize {
        self.view.prev_page()
    }

    pub fn set_clock(&mut self, clock: TabContext) {
        self.view.set_clock(clock);
    }

    // --- Mutations ---

    /// Creates a folder inside the current folder.
    pub fn create_folder(&mut self, name: &str) -> Result<DriveEntry> {
        let name = self.checked_name(name, self.current, None)?;
        let folder = DriveEntry::folder(name, self.current);
        tracing::debug!(id = %folder.id, name = %folder.name, "creating folder");

        let mut next = self.entries.clone();
        next.push(folder.clone());
        self.replace_entries(next);
        Ok(folder)
    }

    /// Renames an entry. Files get their kind re-derived from the new extension.
    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<DriveEntry> {
        let parent = self.get(id)?.parent_id;
        let name = self.checked_name(name, parent, Some(id))?;
        self.modify(id, |entry| {
            if !entry.is_folder() {
                entry.kind = DriveKind::from_file_name(&name);
            }
            entry.name = name;
            entry.modified_at = Utc::now();
        })
    }

    /// Deletes an entry and, for folders, everything beneath it. Returns the
    /// removed entries.
    pub fn delete(&mut self, id: Uuid) -> Result<Vec<DriveEntry>> {
        let doomed = self.subtree(id)?;
        let parent = self.get(id)?.parent_id;
        tracing::debug!(%id, count = doomed.len(), "deleting drive entries");

        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .cloned()
            .partition(|e| doomed.contains(&e.id));

        if self.current.is_some_and(|c| doomed.contains(&c)) {
            self.current = parent;
            self.view.reset();
        }
        self.replace_entries(kept);
        Ok(removed)
    }

    /// Flips the starred flag and returns the new value.
    pub fn toggle_star(&mut self, id: Uuid) -> Result<bool> {
        Ok(self.modify(id, |entry| entry.starred = !entry.starred)?.starred)
    }

    pub fn set_shared(&mut self, id: Uuid, shared: bool) -> Result<DriveEntry> {
        self.modify(id, |entry| entry.shared = shared)
    }

    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut DriveEntry)) -> Result<DriveEntry> {
        let mut next = self.entries.clone();
        let entry = next
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DeskError::NotFound(format!("drive entry {}", id)))?;
        change(entry);
        let updated = entry.clone();
        self.replace_entries(next);
        Ok(updated)
    }

    fn replace_entries(&mut self, entries: Vec<DriveEntry>) {
        self.entries = entries;
        self.rescope();
    }

    /// Feeds the view the slice the active tab should see.
    fn rescope(&mut self) {
        let scoped: Vec<DriveEntry> = match self.view.criteria().tab {
            DriveTab::MyDrive => self
                .entries
                .iter()
                .filter(|e| e.parent_id == self.current)
                .cloned()
                .collect(),
            _ => self.entries.clone(),
        };
        self.view.replace_items(scoped);
    }

    /// Ids of `id` and all of its descendants.
    fn subtree(&self, id: Uuid) -> Result<HashSet<Uuid>> {
        self.get(id)?;
        let mut ids = HashSet::from([id]);
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            for child in self.entries.iter().filter(|e| e.parent_id == Some(parent)) {
                if ids.insert(child.id) {
                    frontier.push(child.id);
                }
            }
        }
        Ok(ids)
    }

    /// Trims `name` and checks it is non-empty and unique (ignoring case)
    /// among the other children of `parent`.
    fn checked_name(
        &self,
        name: &str,
        parent: Option<Uuid>,
        except: Option<Uuid>,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::Validation("Name cannot be empty".to_string()));
        }
        let lowered = name.to_lowercase();
        let clash = self.entries.iter().any(|e| {
            e.parent_id == parent && Some(e.id) != except && e.name.to_lowercase() == lowered
        });
        if clash {
            return Err(DeskError::Validation(format!(
                "An item named '{}' already exists here",
                name
            )));
        }
        Ok(name.to_string())
    }
}
