//! # API Facade
//!
//! The single entry point for every deskview operation, whatever the UI.
//!
//! The facade:
//! - **Loads datasets** from the [`KeyValueStore`], seeding them from
//!   [`crate::sample`] on first use
//! - **Normalizes inputs** (UUID prefixes → ids, optional page size → config
//!   default)
//! - **Dispatches** to the view-models ([`DriveBrowser`], [`TemplateManager`],
//!   [`ListView`]) and the profile service
//! - **Writes back** after a mutation and returns structured results
//!
//! It never prints and never decides how results look.
//!
//! ## Generic Over Storage and Backend
//!
//! `DeskApi<S: KeyValueStore, B: ProfileBackend>`:
//! - Production: `DeskApi<FileStore, InMemoryBackend>`
//! - Testing: `DeskApi<InMemoryStore, InMemoryBackend>`

use crate::config::DeskConfig;
use crate::drive::{Breadcrumb, DriveBrowser};
use crate::error::{DeskError, Result};
use crate::listing::{CriteriaFor, Listable, ListView, Paged, SortSpec, TabContext};
use crate::model::{Document, DriveEntry, Project, SmsTemplate, TemplateCategory};
use crate::profile::{
    AdminProfile, AutoSave, ProfileBackend, ProfileCache, ProfileEditor, ProfileField,
    ProfileService,
};
use crate::sample;
use crate::store::KeyValueStore;
use crate::templates::{
    analyze_sms, extract_variables, missing_variables, render_template, SmsInfo, TemplateManager,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

pub use crate::store::{DOCUMENTS_KEY, DRIVE_KEY, PROJECTS_KEY, TEMPLATES_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A command's data plus the messages a UI should surface.
#[derive(Debug)]
pub struct CmdResult<T> {
    pub data: T,
    pub messages: Vec<CmdMessage>,
}

impl<T> CmdResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// What a list request asks for. `page_size: None` uses the configured size.
#[derive(Debug, Clone)]
pub struct ListQuery<L: Listable> {
    pub criteria: CriteriaFor<L>,
    pub sort: SortSpec<L::SortKey>,
    pub page: usize,
    pub page_size: Option<usize>,
}

impl<L: Listable> Default for ListQuery<L> {
    fn default() -> Self {
        Self {
            criteria: CriteriaFor::<L>::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveListing {
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(flatten)]
    pub page: Paged<DriveEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInspection {
    pub variables: Vec<String>,
    pub sms: SmsInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePreview {
    pub template: SmsTemplate,
    pub rendered: String,
    pub missing: Vec<String>,
    pub sms: SmsInfo,
}

/// Requested profile edits; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileChanges {
    fn fields(self) -> Vec<(ProfileField, String)> {
        [
            (ProfileField::FirstName, self.first_name),
            (ProfileField::LastName, self.last_name),
            (ProfileField::Email, self.email),
            (ProfileField::Phone, self.phone),
            (ProfileField::Password, self.password),
            (ProfileField::ConfirmPassword, self.confirm_password),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Requested template edits; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub content: Option<String>,
}

impl TemplateChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub struct DeskApi<S: KeyValueStore, B: ProfileBackend> {
    store: S,
    profiles: ProfileService<B>,
    config: DeskConfig,
    config_dir: Option<PathBuf>,
    clock: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore, B: ProfileBackend> DeskApi<S, B> {
    pub fn new(store: S, backend: B, config: DeskConfig) -> Self {
        Self {
            store,
            profiles: ProfileService::new(backend),
            config,
            config_dir: None,
            clock: None,
        }
    }

    /// Where `config` changes are persisted. Without it they only live in memory.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Pins "now" (for sample timestamps and Recent tabs).
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn tab_context(&self) -> TabContext {
        TabContext::new(self.now(), self.config.recent_days)
    }

    fn page_size<L: Listable>(&self, query: &ListQuery<L>) -> usize {
        query.page_size.unwrap_or(self.config.page_size)
    }

    /// Reads a dataset, seeding and persisting sample data when the key is absent.
    fn dataset<T>(&mut self, key: &str, seed: impl FnOnce(DateTime<Utc>) -> Vec<T>) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(items) = self.store.load::<Vec<T>>(key)? {
            tracing::debug!(key, count = items.len(), "loaded dataset");
            return Ok(items);
        }
        let items = seed(self.now());
        tracing::info!(key, count = items.len(), "seeding dataset with sample data");
        self.store.save(key, &items)?;
        Ok(items)
    }

    fn run_list<L>(&self, items: Vec<L>, query: ListQuery<L>) -> Result<Paged<L>>
    where
        L: Listable + Clone,
    {
        let mut view = ListView::new(items, self.page_size(&query))?.with_clock(self.tab_context());
        view.set_criteria(query.criteria);
        view.set_sort(query.sort);
        view.go_to_page(query.page);
        Ok(view.current_page().map(L::clone))
    }

    // --- Drive ---

    fn drive_browser(&mut self, page_size: usize) -> Result<DriveBrowser> {
        let entries = self.dataset(DRIVE_KEY, sample::drive)?;
        Ok(DriveBrowser::new(entries, page_size)?.with_clock(self.tab_context()))
    }

    fn save_drive(&mut self, browser: DriveBrowser) -> Result<()> {
        self.store.save(DRIVE_KEY, &browser.into_entries())
    }

    pub fn list_drive(
        &mut self,
        folder: Option<&str>,
        query: ListQuery<DriveEntry>,
    ) -> Result<DriveListing> {
        let mut browser = self.drive_browser(self.page_size(&query))?;
        if let Some(prefix) = folder {
            let id = resolve_id(browser.entries(), "drive entry", prefix)?;
            browser.open_folder(id)?;
        }
        browser.set_tab(query.criteria.tab);
        browser.set_search(query.criteria.search);
        browser.set_kind(query.criteria.category);
        browser.set_flag(query.criteria.flag);
        browser.set_sort(query.sort);
        browser.go_to_page(query.page);

        Ok(DriveListing {
            breadcrumbs: browser.breadcrumbs(),
            page: browser.current_page().map(DriveEntry::clone),
        })
    }

    pub fn create_folder(
        &mut self,
        parent: Option<&str>,
        name: &str,
    ) -> Result<CmdResult<DriveEntry>> {
        let mut browser = self.drive_browser(self.config.page_size)?;
        if let Some(prefix) = parent {
            let id = resolve_id(browser.entries(), "drive entry", prefix)?;
            browser.open_folder(id)?;
        }
        let folder = browser.create_folder(name)?;
        self.save_drive(browser)?;
        let message = CmdMessage::success(format!("Created folder '{}'", folder.name));
        Ok(CmdResult::new(folder).with_message(message))
    }

    pub fn rename_drive_entry(&mut self, id: &str, name: &str) -> Result<CmdResult<DriveEntry>> {
        let mut browser = self.drive_browser(self.config.page_size)?;
        let id = resolve_id(browser.entries(), "drive entry", id)?;
        let old = browser.get(id)?.name.clone();
        let entry = browser.rename(id, name)?;
        self.save_drive(browser)?;
        let message = CmdMessage::success(format!("Renamed '{}' to '{}'", old, entry.name));
        Ok(CmdResult::new(entry).with_message(message))
    }

    pub fn delete_drive_entry(&mut self, id: &str) -> Result<CmdResult<Vec<DriveEntry>>> {
        let mut browser = self.drive_browser(self.config.page_size)?;
        let id = resolve_id(browser.entries(), "drive entry", id)?;
        let name = browser.get(id)?.name.clone();
        let removed = browser.delete(id)?;
        self.save_drive(browser)?;
        let message = match removed.len() {
            1 => CmdMessage::success(format!("Deleted '{}'", name)),
            n => CmdMessage::success(format!("Deleted '{}' and {} item(s) inside it", name, n - 1)),
        };
        Ok(CmdResult::new(removed).with_message(message))
    }

    pub fn toggle_star(&mut self, id: &str) -> Result<CmdResult<DriveEntry>> {
        let mut browser = self.drive_browser(self.config.page_size)?;
        let id = resolve_id(browser.entries(), "drive entry", id)?;
        browser.toggle_star(id)?;
        let entry = browser.get(id)?.clone();
        self.save_drive(browser)?;
        let verb = if entry.starred { "Starred" } else { "Unstarred" };
        let message = CmdMessage::success(format!("{} '{}'", verb, entry.name));
        Ok(CmdResult::new(entry).with_message(message))
    }

    pub fn set_shared(&mut self, id: &str, shared: bool) -> Result<CmdResult<DriveEntry>> {
        let mut browser = self.drive_browser(self.config.page_size)?;
        let id = resolve_id(browser.entries(), "drive entry", id)?;
        let entry = browser.set_shared(id, shared)?;
        self.save_drive(browser)?;
        let verb = if shared { "Shared" } else { "Stopped sharing" };
        let message = CmdMessage::success(format!("{} '{}'", verb, entry.name));
        Ok(CmdResult::new(entry).with_message(message))
    }

    // --- SMS templates ---

    fn template_manager(&mut self) -> Result<TemplateManager> {
        let templates = self.dataset(TEMPLATES_KEY, sample::templates)?;
        TemplateManager::new(templates, self.config.page_size)
    }

    fn save_templates(&mut self, manager: TemplateManager) -> Result<()> {
        self.store.save(TEMPLATES_KEY, &manager.into_templates())
    }

    pub fn list_templates(&mut self, query: ListQuery<SmsTemplate>) -> Result<Paged<SmsTemplate>> {
        let templates = self.dataset(TEMPLATES_KEY, sample::templates)?;
        self.run_list(templates, query)
    }

    pub fn add_template(
        &mut self,
        name: &str,
        content: &str,
        category: TemplateCategory,
    ) -> Result<CmdResult<SmsTemplate>> {
        let mut manager = self.template_manager()?;
        let template = manager.create(name, content, category)?;
        self.save_templates(manager)?;
        let mut result = CmdResult::new(template.clone()).with_message(CmdMessage::success(
            format!("Created template '{}'", template.name),
        ));
        let vars = template.variables();
        if !vars.is_empty() {
            result = result.with_message(CmdMessage::info(format!("Variables: {}", vars.join(", "))));
        }
        Ok(result)
    }

    /// Applies every requested change, or none of them if one is invalid.
    pub fn edit_template(
        &mut self,
        id: &str,
        changes: TemplateChanges,
    ) -> Result<CmdResult<SmsTemplate>> {
        if changes.is_empty() {
            return Err(DeskError::Validation(
                "Nothing to update: pass a name, category or content".to_string(),
            ));
        }
        let mut manager = self.template_manager()?;
        let id = resolve_id(manager.templates(), "template", id)?;
        let mut template = manager.get(id)?.clone();
        if let Some(name) = &changes.name {
            template = manager.rename(id, name)?;
        }
        if let Some(category) = changes.category {
            template = manager.set_category(id, category)?;
        }
        if let Some(content) = &changes.content {
            template = manager.update_content(id, content)?;
        }
        self.save_templates(manager)?;
        let message = CmdMessage::success(format!("Updated template '{}'", template.name));
        Ok(CmdResult::new(template).with_message(message))
    }

    pub fn toggle_template(&mut self, id: &str) -> Result<CmdResult<SmsTemplate>> {
        let mut manager = self.template_manager()?;
        let id = resolve_id(manager.templates(), "template", id)?;
        let template = manager.toggle_active(id)?;
        self.save_templates(manager)?;
        let state = if template.active { "active" } else { "inactive" };
        let message = CmdMessage::success(format!("Template '{}' is now {}", template.name, state));
        Ok(CmdResult::new(template).with_message(message))
    }

    pub fn delete_template(&mut self, id: &str) -> Result<CmdResult<SmsTemplate>> {
        let mut manager = self.template_manager()?;
        let id = resolve_id(manager.templates(), "template", id)?;
        let template = manager.delete(id)?;
        self.save_templates(manager)?;
        let message = CmdMessage::success(format!("Deleted template '{}'", template.name));
        Ok(CmdResult::new(template).with_message(message))
    }

    pub fn preview_template(
        &mut self,
        id: &str,
        values: &HashMap<String, String>,
    ) -> Result<CmdResult<TemplatePreview>> {
        let manager = self.template_manager()?;
        let id = resolve_id(manager.templates(), "template", id)?;
        let template = manager.get(id)?.clone();
        let rendered = render_template(&template.content, values);
        let missing = missing_variables(&template.content, values);
        let sms = analyze_sms(&rendered);

        let mut result = CmdResult::new(TemplatePreview {
            template,
            rendered,
            missing: missing.clone(),
            sms,
        });
        if !missing.is_empty() {
            result = result.with_message(CmdMessage::warning(format!(
                "No value for: {}",
                missing.join(", ")
            )));
        }
        Ok(result)
    }

    pub fn inspect_text(&self, text: &str) -> TextInspection {
        TextInspection {
            variables: extract_variables(text),
            sms: analyze_sms(text),
        }
    }

    // --- Technician views ---

    pub fn list_documents(&mut self, query: ListQuery<Document>) -> Result<Paged<Document>> {
        let documents = self.technician_documents()?;
        self.run_list(documents, query)
    }

    pub fn list_projects(&mut self, query: ListQuery<Project>) -> Result<Paged<Project>> {
        let projects = self.dataset(PROJECTS_KEY, sample::projects)?;
        self.run_list(projects, query)
    }

    /// Documents are seeded against the project list so their project names match.
    fn technician_documents(&mut self) -> Result<Vec<Document>> {
        let projects = self.dataset(PROJECTS_KEY, sample::projects)?;
        self.dataset(DOCUMENTS_KEY, |now| sample::documents(now, &projects))
    }

    // --- Profile ---

    /// The cached profile, fetched from the backend on first use.
    pub fn profile(&mut self) -> Result<AdminProfile> {
        let mut cache = ProfileCache::load(&self.store, &self.config.profile_key)?;
        if let Some(profile) = cache.profile() {
            return Ok(profile.clone());
        }
        let profile = self.profiles.load(&sample::profile().id)?;
        cache.set(profile.clone());
        cache.save(&mut self.store)?;
        Ok(profile)
    }

    /// Applies edits through the auto-saving editor and flushes once.
    pub fn update_profile(&mut self, changes: ProfileChanges) -> Result<CmdResult<AdminProfile>> {
        let current = self.profile()?;
        let fields = changes.fields();
        if fields.is_empty() {
            return Ok(CmdResult::new(current)
                .with_message(CmdMessage::info("Nothing to update")));
        }

        let autosave = AutoSave::new(self.config.autosave_delay());
        let mut editor = ProfileEditor::new(current.id.clone(), &current, autosave);
        let now = Instant::now();
        for (field, value) in fields {
            editor.edit(field, value, now);
        }
        let updated = editor
            .flush(&mut self.profiles)?
            .ok_or_else(|| DeskError::Api("No pending profile changes".to_string()))?;

        let mut cache = ProfileCache::load(&self.store, &self.config.profile_key)?;
        cache.set(updated.clone());
        cache.save(&mut self.store)?;
        Ok(CmdResult::new(updated).with_message(CmdMessage::success("Profile updated")))
    }

    // --- Config ---

    pub fn configure(&mut self, action: ConfigAction) -> Result<CmdResult<Option<DeskConfig>>> {
        match action {
            ConfigAction::ShowAll => Ok(CmdResult::new(Some(self.config.clone()))),
            ConfigAction::ShowKey(key) => match self.config.get(&key) {
                Some(value) => Ok(CmdResult::new(None).with_message(CmdMessage::info(value))),
                None => Err(DeskError::Validation(format!("Unknown config key: {}", key))),
            },
            ConfigAction::Set(key, value) => {
                self.config.set(&key, &value)?;
                if let Some(dir) = &self.config_dir {
                    self.config.save(dir)?;
                }
                let shown = self.config.get(&key).unwrap_or(value);
                Ok(CmdResult::new(Some(self.config.clone()))
                    .with_message(CmdMessage::success(format!("{} set to {}", key, shown))))
            }
        }
    }
}

/// Resolves a full UUID or any unique prefix of one.
pub fn resolve_id<L: Listable>(items: &[L], what: &str, input: &str) -> Result<Uuid> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(DeskError::Validation(format!("Missing {} id", what)));
    }
    if let Ok(id) = Uuid::parse_str(&needle) {
        return match items.iter().find(|item| item.id() == id) {
            Some(_) => Ok(id),
            None => Err(DeskError::NotFound(format!("{} {}", what, input.trim()))),
        };
    }
    let mut hits = items
        .iter()
        .map(Listable::id)
        .filter(|id| id.to_string().starts_with(&needle));
    match (hits.next(), hits.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(DeskError::NotFound(format!("{} {}", what, input.trim()))),
        (Some(_), Some(_)) => Err(DeskError::Validation(format!(
            "Ambiguous {} id '{}'; type more characters",
            what,
            input.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Direction, Flag, FlagFilter};
    use crate::model::{DocumentSortKey, DriveTab, ProjectStatus, ProjectTab, TemplateTab};
    use crate::profile::{InMemoryBackend, BACKEND_ERROR_MESSAGE};
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::{
        document, drive_file, drive_folder, project, template, StoreFixture,
    };
    use serde_json::json;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_user("1", serde_json::to_value(sample::profile()).unwrap())
    }

    fn api() -> DeskApi<InMemoryStore, InMemoryBackend> {
        DeskApi::new(InMemoryStore::new(), backend(), DeskConfig::default())
    }

    fn api_with(store: InMemoryStore) -> DeskApi<InMemoryStore, InMemoryBackend> {
        DeskApi::new(store, backend(), DeskConfig::default())
    }

    #[test]
    fn first_list_seeds_and_persists_sample_data() {
        let mut api = api();
        assert!(api.store().get(DRIVE_KEY).unwrap().is_none());
        let listing = api.list_drive(None, ListQuery::default()).unwrap();
        assert!(listing.page.total_items > 0);
        assert!(api.store().get(DRIVE_KEY).unwrap().is_some());
        assert_eq!(listing.breadcrumbs.len(), 1);
    }

    #[test]
    fn documents_seed_against_projects() {
        let mut api = api();
        let docs = api
            .list_documents(ListQuery {
                page_size: Some(500),
                ..ListQuery::default()
            })
            .unwrap();
        let projects = api
            .list_projects(ListQuery {
                page_size: Some(500),
                ..ListQuery::default()
            })
            .unwrap();
        for doc in &docs.items {
            assert!(projects.items.iter().any(|p| p.name == doc.project));
        }
    }

    #[test]
    fn drive_listing_applies_query() {
        let folder = drive_folder("Docs");
        let entries = vec![
            folder.clone(),
            drive_file("a.pdf", 1).with_shared(true),
            drive_file("b.pdf", 2),
            drive_file("c.pdf", 3).with_shared(true),
        ];
        let store = StoreFixture::new().with_drive(&entries).store;
        let mut api = api_with(store);

        let mut query = ListQuery::default();
        query.criteria = query.criteria.with_flag(FlagFilter::Only(Flag::Shared));
        query.sort = SortSpec::descending(crate::model::DriveSortKey::Size);
        let listing = api.list_drive(None, query).unwrap();
        let names: Vec<_> = listing.page.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf"]);
    }

    #[test]
    fn drive_mutations_persist() {
        let docs = drive_folder("Docs");
        let store = StoreFixture::new()
            .with_drive(&[docs.clone(), drive_file("a.pdf", 1)])
            .store;
        let mut api = api_with(store);

        let prefix = &docs.id.to_string()[..8];
        let created = api.create_folder(Some(prefix), "Inner").unwrap().data;
        assert_eq!(created.parent_id, Some(docs.id));

        let listing = api.list_drive(Some(prefix), ListQuery::default()).unwrap();
        let crumbs: Vec<_> = listing.breadcrumbs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(crumbs, vec!["My Drive", "Docs"]);
        assert_eq!(listing.page.items[0].name, "Inner");

        api.toggle_star(&created.id.to_string()).unwrap();
        let mut starred = ListQuery::default();
        starred.criteria = starred.criteria.with_tab(DriveTab::Starred);
        assert_eq!(api.list_drive(None, starred).unwrap().page.total_items, 1);

        let removed = api.delete_drive_entry(prefix).unwrap().data;
        assert_eq!(removed.len(), 2);
        let all = api.list_drive(None, ListQuery::default()).unwrap();
        assert_eq!(all.page.total_items, 1);
    }

    #[test]
    fn resolve_id_handles_prefixes() {
        let mut a = drive_file("a", 1);
        a.id = Uuid::parse_str("1111aaaa-0000-4000-8000-000000000001").unwrap();
        let mut b = drive_file("b", 1);
        b.id = Uuid::parse_str("1111bbbb-0000-4000-8000-000000000002").unwrap();
        let items = vec![a.clone(), b.clone()];

        assert_eq!(resolve_id(&items, "entry", &a.id.to_string()).unwrap(), a.id);
        assert_eq!(resolve_id(&items, "entry", "1111B").unwrap(), b.id);
        assert!(matches!(
            resolve_id(&items, "entry", "1111"),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            resolve_id(&items, "entry", "zzzz"),
            Err(DeskError::NotFound(_))
        ));
        assert!(matches!(
            resolve_id(&items, "entry", "1111cccc-0000-4000-8000-000000000003"),
            Err(DeskError::NotFound(_))
        ));
        assert!(matches!(
            resolve_id(&items, "entry", " "),
            Err(DeskError::Validation(_))
        ));
    }

    #[test]
    fn template_lifecycle() {
        let store = StoreFixture::new()
            .with_templates(&[template("Welcome", "Hi {{name}}")])
            .store;
        let mut api = api_with(store);

        let added = api
            .add_template("Reminder", "See you {{date}}", TemplateCategory::Reminder)
            .unwrap();
        assert_eq!(added.messages.len(), 2);
        let id = added.data.id.to_string();

        let toggled = api.toggle_template(&id).unwrap().data;
        assert!(!toggled.active);

        let mut inactive = ListQuery::default();
        inactive.criteria = inactive.criteria.with_tab(TemplateTab::Inactive);
        let page = api.list_templates(inactive).unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "Reminder");

        api.delete_template(&id).unwrap();
        assert_eq!(api.list_templates(ListQuery::default()).unwrap().total_items, 1);
    }

    #[test]
    fn edit_template_changes_requested_fields_only() {
        let t = template("Welcome", "Hi {{name}}");
        let store = StoreFixture::new().with_templates(&[t.clone()]).store;
        let mut api = api_with(store);
        let id = t.id.to_string();

        let edited = api
            .edit_template(
                &id,
                TemplateChanges {
                    name: Some(" Greeting ".to_string()),
                    category: Some(TemplateCategory::Marketing),
                    ..Default::default()
                },
            )
            .unwrap()
            .data;
        assert_eq!(edited.name, "Greeting");
        assert_eq!(edited.category, TemplateCategory::Marketing);
        assert_eq!(edited.content, "Hi {{name}}");

        let mut marketing = ListQuery::default();
        marketing.criteria.category = Some(TemplateCategory::Marketing);
        assert_eq!(api.list_templates(marketing).unwrap().total_items, 1);

        // A blank name rejects the whole edit, content included.
        let rejected = api.edit_template(
            &id,
            TemplateChanges {
                name: Some("  ".to_string()),
                content: Some("Changed".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(rejected, Err(DeskError::Validation(_))));
        let page = api.list_templates(ListQuery::default()).unwrap();
        assert_eq!(page.items[0].content, "Hi {{name}}");

        assert!(api.edit_template(&id, TemplateChanges::default()).is_err());
    }

    #[test]
    fn preview_reports_missing_values() {
        let t = template("Welcome", "Hi {{name}}, code {{code}}");
        let store = StoreFixture::new().with_templates(&[t.clone()]).store;
        let mut api = api_with(store);

        let values = HashMap::from([("name".to_string(), "Ana".to_string())]);
        let preview = api.preview_template(&t.id.to_string(), &values).unwrap();
        assert_eq!(preview.data.rendered, "Hi Ana, code {{code}}");
        assert_eq!(preview.data.missing, vec!["code"]);
        assert_eq!(preview.data.sms.segments, 1);
        assert_eq!(preview.messages.len(), 1);
    }

    #[test]
    fn stored_technician_data_is_not_reseeded() {
        let store = StoreFixture::new()
            .with_projects(&[
                project("Roof", ProjectStatus::Completed),
                project("Kitchen", ProjectStatus::InProgress),
            ])
            .with_documents(&[document("small.pdf", 10), document("big.pdf", 5_000)])
            .store;
        let mut api = api_with(store);

        let mut by_size = ListQuery::<Document>::default();
        by_size.sort = SortSpec {
            key: DocumentSortKey::Size,
            direction: Direction::Descending,
        };
        let docs = api.list_documents(by_size).unwrap();
        assert_eq!(docs.total_items, 2);
        assert_eq!(docs.items[0].name, "big.pdf");

        let mut done = ListQuery::default();
        done.criteria = done.criteria.with_tab(ProjectTab::Completed);
        let projects = api.list_projects(done).unwrap();
        assert_eq!(projects.total_items, 1);
        assert_eq!(projects.items[0].name, "Roof");
    }

    #[test]
    fn project_tabs_filter_by_status() {
        let mut api = api();
        let mut query = ListQuery::default();
        query.criteria = query.criteria.with_tab(ProjectTab::Completed);
        query.page_size = Some(100);
        let page = api.list_projects(query).unwrap();
        assert!(page.total_items > 0);
        assert!(page.items.iter().all(|p| p.status == ProjectStatus::Completed));
    }

    #[test]
    fn profile_is_fetched_then_cached() {
        let mut api = api();
        let profile = api.profile().unwrap();
        assert_eq!(profile.first_name, "Claire");
        let cached = api.store().get("adminInfo").unwrap().unwrap();
        assert_eq!(cached["firstName"], json!("Claire"));
    }

    #[test]
    fn profile_update_validates_before_backend() {
        let mut api = api();
        let err = api
            .update_profile(ProfileChanges {
                email: Some("not-an-email".into()),
                ..ProfileChanges::default()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert_eq!(api.profile().unwrap().email, "claire.martin@example.com");
    }

    #[test]
    fn profile_update_writes_cache() {
        let mut api = api();
        let result = api
            .update_profile(ProfileChanges {
                first_name: Some("Clara".into()),
                ..ProfileChanges::default()
            })
            .unwrap();
        assert_eq!(result.data.first_name, "Clara");
        assert_eq!(api.profile().unwrap().first_name, "Clara");
    }

    #[test]
    fn unreachable_backend_yields_single_message() {
        let mut backend = backend();
        backend.set_offline(true);
        let mut api = DeskApi::new(InMemoryStore::new(), backend, DeskConfig::default());
        let err = api.profile().unwrap_err();
        assert!(err.to_string().contains(BACKEND_ERROR_MESSAGE));
    }

    #[test]
    fn configure_sets_and_reads_keys() {
        let mut api = api();
        api.configure(ConfigAction::Set("page-size".into(), "3".into()))
            .unwrap();
        assert_eq!(api.config().page_size, 3);
        let shown = api
            .configure(ConfigAction::ShowKey("page-size".into()))
            .unwrap();
        assert_eq!(shown.messages[0].content, "3");
        assert!(api
            .configure(ConfigAction::ShowKey("bogus".into()))
            .is_err());

        let page = api.list_projects(ListQuery::default()).unwrap();
        assert_eq!(page.page_size, 3);
    }
}
