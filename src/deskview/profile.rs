//! # Admin Profile
//!
//! The settings page edits the signed-in admin's profile. Four pieces:
//!
//! - [`ProfileForm`] + [`validate_form`]: synchronous checks (required
//!   fields, email shape, password length and confirmation). A failing form
//!   never reaches the backend.
//! - [`ProfileBackend`]: the remote user resource (`GET`/`PATCH
//!   /api/users?id=...`). Bodies are opaque JSON; [`AdminProfile::from_json`]
//!   only picks out the fields it knows. [`InMemoryBackend`] stands in for the
//!   real service.
//! - [`ProfileService`]: runs validation, calls the backend, and collapses
//!   every backend failure into [`BACKEND_ERROR_MESSAGE`].
//! - [`ProfileCache`]: the local copy kept under the `adminInfo` key, loaded
//!   and saved explicitly through a [`KeyValueStore`].
//!
//! [`AutoSave`] and [`ProfileEditor`] implement "save two seconds after the
//! last edit": each edit pushes the pending save back, so a burst of edits
//! produces exactly one submission.

use crate::error::{DeskError, Result};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_PROFILE_KEY: &str = "adminInfo";
pub const MIN_PASSWORD_LEN: usize = 8;
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// The one message users see for any backend failure.
pub const BACKEND_ERROR_MESSAGE: &str = "Unable to reach the profile service. Please try again.";

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AdminProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Reads a backend body. Only fields that are present and of the right
    /// type are taken; everything else keeps its default.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| DeskError::Backend("profile body is not an object".to_string()))?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };
        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Ok(Self {
            id,
            first_name: text("firstName"),
            last_name: text("lastName"),
            email: text("email"),
            phone: text("phone"),
            role: text("role"),
            avatar_url: obj
                .get("avatarUrl")
                .and_then(Value::as_str)
                .map(str::to_string),
            updated_at: obj
                .get("updatedAt")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|at| at.with_timezone(&Utc)),
        })
    }
}

// --- Form & validation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

/// What the settings form holds. Password fields stay empty unless the user
/// is changing the password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &AdminProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::FirstName => self.first_name = value,
            ProfileField::LastName => self.last_name = value,
            ProfileField::Email => self.email = value,
            ProfileField::Phone => self.phone = value,
            ProfileField::Password => self.password = value,
            ProfileField::ConfirmPassword => self.confirm_password = value,
        }
    }

    pub fn changes_password(&self) -> bool {
        !self.password.is_empty() || !self.confirm_password.is_empty()
    }

    /// The PATCH body. The password is only sent when it is being changed.
    pub fn to_patch(&self) -> Value {
        let mut body = Map::new();
        body.insert("firstName".into(), json!(self.first_name.trim()));
        body.insert("lastName".into(), json!(self.last_name.trim()));
        body.insert("email".into(), json!(self.email.trim()));
        body.insert("phone".into(), json!(self.phone.trim()));
        if self.changes_password() {
            body.insert("password".into(), json!(self.password));
        }
        Value::Object(body)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Checks run before any backend call. Returns the first failure.
pub fn validate_form(form: &ProfileForm) -> Result<()> {
    let fail = |msg: &str| -> Result<()> { Err(DeskError::Validation(msg.to_string())) };
    if form.first_name.trim().is_empty() {
        return fail("First name is required");
    }
    if form.last_name.trim().is_empty() {
        return fail("Last name is required");
    }
    if form.email.trim().is_empty() {
        return fail("Email is required");
    }
    if !is_valid_email(&form.email) {
        return fail("Please enter a valid email address");
    }
    if form.changes_password() {
        if form.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DeskError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if form.password != form.confirm_password {
            return fail("Passwords do not match");
        }
    }
    Ok(())
}

// --- Backend ---

/// The remote user resource.
pub trait ProfileBackend {
    fn fetch(&self, id: &str) -> Result<Value>;

    /// Applies a partial update and returns the stored body.
    fn update(&mut self, id: &str, patch: &Value) -> Result<Value>;
}

/// Holds user bodies in a map. `set_offline(true)` makes every call fail.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    users: HashMap<String, Value>,
    offline: bool,
    calls: usize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, body: Value) -> Self {
        self.users.insert(id.to_string(), body);
        self
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of update calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            Err(DeskError::Backend("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ProfileBackend for InMemoryBackend {
    fn fetch(&self, id: &str) -> Result<Value> {
        self.check_online()?;
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| DeskError::Backend(format!("user {} not found", id)))
    }

    fn update(&mut self, id: &str, patch: &Value) -> Result<Value> {
        self.calls += 1;
        self.check_online()?;
        let patch = patch
            .as_object()
            .ok_or_else(|| DeskError::Backend("patch body is not an object".to_string()))?;
        let body = self
            .users
            .get_mut(id)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| DeskError::Backend(format!("user {} not found", id)))?;
        for (key, value) in patch {
            // Secrets are accepted but never echoed back.
            if key != "password" {
                body.insert(key.clone(), value.clone());
            }
        }
        body.insert("updatedAt".into(), json!(Utc::now().to_rfc3339()));
        Ok(Value::Object(body.clone()))
    }
}

/// Validation plus backend calls, with failures flattened for display.
pub struct ProfileService<B: ProfileBackend> {
    backend: B,
}

impl<B: ProfileBackend> ProfileService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn load(&self, id: &str) -> Result<AdminProfile> {
        self.backend
            .fetch(id)
            .and_then(|body| AdminProfile::from_json(&body))
            .map_err(flatten_backend_error)
    }

    /// Validates, then sends the form as a PATCH.
    pub fn submit(&mut self, id: &str, form: &ProfileForm) -> Result<AdminProfile> {
        validate_form(form)?;
        let patch = form.to_patch();
        self.backend
            .update(id, &patch)
            .and_then(|body| AdminProfile::from_json(&body))
            .map_err(flatten_backend_error)
    }
}

fn flatten_backend_error(err: DeskError) -> DeskError {
    tracing::warn!(error = %err, "profile backend call failed");
    DeskError::Api(BACKEND_ERROR_MESSAGE.to_string())
}

// --- Local cache ---

/// The profile copy kept in local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCache {
    key: String,
    profile: Option<AdminProfile>,
}

impl ProfileCache {
    pub fn load<S: KeyValueStore>(store: &S, key: &str) -> Result<Self> {
        let profile = store.load::<AdminProfile>(key)?;
        tracing::debug!(key, cached = profile.is_some(), "loaded profile cache");
        Ok(Self {
            key: key.to_string(),
            profile,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn profile(&self) -> Option<&AdminProfile> {
        self.profile.as_ref()
    }

    pub fn set(&mut self, profile: AdminProfile) {
        self.profile = Some(profile);
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        match &self.profile {
            Some(profile) => store.save(&self.key, profile),
            None => store.remove(&self.key).map(|_| ()),
        }
    }

    pub fn clear(&mut self) {
        self.profile = None;
    }
}

// --- Auto-save ---

/// Debounced save trigger. Every [`AutoSave::touch`] moves the deadline to
/// `now + delay`; [`AutoSave::take_due`] fires once per pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl AutoSave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed; clears the pending save.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Fires immediately if anything is pending (e.g. on exit).
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

/// Form state with auto-save wired to a [`ProfileService`].
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    user_id: String,
    form: ProfileForm,
    autosave: AutoSave,
    error: Option<String>,
}

impl ProfileEditor {
    pub fn new(user_id: impl Into<String>, profile: &AdminProfile, autosave: AutoSave) -> Self {
        Self {
            user_id: user_id.into(),
            form: ProfileForm::from_profile(profile),
            autosave,
            error: None,
        }
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    /// Last submission error, cleared by the next edit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn edit(&mut self, field: ProfileField, value: impl Into<String>, now: Instant) {
        self.form.set(field, value);
        self.error = None;
        self.autosave.touch(now);
    }

    /// Submits when the auto-save deadline has passed. `Ok(None)` means
    /// nothing was due.
    pub fn tick<B: ProfileBackend>(
        &mut self,
        now: Instant,
        service: &mut ProfileService<B>,
    ) -> Result<Option<AdminProfile>> {
        if !self.autosave.take_due(now) {
            return Ok(None);
        }
        self.submit(service).map(Some)
    }

    /// Submits right away if there are unsaved edits.
    pub fn flush<B: ProfileBackend>(
        &mut self,
        service: &mut ProfileService<B>,
    ) -> Result<Option<AdminProfile>> {
        if !self.autosave.flush() {
            return Ok(None);
        }
        self.submit(service).map(Some)
    }

    fn submit<B: ProfileBackend>(
        &mut self,
        service: &mut ProfileService<B>,
    ) -> Result<AdminProfile> {
        match service.submit(&self.user_id, &self.form) {
            Ok(profile) => {
                self.form.password.clear();
                self.form.confirm_password.clear();
                Ok(profile)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn valid_form() -> ProfileForm {
        ProfileForm {
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: "ana@example.com".into(),
            phone: "+33 6 12 34 56 78".into(),
            ..ProfileForm::default()
        }
    }

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_user(
            "1",
            json!({
                "id": 1,
                "firstName": "Ana",
                "lastName": "Lima",
                "email": "ana@example.com",
                "role": "admin",
                "extra": {"nested": true}
            }),
        )
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(DeskError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn required_fields() {
        let mut form = valid_form();
        form.first_name = " ".into();
        assert_eq!(message(validate_form(&form)), "First name is required");

        let mut form = valid_form();
        form.email.clear();
        assert_eq!(message(validate_form(&form)), "Email is required");
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("a.b@c.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("@c.io"));

        let mut form = valid_form();
        form.email = "nope".into();
        assert_eq!(
            message(validate_form(&form)),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn password_rules() {
        let mut form = valid_form();
        form.password = "short".into();
        form.confirm_password = "short".into();
        assert_eq!(
            message(validate_form(&form)),
            "Password must be at least 8 characters"
        );

        form.password = "longenough".into();
        form.confirm_password = "longenougH".into();
        assert_eq!(message(validate_form(&form)), "Passwords do not match");

        form.confirm_password = "longenough".into();
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn patch_omits_password_unless_changing() {
        let form = valid_form();
        assert!(form.to_patch().get("password").is_none());

        let mut form = valid_form();
        form.password = "longenough".into();
        assert_eq!(form.to_patch()["password"], "longenough");
    }

    #[test]
    fn from_json_picks_known_fields() {
        let profile = AdminProfile::from_json(&json!({
            "id": 7,
            "firstName": "Ana",
            "lastName": 42,
            "unknown": "x"
        }))
        .unwrap();
        assert_eq!(profile.id, "7");
        assert_eq!(profile.first_name, "Ana");
        assert_eq!(profile.last_name, "");
        assert!(AdminProfile::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn invalid_form_never_reaches_backend() {
        let mut service = ProfileService::new(backend());
        let mut form = valid_form();
        form.last_name.clear();
        assert!(matches!(
            service.submit("1", &form),
            Err(DeskError::Validation(_))
        ));
        assert_eq!(service.backend().calls(), 0);
    }

    #[test]
    fn submit_updates_backend() {
        let mut service = ProfileService::new(backend());
        let mut form = valid_form();
        form.first_name = "Anna".into();
        let updated = service.submit("1", &form).unwrap();
        assert_eq!(updated.first_name, "Anna");
        assert_eq!(updated.role, "admin");
        assert!(updated.updated_at.is_some());
        assert_eq!(service.load("1").unwrap().first_name, "Anna");
    }

    #[test]
    fn backend_errors_collapse_to_one_message() {
        let mut b = backend();
        b.set_offline(true);
        let mut service = ProfileService::new(b);

        for err in [
            service.load("1").unwrap_err(),
            service.submit("1", &valid_form()).unwrap_err(),
        ] {
            assert_eq!(err.to_string(), format!("Api Error: {}", BACKEND_ERROR_MESSAGE));
        }

        let service = ProfileService::new(InMemoryBackend::new());
        assert!(matches!(service.load("missing"), Err(DeskError::Api(_))));
    }

    #[test]
    fn cache_round_trips_through_store() {
        let mut store = InMemoryStore::new();
        let mut cache = ProfileCache::load(&store, DEFAULT_PROFILE_KEY).unwrap();
        assert!(cache.profile().is_none());

        cache.set(AdminProfile {
            first_name: "Ana".into(),
            ..AdminProfile::default()
        });
        cache.save(&mut store).unwrap();

        let reloaded = ProfileCache::load(&store, DEFAULT_PROFILE_KEY).unwrap();
        assert_eq!(reloaded.profile().unwrap().first_name, "Ana");

        cache.clear();
        cache.save(&mut store).unwrap();
        assert!(store.get(DEFAULT_PROFILE_KEY).unwrap().is_none());
    }

    #[test]
    fn autosave_debounces_rapid_edits() {
        let start = Instant::now();
        let mut autosave = AutoSave::default();
        assert!(!autosave.take_due(start));

        for ms in [0, 300, 900, 1500] {
            autosave.touch(start + Duration::from_millis(ms));
        }
        assert!(!autosave.take_due(start + Duration::from_millis(3000)));
        assert!(autosave.take_due(start + Duration::from_millis(3500)));
        assert!(!autosave.take_due(start + Duration::from_millis(9000)));
    }

    #[test]
    fn editor_submits_once_after_quiet_period() {
        let start = Instant::now();
        let mut service = ProfileService::new(backend());
        let profile = service.load("1").unwrap();
        let mut editor = ProfileEditor::new("1", &profile, AutoSave::default());

        editor.edit(ProfileField::FirstName, "A", start);
        editor.edit(ProfileField::FirstName, "An", start + Duration::from_millis(100));
        editor.edit(ProfileField::FirstName, "Ann", start + Duration::from_millis(200));

        let mut saves = 0;
        for ms in (0..5000).step_by(100) {
            if editor
                .tick(start + Duration::from_millis(ms), &mut service)
                .unwrap()
                .is_some()
            {
                saves += 1;
            }
        }
        assert_eq!(saves, 1);
        assert_eq!(service.backend().calls(), 1);
        assert_eq!(service.load("1").unwrap().first_name, "Ann");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn editor_keeps_error_message() {
        let start = Instant::now();
        let mut service = ProfileService::new(backend());
        let mut editor = ProfileEditor::new("1", &AdminProfile::default(), AutoSave::default());
        editor.edit(ProfileField::Email, "bad", start);
        assert!(editor.flush(&mut service).is_err());
        assert_eq!(editor.error(), Some("First name is required"));
        assert_eq!(editor.flush(&mut service).unwrap(), None);
    }
}
