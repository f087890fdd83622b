use crate::listing::{compare_text, Flag, Listable, TabContext};
use crate::templates::extract_variables;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

labeled_enum! {
    "template category",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TemplateCategory {
        Appointment => "appointment",
        Reminder => "reminder",
        Confirmation => "confirmation",
        Marketing => "marketing",
        Notification => "notification",
        Other => "other",
    }
}

labeled_enum! {
    "template tab",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TemplateTab {
        #[default]
        All => "all",
        Active => "active",
        Inactive => "inactive",
    }
}

labeled_enum! {
    "sort key",
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum TemplateSortKey {
        #[default]
        Name => "name",
        Updated => "updated",
        Category => "category",
        Length => "length",
    }
}

/// A reusable SMS body. Placeholders use the `{{variable}}` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsTemplate {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub category: TemplateCategory,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl SmsTemplate {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
            category,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        if self.created_at > at {
            self.created_at = at;
        }
        self
    }

    /// Placeholder names in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        extract_variables(&self.content)
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

impl Listable for SmsTemplate {
    type Category = TemplateCategory;
    type Tab = TemplateTab;
    type SortKey = TemplateSortKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.content.as_str()]
    }

    fn category(&self) -> TemplateCategory {
        self.category
    }

    fn has_flag(&self, _flag: Flag) -> bool {
        false
    }

    fn in_tab(&self, tab: TemplateTab, _ctx: &TabContext) -> bool {
        match tab {
            TemplateTab::All => true,
            TemplateTab::Active => self.active,
            TemplateTab::Inactive => !self.active,
        }
    }

    fn compare_by(&self, other: &Self, key: TemplateSortKey) -> Ordering {
        match key {
            TemplateSortKey::Name => compare_text(&self.name, &other.name),
            TemplateSortKey::Updated => self.updated_at.cmp(&other.updated_at),
            TemplateSortKey::Category => self.category.as_str().cmp(other.category.as_str()),
            TemplateSortKey::Length => self.char_count().cmp(&other.char_count()),
        }
    }
}
