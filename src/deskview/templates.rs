//! # SMS Templates
//!
//! Template bodies carry `{{variable}}` placeholders. A placeholder is exactly
//! two opening braces, a word (`[A-Za-z0-9_]+`), two closing braces. Anything
//! else (`{name}`, `{{ name }}`, `{{}}`) is plain text and is neither
//! extracted nor substituted.
//!
//! [`TemplateManager`] is the view-model behind the template list: it owns the
//! [`ListView`] and applies create/update/toggle/delete by rebuilding the
//! template array and swapping it in.

use crate::error::{DeskError, Result};
use crate::listing::ListView;
use crate::model::{SmsTemplate, TemplateCategory};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("static placeholder regex"));

/// Placeholder names, deduplicated, in order of first appearance.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = &caps[1];
        if !seen.iter().any(|s: &String| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Substitutes every placeholder that has a value. Unknown placeholders are
/// left exactly as written.
pub fn render_template(content: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

pub fn missing_variables(content: &str, values: &HashMap<String, String>) -> Vec<String> {
    extract_variables(content)
        .into_iter()
        .filter(|name| !values.contains_key(name))
        .collect()
}

/// Parses `KEY=VALUE` pairs as typed on a command line.
pub fn parse_assignments<I, S>(pairs: I) -> Result<HashMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = HashMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            DeskError::Validation(format!("Expected KEY=VALUE, got '{}'", pair))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DeskError::Validation(format!(
                "Missing variable name in '{}'",
                pair
            )));
        }
        values.insert(key.to_string(), value.to_string());
    }
    Ok(values)
}

// --- Segment counting ---

const GSM_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";
const GSM_EXTENDED: &str = "^{}\\[~]|€\u{000C}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

impl SmsEncoding {
    /// Capacity of a lone segment and of each part of a concatenated message.
    pub fn limits(self) -> (usize, usize) {
        match self {
            SmsEncoding::Gsm7 => (160, 153),
            SmsEncoding::Ucs2 => (70, 67),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsInfo {
    pub encoding: SmsEncoding,
    /// Length in encoding units (septets or UTF-16 code units).
    pub units: usize,
    pub segments: usize,
}

pub fn analyze_sms(text: &str) -> SmsInfo {
    let gsm_units = text.chars().try_fold(0usize, |acc, c| {
        if GSM_BASIC.contains(c) {
            Some(acc + 1)
        } else if GSM_EXTENDED.contains(c) {
            Some(acc + 2)
        } else {
            None
        }
    });
    let (encoding, units) = match gsm_units {
        Some(units) => (SmsEncoding::Gsm7, units),
        None => (SmsEncoding::Ucs2, text.encode_utf16().count()),
    };
    let (single, part) = encoding.limits();
    let segments = match units {
        0 => 0,
        n if n <= single => 1,
        n => n.div_ceil(part),
    };
    SmsInfo {
        encoding,
        units,
        segments,
    }
}

pub fn sms_segments(text: &str) -> usize {
    analyze_sms(text).segments
}

// --- Template manager ---

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::Validation(format!("Template {} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// List view plus the mutations the template page offers.
#[derive(Debug, Clone)]
pub struct TemplateManager {
    view: ListView<SmsTemplate>,
}

impl TemplateManager {
    pub fn new(templates: Vec<SmsTemplate>, page_size: usize) -> Result<Self> {
        Ok(Self {
            view: ListView::new(templates, page_size)?,
        })
    }

    pub fn view(&self) -> &ListView<SmsTemplate> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<SmsTemplate> {
        &mut self.view
    }

    pub fn templates(&self) -> &[SmsTemplate] {
        self.view.items()
    }

    pub fn into_templates(self) -> Vec<SmsTemplate> {
        self.view.into_items()
    }

    pub fn get(&self, id: Uuid) -> Result<&SmsTemplate> {
        self.templates()
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| DeskError::NotFound(format!("template {}", id)))
    }

    pub fn create(
        &mut self,
        name: &str,
        content: &str,
        category: TemplateCategory,
    ) -> Result<SmsTemplate> {
        let name = required("name", name)?;
        let content = required("content", content)?;
        let template = SmsTemplate::new(name, content, category);
        tracing::debug!(id = %template.id, name = %template.name, "creating template");

        let mut next = self.templates().to_vec();
        next.push(template.clone());
        self.view.replace_items(next);
        Ok(template)
    }

    pub fn update_content(&mut self, id: Uuid, content: &str) -> Result<SmsTemplate> {
        let content = required("content", content)?;
        self.modify(id, |t| t.content = content)
    }

    pub fn rename(&mut self, id: Uuid, name: &str) -> Result<SmsTemplate> {
        let name = required("name", name)?;
        self.modify(id, |t| t.name = name)
    }

    pub fn set_category(&mut self, id: Uuid, category: TemplateCategory) -> Result<SmsTemplate> {
        self.modify(id, |t| t.category = category)
    }

    pub fn toggle_active(&mut self, id: Uuid) -> Result<SmsTemplate> {
        self.modify(id, |t| t.active = !t.active)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<SmsTemplate> {
        let removed = self.get(id)?.clone();
        tracing::debug!(%id, "deleting template");
        let next = self
            .templates()
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        self.view.replace_items(next);
        Ok(removed)
    }

    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut SmsTemplate)) -> Result<SmsTemplate> {
        self.get(id)?;
        let mut next = self.templates().to_vec();
        let mut updated = None;
        if let Some(t) = next.iter_mut().find(|t| t.id == id) {
            change(t);
            t.updated_at = Utc::now();
            updated = Some(t.clone());
        }
        self.view.replace_items(next);
        updated.ok_or_else(|| DeskError::NotFound(format!("template {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TemplateTab;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_in_order_of_first_appearance() {
        assert_eq!(
            extract_variables("Hi {{name}}, your code is {{code}}. Bye {{name}}."),
            vec!["name", "code"]
        );
    }

    #[test]
    fn malformed_placeholders_are_ignored() {
        assert!(extract_variables("{name} {{ name }} {{}} {{na-me}} {{name").is_empty());
        assert!(extract_variables("").is_empty());
    }

    #[test]
    fn placeholder_names_are_ascii_words() {
        let content = "Bonjour {{prénom}}, {{nom_2}}";
        assert_eq!(extract_variables(content), vec!["nom_2"]);
        let out = render_template(
            content,
            &values(&[("prénom", "Léa"), ("nom_2", "Roux")]),
        );
        assert_eq!(out, "Bonjour {{prénom}}, Roux");
    }

    #[test]
    fn render_keeps_unknown_placeholders() {
        let out = render_template(
            "Hello {{name}}, see you at {{time}}.",
            &values(&[("name", "Ana")]),
        );
        assert_eq!(out, "Hello Ana, see you at {{time}}.");
    }

    #[test]
    fn missing_lists_unsupplied_variables() {
        let content = "{{a}} {{b}} {{a}} {{c}}";
        assert_eq!(
            missing_variables(content, &values(&[("b", "x")])),
            vec!["a", "c"]
        );
    }

    #[test]
    fn parses_assignments() {
        let parsed = parse_assignments(["name=Ana", "code=a=b"]).unwrap();
        assert_eq!(parsed["name"], "Ana");
        assert_eq!(parsed["code"], "a=b");
        assert!(parse_assignments(["novalue"]).is_err());
        assert!(parse_assignments(["=x"]).is_err());
    }

    #[test]
    fn gsm_segment_boundaries() {
        assert_eq!(sms_segments(""), 0);
        assert_eq!(sms_segments(&"a".repeat(160)), 1);
        assert_eq!(sms_segments(&"a".repeat(161)), 2);
        assert_eq!(sms_segments(&"a".repeat(306)), 2);
        assert_eq!(sms_segments(&"a".repeat(307)), 3);
    }

    #[test]
    fn extended_gsm_characters_take_two_units() {
        let info = analyze_sms("€{}");
        assert_eq!(info.encoding, SmsEncoding::Gsm7);
        assert_eq!(info.units, 6);
    }

    #[test]
    fn non_gsm_text_switches_to_ucs2() {
        let info = analyze_sms("Привет");
        assert_eq!(info.encoding, SmsEncoding::Ucs2);
        assert_eq!(info.segments, 1);
        assert_eq!(sms_segments(&"ж".repeat(70)), 1);
        assert_eq!(sms_segments(&"ж".repeat(71)), 2);
        assert_eq!(sms_segments(&"ж".repeat(135)), 3);
    }

    #[test]
    fn create_validates_required_fields() {
        let mut manager = TemplateManager::new(vec![], 10).unwrap();
        assert!(manager
            .create("  ", "body", TemplateCategory::Other)
            .is_err());
        assert!(manager
            .create("Name", "", TemplateCategory::Other)
            .is_err());
        assert!(manager.templates().is_empty());

        let t = manager
            .create(" Welcome ", "Hi {{name}}", TemplateCategory::Notification)
            .unwrap();
        assert_eq!(t.name, "Welcome");
        assert_eq!(manager.templates().len(), 1);
    }

    #[test]
    fn toggle_moves_template_between_tabs() {
        let mut manager = TemplateManager::new(vec![], 10).unwrap();
        let t = manager
            .create("A", "x", TemplateCategory::Reminder)
            .unwrap();
        manager.view_mut().set_tab(TemplateTab::Inactive);
        assert_eq!(manager.view().current_page().total_items, 0);

        let toggled = manager.toggle_active(t.id).unwrap();
        assert!(!toggled.active);
        assert_eq!(manager.view().current_page().total_items, 1);
    }

    #[test]
    fn update_and_delete() {
        let mut manager = TemplateManager::new(vec![], 10).unwrap();
        let t = manager.create("A", "x", TemplateCategory::Other).unwrap();
        let updated = manager.update_content(t.id, "Hi {{who}}").unwrap();
        assert_eq!(updated.variables(), vec!["who"]);
        assert!(manager.update_content(t.id, " ").is_err());

        let renamed = manager.rename(t.id, " B ").unwrap();
        assert_eq!(renamed.name, "B");
        assert!(manager.rename(t.id, "").is_err());
        let moved = manager
            .set_category(t.id, TemplateCategory::Appointment)
            .unwrap();
        assert_eq!(moved.category, TemplateCategory::Appointment);
        assert!(manager
            .set_category(Uuid::new_v4(), TemplateCategory::Other)
            .is_err());

        manager.delete(t.id).unwrap();
        assert!(manager.templates().is_empty());
        assert!(matches!(manager.delete(t.id), Err(DeskError::NotFound(_))));
    }
}
