use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use deskview::api::{CmdMessage, DriveListing, MessageLevel, TemplatePreview, TextInspection};
use deskview::config::DeskConfig;
use deskview::error::Result;
use deskview::format::{format_date, format_optional_size, format_relative, format_size};
use deskview::listing::Paged;
use deskview::model::{Document, Project, SmsTemplate};
use deskview::profile::AdminProfile;
use deskview::templates::{analyze_sms, SmsEncoding, SmsInfo};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use uuid::Uuid;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 8;
const STAR_MARKER: &str = "★";
const SHARED_MARKER: &str = "⇄";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Dim,
    Good,
    Alert,
}

impl Tone {
    fn paint(self, text: &str) -> ColoredString {
        match self {
            Tone::Plain => text.normal(),
            Tone::Dim => text.dimmed(),
            Tone::Good => text.green(),
            Tone::Alert => text.red(),
        }
    }
}

/// One list line: short id, title, then fixed-width columns, markers and time.
struct Row<'a> {
    id: Uuid,
    title: &'a str,
    bold: bool,
    columns: Vec<(String, Tone)>,
    starred: bool,
    shared: bool,
    time: String,
}

fn print_row(row: Row<'_>) {
    let id: String = row.id.to_string().chars().take(ID_WIDTH).collect();
    let left_width = 2 + id.width() + 2;

    let columns_width: usize = row.columns.iter().map(|(c, _)| c.width() + 2).sum();
    let markers = format!(
        "{}{} ",
        if row.starred { STAR_MARKER } else { " " },
        if row.shared { SHARED_MARKER } else { " " }
    );
    let time = format!("{:>width$}", row.time, width = TIME_WIDTH);
    let fixed = left_width + columns_width + 1 + markers.width() + time.width();
    let available = LINE_WIDTH.saturating_sub(fixed);

    let title = truncate_to_width(row.title, available);
    let padding = available.saturating_sub(title.width());
    let title = if row.bold { title.bold() } else { title.normal() };

    let mut line = format!("  {}  {}{}", id.yellow(), title, " ".repeat(padding));
    for (column, tone) in &row.columns {
        line.push_str(&format!("  {}", tone.paint(column)));
    }
    println!("{} {}{}", line, markers.yellow(), time.dimmed());
}

fn print_footer<T>(page: &Paged<T>, what: &str) {
    match page.item_range() {
        None => println!("No {} found.", what),
        Some((first, last)) => println!(
            "{}",
            format!(
                "Page {} of {} · {}-{} of {} {}",
                page.page, page.total_pages, first, last, page.total_items, what
            )
            .dimmed()
        ),
    }
}

pub(super) fn print_drive(listing: &DriveListing, now: DateTime<Utc>) {
    let path: Vec<&str> = listing.breadcrumbs.iter().map(|c| c.name.as_str()).collect();
    println!("{}", path.join(" / ").bold());
    println!();

    for entry in &listing.page.items {
        let title = if entry.is_folder() {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        print_row(Row {
            id: entry.id,
            title: &title,
            bold: entry.is_folder(),
            columns: vec![
                (pad_to_width(entry.kind.as_str(), 12), Tone::Dim),
                (format!("{:>9}", format_optional_size(entry.size)), Tone::Plain),
            ],
            starred: entry.starred,
            shared: entry.shared,
            time: format_relative(entry.modified_at, now),
        });
    }
    print_footer(&listing.page, "entries");
}

pub(super) fn print_templates(page: &Paged<SmsTemplate>, now: DateTime<Utc>) {
    for template in &page.items {
        let state = if template.active {
            (pad_to_width("active", 8), Tone::Good)
        } else {
            (pad_to_width("inactive", 8), Tone::Dim)
        };
        let sms = analyze_sms(&template.content);
        print_row(Row {
            id: template.id,
            title: &template.name,
            bold: false,
            columns: vec![
                (pad_to_width(template.category.as_str(), 12), Tone::Dim),
                state,
                (
                    format!("{:>4} ch {} sms", template.char_count(), sms.segments),
                    Tone::Plain,
                ),
            ],
            starred: false,
            shared: false,
            time: format_relative(template.updated_at, now),
        });
    }
    print_footer(page, "templates");
}

pub(super) fn print_documents(page: &Paged<Document>, now: DateTime<Utc>) {
    for doc in &page.items {
        print_row(Row {
            id: doc.id,
            title: &doc.name,
            bold: false,
            columns: vec![
                (truncate_and_pad(&doc.project, 18), Tone::Dim),
                (pad_to_width(doc.kind.as_str(), 8), Tone::Plain),
                (pad_to_width(doc.status.as_str(), 8), Tone::Dim),
                (format!("{:>9}", format_size(doc.size)), Tone::Plain),
            ],
            starred: doc.starred,
            shared: doc.shared,
            time: format_relative(doc.modified_at, now),
        });
    }
    print_footer(page, "documents");
}

pub(super) fn print_projects(page: &Paged<Project>, now: DateTime<Utc>) {
    let today = now.date_naive();
    for project in &page.items {
        let due = project
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let tone = if project.is_overdue(today) {
            Tone::Alert
        } else {
            Tone::Plain
        };
        print_row(Row {
            id: project.id,
            title: &project.name,
            bold: false,
            columns: vec![
                (truncate_and_pad(&project.client, 14), Tone::Dim),
                (pad_to_width(project.status.as_str(), 11), Tone::Plain),
                (format!("{:>3}%", project.progress), Tone::Plain),
                (pad_to_width(&due, 10), tone),
            ],
            starred: project.starred,
            shared: false,
            time: format_relative(project.modified_at, now),
        });
    }
    print_footer(page, "projects");
}

fn sms_summary(sms: &SmsInfo) -> String {
    let encoding = match sms.encoding {
        SmsEncoding::Gsm7 => "GSM-7",
        SmsEncoding::Ucs2 => "UCS-2",
    };
    format!(
        "{} units · {} segment(s) · {}",
        sms.units, sms.segments, encoding
    )
}

pub(super) fn print_preview(preview: &TemplatePreview) {
    println!(
        "{} {}",
        preview.template.name.bold(),
        format!("({})", preview.template.category).dimmed()
    );
    println!("--------------------------------");
    println!("{}", preview.rendered);
    println!("--------------------------------");
    println!("{}", sms_summary(&preview.sms).dimmed());
}

pub(super) fn print_inspection(inspection: &TextInspection) {
    if inspection.variables.is_empty() {
        println!("No variables found.");
    } else {
        for var in &inspection.variables {
            println!("{}", format!("{{{{{}}}}}", var).yellow());
        }
    }
    println!("{}", sms_summary(&inspection.sms).dimmed());
}

pub(super) fn print_profile(profile: &AdminProfile) {
    let updated = profile
        .updated_at
        .map(format_date)
        .unwrap_or_else(|| "-".to_string());
    println!("{}", profile.full_name().bold());
    for (label, value) in [
        ("id", profile.id.as_str()),
        ("email", profile.email.as_str()),
        ("phone", profile.phone.as_str()),
        ("role", profile.role.as_str()),
        ("updated", updated.as_str()),
    ] {
        println!("  {} {}", pad_to_width(label, 8).dimmed(), value);
    }
}

pub(super) fn print_config(config: &DeskConfig) {
    for key in DeskConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_and_pad(s: &str, width: usize) -> String {
    if s.width() <= width {
        pad_to_width(s, width)
    } else {
        pad_to_width(&truncate_to_width(s, width), width)
    }
}
