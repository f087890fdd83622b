//! Deterministic mock data for first runs and demos.
//!
//! Everything is derived from a fixed seed, so ids and sizes are stable
//! across runs. Timestamps are offsets from the `now` the caller passes in,
//! which keeps the "Recent" tabs populated whenever the data is generated.

use crate::model::{
    Document, DocumentKind, DocumentStatus, DriveEntry, Project, ProjectStatus, SmsTemplate,
    TemplateCategory,
};
use crate::profile::AdminProfile;
use chrono::{DateTime, Duration, Utc};
use uuid::{Builder, Uuid};

const SEED: u64 = 0x5EED_DE5C_u64;

const OWNERS: [&str; 4] = ["Me", "Claire Martin", "Julien Petit", "Sofia Rossi"];

/// splitmix64; small, fast, and good enough for mock data.
struct Rng(u64);

impl Rng {
    fn new(stream: u64) -> Self {
        Self(SEED ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn chance(&mut self, one_in: u64) -> bool {
        self.below(one_in) == 0
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }

    fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_le_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_le_bytes());
        Builder::from_random_bytes(bytes).into_uuid()
    }

    fn minutes_before(&mut self, now: DateTime<Utc>, max_days: i64) -> DateTime<Utc> {
        now - Duration::minutes(self.below((max_days * 24 * 60) as u64) as i64)
    }
}

pub fn drive(now: DateTime<Utc>) -> Vec<DriveEntry> {
    let mut rng = Rng::new(1);
    let mut entries = Vec::new();

    let mut folder = |rng: &mut Rng, name: &str, parent: Option<Uuid>| {
        let mut entry = DriveEntry::folder(name, parent)
            .with_owner(*rng.pick(&OWNERS))
            .with_starred(rng.chance(5))
            .with_modified(rng.minutes_before(now, 90));
        entry.id = rng.uuid();
        entries.push(entry.clone());
        entry.id
    };

    let invoices = folder(&mut rng, "Invoices", None);
    let invoices_2024 = folder(&mut rng, "2024", Some(invoices));
    let photos = folder(&mut rng, "Site photos", None);
    let villa = folder(&mut rng, "Villa Moreau", Some(photos));
    let contracts = folder(&mut rng, "Contracts", None);
    let marketing = folder(&mut rng, "Marketing", None);
    folder(&mut rng, "Archive", None);

    let files: [(&str, Option<Uuid>); 22] = [
        ("Company handbook.pdf", None),
        ("Price list 2024.xlsx", None),
        ("Quarterly review.pptx", None),
        ("Logo.svg", None),
        ("Notes.txt", None),
        ("Backup.zip", None),
        ("INV-1041.pdf", Some(invoices)),
        ("INV-1042.pdf", Some(invoices)),
        ("Payment tracker.xlsx", Some(invoices)),
        ("INV-0977.pdf", Some(invoices_2024)),
        ("INV-0978.pdf", Some(invoices_2024)),
        ("Before works.jpg", Some(photos)),
        ("Roof inspection.mp4", Some(photos)),
        ("Kitchen 01.jpg", Some(villa)),
        ("Kitchen 02.jpg", Some(villa)),
        ("Bathroom.heic", Some(villa)),
        ("Service agreement.docx", Some(contracts)),
        ("NDA Rossi.pdf", Some(contracts)),
        ("Subcontractor terms.odt", Some(contracts)),
        ("Spring campaign.pptx", Some(marketing)),
        ("Flyer.png", Some(marketing)),
        ("Mailing list.csv", Some(marketing)),
    ];
    for (name, parent) in files {
        let size = 2_000 + rng.below(48_000_000);
        let mut entry = DriveEntry::file(name, parent, size)
            .with_owner(*rng.pick(&OWNERS))
            .with_starred(rng.chance(4))
            .with_shared(rng.chance(3))
            .with_modified(rng.minutes_before(now, 45));
        entry.id = rng.uuid();
        entries.push(entry);
    }
    entries
}

pub fn templates(now: DateTime<Utc>) -> Vec<SmsTemplate> {
    let mut rng = Rng::new(2);
    let bodies: [(&str, &str, TemplateCategory, bool); 9] = [
        (
            "Appointment confirmation",
            "Hello {{firstName}}, your appointment on {{date}} at {{time}} is confirmed.",
            TemplateCategory::Confirmation,
            true,
        ),
        (
            "Day-before reminder",
            "Reminder: {{technician}} will visit {{address}} tomorrow at {{time}}.",
            TemplateCategory::Reminder,
            true,
        ),
        (
            "Booking request",
            "Hi {{firstName}}, reply with a slot that suits you for {{service}}.",
            TemplateCategory::Appointment,
            true,
        ),
        (
            "Technician on the way",
            "{{technician}} is on the way and should arrive in about {{eta}} minutes.",
            TemplateCategory::Notification,
            true,
        ),
        (
            "Quote ready",
            "Your quote {{quoteNumber}} is ready: {{link}}",
            TemplateCategory::Notification,
            true,
        ),
        (
            "Invoice overdue",
            "Hello {{firstName}}, invoice {{invoiceNumber}} of {{amount}} is overdue.",
            TemplateCategory::Reminder,
            false,
        ),
        (
            "Spring offer",
            "Spring offer: {{discount}}% off boiler servicing until {{endDate}}!",
            TemplateCategory::Marketing,
            false,
        ),
        (
            "Satisfaction survey",
            "Thanks {{firstName}}! How did we do? Rate us here: {{link}}",
            TemplateCategory::Marketing,
            true,
        ),
        (
            "Generic message",
            "Hello, this is a message from your service provider.",
            TemplateCategory::Other,
            true,
        ),
    ];
    bodies
        .into_iter()
        .map(|(name, content, category, active)| {
            let mut t = SmsTemplate::new(name, content, category)
                .with_active(active)
                .with_updated(rng.minutes_before(now, 120));
            t.id = rng.uuid();
            t
        })
        .collect()
}

pub fn projects(now: DateTime<Utc>) -> Vec<Project> {
    let mut rng = Rng::new(3);
    let specs: [(&str, &str, &str, ProjectStatus); 10] = [
        ("Boiler replacement", "Moreau", "12 rue des Lilas", ProjectStatus::InProgress),
        ("Kitchen renovation", "Villa Moreau", "4 chemin du Moulin", ProjectStatus::InProgress),
        ("Roof inspection", "Dupont", "33 avenue Foch", ProjectStatus::ToComplete),
        ("Heat pump install", "Garnier", "8 impasse Vert", ProjectStatus::ToComplete),
        ("Bathroom refit", "Rossi", "21 rue Pasteur", ProjectStatus::Completed),
        ("Electrical audit", "Lefebvre SARL", "2 quai Ouest", ProjectStatus::Completed),
        ("Gutter repair", "Petit", "17 rue Haute", ProjectStatus::Cancelled),
        ("Annual maintenance", "Bernard", "5 place du Marché", ProjectStatus::ToComplete),
        ("Solar panels", "Martin", "90 route de Lyon", ProjectStatus::InProgress),
        ("Window replacement", "Durand", "14 allée Verte", ProjectStatus::Completed),
    ];
    specs
        .into_iter()
        .map(|(name, client, address, status)| {
            let progress = match status {
                ProjectStatus::ToComplete => 0,
                ProjectStatus::InProgress => 10 + rng.below(80) as u8,
                ProjectStatus::Completed => 100,
                ProjectStatus::Cancelled => rng.below(50) as u8,
            };
            let due = (now + Duration::days(rng.below(60) as i64 - 20)).date_naive();
            let mut p = Project::new(name, client)
                .with_address(address)
                .with_status(status)
                .with_progress(progress)
                .with_due_date(due)
                .with_starred(rng.chance(4))
                .with_modified(rng.minutes_before(now, 30));
            p.id = rng.uuid();
            p
        })
        .collect()
}

/// Documents attached to the sample projects.
pub fn documents(now: DateTime<Utc>, projects: &[Project]) -> Vec<Document> {
    let mut rng = Rng::new(4);
    let kinds: [(DocumentKind, &str, &str); 6] = [
        (DocumentKind::Report, "Intervention report", "pdf"),
        (DocumentKind::Invoice, "Invoice", "pdf"),
        (DocumentKind::Quote, "Quote", "pdf"),
        (DocumentKind::Contract, "Contract", "docx"),
        (DocumentKind::Photo, "Photo", "jpg"),
        (DocumentKind::Plan, "Floor plan", "dwg"),
    ];
    let mut docs = Vec::new();
    for project in projects {
        for _ in 0..(2 + rng.below(3)) {
            let (kind, label, ext) = *rng.pick(&kinds);
            let status = *rng.pick(&[
                DocumentStatus::Draft,
                DocumentStatus::Pending,
                DocumentStatus::Approved,
                DocumentStatus::Rejected,
            ]);
            let name = format!("{} {:04}.{}", label, rng.below(10_000), ext);
            let mut doc = Document::new(name, kind, project.name.clone())
                .with_size(5_000 + rng.below(12_000_000))
                .with_status(status)
                .with_starred(rng.chance(5))
                .with_shared(rng.chance(3))
                .with_modified(rng.minutes_before(now, 40));
            doc.id = rng.uuid();
            docs.push(doc);
        }
    }
    docs
}

pub fn profile() -> AdminProfile {
    AdminProfile {
        id: "1".to_string(),
        first_name: "Claire".to_string(),
        last_name: "Martin".to_string(),
        email: "claire.martin@example.com".to_string(),
        phone: "+33 6 12 34 56 78".to_string(),
        role: "admin".to_string(),
        avatar_url: None,
        updated_at: None,
    }
}
