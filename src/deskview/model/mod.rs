//! # Domain Model
//!
//! The four record types backing the dashboard views:
//!
//! - [`DriveEntry`]: files and folders in the admin Drive browser
//! - [`SmsTemplate`]: reusable SMS bodies with `{{variable}}` placeholders
//! - [`Document`]: technician documents attached to projects
//! - [`Project`]: technician work orders
//!
//! Each record implements [`crate::listing::Listable`], which is all the list
//! pipeline needs to filter, sort and paginate it.
//!
//! ## Closed Enums
//!
//! Every category, status, tab and sort key is a closed enum. Parsing from
//! user input happens once, at the boundary, through `FromStr`; the labels are
//! kebab-case (`my-drive`, `to-complete`). JSON serialization uses camelCase
//! variant names so stored blobs stay compatible with the dashboard's format.

use crate::error::DeskError;

/// Declares a closed enum with a stable kebab-case label per variant.
///
/// Generates `ALL`, `as_str()`, `Display` and a `FromStr` that accepts the
/// label case-insensitively (underscores are read as dashes).
macro_rules! labeled_enum {
    (
        $what:literal,
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::DeskError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase().replace('_', "-");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| crate::model::unknown_label($what, s, $name::ALL.iter().map(|v| v.as_str())))
            }
        }
    };
}

mod document;
mod drive;
mod project;
mod template;

pub use document::{Document, DocumentKind, DocumentSortKey, DocumentStatus, DocumentTab};
pub use drive::{DriveEntry, DriveKind, DriveSortKey, DriveTab};
pub use project::{Project, ProjectSortKey, ProjectStatus, ProjectTab};
pub use template::{SmsTemplate, TemplateCategory, TemplateSortKey, TemplateTab};

pub(crate) fn unknown_label<'a>(
    what: &str,
    input: &str,
    expected: impl Iterator<Item = &'a str>,
) -> DeskError {
    let expected: Vec<&str> = expected.collect();
    DeskError::Validation(format!(
        "Unknown {} '{}' (expected one of: {})",
        what,
        input,
        expected.join(", ")
    ))
}
