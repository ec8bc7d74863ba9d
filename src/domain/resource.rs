//! Description of a remote entity type shown in the dashboard.
//!
//! Every listing page shares one pipeline; a [`Resource`] implementation
//! supplies the per-entity pieces: where the entity lives on the remote API,
//! which query keys filter it, how its rows look and which form fields edit it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::types::EntityId;

/// Top-level dashboard section an entity belongs to.
///
/// The section is the first path segment of every route of the entity and is
/// one of the prefixes protected by the route guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Lms,
    Hr,
}

impl Section {
    pub const fn as_str(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Lms => "lms",
            Section::Hr => "hr",
        }
    }
}

/// Table column header.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

/// Static option of a select input.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StaticOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const STATUS_OPTIONS: &[StaticOption] = &[
    StaticOption {
        value: "active",
        label: "Active",
    },
    StaticOption {
        value: "inactive",
        label: "Inactive",
    },
];

pub const SORT_ORDER_OPTIONS: &[StaticOption] = &[
    StaticOption {
        value: "asc",
        label: "Oldest first",
    },
    StaticOption {
        value: "desc",
        label: "Newest first",
    },
];

/// Kind of input rendered for a filter or form field.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Textarea,
    Number,
    Date,
    Checkbox,
    /// Select with a fixed list of options.
    Select { options: &'static [StaticOption] },
    /// Select whose options are loaded from another remote endpoint.
    RemoteSelect { endpoint: &'static str },
    /// Multi-select whose options are loaded from another remote endpoint.
    RemoteMultiSelect { endpoint: &'static str },
}

/// Query-string filter recognized by a listing page.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FilterField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
}

impl FilterField {
    pub const fn search() -> Self {
        Self {
            key: "search",
            label: "Search",
            kind: InputKind::Text,
        }
    }

    pub const fn status() -> Self {
        Self {
            key: "status",
            label: "Status",
            kind: InputKind::Select {
                options: STATUS_OPTIONS,
            },
        }
    }

    pub const fn sort_order() -> Self {
        Self {
            key: "sort_order",
            label: "Sort",
            kind: InputKind::Select {
                options: SORT_ORDER_OPTIONS,
            },
        }
    }

    pub const fn remote(key: &'static str, label: &'static str, endpoint: &'static str) -> Self {
        Self {
            key,
            label,
            kind: InputKind::RemoteSelect { endpoint },
        }
    }
}

/// Editable field of the create/edit form.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

impl FormField {
    pub const fn required(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Per-row action offered by a listing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

pub const DEFAULT_FILTERS: &[FilterField] = &[FilterField::search(), FilterField::sort_order()];

pub const ALL_ROW_ACTIONS: &[RowAction] = &[RowAction::View, RowAction::Edit, RowAction::Delete];

/// A remote entity type managed through the dashboard.
pub trait Resource: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// URL segment and permission prefix, e.g. `districts`.
    const SLUG: &'static str;
    /// Remote API path relative to the versioned prefix, e.g. `/districts`.
    const ENDPOINT: &'static str;
    /// Human readable plural title.
    const TITLE: &'static str;
    /// Dashboard section the routes are mounted under.
    const SECTION: Section;
    /// Whether the endpoint can be read without a session token.
    const PUBLIC: bool = false;

    fn id(&self) -> EntityId;

    /// Short label used in confirmations and page titles.
    fn label(&self) -> String;

    fn columns() -> &'static [Column];

    /// Cell values in the same order as [`Resource::columns`].
    fn cells(&self) -> Vec<String>;

    /// Query keys recognized by the listing page.
    fn filters() -> &'static [FilterField] {
        DEFAULT_FILTERS
    }

    fn form_fields() -> &'static [FormField];

    fn row_actions() -> &'static [RowAction] {
        ALL_ROW_ACTIONS
    }

    /// Base path of the listing page, e.g. `/dashboard/districts`.
    fn base_path() -> String {
        format!("/{}/{}", Self::SECTION.as_str(), Self::SLUG)
    }

    /// Permission required for the given action, e.g. `districts.delete`.
    fn permission(action: &str) -> String {
        format!("{}.{}", Self::SLUG, action)
    }

    fn recognizes(key: &str) -> bool {
        Self::filters().iter().any(|field| field.key == key)
    }
}

/// Formats an optional value for a table cell.
pub fn cell<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}
