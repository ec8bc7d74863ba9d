//! DTOs rendered by the generic resource pages.

use serde::Serialize;

use crate::api::errors::FieldErrors;
use crate::domain::resource::{Column, InputKind};
use crate::domain::types::EntityId;
use crate::pagination::PaginationControl;

/// Option of a select input, flagged when it matches the current value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One input of the filter form.
#[derive(Clone, Debug, Serialize)]
pub struct FilterFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub multiple: bool,
    /// Current value of a single-valued input; empty when unset.
    pub value: String,
    pub options: Vec<OptionView>,
}

/// Filter form shown above a listing table.
#[derive(Clone, Debug, Serialize)]
pub struct FilterFormView {
    /// Path the form submits to and the URL it keeps in sync.
    pub action: String,
    pub fields: Vec<FilterFieldView>,
    /// Bare listing path; following it resets every filter.
    pub clear_url: String,
    pub debounce_ms: u64,
    /// Whether any filter is currently applied.
    pub active: bool,
}

/// Table row with pre-built action URLs.
#[derive(Clone, Debug, Serialize)]
pub struct RowView {
    pub id: EntityId,
    pub label: String,
    pub cells: Vec<String>,
    pub view_url: Option<String>,
    pub edit_url: Option<String>,
    pub delete_url: Option<String>,
}

/// What the results area of a listing shows.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListOutcome {
    /// The fetch failed; only the message is shown.
    Error { message: String },
    /// The fetch succeeded with zero items.
    NotFound { message: String },
    Rows {
        rows: Vec<RowView>,
        pagination: PaginationControl,
    },
}

impl ListOutcome {
    pub fn rows(&self) -> &[RowView] {
        match self {
            ListOutcome::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

/// Data required to render a listing page.
#[derive(Clone, Debug, Serialize)]
pub struct ListPageData {
    pub title: &'static str,
    pub slug: &'static str,
    pub base_path: String,
    pub columns: &'static [Column],
    pub filters: FilterFormView,
    pub outcome: ListOutcome,
    /// Path plus query of the page; delete actions come back here.
    pub current_url: String,
    pub can_create: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

/// Data required to render a single entity.
#[derive(Clone, Debug, Serialize)]
pub struct DetailPageData {
    pub title: &'static str,
    pub label: String,
    pub base_path: String,
    pub rows: Vec<DetailRow>,
    pub edit_url: Option<String>,
    pub delete_url: Option<String>,
}

/// One input of the create/edit form.
#[derive(Clone, Debug, Serialize)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub value: String,
    pub checked: bool,
    pub options: Vec<OptionView>,
    pub error: Option<String>,
}

/// Data required to render the create/edit form.
#[derive(Clone, Debug, Serialize)]
pub struct FormPageData {
    pub title: &'static str,
    pub heading: String,
    pub action: String,
    pub cancel_url: String,
    pub fields: Vec<FormFieldView>,
    /// Form-level error shown above the inputs.
    pub message: Option<String>,
}

impl FormPageData {
    /// Attaches per-field messages and the form-level message.
    pub fn with_errors(mut self, message: impl Into<String>, errors: &FieldErrors) -> Self {
        for field in &mut self.fields {
            field.error = errors.get(field.name).map(str::to_string);
        }
        self.message = Some(message.into());
        self
    }
}
