//! List, detail, form and delete workflows shared by every resource.
//!
//! Each function is generic over the [`Resource`] being shown and over the
//! [`ResourceApi`] used to reach the remote service.

use serde_json::Value;

use crate::api::client::ResourceApi;
use crate::api::envelope::{ApiSuccess, Page};
use crate::api::errors::{ApiError, FieldErrors};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::{InputKind, Resource, RowAction, StaticOption};
use crate::domain::types::EntityId;
use crate::dto::resources::{
    DetailPageData, DetailRow, FilterFieldView, FilterFormView, FormFieldView, FormPageData,
    ListOutcome, ListPageData, OptionView, RowView,
};
use crate::filters::FilterState;
use crate::filters::query::ListQuery;
use crate::forms::resources::ResourceForm;
use crate::pagination::PaginationControl;
use crate::services::{ServiceError, ServiceResult, ensure_permission};

/// Listing settings taken from the server configuration.
#[derive(Clone, Copy, Debug)]
pub struct ListSettings {
    pub per_page: u32,
    pub debounce_ms: u64,
}

/// Result of submitting a create/edit form.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved { message: String },
    /// The form must be shown again with the errors attached.
    Rejected(FormPageData),
}

/// Public resources are readable by anyone; the rest need a session with
/// the `action` permission.
fn authorize_read<R: Resource>(user: Option<&AuthenticatedUser>, action: &str) -> ServiceResult<()> {
    if R::PUBLIC {
        return Ok(());
    }
    let user = user.ok_or(ServiceError::Unauthorized)?;
    ensure_permission(user, &R::permission(action))
}

fn allows<R: Resource>(user: Option<&AuthenticatedUser>, action: &str) -> bool {
    !R::PUBLIC && user.is_some_and(|user| user.can(&R::permission(action)))
}

/// Loads one listing page: the filter form, the current page of entities and
/// the pagination links.
///
/// Unrecognized query keys never reach the remote API, but pagination links
/// keep them so the URL is preserved apart from the page number.
pub async fn load_list_page<R, A>(
    api: &A,
    user: Option<&AuthenticatedUser>,
    params: &FilterState,
    settings: ListSettings,
) -> ServiceResult<ListPageData>
where
    R: Resource,
    A: ResourceApi,
{
    authorize_read::<R>(user, "list")?;

    let base_path = R::base_path();
    let filters = load_filter_form::<R, A>(api, user, params, settings.debounce_ms).await;
    let query = ListQuery::for_resource::<R>(params).per_page(settings.per_page);

    let outcome = match api.list::<R>(user, &query).await {
        Ok(success) => list_outcome(success, user, &base_path, params),
        Err(err) if err.is_unauthenticated() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to list {}: {err:?}", R::SLUG);
            ListOutcome::Error {
                message: err.to_string(),
            }
        }
    };

    Ok(ListPageData {
        title: R::TITLE,
        slug: R::SLUG,
        current_url: params.to_url(&base_path),
        can_create: allows::<R>(user, "create"),
        base_path,
        columns: R::columns(),
        filters,
        outcome,
    })
}

fn list_outcome<R: Resource>(
    success: ApiSuccess<Page<R>>,
    user: Option<&AuthenticatedUser>,
    base_path: &str,
    params: &FilterState,
) -> ListOutcome {
    let page = success.data;
    if page.is_empty() {
        return ListOutcome::NotFound {
            message: success
                .message
                .unwrap_or_else(|| format!("No {} found.", R::TITLE.to_lowercase())),
        };
    }

    ListOutcome::Rows {
        rows: build_rows(&page.items, user, base_path),
        pagination: PaginationControl::new(page.pagination, base_path, params),
    }
}

fn build_rows<R: Resource>(
    items: &[R],
    user: Option<&AuthenticatedUser>,
    base_path: &str,
) -> Vec<RowView> {
    let actions = R::row_actions();
    let can_view = actions.contains(&RowAction::View);
    let can_edit = actions.contains(&RowAction::Edit) && allows::<R>(user, "update");
    let can_delete = actions.contains(&RowAction::Delete) && allows::<R>(user, "delete");

    items
        .iter()
        .map(|item| {
            let id = item.id();
            RowView {
                id,
                label: item.label(),
                cells: item.cells(),
                view_url: can_view.then(|| format!("{base_path}/{id}")),
                edit_url: can_edit.then(|| format!("{base_path}/{id}/edit")),
                delete_url: can_delete.then(|| format!("{base_path}/{id}/delete")),
            }
        })
        .collect()
}

/// Builds the filter form for `R`, loading remote options for its selects.
///
/// A failed option load is logged and leaves that select empty; the rest of
/// the page still renders.
pub async fn load_filter_form<R, A>(
    api: &A,
    user: Option<&AuthenticatedUser>,
    params: &FilterState,
    debounce_ms: u64,
) -> FilterFormView
where
    R: Resource,
    A: ResourceApi,
{
    let mut fields = Vec::with_capacity(R::filters().len());
    for field in R::filters() {
        let current = params.get(field.key);
        let is_selected = |value: &str| current.is_some_and(|current| current.contains(value));

        let (multiple, options) = match field.kind {
            InputKind::Select { options } => (false, static_options(options, is_selected)),
            InputKind::RemoteSelect { endpoint } => {
                (false, remote_options(api, user, endpoint, is_selected).await)
            }
            InputKind::RemoteMultiSelect { endpoint } => {
                (true, remote_options(api, user, endpoint, is_selected).await)
            }
            _ => (false, Vec::new()),
        };

        fields.push(FilterFieldView {
            key: field.key,
            label: field.label,
            kind: field.kind,
            multiple,
            value: current
                .and_then(|value| value.first())
                .unwrap_or_default()
                .to_string(),
            options,
        });
    }

    let base_path = R::base_path();
    FilterFormView {
        active: params.iter().any(|(key, _)| R::recognizes(key)),
        clear_url: base_path.clone(),
        action: base_path,
        fields,
        debounce_ms,
    }
}

fn static_options(options: &[StaticOption], is_selected: impl Fn(&str) -> bool) -> Vec<OptionView> {
    options
        .iter()
        .map(|option| OptionView {
            value: option.value.to_string(),
            label: option.label.to_string(),
            selected: is_selected(option.value),
        })
        .collect()
}

async fn remote_options<A: ResourceApi>(
    api: &A,
    user: Option<&AuthenticatedUser>,
    endpoint: &str,
    is_selected: impl Fn(&str) -> bool,
) -> Vec<OptionView> {
    match api.options(user, endpoint).await {
        Ok(success) => success
            .data
            .into_iter()
            .map(|option| {
                let value = option.id.to_string();
                OptionView {
                    selected: is_selected(&value),
                    value,
                    label: option.name,
                }
            })
            .collect(),
        Err(err) => {
            log::error!("Failed to load options from {endpoint}: {err:?}");
            Vec::new()
        }
    }
}

/// Loads a single entity for the detail page.
pub async fn load_detail_page<R, A>(
    api: &A,
    user: Option<&AuthenticatedUser>,
    id: i64,
) -> ServiceResult<DetailPageData>
where
    R: Resource,
    A: ResourceApi,
{
    authorize_read::<R>(user, "view")?;
    let id = EntityId::new(id)?;

    let entity = api.fetch::<R>(user, id).await?.data;
    let base_path = R::base_path();
    let actions = R::row_actions();

    Ok(DetailPageData {
        title: R::TITLE,
        label: entity.label(),
        rows: describe(&to_json(&entity)?),
        edit_url: (actions.contains(&RowAction::Edit) && allows::<R>(user, "update"))
            .then(|| format!("{base_path}/{id}/edit")),
        delete_url: (actions.contains(&RowAction::Delete) && allows::<R>(user, "delete"))
            .then(|| format!("{base_path}/{id}/delete")),
        base_path,
    })
}

fn to_json<R: Resource>(entity: &R) -> ServiceResult<Value> {
    serde_json::to_value(entity).map_err(|e| ServiceError::Api(ApiError::Decode(e.to_string())))
}

fn describe(entity: &Value) -> Vec<DetailRow> {
    let Value::Object(fields) = entity else {
        return Vec::new();
    };
    fields
        .iter()
        .map(|(key, value)| DetailRow {
            label: humanize(key),
            value: display_value(value),
        })
        .collect()
}

pub(crate) fn humanize(key: &str) -> String {
    let text = key.replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) if text.is_empty() => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(object) => ["name", "title", "code", "id"]
            .iter()
            .find_map(|key| object.get(*key).filter(|v| !v.is_null()))
            .map(display_value)
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// Loads the create form (`id` is `None`) or the edit form pre-filled with
/// the current entity.
pub async fn load_form_page<R, A>(
    api: &A,
    user: &AuthenticatedUser,
    id: Option<i64>,
) -> ServiceResult<FormPageData>
where
    R: Resource,
    A: ResourceApi,
{
    match id {
        None => {
            ensure_permission(user, &R::permission("create"))?;
            Ok(build_form_page::<R, A>(api, user, None, &ResourceForm::default(), None).await)
        }
        Some(id) => {
            ensure_permission(user, &R::permission("update"))?;
            let id = EntityId::new(id)?;
            let entity = api.fetch::<R>(Some(user), id).await?.data;
            let form = ResourceForm::from_entity(&to_json(&entity)?, R::form_fields());
            Ok(build_form_page::<R, A>(api, user, Some(id), &form, Some(entity.label())).await)
        }
    }
}

async fn build_form_page<R, A>(
    api: &A,
    user: &AuthenticatedUser,
    id: Option<EntityId>,
    form: &ResourceForm,
    label: Option<String>,
) -> FormPageData
where
    R: Resource,
    A: ResourceApi,
{
    let mut fields = Vec::with_capacity(R::form_fields().len());
    for field in R::form_fields() {
        let current = form.values(field.name);
        let is_selected = |value: &str| current.iter().any(|v| v == value);

        let options = match field.kind {
            InputKind::Select { options } => static_options(options, is_selected),
            InputKind::RemoteSelect { endpoint } | InputKind::RemoteMultiSelect { endpoint } => {
                remote_options(api, Some(user), endpoint, is_selected).await
            }
            _ => Vec::new(),
        };

        fields.push(FormFieldView {
            name: field.name,
            label: field.label,
            kind: field.kind,
            required: field.required,
            value: form.value(field.name).unwrap_or_default().to_string(),
            checked: form.is_checked(field.name),
            options,
            error: None,
        });
    }

    let base_path = R::base_path();
    let (heading, action) = match id {
        Some(id) => (
            format!(
                "{}: {}",
                R::TITLE,
                label.unwrap_or_else(|| format!("#{id}"))
            ),
            format!("{base_path}/{id}/edit"),
        ),
        None => (
            format!("{}: new entry", R::TITLE),
            format!("{base_path}/new"),
        ),
    };

    FormPageData {
        title: R::TITLE,
        heading,
        action,
        cancel_url: base_path,
        fields,
        message: None,
    }
}

/// Validates `form` locally, then creates (`id` is `None`) or updates the
/// entity. Local and remote field errors both come back as
/// [`SaveOutcome::Rejected`] with the submitted values kept.
pub async fn save_resource<R, A>(
    api: &A,
    user: &AuthenticatedUser,
    id: Option<i64>,
    form: ResourceForm,
) -> ServiceResult<SaveOutcome>
where
    R: Resource,
    A: ResourceApi,
{
    let action = if id.is_some() { "update" } else { "create" };
    ensure_permission(user, &R::permission(action))?;
    let id = id.map(EntityId::new).transpose()?;

    let payload = match form.to_payload(R::form_fields()) {
        Ok(payload) => Value::Object(payload),
        Err(errors) => {
            let page = build_form_page::<R, A>(api, user, id, &form, None).await;
            return Ok(SaveOutcome::Rejected(
                page.with_errors("Please correct the highlighted fields.", &errors),
            ));
        }
    };

    let result = match id {
        Some(id) => api.update::<R>(user, id, &payload).await,
        None => api.create::<R>(user, &payload).await,
    };

    let (message, errors) = match result {
        Ok(success) => {
            return Ok(SaveOutcome::Saved {
                message: success
                    .message
                    .unwrap_or_else(|| format!("{} saved.", R::TITLE)),
            });
        }
        Err(err) => match ServiceError::from(err) {
            ServiceError::Validation { message, errors } => (message, errors),
            ServiceError::Api(err) => {
                log::error!("Failed to save {}: {err:?}", R::SLUG);
                (err.to_string(), FieldErrors::new())
            }
            other => return Err(other),
        },
    };

    let page = build_form_page::<R, A>(api, user, id, &form, None).await;
    Ok(SaveOutcome::Rejected(page.with_errors(message, &errors)))
}

/// Deletes one entity and returns the confirmation message.
pub async fn delete_resource<R, A>(api: &A, user: &AuthenticatedUser, id: i64) -> ServiceResult<String>
where
    R: Resource,
    A: ResourceApi,
{
    ensure_permission(user, &R::permission("delete"))?;
    let id = EntityId::new(id)?;

    let success = api.delete::<R>(user, id).await?;
    Ok(success
        .message
        .unwrap_or_else(|| format!("{} entry deleted.", R::TITLE)))
}
