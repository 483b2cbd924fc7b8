//! The generic entity console.

use serde_json::Value;
use std::sync::Arc;

use super::api::{ConsoleError, ResourceApi};
use super::projection::{project, Projected};
use super::render::default_cell;

/// One table column: a dotted field path, a header label, and an optional
/// custom renderer overriding [`default_cell`].
#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub render: Option<fn(&Projected<'_>) -> String>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            render: None,
        }
    }

    #[must_use]
    pub fn with_render(mut self, render: fn(&Projected<'_>) -> String) -> Self {
        self.render = Some(render);
        self
    }
}

/// Construction-time description of one entity console.
#[derive(Clone)]
pub struct ConsoleConfig {
    pub title: String,
    /// Resource path segment used to build API URLs, e.g. "revenue-events".
    pub resource: String,
    pub columns: Vec<Column>,
    /// Field holding the record identifier.
    pub id_field: String,
    /// Whether a create form is available. Without one the console is
    /// read/delete-only.
    pub can_create: bool,
    /// Whether an edit form is available.
    pub can_edit: bool,
}

impl ConsoleConfig {
    pub fn new(title: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            resource: resource.into(),
            columns: Vec::new(),
            id_field: "id".to_string(),
            can_create: false,
            can_edit: false,
        }
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn with_forms(mut self) -> Self {
        self.can_create = true;
        self.can_edit = true;
        self
    }
}

/// Fetch lifecycle of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial fetch has not resolved yet.
    Loading,
    /// Collection loaded; console is interactive.
    Ready,
}

/// Modal state. Explicit tagged cases instead of an "either a sentinel or a
/// record" union so there is never an ambiguous runtime type test.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Closed,
    Creating,
    Editing(Value),
}

/// List/create/edit/delete console over one admin resource.
///
/// Errors never terminate the console: a failed operation records an inline
/// message, the phase stays `Ready`, and the user may try again. Nothing is
/// retried automatically.
pub struct EntityConsole {
    config: ConsoleConfig,
    api: Arc<dyn ResourceApi>,
    phase: Phase,
    modal: Modal,
    items: Vec<Value>,
    error: Option<String>,
}

impl EntityConsole {
    pub fn new(config: ConsoleConfig, api: Arc<dyn ResourceApi>) -> Self {
        Self {
            config,
            api,
            phase: Phase::Loading,
            modal: Modal::Closed,
            items: Vec::new(),
            error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record identifier per the configured id field.
    pub fn record_id(&self, record: &Value) -> Option<String> {
        record
            .get(&self.config.id_field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Initial (and post-write) fetch of the full collection.
    pub async fn load(&mut self) {
        match self.api.list(&self.config.resource).await {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(resource = %self.config.resource, error = %err, "list fetch failed");
                self.error = Some("Failed to load".to_string());
            }
        }
        self.phase = Phase::Ready;
    }

    /// Column headers in declaration order.
    pub fn headers(&self) -> Vec<&str> {
        self.config
            .columns
            .iter()
            .map(|c| c.label.as_str())
            .collect()
    }

    /// Project every record through the column list.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.items
            .iter()
            .map(|record| {
                self.config
                    .columns
                    .iter()
                    .map(|column| {
                        let projected = project(record, &column.key);
                        match column.render {
                            Some(render) => render(&projected),
                            None => default_cell(&projected),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Open the create modal. No-op when the console has no create form.
    pub fn open_create(&mut self) {
        if self.config.can_create {
            self.modal = Modal::Creating;
        }
    }

    /// Open the edit modal pre-populated with the record's current values.
    pub fn open_edit(&mut self, id: &str) {
        if !self.config.can_edit {
            return;
        }
        if let Some(record) = self
            .items
            .iter()
            .find(|record| self.record_id(record).as_deref() == Some(id))
        {
            self.modal = Modal::Editing(record.clone());
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Submit the create form. On success the modal closes and the whole
    /// collection is re-fetched; no optimistic local insert. Returns the
    /// created record for callers that need the response body.
    pub async fn submit_create(&mut self, body: Value) -> Option<Value> {
        match self.api.create(&self.config.resource, &body).await {
            Ok(created) => {
                self.modal = Modal::Closed;
                self.load().await;
                Some(created)
            }
            Err(err) => {
                self.record_failure("Failed to create", &err);
                None
            }
        }
    }

    /// Submit the edit form. On success the modal closes and the collection
    /// is re-fetched.
    pub async fn submit_edit(&mut self, id: &str, body: Value) -> Option<Value> {
        match self.api.update(&self.config.resource, id, &body).await {
            Ok(updated) => {
                self.modal = Modal::Closed;
                self.load().await;
                Some(updated)
            }
            Err(err) => {
                self.record_failure("Failed to update", &err);
                None
            }
        }
    }

    /// Delete a record after interactive confirmation.
    ///
    /// On success the row is removed from local state immediately, without a
    /// re-fetch. This asymmetry with create/edit is intentional.
    pub async fn request_delete(&mut self, id: &str, confirm: impl FnOnce() -> bool) {
        if !confirm() {
            return;
        }

        match self.api.delete(&self.config.resource, id).await {
            Ok(()) => {
                let id_field = &self.config.id_field;
                self.items
                    .retain(|record| record.get(id_field).and_then(Value::as_str) != Some(id));
                self.error = None;
            }
            Err(err) => {
                self.record_failure("Failed to delete", &err);
            }
        }
    }

    fn record_failure(&mut self, message: &str, err: &ConsoleError) {
        tracing::warn!(resource = %self.config.resource, error = %err, "console operation failed");
        self.error = Some(message.to_string());
    }
}
