//! Per-entity console instantiations.
//!
//! Most entities are plain [`EntityConsole`] instances with a column list.
//! The rest are bespoke variants of the same shape: they keep the identical
//! list/create/edit/delete lifecycle (re-fetch after create/edit, optimistic
//! removal after delete) but need extra reference data for cross-entity
//! selects, or one-time secret handling.

use serde_json::{json, Value};
use std::sync::Arc;

use super::api::{ConsoleError, HttpResourceClient, ResourceApi};
use super::console::{Column, ConsoleConfig, EntityConsole};
use super::render::yes_no;

/// Option entry for a cross-entity select, e.g. choosing an organization
/// when creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

/// Build select options from a fetched collection.
fn select_options(items: &[Value], label_field: &str) -> Vec<SelectOption> {
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?.to_string();
            let label = item
                .get(label_field)
                .and_then(Value::as_str)
                .unwrap_or(&id)
                .to_string();
            Some(SelectOption { id, label })
        })
        .collect()
}

/// Organizations: generic console, full forms.
pub fn organizations(api: Arc<dyn ResourceApi>) -> EntityConsole {
    let config = ConsoleConfig::new("Organizations", "organizations")
        .column(Column::new("name", "Name"))
        .column(Column::new("slug", "Slug"))
        .column(Column::new("owner", "Owner"))
        .column(Column::new("createdAt", "Created"))
        .with_forms();
    EntityConsole::new(config, api)
}

/// Customers: generic console, full forms.
pub fn customers(api: Arc<dyn ResourceApi>) -> EntityConsole {
    let config = ConsoleConfig::new("Customers", "customers")
        .column(Column::new("email", "Email"))
        .column(Column::new("name", "Name"))
        .column(Column::new("organization.name", "Organization"))
        .column(Column::new("externalId", "External ID"))
        .column(Column::new("createdAt", "Created"))
        .with_forms();
    EntityConsole::new(config, api)
}

/// Integrations: generic console with a boolean renderer for the active flag.
pub fn integrations(api: Arc<dyn ResourceApi>) -> EntityConsole {
    let config = ConsoleConfig::new("Integrations", "integrations")
        .column(Column::new("name", "Name"))
        .column(Column::new("type", "Type"))
        .column(Column::new("organization.name", "Organization"))
        .column(Column::new("isActive", "Active").with_render(yes_no))
        .column(Column::new("createdAt", "Created"))
        .with_forms();
    EntityConsole::new(config, api)
}

/// Users: bespoke because create/update carry a password field that must
/// never be echoed back and is only sent when non-empty.
pub struct UsersConsole {
    console: EntityConsole,
}

impl UsersConsole {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        let config = ConsoleConfig::new("Users", "users")
            .column(Column::new("email", "Email"))
            .column(Column::new("name", "Name"))
            .column(Column::new("role", "Role"))
            .column(Column::new("createdAt", "Created"))
            .with_forms();
        Self {
            console: EntityConsole::new(config, api),
        }
    }

    pub fn console(&self) -> &EntityConsole {
        &self.console
    }

    pub async fn load(&mut self) {
        self.console.load().await;
    }

    pub async fn create_user(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
        role: &str,
    ) -> Option<Value> {
        let body = json!({
            "email": email,
            "password": password,
            "name": name,
            "role": role,
        });
        self.console.submit_create(body).await
    }

    /// Update a user; an empty password string means "leave unchanged" and
    /// is omitted from the payload entirely.
    pub async fn update_user(
        &mut self,
        id: &str,
        email: Option<&str>,
        password: &str,
        name: Option<&str>,
        role: Option<&str>,
    ) -> Option<Value> {
        let mut body = serde_json::Map::new();
        if let Some(email) = email {
            body.insert("email".into(), json!(email));
        }
        if !password.is_empty() {
            body.insert("password".into(), json!(password));
        }
        if let Some(name) = name {
            body.insert("name".into(), json!(name));
        }
        if let Some(role) = role {
            body.insert("role".into(), json!(role));
        }
        self.console.submit_edit(id, Value::Object(body)).await
    }

    pub async fn delete(&mut self, id: &str, confirm: impl FnOnce() -> bool) {
        self.console.request_delete(id, confirm).await;
    }
}

/// Plans: bespoke typed create form (tier select, price input).
pub struct PlansConsole {
    console: EntityConsole,
}

impl PlansConsole {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        let config = ConsoleConfig::new("Plans", "plans")
            .column(Column::new("name", "Name"))
            .column(Column::new("type", "Type"))
            .column(Column::new("price", "Price"))
            .column(Column::new("interval", "Interval"))
            .column(Column::new("createdAt", "Created"))
            .with_forms();
        Self {
            console: EntityConsole::new(config, api),
        }
    }

    pub fn console(&self) -> &EntityConsole {
        &self.console
    }

    pub async fn load(&mut self) {
        self.console.load().await;
    }

    pub async fn create_plan(
        &mut self,
        name: &str,
        plan_type: &str,
        price: f64,
        currency: &str,
        interval: &str,
    ) -> Option<Value> {
        let body = json!({
            "name": name,
            "type": plan_type,
            "price": price,
            "currency": currency,
            "interval": interval,
        });
        self.console.submit_create(body).await
    }

    pub async fn update_plan(&mut self, id: &str, body: Value) -> Option<Value> {
        self.console.submit_edit(id, body).await
    }

    pub async fn delete(&mut self, id: &str, confirm: impl FnOnce() -> bool) {
        self.console.request_delete(id, confirm).await;
    }
}

/// Consoles whose forms select related records fetch the reference lists
/// concurrently with the main collection; the fetches are independent and
/// unordered.
macro_rules! reference_console {
    (
        $(#[$doc:meta])*
        $name:ident, $title:literal, $resource:literal,
        columns: [$(($key:literal, $label:literal)),+ $(,)?],
        references: [$(($field:ident, $ref_resource:literal, $label_field:literal)),+ $(,)?]
    ) => {
        $(#[$doc])*
        pub struct $name {
            console: EntityConsole,
            api: Arc<dyn ResourceApi>,
            $($field: Vec<SelectOption>,)+
        }

        impl $name {
            pub fn new(api: Arc<dyn ResourceApi>) -> Self {
                let config = ConsoleConfig::new($title, $resource)
                    $(.column(Column::new($key, $label)))+
                    .with_forms();
                Self {
                    console: EntityConsole::new(config, Arc::clone(&api)),
                    api,
                    $($field: Vec::new(),)+
                }
            }

            pub fn console(&self) -> &EntityConsole {
                &self.console
            }

            $(
                pub fn $field(&self) -> &[SelectOption] {
                    &self.$field
                }
            )+

            /// Fetch the collection and every reference list concurrently.
            pub async fn load(&mut self) {
                let ($($field,)+) = tokio::join!(
                    $(self.api.list($ref_resource),)+
                );
                $(
                    self.$field = match $field {
                        Ok(items) => select_options(&items, $label_field),
                        Err(_) => Vec::new(),
                    };
                )+
                self.console.load().await;
            }

            pub async fn create(&mut self, body: Value) -> Option<Value> {
                self.console.submit_create(body).await
            }

            pub async fn update(&mut self, id: &str, body: Value) -> Option<Value> {
                self.console.submit_edit(id, body).await
            }

            pub async fn delete(&mut self, id: &str, confirm: impl FnOnce() -> bool) {
                self.console.request_delete(id, confirm).await;
            }
        }
    };
}

reference_console!(
    /// Subscriptions: bespoke because creating one selects an organization
    /// and a plan.
    SubscriptionsConsole, "Subscriptions", "subscriptions",
    columns: [
        ("organization.name", "Organization"),
        ("plan.name", "Plan"),
        ("status", "Status"),
        ("currentPeriodStart", "Period Start"),
        ("currentPeriodEnd", "Period End"),
    ],
    references: [
        (organization_options, "organizations", "name"),
        (plan_options, "plans", "name"),
    ]
);

reference_console!(
    /// Invoices: bespoke for the organization/customer selects.
    InvoicesConsole, "Invoices", "invoices",
    columns: [
        ("number", "Number"),
        ("organization.name", "Organization"),
        ("customer.email", "Customer"),
        ("amount", "Amount"),
        ("status", "Status"),
        ("dueDate", "Due"),
    ],
    references: [
        (organization_options, "organizations", "name"),
        (customer_options, "customers", "email"),
    ]
);

reference_console!(
    /// Revenue events: bespoke for the organization/customer selects.
    RevenueEventsConsole, "Revenue Events", "revenue-events",
    columns: [
        ("type", "Type"),
        ("organization.name", "Organization"),
        ("customer.email", "Customer"),
        ("amount", "Amount"),
        ("currency", "Currency"),
        ("effectiveDate", "Effective"),
    ],
    references: [
        (organization_options, "organizations", "name"),
        (customer_options, "customers", "email"),
    ]
);

reference_console!(
    /// Team members: bespoke for the user/organization selects.
    TeamMembersConsole, "Team Members", "team-members",
    columns: [
        ("user.email", "User"),
        ("organization.name", "Organization"),
        ("role", "Role"),
        ("createdAt", "Added"),
    ],
    references: [
        (user_options, "users", "email"),
        (organization_options, "organizations", "name"),
    ]
);

reference_console!(
    /// Usage metrics: bespoke for the organization select.
    UsageMetricsConsole, "Usage Metrics", "usage-metrics",
    columns: [
        ("metricType", "Metric"),
        ("value", "Value"),
        ("period", "Period"),
        ("createdAt", "Recorded"),
    ],
    references: [
        (organization_options, "organizations", "name"),
    ]
);

/// API keys: bespoke for the organization select and the one-time raw
/// secret reveal. The raw key is captured from the creation response and
/// exposed until dismissed; it is never retrievable again afterwards.
pub struct ApiKeysConsole {
    console: EntityConsole,
    api: Arc<dyn ResourceApi>,
    organization_options: Vec<SelectOption>,
    pending_secret: Option<String>,
}

impl ApiKeysConsole {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        let config = ConsoleConfig::new("API Keys", "api-keys")
            .column(Column::new("name", "Name"))
            .column(Column::new("keyPrefix", "Key Prefix"))
            .column(Column::new("organization.name", "Organization"))
            .column(Column::new("expiresAt", "Expires"))
            .with_forms();
        Self {
            console: EntityConsole::new(config, Arc::clone(&api)),
            api,
            organization_options: Vec::new(),
            pending_secret: None,
        }
    }

    pub fn console(&self) -> &EntityConsole {
        &self.console
    }

    pub fn organization_options(&self) -> &[SelectOption] {
        &self.organization_options
    }

    /// The raw key from the most recent creation, shown exactly once.
    pub fn pending_secret(&self) -> Option<&str> {
        self.pending_secret.as_deref()
    }

    pub fn dismiss_secret(&mut self) {
        self.pending_secret = None;
    }

    pub async fn load(&mut self) {
        let organizations = self.api.list("organizations").await;
        self.organization_options = match organizations {
            Ok(items) => select_options(&items, "name"),
            Err(_) => Vec::new(),
        };
        self.console.load().await;
    }

    pub async fn create_key(&mut self, organization_id: &str, name: &str) -> Option<Value> {
        let body = json!({
            "organizationId": organization_id,
            "name": name,
        });
        let created = self.console.submit_create(body).await?;
        self.pending_secret = created
            .get("rawKey")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(created)
    }

    pub async fn rename_key(&mut self, id: &str, name: &str) -> Option<Value> {
        self.console.submit_edit(id, json!({ "name": name })).await
    }

    pub async fn delete(&mut self, id: &str, confirm: impl FnOnce() -> bool) {
        self.console.request_delete(id, confirm).await;
    }
}

/// Entry-count dashboard backed by `/api/admin/stats`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardCounts {
    pub users: u64,
    pub organizations: u64,
    pub customers: u64,
    pub invoices: u64,
}

pub struct Dashboard {
    client: HttpResourceClient,
    counts: DashboardCounts,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(client: HttpResourceClient) -> Self {
        Self {
            client,
            counts: DashboardCounts::default(),
            error: None,
        }
    }

    pub fn counts(&self) -> DashboardCounts {
        self.counts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) {
        match self.client.stats().await {
            Ok(stats) => {
                let count = |field: &str| stats.get(field).and_then(Value::as_u64).unwrap_or(0);
                self.counts = DashboardCounts {
                    users: count("users"),
                    organizations: count("organizations"),
                    customers: count("customers"),
                    invoices: count("invoices"),
                };
                self.error = None;
            }
            Err(err) => {
                self.record_failure(&err);
            }
        }
    }

    fn record_failure(&mut self, err: &ConsoleError) {
        tracing::warn!(error = %err, "stats fetch failed");
        self.error = Some("Failed to load".to_string());
    }
}
