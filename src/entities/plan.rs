use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Billing plan offered to organizations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// "INDIVIDUAL", "TEAM", or "ENTERPRISE".
    #[serde(rename = "type")]
    pub plan_type: String,

    pub price: f64,

    pub currency: String,

    /// Billing interval, e.g. "month" or "year".
    pub interval: String,

    /// Opaque feature flags; never validated beyond being an object.
    pub features: Option<Json>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Plan tier accepted on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Individual,
    Team,
    Enterprise,
}

impl PlanType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Team => "TEAM",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}
