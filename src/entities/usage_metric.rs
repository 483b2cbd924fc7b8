use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Point-in-time usage measurement reported for an organization.
///
/// References the organization by id only; high-volume, so listings are
/// bounded to the most recent entries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usage_metrics")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub organization_id: String,

    pub metric_type: String,

    pub value: f64,

    /// Reporting period label, e.g. "2026-07".
    pub period: String,

    pub metadata: Option<Json>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
