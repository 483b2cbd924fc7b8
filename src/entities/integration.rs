use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Connection to an external billing source.
///
/// `config` holds provider credentials and is treated as an opaque object.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "integrations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub organization_id: String,

    /// "STRIPE", "BILLING", or "CUSTOM".
    #[serde(rename = "type")]
    pub integration_type: String,

    pub name: String,

    pub config: Option<Json>,

    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Integration kind accepted on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    Stripe,
    Billing,
    Custom,
}

impl IntegrationType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "STRIPE",
            Self::Billing => "BILLING",
            Self::Custom => "CUSTOM",
        }
    }
}
