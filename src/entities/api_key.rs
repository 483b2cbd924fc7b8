use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// API key issued to an organization.
///
/// The raw secret exists only in the creation response; at rest only the
/// Argon2 hash and the truncated display prefix remain.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_keys")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub organization_id: String,

    pub name: String,

    #[serde(skip_serializing)]
    pub key_hash: String,

    /// Truncated, non-secret derivative shown in listings, e.g. "llk_3f9a02c1...".
    pub key_prefix: String,

    pub last_used_at: Option<DateTimeUtc>,
    pub expires_at: Option<DateTimeUtc>,

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
