//! SeaORM entities for the admin resource surface.
//!
//! All tables use string UUID primary keys generated by the handlers, and
//! serialize with camelCase field names to match the wire format. Secret
//! columns (`users.password_hash`, `api_keys.key_hash`) are excluded from
//! serialization entirely so no response path can leak them.

pub mod api_key;
pub mod customer;
pub mod integration;
pub mod invoice;
pub mod organization;
pub mod plan;
pub mod revenue_event;
pub mod subscription;
pub mod team_member;
pub mod usage_metric;
pub mod user;
