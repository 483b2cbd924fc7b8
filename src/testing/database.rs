//! Database testing helpers.
//!
//! Each [`TestDb`] is a uniquely named shared-cache SQLite in-memory
//! database, so parallel tests never see each other's rows while the
//! connection pool still shares one store.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::migration::Migrator;

static TEST_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Manages an isolated test database connection.
pub struct TestDb {
    pub connection: DatabaseConnection,
}

impl TestDb {
    /// Create a new in-memory database with the full schema applied.
    pub async fn new() -> Result<Self, DbErr> {
        let instance = Self::new_empty().await?;
        Migrator::up(&instance.connection, None).await?;
        Ok(instance)
    }

    /// Create a new in-memory database without running migrations.
    pub async fn new_empty() -> Result<Self, DbErr> {
        let counter = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url = format!(
            "sqlite:file:ledgerline_test_{}_{}?mode=memory&cache=shared",
            std::process::id(),
            counter
        );

        let connection = Database::connect(url).await?;

        // Referential actions (cascade / restrict / set null) need the
        // foreign-key pragma on in SQLite.
        connection
            .execute_unprepared("PRAGMA foreign_keys=ON;")
            .await?;
        connection
            .execute_unprepared("PRAGMA busy_timeout=5000;")
            .await?;

        Ok(Self { connection })
    }

    /// Get a clone of the database connection.
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Seed the database with raw SQL statements.
    pub async fn seed(&self, statements: &[&str]) -> Result<(), DbErr> {
        for statement in statements {
            self.connection.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    use crate::entities::plan;

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let first = TestDb::new().await.unwrap();
        let second = TestDb::new().await.unwrap();

        first
            .seed(&[
                "INSERT INTO plans (id, name, plan_type, price, currency, interval, created_at, updated_at) \
                 VALUES ('pln_1', 'Starter', 'INDIVIDUAL', 9.0, 'USD', 'month', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            ])
            .await
            .unwrap();

        let in_first = plan::Entity::find().all(&first.connection).await.unwrap();
        let in_second = plan::Entity::find().all(&second.connection).await.unwrap();

        assert_eq!(in_first.len(), 1);
        assert!(in_second.is_empty());
    }
}
