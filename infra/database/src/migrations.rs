use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const BOOTSTRAP: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS migration_key ON migration FIELDS slice, version UNIQUE;
";

/// A versioned schema script owned by a feature slice.
///
/// Scripts are applied once, in registration order, inside a transaction.
/// The checksum of an applied script is recorded and verified on every start,
/// so an applied version must never be edited; add a new version instead.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Stable hex digest of the script body.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script.trim()))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn to_applied(self) -> AppliedMigration {
        AppliedMigration {
            slice: self.slice.to_owned(),
            version: self.version.to_owned(),
            checksum: self.checksum(),
        }
    }
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug, Clone, SurrealValue)]
pub struct AppliedMigration {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query(BOOTSTRAP)
            .await
            .context("Bootstrapping migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied_migrations().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum)?;
                report.skipped.push(migration.to_applied());
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(migration.to_applied());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{
                slice: $slice,
                version: $version,
                checksum: $checksum,
                applied_at: time::now()
            }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice.to_owned()))
            .bind(("version", migration.version.to_owned()))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("SQL execution failed at {}", migration.key()))?
            .check()
            .map_err(|e| DatabaseError::Migration {
                message: surrealdb::Error::from(e).to_string().into(),
                context: Some(format!("Applying {}", migration.key()).into()),
            })?;

        Ok(())
    }

    async fn applied_migrations(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let expected = migration.checksum();
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {existing}, current {expected})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_ignores_surrounding_whitespace() {
        let a = Migration::new("registrar", "0001", "DEFINE TABLE student;");
        let b = Migration::new("registrar", "0001", "\n  DEFINE TABLE student;\n");
        assert_eq!(a.checksum(), b.checksum());
        assert_eq!(a.checksum().len(), 16);
    }

    #[test]
    fn edited_script_is_rejected() {
        let original = Migration::new("registrar", "0001", "DEFINE TABLE student;");
        let edited = Migration::new("registrar", "0001", "DEFINE TABLE pupil;");

        assert!(ensure_checksum_match(&original, &original.checksum()).is_ok());
        let err = ensure_checksum_match(&edited, &original.checksum()).expect_err("mismatch");
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }
}
