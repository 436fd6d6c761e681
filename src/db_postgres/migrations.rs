use sqlx::PgPool;
use tracing::info;

use crate::app_error::AppError;

/// Arbitrary key for pg_advisory_xact_lock, so concurrent callers don't race on CREATE TABLE
const MIGRATION_LOCK: i64 = 7_261_001;

/// Split the embedded schema into individual statements
fn statements(commands: &str) -> impl Iterator<Item = &str> {
    commands
        .split(';')
        .map(str::trim)
        .filter(|command| !command.is_empty())
}

/// Create every table, if not already present, in a single transaction
pub async fn migrations(db: &PgPool) -> Result<(), AppError> {
    let commands = include_str!("./migrations.sql");
    let mut transaction = db.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK)
        .execute(&mut *transaction)
        .await?;

    let mut applied = 0;
    for command in statements(commands) {
        sqlx::query(command).execute(&mut *transaction).await?;
        applied += 1;
    }
    transaction.commit().await?;
    info!(applied, "migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_statements_split() {
        let result = statements(include_str!("./migrations.sql")).collect::<Vec<_>>();

        assert_eq!(result.len(), 9);
        assert!(result.iter().all(|i| !i.ends_with(';')));
        assert!(result[0].starts_with("CREATE TABLE IF NOT EXISTS airport"));
        assert!(result.last().unwrap_or(&"").starts_with("CREATE INDEX"));
    }

    #[test]
    fn migrations_statements_skip_blank() {
        let result = statements(" ;\n; SELECT 1 ;\n").collect::<Vec<_>>();
        assert_eq!(result, vec!["SELECT 1"]);
    }
}
