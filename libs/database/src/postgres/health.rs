use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Round-trip a trivial query to prove the pool can reach Postgres.
///
/// Readiness probes call this, so it must stay cheap.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let probe = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());

    db.query_one_raw(probe)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("SELECT 1 against PostgreSQL: {}", e)))?;

    debug!("PostgreSQL answered the probe");
    Ok(())
}
