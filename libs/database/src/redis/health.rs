use redis::aio::ConnectionManager;
use tracing::debug;

use crate::common::DatabaseError;

/// Round-trip a `PING` to prove the connection can reach Redis.
///
/// Anything but `PONG` counts as unhealthy, including a server that
/// answers with an error while loading its dataset.
pub async fn check_health(conn: &mut ConnectionManager) -> Result<(), DatabaseError> {
    let answer: String = redis::cmd("PING")
        .query_async(conn)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PING against Redis: {}", e)))?;

    if answer != "PONG" {
        return Err(DatabaseError::HealthCheckFailed(format!(
            "Redis PING answered '{}', wanted PONG",
            answer
        )));
    }

    debug!("Redis answered PONG");
    Ok(())
}
