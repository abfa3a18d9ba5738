//! Redis container fixture.

use redis::Client;
use redis::aio::ConnectionManager;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// A throwaway Redis instance for one test.
///
/// Holds the container alive for as long as the fixture lives; dropping the
/// fixture stops and removes the container.
///
/// ```no_run
/// use test_utils::TestRedis;
/// use redis::AsyncCommands;
///
/// # async fn demo() {
/// let redis = TestRedis::new().await;
/// let mut conn = redis.connection();
///
/// conn.set::<_, _, ()>("job:1", "queued").await.unwrap();
/// let state: String = conn.get("job:1").await.unwrap();
/// assert_eq!(state, "queued");
/// # }
/// ```
pub struct TestRedis {
    #[allow(dead_code)]
    container: ContainerAsync<Redis>,
    connection: ConnectionManager,
    pub connection_string: String,
}

impl TestRedis {
    /// Start a Redis 8 Alpine container and connect to it.
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .await
            .expect("Redis container did not start");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Redis container exposed no port");
        let connection_string = format!("redis://127.0.0.1:{}", port);

        let client = Client::open(connection_string.clone()).expect("Redis URL was rejected");
        let connection = ConnectionManager::new(client)
            .await
            .expect("could not reach the Redis container");

        tracing::info!(port, "Test Redis ready (Redis 8-alpine)");

        Self {
            container,
            connection,
            connection_string,
        }
    }

    /// A clone of the shared connection, ready to hand to producers and
    /// workers under test.
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Connection string for code that wants to build its own client.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestRedis {
    fn drop(&mut self) {
        tracing::debug!("Discarding test Redis container");
    }
}
