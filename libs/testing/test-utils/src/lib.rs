//! Test infrastructure shared by the domain crates.
//!
//! Container-backed fixtures are feature gated so crates only pull in what
//! they exercise:
//!
//! - `postgres` (default): [`TestDatabase`], a PostgreSQL container with
//!   migrations already applied
//! - `redis`: [`TestRedis`], a Redis container
//! - `all`: both
//!
//! [`TestDataBuilder`] and the [`assertions`] helpers are always available.
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn test_stores_a_task() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("stores_a_task");
//!
//!     let owner = builder.user_id();
//!     let title = builder.name("task", "main");
//! }
//! ```
//!
//! Redis fixtures come in through dev-dependency features:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis"] }
//! ```

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Seeded generator for test fixtures.
///
/// Two builders with the same seed hand out the same values, so a test can
/// regenerate a value instead of threading it through.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Derive the seed from the test's name.
    ///
    /// Tests that share a name collide on fixture values, which is exactly
    /// the reproducibility this crate is after.
    pub fn from_test_name(name: &str) -> Self {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A user id that stays below the range real data occupies.
    pub fn user_id(&self) -> i64 {
        (self.seed % 1_000_000) as i64
    }

    /// A resource name of the form `test-{prefix}-{seed}-{suffix}`.
    ///
    /// `prefix` says what kind of thing it names, `suffix` distinguishes
    /// multiple fixtures within one test.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{prefix}-{}-{suffix}", self.seed)
    }
}

/// Assertion helpers with context-carrying panic messages.
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(actual, expected, "{context}: ids differ");
    }

    /// Unwrap an Option, naming what was expected when it is None.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{context}: value was None"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = TestDataBuilder::new(42);
        let b = TestDataBuilder::new(42);

        assert_eq!(a.user_id(), b.user_id());
        assert_eq!(a.name("task", "main"), b.name("task", "main"));
    }

    #[test]
    fn test_name_determines_seed() {
        let a = TestDataBuilder::from_test_name("my_test");
        let b = TestDataBuilder::from_test_name("my_test");
        assert_eq!(a.user_id(), b.user_id());
    }

    #[test]
    fn test_distinct_names_give_distinct_values() {
        let a = TestDataBuilder::from_test_name("first_test");
        let b = TestDataBuilder::from_test_name("second_test");
        assert_ne!(a.user_id(), b.user_id());
    }

    #[test]
    fn test_user_id_fits_fixture_range() {
        let builder = TestDataBuilder::from_test_name("range_check");
        let id = builder.user_id();
        assert!((0..1_000_000).contains(&id));
    }
}
