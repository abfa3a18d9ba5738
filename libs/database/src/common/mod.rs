//! Pieces shared by the PostgreSQL and Redis halves of this crate.

pub mod error;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::RetryConfig;
