//! Repository implementations.
//!
//! The local repository is always available (tests and the factory fall
//! back to it); Postgres is feature-gated.

pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::PostgresRepository;
