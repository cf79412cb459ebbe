//! `taskhub-infra` — implementations of the auth and storage seams.
//!
//! In-memory stores for dev/tests, the HS256 token codec, and (behind the
//! `postgres` feature) sqlx-backed persistent stores.

pub mod memory;
pub mod token;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{InMemoryMembershipStore, InMemoryProjectStore, InMemoryUserStore};
pub use token::JwtCodec;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresMembershipStore, PostgresUserStore};
