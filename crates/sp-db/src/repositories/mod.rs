//! Owner-scoped repository functions, one module per entity.
//!
//! Every function takes an executor so callers can run against the pool or
//! inside a transaction. Reads and writes on user-facing tables are scoped by
//! the owner id; child rows scope through a join to the owning parent, so a
//! row invisible to the caller behaves exactly like a missing row.

pub mod analytics;
pub mod goal;
pub mod material;
pub mod plan;
pub mod profile;
pub mod session;
