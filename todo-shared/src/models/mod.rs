/// Database models
///
/// - `user`: User accounts
/// - `todo`: Todo items owned by a single user
///
/// Each model carries its PostgreSQL row operations as associated functions
/// taking a `&PgPool`; `store::PgStore` exposes them through the persistence
/// traits.

pub mod todo;
pub mod user;
