//! SeaORM entities - one table per document collection.

pub mod post;
pub mod profile;
pub mod user;
