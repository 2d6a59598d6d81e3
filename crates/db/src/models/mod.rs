//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, conversions into the core domain type, and a create DTO where the
//! table is written directly.

pub mod application;
pub mod job;
