//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the entity is client-mutable

pub mod phase;
pub mod pose;
pub mod sequence;
pub mod sequence_pose;
