//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row writes
//! (sequence assembly, pose editing) run inside a single transaction so a
//! failure never leaves a half-written sequence behind.

pub mod phase_repo;
pub mod pose_repo;
pub mod sequence_pose_repo;
pub mod sequence_repo;

pub use phase_repo::PhaseRepo;
pub use pose_repo::PoseRepo;
pub use sequence_pose_repo::SequencePoseRepo;
pub use sequence_repo::SequenceRepo;
