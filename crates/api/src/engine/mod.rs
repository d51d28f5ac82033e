//! The generation engine: orchestrates prompt building, the model call,
//! parsing, pose matching, assembly, and persistence for every generation
//! endpoint. Pure sequencing logic lives in `yogaflow_core`; this module
//! wires it to the database and the model client.

mod generator;

pub use generator::{
    complete_poses, fill_poses, generate_cues, generate_sequence, CompletePosesRequest,
    FillPosesRequest, GenerateCuesRequest, SegmentInput, StructureInput,
};
