pub mod generation;
pub mod poses;
pub mod sequences;
