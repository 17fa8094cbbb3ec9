//! Shared utilities for the pdg crates.
mod errors;
mod id;
mod out_file;

pub use errors::{Error, PdgResult};
pub use id::Id;
pub use out_file::OutputFile;
