//! Shared runtime utilities: periodic background tasks and filesystem
//! helpers.

pub mod fs;
pub mod periodic;

pub use fs::{dir_entry_names, ensure_dir};
pub use periodic::PeriodicRunner;
