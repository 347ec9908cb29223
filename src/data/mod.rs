//! Loading of the two source tables from disk.

pub mod loader;

pub use loader::{load_dir, LoadError, LoadReport, LoadedData};
