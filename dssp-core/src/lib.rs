//! Shared primitives for the dssp workspace.
//!
//! - **Error types**: [`DsspError`] and [`Result`] for structured error handling
//! - **Traits**: [`Summarizable`] and [`ContentAddressable`]
//! - **Hashing**: SHA-256 content addressing for reproducibility checks

pub mod error;
pub mod hash;
pub mod traits;

pub use error::{DsspError, Result};
pub use traits::*;
