//! File system utilities for cross-platform file operations
//!
//! - **Atomic operations**: files are written via a unique temp sibling and renamed
//! - **Directories**: parent directories are created on demand
//! - **Permissions**: owner-executable bits for installed binaries

pub mod atomic;
pub mod dirs;
pub mod permissions;

pub use atomic::{atomic_write, safe_write, unique_temp_path};
pub use dirs::{ensure_dir, ensure_parent_dir};
pub use permissions::{is_executable, make_executable};
