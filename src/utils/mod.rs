//! Cross-platform utilities and helpers
//!
//! - [`fs`] - Atomic writes, directory creation and executable permissions
//! - [`platform`] - Standard directories and terminal detection

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, make_executable, safe_write};
pub use platform::{get_cache_dir, is_windows, stderr_is_terminal};
