//! Path constants for the on-disk state store.

use std::path::PathBuf;

/// The name of the state directory under ~/.config/
pub const STATE_DIR_NAME: &str = "quaver";

/// Get the default state directory path (~/.config/quaver/)
#[must_use]
pub fn state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(STATE_DIR_NAME)
}
