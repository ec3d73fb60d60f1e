// src/mode.rs
//! Operating-mode latch.
//!
//! The same crate is loaded either as the directly-managed extension
//! (Standalone: it owns message authoring via host-native content) or vendored
//! inside another extension (Embedded: it only consumes a remote feed). The
//! first caller to detect "I am directly managed" wins; a vendoring host that
//! initializes later must not override that decision.

use once_cell::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Standalone,
    Embedded,
}

/// First-write-wins mode cell. Reading before any write pins the default,
/// so a late `set` cannot flip a mode some caller already observed.
pub struct ModeSelector {
    cell: OnceCell<Mode>,
}

impl ModeSelector {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Only the first call before any read takes effect; later calls are no-ops.
    pub fn set(&self, mode: Mode) {
        let _ = self.cell.set(mode);
    }

    /// Defaults to `Embedded` when never set.
    pub fn current(&self) -> Mode {
        *self.cell.get_or_init(|| Mode::Embedded)
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new()
    }
}

static MODE: ModeSelector = ModeSelector::new();

/// Set the process-wide operating mode. First write wins.
pub fn set_mode(mode: Mode) {
    MODE.set(mode);
}

/// Read the process-wide operating mode (pins `Embedded` if never set).
pub fn current_mode() -> Mode {
    MODE.current()
}
