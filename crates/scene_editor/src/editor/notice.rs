//! Messages for the GUI to show as popups

use std::fmt;

/// Refusal the user should be told about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Tried to delete the only scene
    LastScene,
}

impl Notice {
    /// Popup text
    pub const fn message(self) -> &'static str {
        match self {
            Self::LastScene => "Must be at least one scene",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
