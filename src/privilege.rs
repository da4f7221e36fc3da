//! Elevated-privilege check performed before the menu starts.

use crate::error::{HardenError, Result};

/// True when running with effective uid 0.
pub fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

pub fn require_elevated(elevated: bool) -> Result<()> {
    if elevated {
        Ok(())
    } else {
        Err(HardenError::InsufficientPrivilege)
    }
}
