pub mod check;
pub mod list;
pub mod validate;

use anyhow::{anyhow, Result};
use std::sync::RwLockReadGuard;
use tabcheck_core::ValidatorRegistry;

/// Read access to the process-wide registry set up in `main`.
fn registry() -> Result<RwLockReadGuard<'static, ValidatorRegistry>> {
    tabcheck_validator::global()?
        .read()
        .map_err(|_| anyhow!("validator registry lock is poisoned"))
}
