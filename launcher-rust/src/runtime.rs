use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{error::BootstrapError, paths::Layout, platform::Os};

/// Picks the runtime to launch with. The newer runtime always wins when it
/// is present, regardless of what else is on disk.
pub fn select(layout: &Layout) -> Result<PathBuf, BootstrapError> {
    select_with(&layout.older_runtime, &layout.newer_runtime, |p| p.exists())
}

pub fn select_with(
    older: &Path,
    newer: &Path,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, BootstrapError> {
    if exists(newer) {
        return Ok(newer.to_path_buf());
    }
    if exists(older) {
        return Ok(older.to_path_buf());
    }
    Err(BootstrapError::RuntimeNotFound {
        older: older.to_path_buf(),
        newer: newer.to_path_buf(),
    })
}

/// Restores the executable bit on the chosen runtime. Failing here is not
/// fatal: the launch itself shows whether the permissions were good enough.
pub fn prepare(os: Os, runtime: &Path) {
    if !os.needs_exec_bit() {
        return;
    }
    if let Err(err) = make_executable(runtime) {
        println!("Warning: Failed to set runtime executable permissions");
        log::warn!(
            "failed to set executable permissions on {}: {err}",
            runtime.display()
        );
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
