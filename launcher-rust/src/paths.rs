use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{config::Profile, platform::Os};

/// Overrides the located bundle root, for running out of a dev tree.
pub const ROOT_ENV: &str = "JARVESSEL_ROOT";

pub fn self_path() -> Result<PathBuf> {
    Ok(std::env::current_exe().context("current_exe")?)
}

/// Directory the bundle lives in: the executable's own directory, or the
/// `Resources` directory when running from inside a macOS app bundle. Falls
/// back to the working directory when the OS cannot tell us where we are.
pub fn root_dir(os: Os) -> Result<PathBuf> {
    if let Some(dev_root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dev_root));
    }
    match self_path() {
        Ok(exe) => {
            if let Some(dir) = root_from_exe(os, &exe) {
                return Ok(dir);
            }
        }
        Err(err) => eprintln!("warning: cannot resolve executable path: {err:#}"),
    }
    std::env::current_dir().context("current_dir")
}

pub fn root_from_exe(os: Os, exe: &Path) -> Option<PathBuf> {
    if os == Os::MacOs {
        if let Some(resources) = bundle_resources_dir(exe) {
            return Some(resources);
        }
    }
    exe.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// `Foo.app/Contents/MacOS/foo` -> `Foo.app/Contents/Resources`.
pub fn bundle_resources_dir(exe: &Path) -> Option<PathBuf> {
    let macos_dir = exe.parent()?;
    if macos_dir.file_name()? != "MacOS" {
        return None;
    }
    let contents = macos_dir.parent()?;
    if contents.file_name()? != "Contents" {
        return None;
    }
    let is_app = contents
        .parent()?
        .extension()
        .map(|e| e.eq_ignore_ascii_case("app"))
        .unwrap_or(false);
    if !is_app {
        return None;
    }
    Some(contents.join("Resources"))
}

/// True for `Foo.app/Contents/Resources`. Writing there breaks the bundle's
/// code signature.
pub fn is_bundle_resources(dir: &Path) -> bool {
    let Some(contents) = dir.parent() else {
        return false;
    };
    dir.file_name().is_some_and(|n| n == "Resources")
        && contents.file_name().is_some_and(|n| n == "Contents")
        && contents
            .parent()
            .and_then(Path::extension)
            .is_some_and(|e| e.eq_ignore_ascii_case("app"))
}

/// Where the payload and the two runtime candidates are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub payload: PathBuf,
    pub older_runtime: PathBuf,
    pub newer_runtime: PathBuf,
}

impl Layout {
    pub fn derive(root: &Path, os: Os, profile: &Profile) -> Self {
        let payload = format!("{}{}", os.separator(), profile.payload_file_name);
        let older = os.runtime_suffix(profile.older_runtime_dir, profile.runtime_executable);
        let newer = os.runtime_suffix(profile.newer_runtime_dir, profile.runtime_executable);
        Self {
            root: root.to_path_buf(),
            payload: concat(root, &payload),
            older_runtime: concat(root, &older),
            newer_runtime: concat(root, &newer),
        }
    }
}

// Plain concatenation, not `Path::join`: the suffixes already carry the
// platform separator.
fn concat(root: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(root.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
