use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::paths;

const LOG_FILE_NAME: &str = "launcher.log";

/// Filter for the bootstrap log, `env_logger` syntax.
pub const LOG_ENV: &str = "JARVESSEL_LOG";

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join("logs")
}

pub fn open_log_file(root: &Path) -> Result<(PathBuf, fs::File)> {
    let dir = logs_dir(root);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let log_path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;
    Ok((log_path, file))
}

/// Whether a file log may be written under `root`. Never inside a signed
/// app bundle.
pub fn file_log_allowed(root: &Path) -> bool {
    !paths::is_bundle_resources(root)
}

/// Routes `log` output to `<root>/logs/launcher.log`, or to stderr when the
/// root must not be written to. Returns the log file, if any.
pub fn init(root: &Path) -> Result<Option<PathBuf>> {
    if !file_log_allowed(root) {
        init_stderr();
        return Ok(None);
    }
    let (log_path, file) = open_log_file(root)?;
    builder()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("install logger")?;
    Ok(Some(log_path))
}

/// For bundles installed somewhere read-only.
pub fn init_stderr() {
    let _ = builder().target(env_logger::Target::Stderr).try_init();
}

fn builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"));
    builder.write_style(env_logger::WriteStyle::Never);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let log_path = init(tmp.path()).unwrap().unwrap();
        assert!(log_path.exists());
        assert_eq!(log_path, logs_dir(tmp.path()).join(LOG_FILE_NAME));
    }

    #[test]
    fn no_file_log_inside_app_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let resources = tmp.path().join("MyApp.app").join("Contents").join("Resources");
        fs::create_dir_all(&resources).unwrap();
        assert!(!file_log_allowed(&resources));
        assert!(file_log_allowed(tmp.path()));
        assert!(file_log_allowed(&tmp.path().join("Resources")));
    }

    #[test]
    fn open_log_file_appends() {
        use std::io::Write;
        let tmp = tempfile::tempdir().unwrap();
        let (path, mut file) = open_log_file(tmp.path()).unwrap();
        writeln!(file, "first").unwrap();
        let (_, mut again) = open_log_file(tmp.path()).unwrap();
        writeln!(again, "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }
}
