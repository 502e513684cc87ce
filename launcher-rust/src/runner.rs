use std::{ffi::OsStr, path::Path};

use crate::{
    command::{self, CommandLine},
    config::Profile,
    error::BootstrapError,
    launch::LaunchPlan,
    paths::Layout,
    platform::Os,
    runtime,
};

pub fn run<I, S>(root: &Path, args: I) -> Result<(), BootstrapError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_with_launcher(root, Os::current(), &Profile::bundled(), args, |plan| plan.execute())?;
    Ok(())
}

/// Locate, select, build and launch. `launch` receives the finished plan so
/// tests can inspect it instead of starting a process.
pub fn run_with_launcher<I, S>(
    root: &Path,
    os: Os,
    profile: &Profile,
    args: I,
    mut launch: impl FnMut(LaunchPlan) -> anyhow::Result<()>,
) -> Result<CommandLine, BootstrapError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    log::info!("bundle root {} ({os})", root.display());
    let layout = Layout::derive(root, os, profile);

    if !layout.payload.exists() {
        return Err(BootstrapError::PayloadNotFound {
            path: layout.payload,
        });
    }

    let runtime = runtime::select(&layout)?;
    log::info!("using runtime {}", runtime.display());
    runtime::prepare(os, &runtime);

    let cmd = command::build(
        os,
        &runtime,
        &layout.payload,
        profile.newer_runtime_marker,
        args,
    )?;
    log::debug!("command line: {cmd}");

    let plan = LaunchPlan::for_os(os, &cmd, &layout.root)
        .map_err(|err| launch_failed(profile, &cmd, err))?;
    launch(plan).map_err(|err| launch_failed(profile, &cmd, err))?;
    Ok(cmd)
}

fn launch_failed(profile: &Profile, cmd: &CommandLine, err: anyhow::Error) -> BootstrapError {
    BootstrapError::LaunchFailed {
        product: profile.product_name.to_string(),
        command: cmd.to_string(),
        reason: format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    fn profile() -> Profile {
        Profile {
            product_name: "MyApp",
            payload_file_name: "App.jar",
            older_runtime_dir: "jre8",
            newer_runtime_dir: "jre23",
            newer_runtime_marker: "jre23",
            runtime_executable: "runtime",
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "fake").unwrap();
    }

    #[test]
    fn missing_payload_stops_before_runtime_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("jre8").join("bin").join("runtime"));
        let mut launched = false;
        let err = run_with_launcher(tmp.path(), Os::Linux, &profile(), ["x"], |_| {
            launched = true;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, BootstrapError::PayloadNotFound { path } if path == tmp.path().join("App.jar")));
        assert!(!launched);
    }

    #[test]
    fn missing_runtimes_is_runtime_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("App.jar"));
        let err = run_with_launcher(tmp.path(), Os::Linux, &profile(), Vec::<&str>::new(), |_| {
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, BootstrapError::RuntimeNotFound { .. }));
    }

    #[test]
    fn launches_newer_runtime_in_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("App.jar"));
        touch(&root.join("jre8").join("bin").join("runtime"));
        touch(&root.join("jre23").join("bin").join("runtime"));

        let mut seen: Vec<(Vec<String>, Option<PathBuf>)> = Vec::new();
        let cmd = run_with_launcher(root, Os::Linux, &profile(), ["--verbose"], |plan| {
            let args = plan
                .command()
                .get_args()
                .map(|a| a.to_string_lossy().to_string())
                .collect();
            let dir = plan.command().get_current_dir().map(Path::to_path_buf);
            seen.push((args, dir));
            Ok(())
        })
        .unwrap();

        assert_eq!(cmd.program(), root.join("jre23").join("bin").join("runtime"));
        assert!(cmd.to_string().contains(command::ADD_OPENS_FLAG));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.as_deref(), Some(root));
        assert!(seen[0].0[1].ends_with(&cmd.to_string()));
    }

    #[test]
    fn launcher_error_becomes_launch_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("App.jar"));
        touch(&root.join("jre8").join("bin").join("runtime"));

        let err = run_with_launcher(root, Os::Linux, &profile(), Vec::<&str>::new(), |_| {
            Err(anyhow::anyhow!("spawn refused"))
        })
        .unwrap_err();
        match err {
            BootstrapError::LaunchFailed {
                product,
                command,
                reason,
            } => {
                assert_eq!(product, "MyApp");
                assert!(command.contains("-jar"));
                assert!(reason.contains("spawn refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
