#[path = "../src/command.rs"]
mod command;
#[path = "../src/config.rs"]
mod config;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/paths.rs"]
mod paths;
#[path = "../src/platform.rs"]
mod platform;
#[path = "../src/runtime.rs"]
mod runtime;

use std::path::{Path, PathBuf};

use config::Profile;
use error::BootstrapError;
use paths::Layout;
use platform::Os;

fn profile() -> Profile {
    Profile {
        product_name: "App",
        payload_file_name: "App.jar",
        older_runtime_dir: "jre8",
        newer_runtime_dir: "jre23",
        newer_runtime_marker: "23",
        runtime_executable: "runtime",
    }
}

fn resolve(present: &[&str], args: &[&str]) -> Result<command::CommandLine, BootstrapError> {
    let layout = Layout::derive(Path::new("/opt/app"), Os::Linux, &profile());
    let present: Vec<PathBuf> = present.iter().map(PathBuf::from).collect();
    let selected = runtime::select_with(&layout.older_runtime, &layout.newer_runtime, |p| {
        present.iter().any(|q| q == p)
    })?;
    command::build(
        Os::Linux,
        &selected,
        &layout.payload,
        profile().newer_runtime_marker,
        args,
    )
}

#[test]
fn older_runtime_only_with_plain_argument() {
    let cmd = resolve(&["/opt/app/App.jar", "/opt/app/jre8/bin/runtime"], &["--verbose"]).unwrap();
    assert_eq!(
        cmd.to_string(),
        r#""/opt/app/jre8/bin/runtime" -jar "/opt/app/App.jar" --verbose"#
    );
    assert!(!cmd.to_string().contains("--add-opens"));
}

#[test]
fn both_runtimes_with_spaced_argument() {
    let cmd = resolve(
        &[
            "/opt/app/App.jar",
            "/opt/app/jre8/bin/runtime",
            "/opt/app/jre23/bin/runtime",
        ],
        &["--name", "Alice Smith"],
    )
    .unwrap();
    assert_eq!(
        cmd.to_string(),
        format!(
            r#""/opt/app/jre23/bin/runtime" {} -jar "/opt/app/App.jar" --name "Alice Smith""#,
            command::ADD_OPENS_FLAG
        )
    );
}

#[test]
fn no_runtime_never_builds_a_command() {
    let err = resolve(&["/opt/app/App.jar"], &["--verbose"]).unwrap_err();
    match err {
        BootstrapError::RuntimeNotFound { older, newer } => {
            assert_eq!(older, PathBuf::from("/opt/app/jre8/bin/runtime"));
            assert_eq!(newer, PathBuf::from("/opt/app/jre23/bin/runtime"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn oversized_arguments_never_yield_a_truncated_line() {
    let big = "y".repeat(command::MAX_COMMAND_LEN / 2);
    let err = resolve(
        &["/opt/app/jre8/bin/runtime"],
        &[big.as_str(), big.as_str()],
    )
    .unwrap_err();
    assert!(matches!(err, BootstrapError::CommandTooLong { .. }));
}

#[test]
fn bundled_profile_layout_uses_configured_names() {
    let p = Profile::bundled();
    let layout = Layout::derive(Path::new("/srv/bundle"), Os::Linux, &p);
    assert_eq!(
        layout.payload,
        PathBuf::from(format!("/srv/bundle/{}", p.payload_file_name))
    );
    assert_eq!(
        layout.older_runtime,
        PathBuf::from(format!(
            "/srv/bundle/{}/bin/{}",
            p.older_runtime_dir, p.runtime_executable
        ))
    );
}
