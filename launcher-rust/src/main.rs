#![cfg_attr(windows, windows_subsystem = "windows")]

mod command;
mod config;
mod error;
mod launch;
mod logging;
mod paths;
mod platform;
mod report;
mod runner;
mod runtime;

use std::process::ExitCode;

use config::Profile;
use platform::Os;

fn main() -> ExitCode {
    let os = Os::current();
    let profile = Profile::bundled();

    let root = match paths::root_dir(os) {
        Ok(root) => root,
        Err(err) => {
            logging::init_stderr();
            report::report(os, &profile.dialog_title(), &format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    };

    match logging::init(&root) {
        Ok(Some(_)) => {}
        Ok(None) => log::info!("inside an app bundle, logging to stderr only"),
        Err(err) => {
            logging::init_stderr();
            log::warn!("file logging unavailable: {err:#}");
        }
    }
    log::info!("{} bootstrap {}", config::APP_ID, env!("CARGO_PKG_VERSION"));

    match runner::run(&root, std::env::args_os().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::report(os, &profile.dialog_title(), &err.to_string());
            ExitCode::FAILURE
        }
    }
}
