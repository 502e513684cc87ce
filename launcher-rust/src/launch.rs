use anyhow::{bail, Context, Result};
use std::{
    ffi::OsString,
    path::Path,
    process::Command,
};

use crate::{
    command::{CommandLine, MAX_COMMAND_LEN},
    platform::Os,
};

/// How the bootstrap treats the process it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Spawn and let go; only a failed spawn counts.
    Detach,
    /// Wait for the wrapper and require a zero exit.
    RequireSuccess,
    /// Wait for the shell; its exit status belongs to the program and is
    /// only logged.
    ShellOnly,
}

pub struct LaunchPlan {
    command: Command,
    completion: Completion,
}

impl LaunchPlan {
    pub fn for_os(os: Os, cmd: &CommandLine, working_dir: &Path) -> Result<Self> {
        let (mut command, completion) = match os {
            Os::Windows => {
                let mut c = Command::new(cmd.program());
                push_raw_args(&mut c, cmd);
                hide_console(&mut c);
                (c, Completion::Detach)
            }
            Os::MacOs => {
                let mut c = Command::new("open");
                c.arg("-n")
                    .arg("-a")
                    .arg(cmd.program())
                    .arg("--args")
                    .args(cmd.args());
                (c, Completion::RequireSuccess)
            }
            Os::Linux => {
                let script = shell_script(cmd, working_dir)?;
                let mut c = Command::new("sh");
                c.arg("-c").arg(script);
                (c, Completion::ShellOnly)
            }
        };
        command.current_dir(working_dir);
        Ok(Self {
            command,
            completion,
        })
    }

    #[cfg(test)]
    pub fn command(&self) -> &Command {
        &self.command
    }

    #[cfg(test)]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn execute(mut self) -> Result<()> {
        let program = self.command.get_program().to_string_lossy().to_string();
        match self.completion {
            Completion::Detach => {
                let child = self
                    .command
                    .spawn()
                    .with_context(|| format!("spawn {program}"))?;
                log::info!("started {program} (pid {})", child.id());
            }
            Completion::RequireSuccess => {
                let status = self
                    .command
                    .status()
                    .with_context(|| format!("run {program}"))?;
                if !status.success() {
                    bail!("{program} exited with {:?}", status.code());
                }
                log::info!("{program} handed off the runtime");
            }
            Completion::ShellOnly => {
                let status = self
                    .command
                    .status()
                    .with_context(|| format!("run {program}"))?;
                log::info!("runtime exited with {:?}", status.code());
            }
        }
        Ok(())
    }
}

fn shell_script(cmd: &CommandLine, working_dir: &Path) -> Result<OsString> {
    let mut script = OsString::from("cd \"");
    script.push(working_dir.as_os_str());
    script.push("\" && ");
    script.push(cmd.line());
    // Same budget as a doubled command buffer, terminator included.
    if script.len() >= MAX_COMMAND_LEN * 2 {
        bail!("command line too long for the shell ({} bytes)", script.len());
    }
    Ok(script)
}

/// The runtime receives the rendered text verbatim after its own quoted
/// path, not a re-quoted token list.
#[cfg(windows)]
fn push_raw_args(c: &mut Command, cmd: &CommandLine) {
    use std::os::windows::process::CommandExt;
    c.raw_arg(cmd.arg_text());
}

#[cfg(not(windows))]
fn push_raw_args(c: &mut Command, cmd: &CommandLine) {
    c.arg(cmd.arg_text());
}

#[cfg(windows)]
fn hide_console(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x08000000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_cmd: &mut Command) {}
