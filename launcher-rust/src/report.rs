use anyhow::Result;
use std::process::{Command, Stdio};

use crate::platform::Os;

/// Shows `message` through the most native surface available, falling back
/// to stderr. Never fails.
pub fn report(os: Os, title: &str, message: &str) {
    log::error!("{message}");

    if os == Os::Windows {
        match message_box(title, message) {
            Ok(()) => return,
            Err(err) => log::warn!("message box unavailable: {err:#}"),
        }
    }

    for mut dialog in dialog_commands(os, title, message) {
        if run_dialog(&mut dialog) {
            return;
        }
    }
    eprintln!("ERROR: {message}");
}

/// Dialog tools to try in order. Whether a tool exists is only learned by
/// running it.
pub fn dialog_commands(os: Os, title: &str, message: &str) -> Vec<Command> {
    match os {
        Os::Windows => Vec::new(),
        Os::MacOs => {
            let script = format!(
                "display dialog \"{}\" buttons {{\"OK\"}} default button \"OK\" with icon stop with title \"{}\"",
                escape_applescript(message),
                escape_applescript(title),
            );
            let mut osascript = Command::new("osascript");
            osascript.arg("-e").arg(script);
            vec![osascript]
        }
        Os::Linux => {
            let mut zenity = Command::new("zenity");
            zenity
                .arg("--error")
                .arg(format!("--title={title}"))
                .arg(format!("--text={message}"));
            let mut xmessage = Command::new("xmessage");
            xmessage.arg("-center").arg(format!("ERROR: {message}"));
            vec![zenity, xmessage]
        }
    }
}

/// Makes `text` safe inside an AppleScript string literal. Line breaks
/// become spaces so the dialog stays on one `-e` line.
pub fn escape_applescript(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

fn run_dialog(dialog: &mut Command) -> bool {
    let program = dialog.get_program().to_string_lossy().to_string();
    match dialog.stdin(Stdio::null()).stderr(Stdio::null()).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::debug!("{program} exited with {:?}", status.code());
            false
        }
        Err(err) => {
            log::debug!("{program} unavailable: {err}");
            false
        }
    }
}

#[cfg(windows)]
fn message_box(title: &str, message: &str) -> Result<()> {
    use std::{ffi::OsStr, iter::once, os::windows::ffi::OsStrExt};
    use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let wide = |s: &str| -> Vec<u16> { OsStr::new(s).encode_wide().chain(once(0)).collect() };
    let text = wide(message);
    let caption = wide(title);
    let rc = unsafe { MessageBoxW(0, text.as_ptr(), caption.as_ptr(), MB_ICONERROR | MB_OK) };
    if rc == 0 {
        let code = unsafe { windows_sys::Win32::Foundation::GetLastError() };
        anyhow::bail!("MessageBoxW failed (error {code})");
    }
    Ok(())
}

#[cfg(not(windows))]
fn message_box(_title: &str, _message: &str) -> Result<()> {
    anyhow::bail!("message boxes need Windows")
}
