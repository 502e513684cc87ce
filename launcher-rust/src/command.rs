use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
};

use crate::{error::BootstrapError, platform::Os};

pub const MAX_COMMAND_LEN: usize = 4096;

/// Lets AWT/SWT grab the main thread on macOS.
pub const FIRST_THREAD_FLAG: &str = "-XstartOnFirstThread";
/// The payload reaches into `jdk.internal.misc`, which newer runtimes seal.
pub const ADD_OPENS_FLAG: &str = "--add-opens=java.base/jdk.internal.misc=ALL-UNNAMED";

/// A runtime invocation, kept both as discrete tokens (for `open --args`)
/// and as rendered text (for process creation and shells). The rendered
/// text is built from the raw OS strings, so arguments that are not UTF-8
/// reach the runtime unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
    line: OsString,
    arg_text: OsString,
}

impl CommandLine {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The whole line: quoted program, then `arg_text`.
    pub fn line(&self) -> &OsStr {
        &self.line
    }

    /// Everything after the quoted program, exactly as rendered.
    pub fn arg_text(&self) -> &OsStr {
        &self.arg_text
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line.to_string_lossy())
    }
}

pub fn build<I, S>(
    os: Os,
    runtime: &Path,
    payload: &Path,
    newer_marker: &str,
    passthrough: I,
) -> Result<CommandLine, BootstrapError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    build_with_limit(os, runtime, payload, newer_marker, passthrough, MAX_COMMAND_LEN)
}

pub fn build_with_limit<I, S>(
    os: Os,
    runtime: &Path,
    payload: &Path,
    newer_marker: &str,
    passthrough: I,
    limit: usize,
) -> Result<CommandLine, BootstrapError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = LineBuffer::new(limit);
    let mut args = Vec::new();

    line.push(runtime.as_os_str(), Quote::Always)?;

    if os.needs_first_thread_flag() {
        line.push(OsStr::new(FIRST_THREAD_FLAG), Quote::Never)?;
        args.push(OsString::from(FIRST_THREAD_FLAG));
    }

    if !newer_marker.is_empty() && runtime.to_string_lossy().contains(newer_marker) {
        line.push(OsStr::new(ADD_OPENS_FLAG), Quote::Never)?;
        args.push(OsString::from(ADD_OPENS_FLAG));
    }

    line.push(OsStr::new("-jar"), Quote::Never)?;
    line.push(payload.as_os_str(), Quote::Always)?;
    args.push(OsString::from("-jar"));
    args.push(payload.as_os_str().to_owned());

    for arg in passthrough {
        let arg = arg.as_ref();
        line.push(arg, Quote::IfSpaced)?;
        args.push(arg.to_owned());
    }

    let (line, arg_text) = line.finish();
    Ok(CommandLine {
        program: runtime.to_path_buf(),
        args,
        line,
        arg_text,
    })
}

#[derive(Clone, Copy)]
enum Quote {
    Always,
    Never,
    IfSpaced,
}

/// Bounded line assembly. `limit` is the size of the destination the line
/// must fit in, terminator byte included, so at most `limit - 1` bytes of
/// text are accepted. Every token is measured together with the separator
/// that follows it, and lengths are counted in OS string bytes.
struct LineBuffer {
    limit: usize,
    used: usize,
    pieces: Vec<OsString>,
}

impl LineBuffer {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            used: 0,
            pieces: Vec::new(),
        }
    }

    fn push(&mut self, token: &OsStr, quote: Quote) -> Result<(), BootstrapError> {
        let quoted = match quote {
            Quote::Always => true,
            Quote::Never => false,
            // Lossy decoding never adds or drops a space.
            Quote::IfSpaced => token.to_string_lossy().contains(' '),
        };
        let mut piece = OsString::with_capacity(token.len() + 2);
        if quoted {
            piece.push("\"");
            piece.push(token);
            piece.push("\"");
        } else {
            piece.push(token);
        }
        let cost = piece.len() + 1;
        if self.used + cost >= self.limit {
            return Err(BootstrapError::CommandTooLong { limit: self.limit });
        }
        self.used += cost;
        self.pieces.push(piece);
        Ok(())
    }

    /// Returns the full line and the part after the first token.
    fn finish(self) -> (OsString, OsString) {
        let mut pieces = self.pieces.into_iter();
        let mut line = pieces.next().unwrap_or_default();
        let mut rest = OsString::new();
        for piece in pieces {
            if !rest.is_empty() {
                rest.push(" ");
            }
            rest.push(&piece);
        }
        if !rest.is_empty() {
            line.push(" ");
            line.push(&rest);
        }
        (line, rest)
    }
}
