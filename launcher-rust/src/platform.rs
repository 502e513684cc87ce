//! Per-platform facts the bootstrap needs: runtime layout inside a bundle,
//! path separator and extra runtime flags. The effectful parts (launching,
//! dialogs) build on these in `launch` and `report`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
}

impl Os {
    /// The platform this binary was compiled for. Anything that is not
    /// Windows or macOS is treated like Linux.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            Os::Linux
        }
    }

    pub const fn separator(self) -> char {
        match self {
            Os::Windows => '\\',
            Os::MacOs | Os::Linux => '/',
        }
    }

    /// Path of the runtime executable relative to the bundle root, including
    /// the leading separator.
    pub fn runtime_suffix(self, runtime_dir: &str, executable: &str) -> String {
        match self {
            Os::Windows => format!("\\{runtime_dir}\\bin\\{executable}.exe"),
            Os::MacOs => format!("/{runtime_dir}/Contents/Home/bin/{executable}"),
            Os::Linux => format!("/{runtime_dir}/bin/{executable}"),
        }
    }

    /// GUI toolkits on macOS must own the process main thread.
    pub const fn needs_first_thread_flag(self) -> bool {
        matches!(self, Os::MacOs)
    }

    /// Windows hands out no executable bit; everywhere else the runtime may
    /// have lost it while being unpacked.
    pub const fn needs_exec_bit(self) -> bool {
        !matches!(self, Os::Windows)
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Os::Windows => "windows",
            Os::MacOs => "macos",
            Os::Linux => "linux",
        };
        f.write_str(name)
    }
}
