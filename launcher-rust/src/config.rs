include!(concat!(env!("OUT_DIR"), "/jarvessel_config.rs"));

/// Bundle constants the bootstrap works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub product_name: &'static str,
    pub payload_file_name: &'static str,
    pub older_runtime_dir: &'static str,
    pub newer_runtime_dir: &'static str,
    /// Substring of a runtime path that marks it as the newer runtime.
    pub newer_runtime_marker: &'static str,
    pub runtime_executable: &'static str,
}

impl Profile {
    pub const fn bundled() -> Self {
        Self {
            product_name: PRODUCT_NAME,
            payload_file_name: PAYLOAD_FILE_NAME,
            older_runtime_dir: OLDER_RUNTIME_DIR,
            newer_runtime_dir: NEWER_RUNTIME_DIR,
            newer_runtime_marker: NEWER_RUNTIME_MARKER,
            runtime_executable: RUNTIME_EXECUTABLE,
        }
    }

    pub fn dialog_title(&self) -> String {
        format!("{} Error", self.product_name)
    }
}
