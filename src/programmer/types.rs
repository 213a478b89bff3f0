use serde::{Deserialize, Serialize};

/// Firmware image token handed to the flashing tool (`commander convert <name>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    name: String,
}

impl ImageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ImageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The two images flashed during a provisioning run.
///
/// `initial` exposes the modem identity; `application` is what ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub initial: ImageSpec,
    pub application: ImageSpec,
}

/// Output captured from a successful tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramOutput {
    /// stdout followed by stderr.
    pub output: String,
}

/// Joins stdout and stderr into one diagnostic string.
pub(crate) fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&err);
    }
    combined
}
