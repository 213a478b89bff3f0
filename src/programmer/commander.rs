use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::error::ProgramError;
use super::types::{ImageSpec, ProgramOutput, combine_output};

/// Flashes a firmware image onto the attached device.
pub trait ImageProgrammer {
    async fn program(&self, image: &ImageSpec) -> Result<ProgramOutput, ProgramError>;
}

impl<T: ImageProgrammer> ImageProgrammer for &T {
    async fn program(&self, image: &ImageSpec) -> Result<ProgramOutput, ProgramError> {
        (**self).program(image).await
    }
}

/// Runs the Simplicity `commander` tool as `<tool> convert <image>`.
///
/// The child gets exactly the environment given at construction, nothing
/// inherited from the calling process. Names and values are OS strings, so
/// non-UTF-8 entries reach the tool unchanged.
pub struct CommanderProgrammer {
    tool_path: PathBuf,
    env: HashMap<OsString, OsString>,
    timeout: Duration,
}

impl CommanderProgrammer {
    pub fn new(tool_path: PathBuf, env: HashMap<OsString, OsString>, timeout: Duration) -> Self {
        Self {
            tool_path,
            env,
            timeout,
        }
    }

    pub fn tool_path(&self) -> &PathBuf {
        &self.tool_path
    }
}

impl ImageProgrammer for CommanderProgrammer {
    async fn program(&self, image: &ImageSpec) -> Result<ProgramOutput, ProgramError> {
        debug!(
            tool = %self.tool_path.display(),
            image = %image,
            timeout = ?self.timeout,
            "Launching flashing tool"
        );

        let child = Command::new(&self.tool_path)
            .arg("convert")
            .arg(image.name())
            .env_clear()
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProgramError::Launch {
                tool: self.tool_path.display().to_string(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ProgramError::Io(e)),
            Err(_) => {
                return Err(ProgramError::TimedOut {
                    timeout: self.timeout,
                });
            }
        };

        // stdout comes first, then stderr. Interleaving is not preserved.
        let combined = combine_output(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(ProgramError::Failed {
                code: output.status.code(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(ProgramOutput { output: combined })
    }
}
