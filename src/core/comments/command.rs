use std::{process::Stdio, sync::Arc};

use tokio::{io::AsyncWriteExt, process::Command};

use super::{CommentGenerator, CommentRequest, GenerateFuture, GeneratorError};

/// Runs an external program once per literal.
///
/// The request goes to stdin as one JSON object; the first line of stdout
/// is the comment. The child is killed if the call is dropped (timeout).
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: Arc<str>,
    args: Arc<[String]>,
}

impl CommandGenerator {
    /// `command` is the program followed by its arguments.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: Arc::from(program.as_str()),
            args: Arc::from(args.to_vec()),
        })
    }

    async fn run(&self, request: CommentRequest) -> Result<String, GeneratorError> {
        let payload = serde_json::to_vec(&request)
            .map_err(|e| GeneratorError::backend(format!("failed to encode request: {}", e)))?;

        let mut child = Command::new(self.program.as_ref())
            .args(self.args.iter())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GeneratorError::backend(format!("failed to start `{}`: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| GeneratorError::backend(format!("failed to write request: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GeneratorError::backend(format!("failed to read output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeneratorError::backend(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or("").trim().to_string())
    }
}

impl CommentGenerator for CommandGenerator {
    fn generate(&self, request: CommentRequest) -> GenerateFuture<'_> {
        Box::pin(self.run(request))
    }
}
