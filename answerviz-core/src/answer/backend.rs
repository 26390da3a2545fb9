use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::foundation::error::{AnswerVizError, AnswerVizResult};

/// Something that turns a question into raw model output.
///
/// The output is untrusted text; callers run it through extraction and sanitization.
pub trait ModelBackend {
    fn complete(&self, question: &str, timeout: Duration) -> AnswerVizResult<String>;
}

impl<F> ModelBackend for F
where
    F: Fn(&str, Duration) -> AnswerVizResult<String>,
{
    fn complete(&self, question: &str, timeout: Duration) -> AnswerVizResult<String> {
        self(question, timeout)
    }
}

/// Always answers with the same response.
#[derive(Clone, Debug)]
pub struct StaticBackend {
    response: String,
}

impl StaticBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl ModelBackend for StaticBackend {
    fn complete(&self, _question: &str, _timeout: Duration) -> AnswerVizResult<String> {
        Ok(self.response.clone())
    }
}

/// Runs an external program per question: question on stdin, response on stdout.
///
/// The child is killed when it does not finish within the timeout.
#[derive(Clone, Debug)]
pub struct CommandBackend {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandBackend {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    fn display_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl ModelBackend for CommandBackend {
    #[tracing::instrument(
        level = "debug",
        skip(self, question),
        fields(program = %self.display_name())
    )]
    fn complete(&self, question: &str, timeout: Duration) -> AnswerVizResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                AnswerVizError::upstream(format!("spawn '{}': {e}", self.display_name()))
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AnswerVizError::upstream("failed to capture model stdout"))?;

        if let Some(mut stdin) = stdin {
            let question = question.to_owned();
            // A child that exits without reading closes the pipe; that is its answer to give.
            thread::spawn(move || {
                let _ = stdin.write_all(question.as_bytes());
            });
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stdout = stdout;
            let mut buf = Vec::new();
            let res = stdout.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(res);
        });

        let bytes = match rx.recv_timeout(timeout) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AnswerVizError::upstream(format!("read model output: {e}")));
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AnswerVizError::upstream(format!(
                    "model did not answer within {} ms",
                    timeout.as_millis()
                )));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AnswerVizError::upstream("model output reader panicked"));
            }
        };

        let status = child
            .wait()
            .map_err(|e| AnswerVizError::upstream(format!("wait for model: {e}")))?;
        if !status.success() {
            return Err(AnswerVizError::upstream(format!("model exited with {status}")));
        }

        tracing::debug!(bytes = bytes.len(), "model answered");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/answer/backend.rs"]
mod tests;
