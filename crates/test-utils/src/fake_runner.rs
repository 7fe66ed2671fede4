use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ciwrap::exec::backend::ExecFuture;
use ciwrap::exec::{CapturedOutput, CommandOutcome, CommandRunner, CommandSpec, ExecError};

/// How a recorded command was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Stream { capture: PathBuf },
    Capture { stdin: Option<PathBuf>, merge_stderr: bool },
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub spec: CommandSpec,
    pub kind: CallKind,
}

/// What the fake "process" does.
#[derive(Debug)]
pub enum FakeReply {
    Exit { code: i32, output: Vec<u8> },
    LaunchFailure,
}

impl FakeReply {
    pub fn ok() -> Self {
        FakeReply::Exit { code: 0, output: Vec::new() }
    }

    pub fn exit(code: i32, output: impl Into<Vec<u8>>) -> Self {
        FakeReply::Exit { code, output: output.into() }
    }
}

type Responder = Box<dyn FnMut(&RecordedCall) -> FakeReply + Send>;

/// A fake command runner that:
/// - records every command it is asked to run
/// - answers with whatever the responder returns (default: exit 0, no output)
/// - for streamed calls, writes the reply's output into the capture file.
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responder: Responder,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::with_responder(|_| FakeReply::ok())
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&RecordedCall) -> FakeReply + Send + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
        }
    }

    /// Shared handle on the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    /// Programs invoked so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.spec.program.clone())
            .collect()
    }

    /// `display()` of every command invoked so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.spec.display())
            .collect()
    }

    fn answer(&mut self, call: RecordedCall) -> Result<CommandOutcome, ExecError> {
        let reply = (self.responder)(&call);
        let program = call.spec.program.clone();
        let kind = call.kind.clone();
        self.calls.lock().unwrap().push(call);

        let (code, output) = match reply {
            FakeReply::Exit { code, output } => (code, output),
            FakeReply::LaunchFailure => {
                return Err(ExecError::Launch {
                    program,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
        };

        let output = match kind {
            CallKind::Stream { capture } => {
                write_capture(&capture, &output)?;
                CapturedOutput::File(capture)
            }
            CallKind::Capture { .. } => CapturedOutput::Buffered(output),
        };

        Ok(CommandOutcome { exit_code: code, output })
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn write_capture(path: &Path, output: &[u8]) -> Result<(), ExecError> {
    let err = |source| ExecError::Capture { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(err)?;
    }
    std::fs::write(path, output).map_err(err)
}

impl CommandRunner for FakeRunner {
    fn stream<'a>(&'a mut self, spec: &'a CommandSpec, capture: &'a Path) -> ExecFuture<'a> {
        let call = RecordedCall {
            spec: spec.clone(),
            kind: CallKind::Stream { capture: capture.to_path_buf() },
        };
        let result = self.answer(call);
        Box::pin(async move { result })
    }

    fn capture<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        stdin: Option<&'a Path>,
        merge_stderr: bool,
    ) -> ExecFuture<'a> {
        let call = RecordedCall {
            spec: spec.clone(),
            kind: CallKind::Capture {
                stdin: stdin.map(Path::to_path_buf),
                merge_stderr,
            },
        };
        let result = self.answer(call);
        Box::pin(async move { result })
    }
}
