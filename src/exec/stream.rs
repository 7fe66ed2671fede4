// src/exec/stream.rs

//! Streaming execution: run a command, show its merged stdout/stderr live
//! and mirror every chunk into a capture file.

use std::io::{BufRead, PipeReader};
use std::path::Path;
use std::process::Stdio;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::exec::{exit_code_of, CapturedOutput, CommandOutcome, CommandSpec, ExecError};

/// Run `spec`, streaming its output to this process's stdout and to
/// `capture_path`.
///
/// Returns the child's exit code once it has terminated and the capture file
/// has been flushed and closed. A non-zero exit code is an `Ok` outcome; only
/// failures to launch, read or capture are errors.
pub async fn run_streaming(
    spec: &CommandSpec,
    capture_path: &Path,
) -> Result<CommandOutcome, ExecError> {
    run_streaming_to(spec, capture_path, tokio::io::stdout()).await
}

/// Same as [`run_streaming`] but mirrors output to an arbitrary console
/// writer instead of stdout.
pub async fn run_streaming_to<W>(
    spec: &CommandSpec,
    capture_path: &Path,
    mut console: W,
) -> Result<CommandOutcome, ExecError>
where
    W: AsyncWrite + Unpin + Send,
{
    let capture_err = |source| ExecError::Capture {
        path: capture_path.to_path_buf(),
        source,
    };

    if let Some(parent) = capture_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(capture_err)?;
        }
    }
    let mut capture = File::create(capture_path).await.map_err(capture_err)?;

    info!(cmd = %spec.display(), capture = ?capture_path, "starting streamed command");

    let mut cmd = spec.to_tokio();
    cmd.stdin(Stdio::null()).kill_on_drop(true);
    let output = merged_output(spec, &mut cmd)?;

    let spawned = cmd.spawn();
    // The command still owns the pipe's write ends; drop it so the reader
    // sees end-of-stream once the child exits.
    drop(cmd);
    let mut child = spawned.map_err(|source| ExecError::Launch {
        program: spec.program.clone(),
        source,
    })?;

    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(64);
    let reader = forward_merged(output, tx);

    let mut console_ok = true;
    while let Some(chunk) = rx.recv().await {
        if console_ok {
            if let Err(e) = write_flushed(&mut console, &chunk).await {
                warn!(error = %e, "console write failed; output continues to capture file only");
                console_ok = false;
            }
        }
        capture.write_all(&chunk).await.map_err(capture_err)?;
    }

    join_readers(spec, vec![reader]).await?;

    let status = child.wait().await.map_err(|source| ExecError::Io {
        program: spec.program.clone(),
        source,
    })?;

    capture.flush().await.map_err(capture_err)?;
    drop(capture);

    let exit_code = exit_code_of(status);
    info!(cmd = %spec.display(), exit_code, "streamed command exited");

    Ok(CommandOutcome {
        exit_code,
        output: CapturedOutput::File(capture_path.to_path_buf()),
    })
}

/// Point the child's stdout and stderr at the write end of one pipe, so both
/// streams share a single file description and keep the child's write order.
///
/// Returns the read end.
pub(crate) fn merged_output(spec: &CommandSpec, cmd: &mut Command) -> Result<PipeReader, ExecError> {
    let io_err = |source| ExecError::Io {
        program: spec.program.clone(),
        source,
    };
    let (reader, writer) = std::io::pipe().map_err(io_err)?;
    cmd.stdout(writer.try_clone().map_err(io_err)?).stderr(writer);
    Ok(reader)
}

/// Read the merged pipe on a blocking thread, forwarding each
/// newline-terminated chunk (raw bytes, newline kept) as soon as it is read.
pub(crate) fn forward_merged(
    reader: PipeReader,
    tx: mpsc::Sender<Vec<u8>>,
) -> JoinHandle<std::io::Result<()>> {
    tokio::task::spawn_blocking(move || {
        let mut reader = std::io::BufReader::new(reader);
        loop {
            let mut chunk = Vec::new();
            if reader.read_until(b'\n', &mut chunk)? == 0 {
                break;
            }
            if tx.blocking_send(chunk).is_err() {
                debug!("output receiver dropped; stopping pipe reader");
                break;
            }
        }
        Ok(())
    })
}

/// Async counterpart of [`forward_merged`] for a single child pipe.
pub(crate) fn forward_pipe<R>(pipe: R, tx: mpsc::Sender<Vec<u8>>) -> JoinHandle<std::io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        loop {
            let mut chunk = Vec::new();
            if reader.read_until(b'\n', &mut chunk).await? == 0 {
                break;
            }
            if tx.send(chunk).await.is_err() {
                debug!("output receiver dropped; stopping pipe reader");
                break;
            }
        }
        Ok(())
    })
}

pub(crate) async fn join_readers(
    spec: &CommandSpec,
    readers: Vec<JoinHandle<std::io::Result<()>>>,
) -> Result<(), ExecError> {
    for reader in readers {
        let res = reader
            .await
            .map_err(|e| std::io::Error::other(format!("pipe reader task failed: {e}")))
            .and_then(|inner| inner);
        res.map_err(|source| ExecError::Io {
            program: spec.program.clone(),
            source,
        })?;
    }
    Ok(())
}

async fn write_flushed<W>(console: &mut W, chunk: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    console.write_all(chunk).await?;
    console.flush().await
}
