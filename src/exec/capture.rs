// src/exec/capture.rs

//! Buffered execution for short setup commands (`which`, `go get`, report
//! conversion).

use std::path::Path;
use std::process::Stdio;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::exec::stream::{forward_merged, forward_pipe, join_readers, merged_output};
use crate::exec::{exit_code_of, CapturedOutput, CommandOutcome, CommandSpec, ExecError};

/// Run `spec` to completion and buffer its stdout.
///
/// - `stdin`: when set, the child's stdin is read from this file; otherwise
///   stdin is null.
/// - `merge_stderr`: when true, stderr shares stdout's pipe and lands in the
///   buffer in write order; otherwise it is inherited and shows up on this
///   process's stderr.
pub async fn run_captured(
    spec: &CommandSpec,
    stdin: Option<&Path>,
    merge_stderr: bool,
) -> Result<CommandOutcome, ExecError> {
    let stdin_cfg = match stdin {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|source| ExecError::Capture {
                path: path.to_path_buf(),
                source,
            })?;
            Stdio::from(file)
        }
        None => Stdio::null(),
    };

    debug!(cmd = %spec.display(), ?stdin, merge_stderr, "starting captured command");

    let mut cmd = spec.to_tokio();
    cmd.stdin(stdin_cfg).kill_on_drop(true);
    let merged = if merge_stderr {
        Some(merged_output(spec, &mut cmd)?)
    } else {
        cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
        None
    };

    let spawned = cmd.spawn();
    drop(cmd);
    let mut child = spawned.map_err(|source| ExecError::Launch {
        program: spec.program.clone(),
        source,
    })?;

    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(64);
    let reader = match merged {
        Some(output) => forward_merged(output, tx),
        None => {
            let stdout = child.stdout.take().ok_or_else(|| ExecError::Io {
                program: spec.program.clone(),
                source: std::io::Error::other("child stdout was not piped"),
            })?;
            forward_pipe(stdout, tx)
        }
    };

    let mut buffer = Vec::new();
    while let Some(chunk) = rx.recv().await {
        buffer.extend_from_slice(&chunk);
    }

    join_readers(spec, vec![reader]).await?;

    let status = child.wait().await.map_err(|source| ExecError::Io {
        program: spec.program.clone(),
        source,
    })?;

    let exit_code = exit_code_of(status);
    info!(cmd = %spec.display(), exit_code, bytes = buffer.len(), "captured command exited");

    Ok(CommandOutcome {
        exit_code,
        output: CapturedOutput::Buffered(buffer),
    })
}
