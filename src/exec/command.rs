// src/exec/command.rs

//! Typed description of an external command.

use std::path::{Path, PathBuf};

use tokio::process::Command;

/// An external command invocation: executable, ordered arguments, optional
/// working directory and environment overrides.
///
/// Arguments are passed to the OS as-is, never through a shell, so nothing
/// needs quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument (lossy for non-UTF-8 paths).
    pub fn path_arg(self, path: impl AsRef<Path>) -> Self {
        let arg = path.as_ref().to_string_lossy().into_owned();
        self.arg(arg)
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// `program arg1 arg2 ...`, as echoed on the `CMD:` line.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build a `tokio::process::Command` with program, args, cwd and env set.
    /// Stdio is left for the caller to configure.
    pub fn to_tokio(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("go")
            .args(["test", "-v"])
            .arg("-timeout")
            .arg("30s");
        assert_eq!(spec.display(), "go test -v -timeout 30s");
    }

    #[test]
    fn builder_records_cwd_and_env() {
        let spec = CommandSpec::new("ansible-playbook")
            .path_arg("provision-container.yml")
            .current_dir("/srv/provisioning")
            .env("GOPATH", "/home/u/go");

        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/srv/provisioning")));
        assert_eq!(spec.env, vec![("GOPATH".to_string(), "/home/u/go".to_string())]);
        assert_eq!(spec.args, vec!["provision-container.yml".to_string()]);
    }
}
