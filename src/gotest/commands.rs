// src/gotest/commands.rs

//! Command lines used by the gotest flow.

use crate::config::GoTestSettings;
use crate::exec::CommandSpec;

pub fn which_go() -> CommandSpec {
    CommandSpec::new("which").arg("go")
}

/// `<go> get -t <package>`
pub fn fetch_deps(settings: &GoTestSettings, go: &str) -> CommandSpec {
    CommandSpec::new(go)
        .args(["get", "-t"])
        .arg(&settings.package)
        .current_dir(&settings.workspace)
        .env("GOPATH", settings.gopath.to_string_lossy())
}

/// `[sudo -E] <go> test -v -timeout <t> -p <n> <package>`
pub fn go_test(settings: &GoTestSettings, go: &str) -> CommandSpec {
    let base = if settings.sudo {
        CommandSpec::new("sudo").args(["-E", go])
    } else {
        CommandSpec::new(go)
    };

    base.args(["test", "-v", "-timeout"])
        .arg(&settings.timeout)
        .arg("-p")
        .arg(settings.parallelism.to_string())
        .arg(&settings.package)
        .current_dir(&settings.workspace)
        .env("GOPATH", settings.gopath.to_string_lossy())
}

/// `go-junit-report`, fed the capture file on stdin.
pub fn junit_report(settings: &GoTestSettings) -> CommandSpec {
    CommandSpec::new(&settings.junit_binary)
}

/// The commands a run would execute, for `--dry-run`.
pub fn plan(settings: &GoTestSettings) -> Vec<CommandSpec> {
    let go = settings.go_binary.as_deref().unwrap_or("go");
    let mut plan = Vec::new();
    if settings.go_binary.is_none() {
        plan.push(which_go());
    }
    plan.push(fetch_deps(settings, go));
    plan.push(go_test(settings, go));
    plan.push(junit_report(settings));
    plan
}
