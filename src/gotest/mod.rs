// src/gotest/mod.rs

//! Go test runner wrapper.
//!
//! Locates the go toolchain, fetches test dependencies, runs `go test` with
//! its output streamed to the console and a capture file, converts that file
//! into a JUnit report with `go-junit-report`, and hands back `go test`'s
//! exit code.

pub mod commands;
pub mod runner;

pub use runner::{locate_go, run_gotest};
