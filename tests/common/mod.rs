//! Shared utilities for orchestrator integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;

use container_entrypoint::process::{CommandRunner, CommandSpec, CommandStatus};

/// Build a lookup function from fixed pairs.
pub fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

/// A runner that records every invocation and replays scripted results.
///
/// Readiness (`migrate`) results are consumed in order; once the script is
/// empty every further check fails with exit code 1. Asset preparation
/// (`collectstatic`) always returns `assets`.
pub struct RecordingRunner {
    readiness: RefCell<VecDeque<io::Result<CommandStatus>>>,
    assets: fn() -> io::Result<CommandStatus>,
    calls: RefCell<Vec<String>>,
}

impl RecordingRunner {
    pub fn new(readiness: Vec<io::Result<CommandStatus>>) -> Self {
        Self {
            readiness: RefCell::new(readiness.into()),
            assets: || Ok(CommandStatus::Exited(0)),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Readiness passes on the first try.
    pub fn healthy() -> Self {
        Self::new(vec![Ok(CommandStatus::Exited(0))])
    }

    /// Readiness never passes.
    pub fn never_ready() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_assets(mut self, assets: fn() -> io::Result<CommandStatus>) -> Self {
        self.assets = assets;
        self
    }

    /// Rendered command lines, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|line| line.split_whitespace().any(|word| word == subcommand))
            .count()
    }
}

impl CommandRunner for &RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        self.calls.borrow_mut().push(spec.to_string());

        if spec.args.iter().any(|a| a == "collectstatic") {
            return (self.assets)();
        }

        self.readiness
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CommandStatus::Exited(1)))
    }
}
