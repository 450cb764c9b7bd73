// ABOUTME: CommandRunner that answers from a script instead of spawning processes.
// ABOUTME: Used to test how the CLI adapters build commands and read output.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollgate::exec::{self, CommandOutput, CommandRunner, CommandSpec};

#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<(Vec<String>, CommandOutput)>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` (program first) with `output`.
    /// Earlier rules win; unmatched commands succeed with empty output.
    pub fn on(self, prefix: &[&str], output: CommandOutput) -> Self {
        self.rules
            .lock()
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().clone()
    }

    /// The single recorded call whose arguments start with `prefix`.
    pub fn call(&self, prefix: &[&str]) -> CommandSpec {
        let calls = self.calls();
        let matching: Vec<_> = calls
            .into_iter()
            .filter(|c| c.args.iter().map(String::as_str).take(prefix.len()).eq(prefix.iter().copied()))
            .collect();
        assert_eq!(matching.len(), 1, "expected one call matching {:?}", prefix);
        matching.into_iter().next().unwrap()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> exec::Result<CommandOutput> {
        self.calls.lock().push(spec.clone());

        let line: Vec<&str> = std::iter::once(spec.program.as_str())
            .chain(spec.args.iter().map(String::as_str))
            .collect();
        let rules = self.rules.lock();
        let output = rules
            .iter()
            .find(|(prefix, _)| {
                prefix.len() <= line.len() && prefix.iter().zip(&line).all(|(p, l)| p == l)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));
        Ok(output)
    }
}
