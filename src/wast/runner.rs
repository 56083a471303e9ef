//! Script execution.

use super::command::{WastAction, WastCommand};
use super::parser::{parse_script, WastParseError};
use super::values::match_results;
use crate::adapter::Config;
use crate::runtime::{Instance, RuntimeError, Value};
use crate::wat;

/// Counters and failures from one script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub modules: usize,
    pub actions: usize,
    pub assert_return: usize,
    pub assert_trap: usize,
    pub assert_invalid: usize,
    pub assert_malformed: usize,
    /// Commands not run because the module they target failed to load.
    pub skipped: usize,
    /// One entry per failed command, prefixed with its line number.
    pub failures: Vec<String>,
}

impl ScriptReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }

    /// Total assertions that passed.
    pub fn assertions(&self) -> usize {
        self.assert_return + self.assert_trap + self.assert_invalid + self.assert_malformed
    }
}

/// Parse and run a script with the default [`Config`].
///
/// Assertion failures do not stop the run; they are collected in the report.
///
/// # Errors
/// Only if the script itself cannot be parsed.
pub fn run_script(source: &str) -> Result<ScriptReport, WastParseError> {
    run_script_with_config(source, &Config::default())
}

/// Parse and run a script, loading every module with `config`.
pub fn run_script_with_config(source: &str, config: &Config) -> Result<ScriptReport, WastParseError> {
    let script = parse_script(source)?;
    let mut runner = WastRunner::new(config);
    for command in &script.commands {
        runner.run_command(command);
    }
    log::debug!(
        "script finished: {} assertion(s) passed, {} failure(s), {} skipped",
        runner.report.assertions(),
        runner.report.failures.len(),
        runner.report.skipped
    );
    Ok(runner.report)
}

struct WastRunner<'c> {
    config: &'c Config,
    /// Most recently defined module; actions target it.
    current: Option<Instance>,
    /// Set when a module fails to load, so its actions are skipped
    module_broken: bool,
    report: ScriptReport,
}

impl<'c> WastRunner<'c> {
    fn new(config: &'c Config) -> Self {
        WastRunner {
            config,
            current: None,
            module_broken: false,
            report: ScriptReport::default(),
        }
    }

    fn fail(&mut self, line: u32, message: String) {
        log::debug!("line {line}: {message}");
        self.report.failures.push(format!("line {line}: {message}"));
    }

    fn invoke(&self, action: &WastAction) -> Result<Vec<Value>, RuntimeError> {
        let WastAction::Invoke { name, args } = action;
        match &self.current {
            Some(instance) => instance.invoke(name, args.clone()),
            None => Err(RuntimeError::UnknownExport(name.clone())),
        }
    }

    fn run_command(&mut self, command: &WastCommand) {
        let line = command.line();
        match command {
            WastCommand::Module { name, source, .. } => match wat::parse_with_config(source, self.config) {
                Ok(module) => {
                    log::debug!(
                        "line {line}: loaded module {} ({} export(s))",
                        name.as_deref().unwrap_or("<anonymous>"),
                        module.export_names().len()
                    );
                    self.current = Some(Instance::new(module));
                    self.module_broken = false;
                    self.report.modules += 1;
                }
                Err(e) => {
                    self.module_broken = true;
                    self.fail(line, format!("module failed to load: {e}"));
                }
            },

            WastCommand::Action { action, .. } => {
                if self.module_broken {
                    self.report.skipped += 1;
                    return;
                }
                match self.invoke(action) {
                    Ok(_) => self.report.actions += 1,
                    Err(e) => self.fail(line, format!("action {} failed: {e}", action.name())),
                }
            }

            WastCommand::AssertReturn { action, expected, .. } => {
                if self.module_broken {
                    self.report.skipped += 1;
                    return;
                }
                match self.invoke(action) {
                    Ok(results) => match match_results(&results, expected) {
                        Ok(()) => self.report.assert_return += 1,
                        Err(msg) => self.fail(line, format!("assert_return {}: {msg}", action.name())),
                    },
                    Err(e) => self.fail(line, format!("assert_return {}: invoke failed: {e}", action.name())),
                }
            }

            WastCommand::AssertTrap { action, message, .. } => {
                if self.module_broken {
                    self.report.skipped += 1;
                    return;
                }
                match self.invoke(action) {
                    Err(RuntimeError::Trap(trap)) if error_message_matches(&trap.to_string(), message) => {
                        self.report.assert_trap += 1;
                    }
                    Err(e) => self.fail(line, format!("assert_trap: expected trap '{message}', got '{e}'")),
                    Ok(results) => self.fail(line, format!("assert_trap: expected trap '{message}', got {results:?}")),
                }
            }

            WastCommand::AssertInvalid { source, message, .. } => match wat::parse_with_config(source, self.config) {
                Err(e) if error_message_matches(&e.message, message) => self.report.assert_invalid += 1,
                Err(e) => self.fail(line, format!("assert_invalid: expected '{message}', got '{}'", e.message)),
                Ok(_) => self.fail(line, format!("assert_invalid: expected '{message}', module loaded")),
            },

            WastCommand::AssertMalformed { source, message, .. } => {
                match wat::parse_with_config(source, self.config) {
                    Err(e) if error_message_matches(&e.message, message) => self.report.assert_malformed += 1,
                    Err(e) => self.fail(line, format!("assert_malformed: expected '{message}', got '{}'", e.message)),
                    Ok(_) => self.fail(line, format!("assert_malformed: expected '{message}', module loaded")),
                }
            }
        }
    }
}

/// Case-insensitive substring match of an expected failure message.
fn error_message_matches(actual: &str, expected: &str) -> bool {
    actual.to_lowercase().contains(&expected.to_lowercase())
}
