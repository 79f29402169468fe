use std::fs::File;
use std::io::Write;

use log::{debug, warn};

use crate::commands::{Environment, execute_builtin};
use crate::error::ShellError;
use crate::external::run_program;
use crate::redirection::{Redirection, parse_command};
use crate::resolve::{ResolvedCommand, resolve};
use crate::tokenize::tokenize;

/// What the read loop should do after a line has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The running program was stopped by SIGINT.
    Interrupted,
    Exit(u8),
}

/// One interpreter session: its state plus the streams commands inherit.
pub struct Session<O: Write, E: Write> {
    env: Environment,
    stdout: O,
    stderr: E,
}

impl<O: Write, E: Write> Session<O, E> {
    pub fn new(env: Environment, stdout: O, stderr: E) -> Self {
        Self {
            env,
            stdout,
            stderr,
        }
    }

    /// Tokenizes, resolves and runs one input line. Every failure is
    /// reported to the session's stderr; a `2>` file only receives what an
    /// external program writes itself. Only `exit 0` ends the session.
    pub fn run_line(&mut self, line: &str) -> Flow {
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.report(&e);
                return Flow::Continue;
            }
        };
        if tokens.is_empty() {
            return Flow::Continue;
        }

        let parsed = parse_command(tokens);
        for e in &parsed.errors {
            self.report(e);
        }
        let Some(command) = resolve(parsed.args, &self.env.search, &self.env.cwd) else {
            return Flow::Continue;
        };
        debug!("resolved {:?} with {:?}", command, parsed.redirects);

        let Some(mut stdout_file) = self.open_target(parsed.redirects.stdout.as_ref()) else {
            return Flow::Continue;
        };
        let Some(stderr_file) = self.open_target(parsed.redirects.stderr.as_ref()) else {
            return Flow::Continue;
        };

        let flow = match command {
            ResolvedCommand::Builtin(builtin, args) => {
                let out: &mut dyn Write = match stdout_file.as_mut() {
                    Some(file) => file,
                    None => &mut self.stdout,
                };
                match execute_builtin(builtin, &args, &mut self.env, out, &mut self.stderr) {
                    Ok(flow) => flow,
                    Err(e) => {
                        warn!("{}: {}", builtin.name(), e);
                        Flow::Continue
                    }
                }
            }
            ResolvedCommand::External { name, path, args } => {
                let result = run_program(
                    &name,
                    &path,
                    &args,
                    &self.env.cwd,
                    stdout_file.as_ref(),
                    stderr_file.as_ref(),
                );
                match result {
                    Ok(captured) => {
                        self.forward(&captured.stdout, &captured.stderr);
                        if captured.interrupted() {
                            Flow::Interrupted
                        } else {
                            Flow::Continue
                        }
                    }
                    Err(e) => {
                        self.report(&e);
                        Flow::Continue
                    }
                }
            }
            ResolvedCommand::NotFound(name) => {
                self.report(&ShellError::CommandNotFound(name));
                Flow::Continue
            }
        };

        if let Err(e) = self.stdout.flush() {
            warn!("flushing stdout: {}", e);
        }
        flow
    }

    /// Opens a redirection target. `None` means the open failed and the
    /// command must be skipped.
    fn open_target(&mut self, target: Option<&Redirection>) -> Option<Option<File>> {
        match target.map(|r| r.open(&self.env.cwd)).transpose() {
            Ok(file) => Some(file),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn forward(&mut self, stdout: &[u8], stderr: &[u8]) {
        if let Err(e) = self.stdout.write_all(stdout) {
            warn!("forwarding stdout: {}", e);
        }
        if let Err(e) = self.stderr.write_all(stderr) {
            warn!("forwarding stderr: {}", e);
        }
    }

    /// Writes a diagnostic to the session's own stderr.
    fn report(&mut self, e: &ShellError) {
        debug!("reporting {:?}", e);
        if let Err(io) = writeln!(self.stderr, "{}", e) {
            warn!("writing diagnostic: {}", io);
        }
    }
}
