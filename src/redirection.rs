use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{ShellError, Stream};

/// Where one stream goes, and whether it is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub file: String,
    pub append: bool,
}

impl Redirection {
    /// Opens the target relative to `cwd`, creating it if absent and
    /// truncating unless in append mode.
    pub fn open(&self, cwd: &Path) -> Result<File, ShellError> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .append(self.append)
            .truncate(!self.append)
            .open(cwd.join(&self.file))
            .map_err(|source| ShellError::Redirect {
                path: PathBuf::from(&self.file),
                source,
            })
    }
}

/// Output and error targets for a single command. Absent means inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub stdout: Option<Redirection>,
    pub stderr: Option<Redirection>,
}

/// A token line with its redirection directives pulled out.
#[derive(Debug, Default)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub redirects: RedirectionSpec,
    /// Directives that had no file after them.
    pub errors: Vec<ShellError>,
}

fn directive(token: &str) -> Option<(Stream, bool)> {
    match token {
        ">" | "1>" => Some((Stream::Output, false)),
        ">>" | "1>>" => Some((Stream::Output, true)),
        "2>" => Some((Stream::Error, false)),
        "2>>" => Some((Stream::Error, true)),
        _ => None,
    }
}

/// Parses tokens into a ParsedCommand, extracting redirection operators.
///
/// Directives may appear anywhere on the line; a later directive for the same
/// stream replaces an earlier one.
pub fn parse_command(tokens: Vec<String>) -> ParsedCommand {
    let mut parsed = ParsedCommand::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let Some((stream, append)) = directive(&token) else {
            parsed.args.push(token);
            continue;
        };
        let Some(file) = tokens.next() else {
            parsed.errors.push(ShellError::MissingRedirectFile(stream));
            break;
        };
        let redirection = Some(Redirection { file, append });
        match stream {
            Stream::Output => parsed.redirects.stdout = redirection,
            Stream::Error => parsed.redirects.stderr = redirection,
        }
    }

    parsed
}
