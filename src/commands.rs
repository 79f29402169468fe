use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use nix::unistd::{AccessFlags, access};

use crate::error::ShellError;
use crate::resolve::{Builtin, SearchPath, find_external};
use crate::session::Flow;

/// Interpreter state the built-ins read and change.
#[derive(Debug, Clone)]
pub struct Environment {
    pub cwd: PathBuf,
    pub home: PathBuf,
    pub search: SearchPath,
}

/// Executes a builtin command, writing results to `out` and diagnostics to `err`.
pub fn execute_builtin(
    builtin: Builtin,
    args: &[String],
    env: &mut Environment,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Flow> {
    match builtin {
        Builtin::Exit => return Ok(Flow::Exit(0)),
        Builtin::Echo => writeln!(out, "{}", args.join(" "))?,
        Builtin::Pwd => writeln!(out, "{}", env.cwd.display())?,
        Builtin::Type => execute_type(args, env, out, err)?,
        Builtin::Cd => {
            if let Err(e) = execute_cd(args, env) {
                writeln!(err, "{}", e)?;
            }
        }
    }
    Ok(Flow::Continue)
}

fn execute_cd(args: &[String], env: &mut Environment) -> Result<(), ShellError> {
    let Some(arg) = args.first() else {
        let home = env.home.clone();
        match check_dir(&home) {
            Ok(()) => env.cwd = home,
            Err(e) => warn!("cd: cannot enter home {}: {}", home.display(), e),
        }
        return Ok(());
    };

    let shown = if arg == "~" {
        env.home.display().to_string()
    } else if let Some(rest) = arg.strip_prefix("~/") {
        env.home.join(rest).display().to_string()
    } else {
        arg.clone()
    };

    let target = normalize(&env.cwd.join(&shown));
    check_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: shown,
        source,
    })?;
    debug!("cd {}", target.display());
    env.cwd = target;
    Ok(())
}

/// Fails the way `chdir` would on `path`.
fn check_dir(path: &Path) -> io::Result<()> {
    if !std::fs::metadata(path)?.is_dir() {
        return Err(io::ErrorKind::NotADirectory.into());
    }
    access(path, AccessFlags::X_OK)?;
    Ok(())
}

/// Removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn execute_type(
    args: &[String],
    env: &Environment,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    if args.is_empty() {
        return writeln!(err, "{}", ShellError::MissingArgument);
    }

    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(out, "{} is a shell builtin", name)?;
            continue;
        }
        match find_external(name, &env.search, &env.cwd) {
            Some(_) if name.contains('/') => writeln!(out, "{} is {}", name, name)?,
            Some(path) => writeln!(out, "{} is {}", name, path.display())?,
            None => writeln!(err, "{}", ShellError::TypeNotFound(name.clone()))?,
        }
    }
    Ok(())
}
