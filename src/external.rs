use std::fs::File;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use bytes::Bytes;
use log::debug;

use crate::error::ShellError;

/// Result of running a program to completion. Streams that were sent to a
/// file come back empty.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: Bytes,
    pub stderr: Bytes,
}

impl Captured {
    pub fn interrupted(&self) -> bool {
        self.status.signal() == Some(nix::libc::SIGINT)
    }
}

fn target(file: Option<&File>) -> io::Result<Stdio> {
    match file {
        Some(file) => Ok(Stdio::from(file.try_clone()?)),
        None => Ok(Stdio::piped()),
    }
}

/// Runs `path` with `args` in `cwd` and waits for it. Streams without a file
/// are captured so the caller can forward them once the program exits.
pub fn run_program(
    name: &str,
    path: &Path,
    args: &[String],
    cwd: &Path,
    stdout: Option<&File>,
    stderr: Option<&File>,
) -> Result<Captured, ShellError> {
    debug!("running {} as {}", name, path.display());
    let output = Command::new(path)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(target(stdout).map_err(ShellError::Spawn)?)
        .stderr(target(stderr).map_err(ShellError::Spawn)?)
        .output()
        .map_err(|e| ShellError::launch(name, e))?;
    debug!("{} exited with {}", name, output.status);

    Ok(Captured {
        status: output.status,
        stdout: Bytes::from(output.stdout),
        stderr: Bytes::from(output.stderr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("linesh-external-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_captures_both_streams() {
        let dir = scratch_dir("capture");
        let path = script(&dir, "both", "echo \"out $1\"; echo err >&2; pwd");
        let captured = run_program("both", &path, &["x".to_string()], &dir, None, None).unwrap();
        assert!(captured.status.success());
        assert_eq!(
            captured.stdout,
            Bytes::from(format!("out x\n{}\n", dir.display()))
        );
        assert_eq!(captured.stderr, Bytes::from_static(b"err\n"));
    }

    #[test]
    fn test_redirected_stream_not_captured() {
        let dir = scratch_dir("redirect");
        let path = script(&dir, "out", "echo into-file");
        let file = File::create(dir.join("log")).unwrap();
        let captured = run_program("out", &path, &[], &dir, Some(&file), None).unwrap();
        assert!(captured.stdout.is_empty());
        assert_eq!(std::fs::read_to_string(dir.join("log")).unwrap(), "into-file\n");
    }

    #[test]
    fn test_vanished_program() {
        let dir = scratch_dir("vanished");
        let err = run_program("gone", &dir.join("gone"), &[], &dir, None, None).unwrap_err();
        assert!(matches!(
            err,
            ShellError::Launch {
                source: LaunchError::NotFound,
                ..
            }
        ));
        assert_eq!(err.to_string(), "gone: command not found");
    }
}
