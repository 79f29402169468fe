use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use nix::unistd::{AccessFlags, access};

/// Commands implemented inside the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Echo,
        Builtin::Exit,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
        }
    }
}

/// What the first word of a line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCommand {
    Builtin(Builtin, Vec<String>),
    External {
        name: String,
        path: PathBuf,
        args: Vec<String>,
    },
    NotFound(String),
}

/// Ordered list of directories searched for bare command names.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Splits a `PATH`-style value. Empty entries stand for the current
    /// directory.
    pub fn parse(value: &OsStr) -> Self {
        let dirs = std::env::split_paths(value)
            .map(|dir| {
                if dir.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    dir
                }
            })
            .collect();
        Self::new(dirs)
    }

    /// Finds the first executable `dir/name`, with relative directories
    /// taken against `cwd`.
    pub fn find(&self, name: &str, cwd: &Path) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') {
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| cwd.join(dir).join(name))
            .find(|candidate| is_executable(candidate))
    }
}

/// True for a regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file()) && access(path, AccessFlags::X_OK).is_ok()
}

/// Resolves a name to a program path without considering built-ins: a
/// directly addressed executable first, then the search path.
pub fn find_external(name: &str, search: &SearchPath, cwd: &Path) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let direct = cwd.join(name);
    if is_executable(&direct) {
        return Some(direct);
    }
    search.find(name, cwd)
}

/// Decides how the clean tokens of a line will run. Returns `None` when
/// there is nothing to run.
///
/// `exit` is only a built-in in its `exit 0` form; anything else is looked
/// up like an external program.
pub fn resolve(mut tokens: Vec<String>, search: &SearchPath, cwd: &Path) -> Option<ResolvedCommand> {
    if tokens.is_empty() {
        return None;
    }
    let name = tokens.remove(0);
    let args = tokens;

    match Builtin::from_name(&name) {
        Some(Builtin::Exit) if args != ["0"] => {}
        Some(builtin) => return Some(ResolvedCommand::Builtin(builtin, args)),
        None => {}
    }

    Some(match find_external(&name, search, cwd) {
        Some(path) => ResolvedCommand::External { name, path, args },
        None => ResolvedCommand::NotFound(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("linesh-resolve-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(path: &Path, mode: u32) {
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    fn words(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_builtin_names() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("ls"), None);
    }

    #[test]
    fn test_resolve_builtin() {
        let search = SearchPath::default();
        let cwd = Path::new("/");
        assert_eq!(
            resolve(words(&["echo", "a"]), &search, cwd),
            Some(ResolvedCommand::Builtin(Builtin::Echo, words(&["a"])))
        );
        assert_eq!(
            resolve(words(&["exit", "0"]), &search, cwd),
            Some(ResolvedCommand::Builtin(Builtin::Exit, words(&["0"])))
        );
        assert_eq!(resolve(Vec::new(), &search, cwd), None);
    }

    #[test]
    fn test_exit_with_other_status_is_not_builtin() {
        let search = SearchPath::default();
        assert_eq!(
            resolve(words(&["exit", "1"]), &search, Path::new("/")),
            Some(ResolvedCommand::NotFound("exit".to_string()))
        );
    }

    #[test]
    fn test_search_order_and_permissions() {
        let root = scratch_dir("search");
        let first = root.join("first");
        let second = root.join("second");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        write_file(&first.join("tool"), 0o644);
        write_file(&second.join("tool"), 0o755);
        write_file(&first.join("other"), 0o755);
        write_file(&second.join("other"), 0o755);

        let search = SearchPath::new(vec![first.clone(), second.clone()]);
        assert_eq!(search.find("tool", &root), Some(second.join("tool")));
        assert_eq!(search.find("other", &root), Some(first.join("other")));
        assert_eq!(search.find("missing", &root), None);
        assert_eq!(search.find("first/other", &root), None);
    }

    #[test]
    fn test_direct_path() {
        let root = scratch_dir("direct");
        std::fs::create_dir_all(root.join("bin dir")).unwrap();
        write_file(&root.join("bin dir/run me"), 0o755);

        let resolved = resolve(words(&["bin dir/run me", "x"]), &SearchPath::default(), &root);
        assert_eq!(
            resolved,
            Some(ResolvedCommand::External {
                name: "bin dir/run me".to_string(),
                path: root.join("bin dir/run me"),
                args: words(&["x"]),
            })
        );
    }

    #[test]
    fn test_directory_is_not_executable() {
        let root = scratch_dir("dir");
        assert!(!is_executable(&root));
    }

    #[test]
    fn test_parse_path_value() {
        let search = SearchPath::parse(OsStr::new("/usr/bin::/bin"));
        assert_eq!(
            search.dirs,
            [PathBuf::from("/usr/bin"), PathBuf::from("."), PathBuf::from("/bin")]
        );
    }
}
