use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Signature shared by every builtin: `(argv, last_status, should_exit) -> status`.
///
/// `argv[0]` is the builtin's own name.
pub type Handler = fn(&[String], i32, &mut bool) -> i32;

/// A command implemented inside the shell process.
pub struct Builtin {
    pub name: &'static str,
    pub handler: Handler,
}

/// The builtin registry, searched in order.
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "exit", handler: exit },
    Builtin { name: "cd", handler: cd },
    Builtin { name: "pwd", handler: pwd },
    Builtin { name: "export", handler: export },
    Builtin { name: "unset", handler: unset },
    Builtin { name: "type", handler: type_ },
];

/// Find the builtin registered under `name`.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Returns true if the command name is a shell builtin.
pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

fn exit(argv: &[String], last_status: i32, should_exit: &mut bool) -> i32 {
    *should_exit = true;
    exit_status(argv.get(1), last_status, &mut io::stderr())
}

fn exit_status(arg: Option<&String>, last_status: i32, stderr: &mut dyn Write) -> i32 {
    match arg {
        None => last_status,
        Some(s) => match s.parse::<i32>() {
            Ok(code) => code,
            Err(_) => {
                let _ = writeln!(stderr, "exit: {s}: numeric argument required");
                2
            }
        },
    }
}

fn cd(argv: &[String], _last_status: i32, _should_exit: &mut bool) -> i32 {
    let mut stderr = io::stderr();
    let target = match argv.get(1) {
        Some(dir) if dir == "-" => match std::env::var("OLDPWD") {
            Ok(prev) => prev,
            Err(_) => {
                let _ = writeln!(stderr, "cd: OLDPWD not set");
                return 1;
            }
        },
        Some(dir) => dir.clone(),
        None => match std::env::var("HOME") {
            Ok(home) => home,
            Err(_) => {
                let _ = writeln!(stderr, "cd: HOME not set");
                return 1;
            }
        },
    };

    let previous = std::env::current_dir();
    if let Err(e) = std::env::set_current_dir(&target) {
        let _ = writeln!(stderr, "cd: {target}: {e}");
        return 1;
    }

    // SAFETY: the shell is single-threaded apart from the ctrlc handler
    // thread, which never touches the environment.
    if let Ok(cwd) = previous {
        unsafe { std::env::set_var("OLDPWD", cwd) };
    }

    0
}

fn pwd(_argv: &[String], _last_status: i32, _should_exit: &mut bool) -> i32 {
    match std::env::current_dir() {
        Ok(path) => {
            let _ = writeln!(io::stdout(), "{}", path.display());
            0
        }
        Err(e) => {
            let _ = writeln!(io::stderr(), "pwd: {e}");
            1
        }
    }
}

fn export(argv: &[String], _last_status: i32, _should_exit: &mut bool) -> i32 {
    let mut status = 0;
    for arg in &argv[1..] {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                // SAFETY: env mutation only happens on the main thread.
                unsafe { std::env::set_var(key, value) };
            }
            _ => {
                let _ = writeln!(io::stderr(), "export: usage: export VAR=value");
                status = 1;
            }
        }
    }
    status
}

fn unset(argv: &[String], _last_status: i32, _should_exit: &mut bool) -> i32 {
    for arg in &argv[1..] {
        // SAFETY: env mutation only happens on the main thread.
        unsafe { std::env::remove_var(arg) };
    }
    0
}

fn type_(argv: &[String], _last_status: i32, _should_exit: &mut bool) -> i32 {
    describe(&argv[1..], &mut io::stdout(), &mut io::stderr())
}

fn describe(names: &[String], stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32 {
    let mut status = 0;
    for name in names {
        if is_builtin(name) {
            let _ = writeln!(stdout, "{name} is a shell builtin");
        } else if let Some(path) = find_in_path(name) {
            let _ = writeln!(stdout, "{name} is {}", path.display());
        } else {
            let _ = writeln!(stderr, "{name}: not found");
            status = 1;
        }
    }
    status
}

/// Check if a path points to an executable file.
fn is_executable(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        return meta.permissions().mode() & 0o111 != 0;
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Search PATH for an executable with the given name.
fn find_in_path(name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return is_executable(&path).then_some(path);
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn registry_lookup_is_exact() {
        assert!(lookup("exit").is_some());
        assert!(lookup("cd").is_some());
        assert!(lookup("ex").is_none());
        assert!(lookup("EXIT").is_none());
        assert!(!is_builtin("ls"));
    }

    #[test]
    fn registry_names_are_unique() {
        for (i, builtin) in BUILTINS.iter().enumerate() {
            assert!(
                BUILTINS[i + 1..].iter().all(|other| other.name != builtin.name),
                "duplicate builtin {}",
                builtin.name
            );
        }
    }

    #[test]
    fn exit_without_argument_keeps_last_status() {
        let mut should_exit = false;
        let status = (lookup("exit").unwrap().handler)(&argv(&["exit"]), 3, &mut should_exit);
        assert!(should_exit);
        assert_eq!(status, 3);
    }

    #[test]
    fn exit_with_code() {
        let mut should_exit = false;
        let status = exit(&argv(&["exit", "42"]), 0, &mut should_exit);
        assert!(should_exit);
        assert_eq!(status, 42);
    }

    #[test]
    fn exit_rejects_non_numeric_argument() {
        let mut stderr = Vec::new();
        let status = exit_status(Some(&"soon".to_string()), 0, &mut stderr);
        assert_eq!(status, 2);
        assert!(String::from_utf8(stderr).unwrap().contains("numeric argument required"));
    }

    #[test]
    fn describe_reports_builtins_and_unknowns() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = describe(
            &argv(&["cd", "pipesh-definitely-not-a-real-command"]),
            &mut stdout,
            &mut stderr,
        );
        assert_eq!(status, 1);
        assert_eq!(String::from_utf8(stdout).unwrap(), "cd is a shell builtin\n");
        assert!(String::from_utf8(stderr).unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn describe_finds_programs_on_path() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        assert_eq!(describe(&argv(&["sh"]), &mut stdout, &mut stderr), 0);
        let out = String::from_utf8(stdout).unwrap();
        assert!(out.starts_with("sh is /"), "stdout was: {out}");
    }

    #[test]
    fn export_rejects_missing_value() {
        let mut should_exit = false;
        assert_eq!(export(&argv(&["export", "NOVALUE"]), 0, &mut should_exit), 1);
        assert!(!should_exit);
    }
}
