//! Shared integration-test harness: runs the `nixos-options` binary against
//! a fake `nix` shell script.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{LazyLock, Mutex, PoisonError};

use tempfile::TempDir;

/// Evaluator output used by most tests.
pub const EXAMPLE_RESPONSE: &str =
    r#"{"key": {"type": "str", "description": "example description", "default": "example default"}}"#;

// Writing an executable while another test thread forks can make exec fail
// with ETXTBSY, so processes are spawned one at a time.
static SPAWN_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// A scratch directory holding a fake `nix` executable.
pub struct FakeNix {
    dir: TempDir,
}

impl FakeNix {
    /// A fake `nix` that prints `json` and exits 0.
    pub fn printing(json: &str) -> Self {
        Self::with_script(&format!("cat <<'JSON'\n{json}\nJSON"))
    }

    /// A fake `nix` that prints `stderr` to standard error and exits 1.
    pub fn failing(stderr: &str) -> Self {
        Self::with_script(&format!("cat >&2 <<'ERR'\n{stderr}\nERR\nexit 1"))
    }

    /// A fake `nix` running an arbitrary shell script body.
    #[allow(clippy::missing_panics_doc)]
    pub fn with_script(body: &str) -> Self {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nix");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake nix");
        set_executable(&path);
        Self { dir }
    }

    /// Path of the fake binary.
    pub fn bin(&self) -> PathBuf {
        self.dir.path().join("nix")
    }

    /// The scratch directory, for fixture files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake nix");
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}

/// Runs the binary with `args`, feeding `stdin`, and waits for it to exit.
#[allow(clippy::missing_panics_doc)]
pub fn run(args: &[&str], stdin: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_nixos-options");
    let mut child = {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Command::new(bin)
            .args(args)
            .env_remove("NIXOS_OPTIONS_CONFIG")
            .env_remove("NIXOS_OPTIONS_ENABLE")
            .env_remove("NIXOS_OPTIONS_EVALUATOR_BIN")
            .env_remove("NIXOS_OPTIONS_EVALUATOR_EXTRA_ARGS")
            .env_remove("NIXOS_OPTIONS_TEMPLATE")
            .env_remove("NIXOS_OPTIONS_LOG_LEVEL")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn nixos-options")
    };

    // The child may exit before reading stdin (usage errors); a broken pipe
    // here is not a test failure.
    let _ = child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(stdin.as_bytes());

    child.wait_with_output().expect("wait for nixos-options")
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
