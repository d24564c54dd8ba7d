//! Runs embedded `PostgreSQL` lifecycle steps on behalf of the test harness.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is the JSON-encoded [`WorkerPayload`] that
//! `pg-embed-setup-unpriv` writes before delegating to this binary: cluster
//! settings plus the environment overrides to apply first. A trimmed example:
//!
//! ```json
//! {
//!   "environment": { "TZ": "UTC", "PGPASSFILE": null },
//!   "settings": {
//!     "version": "=16.4.0",
//!     "port": 15433,
//!     "username": "postgres",
//!     "password": "postgres",
//!     "data_dir": "/tmp/kanban-pg/data",
//!     "installation_dir": "/tmp/kanban-pg/install",
//!     "temporary": false,
//!     "timeout_secs": 30,
//!     "configuration": {},
//!     "trust_installation_dir": true
//!   }
//! }
//! ```
//!
//! Started as root, the binary re-executes itself as `nobody` (through
//! `runuser`, falling back to `su`) because `PostgreSQL` will not run as root.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use kanban_core::worker::reexec_command;
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::{self, Read};
#[cfg(unix)]
use std::process::{Command, ExitStatus};
#[cfg(unix)]
use std::{env, mem::ManuallyDrop};
#[cfg(unix)]
use thiserror::Error;

#[cfg(unix)]
const REEXEC_MARKER: &str = "PG_WORKER_REEXEC";
#[cfg(unix)]
const SAFE_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    Usage(String),
    #[error("failed to read worker payload: {0}")]
    PayloadRead(#[source] BoxError),
    #[error("failed to parse worker payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to drop privileges: {0}")]
    Privileges(String),
    #[error("postgres {operation} failed: {message}")]
    Postgres {
        operation: &'static str,
        message: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    fn parse(raw: &str) -> Result<Self, WorkerError> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!(
                "unknown pg_worker operation '{other}'; expected setup, start, or stop"
            ))),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = utf8_args()?;
    // Usage errors are reported before any privilege change.
    let (operation, payload_path) = parse_args(args.clone())?;
    reexec_unprivileged(&args)?;
    run(operation, &payload_path).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix platforms".into())
}

#[cfg(unix)]
fn utf8_args() -> Result<Vec<Utf8PathBuf>, WorkerError> {
    env::args_os()
        .map(|raw| {
            raw.into_string()
                .map(Utf8PathBuf::from)
                .map_err(|_| WorkerError::Usage("argument is not valid UTF-8".into()))
        })
        .collect()
}

#[cfg(unix)]
fn run(operation: Operation, payload_path: &Utf8Path) -> Result<(), WorkerError> {
    let payload = read_payload(payload_path)?;
    drop_root(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    let postgres = PostgreSQL::new(settings);
    runtime.block_on(execute(operation, postgres))
}

#[cfg(unix)]
async fn execute(operation: Operation, mut postgres: PostgreSQL) -> Result<(), WorkerError> {
    let failed = |err: postgresql_embedded::Error| WorkerError::Postgres {
        operation: operation.as_str(),
        message: err.to_string(),
    };
    match operation {
        Operation::Setup => {
            postgres.setup().await.map_err(failed)?;
            start_if_stopped(&mut postgres).await.map_err(failed)
        }
        Operation::Start => {
            start_if_stopped(&mut postgres).await.map_err(failed)?;
            // Dropping the handle would stop the server; it must outlive this process.
            let _running = ManuallyDrop::new(postgres);
            Ok(())
        }
        Operation::Stop => postgres.stop().await.map_err(failed),
    }
}

#[cfg(unix)]
async fn start_if_stopped(postgres: &mut PostgreSQL) -> Result<(), postgresql_embedded::Error> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres.start().await
}

#[cfg(unix)]
fn parse_args(args: Vec<Utf8PathBuf>) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let mut rest = args.into_iter().skip(1);
    let operation = rest
        .next()
        .ok_or_else(|| WorkerError::Usage("missing operation argument".into()))
        .and_then(|raw| Operation::parse(raw.as_str()))?;
    let payload_path = rest
        .next()
        .ok_or_else(|| WorkerError::Usage("missing config path argument".into()))?;
    if let Some(extra) = rest.next() {
        return Err(WorkerError::Usage(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok((operation, payload_path))
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let bytes = read_file(path).map_err(WorkerError::PayloadRead)?;
    serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
}

#[cfg(unix)]
fn read_file(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let mut file = dir.open(relative.as_std_path())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Re-runs this binary as the unprivileged user and exits with its status.
#[cfg(unix)]
fn reexec_unprivileged(args: &[Utf8PathBuf]) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() || env::var_os(REEXEC_MARKER).is_some() {
        return Ok(());
    }

    let exe = env::current_exe()
        .map_err(WorkerError::Runtime)?
        .into_os_string()
        .into_string()
        .map(Utf8PathBuf::from)
        .map_err(|_| WorkerError::Runtime(io::Error::other("executable path is not UTF-8")))?;
    let forwarded: Vec<&str> = args.iter().skip(1).map(|arg| arg.as_str()).collect();

    let status = match Command::new("runuser")
        .args(["-u", UNPRIVILEGED_USER, "--"])
        .arg(exe.as_std_path())
        .args(&forwarded)
        .env(REEXEC_MARKER, "1")
        .env("PATH", SAFE_PATH)
        .status()
    {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => reexec_via_su(&exe, &forwarded)?,
        Err(err) => return Err(WorkerError::Privileges(err.to_string())),
    };
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(unix)]
fn reexec_via_su(exe: &Utf8Path, forwarded: &[&str]) -> Result<ExitStatus, WorkerError> {
    let command = reexec_command(
        &format!("{REEXEC_MARKER}=1"),
        exe.as_str(),
        forwarded.iter().copied(),
    );
    Command::new("/bin/su")
        .args(["-s", "/bin/sh", UNPRIVILEGED_USER, "-c"])
        .arg(command)
        .env("PATH", SAFE_PATH)
        .status()
        .map_err(|err| WorkerError::Privileges(err.to_string()))
}

#[cfg(unix)]
fn drop_root(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }
    let denied = |err: nix::Error| WorkerError::Privileges(err.to_string());
    let user = User::from_name(username)
        .map_err(denied)?
        .ok_or_else(|| WorkerError::Privileges(format!("user '{username}' not found")))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::Privileges(format!("invalid user name: {err}")))?;
    initgroups(&name, user.gid).map_err(denied)?;
    setgid(user.gid).map_err(denied)?;
    setuid(user.uid).map_err(denied)?;

    // SAFETY: the worker is single-threaded at this point; no runtime exists yet.
    unsafe {
        env::set_var("HOME", &user.dir);
        env::set_var("USER", &user.name);
        env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: called before the runtime is built, while only the main thread runs.
        unsafe {
            match value {
                Some(secret) => env::set_var(key, secret.expose()),
                None => env::remove_var(key),
            }
        }
    }
}
