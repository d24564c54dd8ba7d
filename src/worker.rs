//! Helpers for the `pg_worker` binary that hosts the embedded test database.
//!
//! When the test suite runs as root, `PostgreSQL` refuses to start, so
//! `pg-embed-setup-unpriv` delegates cluster setup to `pg_worker`, which
//! re-executes itself as `nobody`. The quoting here builds that re-exec
//! command line when `runuser` is unavailable and `su -c` is used instead.

/// Quotes `value` as a single POSIX shell word.
///
/// The value is wrapped in single quotes; embedded quotes become `'\''`.
#[must_use]
pub fn shell_escape(value: &str) -> String {
    let quotes = value.matches('\'').count();
    let mut quoted = String::with_capacity(value.len() + 2 + quotes * 3);
    quoted.push('\'');
    for (index, segment) in value.split('\'').enumerate() {
        if index > 0 {
            quoted.push_str("'\\''");
        }
        quoted.push_str(segment);
    }
    quoted.push('\'');
    quoted
}

/// Joins a program and its arguments into one `sh -c` command string,
/// prefixed with `assignment` (for example `PG_WORKER_REEXEC=1`).
#[must_use]
pub fn reexec_command<'a>(
    assignment: &str,
    program: &str,
    args: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut command = format!("{assignment} exec {}", shell_escape(program));
    for arg in args {
        command.push(' ');
        command.push_str(&shell_escape(arg));
    }
    command
}
