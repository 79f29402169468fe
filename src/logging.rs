use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter, e.g. `LINESH_LOG=debug`.
pub const LOG_ENV: &str = "LINESH_LOG";

/// Installs the logger. Logging is off unless `LINESH_LOG` is set, and
/// always goes to stderr so it never lands in command output.
pub fn init_logger() {
    Builder::from_env(Env::new().filter_or(LOG_ENV, "off"))
        .target(Target::Stderr)
        .format_timestamp_millis()
        .init();
}
