//! Logging setup
//!
//! Everything logs through the `log` facade. Native builds print through
//! `env_logger` (filter with `RUST_LOG`, default `info`). Web builds have no
//! logger installed.

/// Install the logger. Safe to call more than once.
pub fn init() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or("info");
        // Fails only if a logger is already set, which is fine
        let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
    }
}
