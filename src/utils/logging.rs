use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Instala o subscriber global; `RUST_LOG` tem precedência sobre `--verbose`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignora o erro caso um subscriber já tenha sido instalado
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_command_started(command: &str) {
    debug!("Running command: {}", command);
}

pub fn log_command_finished(command: &str, duration_ms: u128) {
    info!("Command {} finished in {}ms", command, duration_ms);
}

pub fn log_command_failed(command: &str, err: &str) {
    error!("Command {} failed: {}", command, err);
}
