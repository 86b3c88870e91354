/// CLI do Pachca
///
/// Carrega a configuração em camadas (arquivos `config/`, `.env`, variáveis `PACHCA_*`
/// e flags), executa um comando do SDK `pachca_v1` e imprime a resposta.
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use pachca_cli::commands::{execute_command, output_response, Cli, CliResponse};
use pachca_cli::config::Settings;
use pachca_cli::utils::logging::{
    init, log_command_failed, log_command_finished, log_command_started, log_config_loaded,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env se existir
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init(cli.verbose);

    let mut settings = Settings::new().context("Failed to load settings")?;
    cli.apply_overrides(&mut settings);
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let name = cli.command.name();
    log_command_started(name);
    let started = Instant::now();

    match execute_command(&cli.command, &settings).await {
        Ok(response) => {
            log_command_finished(name, started.elapsed().as_millis());
            output_response(&response, &cli.output);
            Ok(())
        }
        Err(e) => {
            log_command_failed(name, &e.to_string());
            output_response(&CliResponse::error(e.to_string()), &cli.output);
            std::process::exit(e.exit_code());
        }
    }
}
