use anyhow::Context as _;
use clap::Parser;
use std::collections::HashMap;
use std::time::Duration;
use unleash_client::config::cli::{CheckArgs, Command};
use unleash_client::constants::MAX_INTERVAL;
use unleash_client::utils::error::ErrorSeverity;
use unleash_client::utils::{logger, validation::Validate};
use unleash_client::{CliConfig, UnleashClient, UnleashError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting unleash CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 合併並驗證配置
    let config = match cli.to_client_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let mut client = match UnleashClient::new(config, HashMap::new()) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    client.initialize_client().await;

    match &cli.command {
        Command::Check(args) => {
            print_evaluation(&client, args);
        }
        Command::Watch { check, every } => {
            let period = Duration::from_secs((*every).clamp(1, MAX_INTERVAL));
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => print_evaluation(&client, check),
                    signal = tokio::signal::ctrl_c() => {
                        signal.context("failed to listen for Ctrl-C")?;
                        tracing::info!("Received Ctrl-C, shutting down");
                        break;
                    }
                }
            }
        }
    }

    client
        .destroy()
        .await
        .context("failed to shut down the unleash client")?;
    Ok(())
}

fn print_evaluation(client: &UnleashClient, args: &CheckArgs) {
    let enabled = client.is_enabled(&args.feature, &args.context(), args.default);
    println!("{}: {}", args.feature, enabled);
}

fn exit_with(e: &UnleashError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
