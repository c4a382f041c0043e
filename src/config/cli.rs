use crate::config::ClientConfig;
use crate::domain::Context;
use crate::utils::error::{Result, UnleashError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "unleash")]
#[command(about = "Evaluate Unleash feature toggles from the command line")]
pub struct CliConfig {
    /// TOML configuration file; flags given on the command line override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Unleash API URL
    #[arg(long, env = "UNLEASH_URL")]
    pub url: Option<String>,

    #[arg(long, env = "UNLEASH_APP_NAME")]
    pub app_name: Option<String>,

    #[arg(long)]
    pub environment: Option<String>,

    #[arg(long)]
    pub instance_id: Option<String>,

    /// Seconds between feature refreshes
    #[arg(long)]
    pub refresh_interval: Option<u64>,

    /// Seconds between metrics submissions
    #[arg(long)]
    pub metrics_interval: Option<u64>,

    #[arg(long)]
    pub disable_metrics: bool,

    #[arg(long)]
    pub disable_registration: bool,

    /// Extra header sent with every request, as NAME=VALUE
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long)]
    pub cache_directory: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines instead of the compact format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Evaluate a feature once and exit
    Check(CheckArgs),
    /// Keep the client running and print the evaluation periodically
    Watch {
        #[command(flatten)]
        check: CheckArgs,

        /// Seconds between evaluations
        #[arg(long, default_value = "5")]
        every: u64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    pub feature: String,

    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long)]
    pub session_id: Option<String>,

    #[arg(long)]
    pub remote_address: Option<String>,

    /// Value returned when the feature is unknown or evaluation fails
    #[arg(long)]
    pub default: bool,
}

impl CheckArgs {
    pub fn context(&self) -> Context {
        Context {
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
            remote_address: self.remote_address.clone(),
            ..Context::default()
        }
    }
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    Ok((name.trim().to_string(), value.to_string()))
}

fn missing(field: &str) -> UnleashError {
    UnleashError::MissingConfigError {
        field: field.to_string(),
    }
}

impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut table = ClientConfig::table_from_file(path)?;
                // 必填欄位可由命令列補上，須在反序列化前合併
                for (field, value) in [("url", &self.url), ("app_name", &self.app_name)] {
                    if let Some(value) = value {
                        table.insert(field.to_string(), toml::Value::String(value.clone()));
                    }
                    if !table.contains_key(field) {
                        return Err(missing(field));
                    }
                }
                ClientConfig::from_table(table)?
            }
            None => {
                let url = self.url.clone().ok_or_else(|| missing("url"))?;
                let app_name = self.app_name.clone().ok_or_else(|| missing("app_name"))?;
                ClientConfig::new(url, app_name)
            }
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(app_name) = &self.app_name {
            config.app_name = app_name.clone();
        }
        if let Some(environment) = &self.environment {
            config.environment = environment.clone();
        }
        if let Some(instance_id) = &self.instance_id {
            config.instance_id = instance_id.clone();
        }
        if let Some(refresh_interval) = self.refresh_interval {
            config.refresh_interval = refresh_interval;
        }
        if let Some(metrics_interval) = self.metrics_interval {
            config.metrics_interval = metrics_interval;
        }
        if self.disable_metrics {
            config.disable_metrics = true;
        }
        if self.disable_registration {
            config.disable_registration = true;
        }
        for (name, value) in &self.headers {
            config.custom_headers.insert(name.clone(), value.clone());
        }
        if let Some(dir) = &self.cache_directory {
            config.cache_directory = Some(dir.clone());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_check_command() {
        let cli = CliConfig::try_parse_from([
            "unleash",
            "--url",
            "http://localhost:4242/api",
            "--app-name",
            "cli-test",
            "--header",
            "Authorization=token=abc",
            "check",
            "myFeature",
            "--user-id",
            "42",
        ])
        .unwrap();

        let config = cli.to_client_config().unwrap();
        assert_eq!(config.app_name, "cli-test");
        assert_eq!(config.custom_headers["Authorization"], "token=abc");

        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.feature, "myFeature");
                assert_eq!(args.context().user_id.as_deref(), Some("42"));
                assert!(!args.default);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                b"url = \"http://from-file:4242/api\"\napp_name = \"file-app\"\nrefresh_interval = 30\n",
            )
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "unleash",
            "--config",
            path.as_str(),
            "--refresh-interval",
            "5",
            "watch",
            "myFeature",
            "--every",
            "2",
        ])
        .unwrap();

        let config = cli.to_client_config().unwrap();
        assert_eq!(config.url, "http://from-file:4242/api");
        assert_eq!(config.refresh_interval, 5);
        assert!(matches!(cli.command, Command::Watch { every: 2, .. }));
    }

    #[test]
    fn test_flags_fill_required_fields_missing_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"environment = \"staging\"\nmetrics_interval = 30\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "unleash",
            "--config",
            path.as_str(),
            "--url",
            "http://localhost:4242/api",
            "--app-name",
            "cli-test",
            "check",
            "myFeature",
        ])
        .unwrap();

        let config = cli.to_client_config().unwrap();
        assert_eq!(config.url, "http://localhost:4242/api");
        assert_eq!(config.app_name, "cli-test");
        assert_eq!(config.environment, "staging");
        assert_eq!(config.metrics_interval, 30);
    }

    #[test]
    fn test_missing_url_is_reported() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"app_name = \"file-app\"\n").unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from(["unleash", "--config", path.as_str(), "check", "f"])
            .unwrap();

        let result = cli.to_client_config();
        assert!(matches!(
            result,
            Err(UnleashError::MissingConfigError { ref field }) if field == "url"
        ));
    }

    #[test]
    fn test_json_logs_flag() {
        let cli = CliConfig::try_parse_from(["unleash", "--json-logs", "check", "f"]).unwrap();
        assert!(cli.json_logs);
        assert!(!cli.verbose);

        let cli = CliConfig::try_parse_from(["unleash", "check", "f"]).unwrap();
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_bad_header_is_rejected() {
        let result = CliConfig::try_parse_from([
            "unleash",
            "--header",
            "no-equals-sign",
            "check",
            "f",
        ]);
        assert!(result.is_err());
    }
}
