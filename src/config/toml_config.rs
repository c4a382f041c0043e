use crate::config::ClientConfig;
use crate::utils::error::{Result, UnleashError};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(Self::table_from_file(path)?)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_table(Self::table_from_toml_str(content)?)
    }

    /// 讀取檔案但不檢查必填欄位，讓呼叫端先合併其他來源的值
    pub fn table_from_file<P: AsRef<Path>>(path: P) -> Result<toml::Table> {
        let content = std::fs::read_to_string(&path)?;
        Self::table_from_toml_str(&content)
    }

    pub fn table_from_toml_str(content: &str) -> Result<toml::Table> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| UnleashError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_table(table: toml::Table) -> Result<Self> {
        toml::Value::Table(table)
            .try_into::<Self>()
            .map_err(|e| UnleashError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })
    }
}

/// 替換環境變數 (例如 ${UNLEASH_API_TOKEN})，找不到的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
