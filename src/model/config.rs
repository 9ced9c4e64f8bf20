use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 新账户的密码存储方案
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordScheme {
    /// bcrypt（加盐、慢哈希）
    #[default]
    Bcrypt,
    /// 旧版 32 位滚动摘要（仅用于演示数据兼容）
    Legacy,
}

/// 用户分析 CSV 的数值校验级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsValidation {
    /// userId、avgDuration、numCalls 全部可解析才保留该行
    #[default]
    Strict,
    /// 仅校验 userId，其余字段解析失败时为 null
    Lenient,
}

/// 通话记录缺失字段的处理策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFieldPolicy {
    /// 丢弃该行
    #[default]
    Reject,
    /// 使用确定性的占位值补齐
    Default,
}

/// 上游 CSV 数据集地址
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    /// 通话记录 CSV
    #[serde(default = "default_call_logs_url")]
    pub call_logs_url: String,
    /// 用户分析 CSV
    #[serde(default = "default_user_analytics_url")]
    pub user_analytics_url: String,
    /// 按 userId、startTime 排好序的通话记录 CSV
    #[serde(default = "default_ordered_calls_url")]
    pub ordered_calls_url: String,
}

fn default_call_logs_url() -> String {
    "http://127.0.0.1:9000/callLogs.csv".to_string()
}

fn default_user_analytics_url() -> String {
    "http://127.0.0.1:9000/userAnalytics.csv".to_string()
}

fn default_ordered_calls_url() -> String {
    "http://127.0.0.1:9000/orderedCalls.csv".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            call_logs_url: default_call_logs_url(),
            user_analytics_url: default_user_analytics_url(),
            ordered_calls_url: default_ordered_calls_url(),
        }
    }
}

/// Callboard 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub datasets: DatasetConfig,

    /// HTTP 代理地址（可选）
    /// 支持格式: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// 上游请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 会话 JWT 签名密钥（可选，未配置时每次启动随机生成）
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_secret: Option<String>,

    /// 会话有效期（秒）
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// 账户 SQLite 数据库路径（可选，未配置时使用内存存储）
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_db: Option<String>,

    /// 启动时写入演示账户 demo@example.com / password123
    #[serde(default = "default_seed_demo_account")]
    pub seed_demo_account: bool,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default)]
    pub password_scheme: PasswordScheme,

    #[serde(default)]
    pub analytics_validation: AnalyticsValidation,

    #[serde(default)]
    pub missing_field_policy: MissingFieldPolicy,

    /// 配置文件路径（运行时元数据，不写入 JSON）
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_session_ttl_secs() -> u64 {
    12 * 60 * 60
}

fn default_seed_demo_account() -> bool {
    true
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            datasets: DatasetConfig::default(),
            proxy_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            session_secret: None,
            session_ttl_secs: default_session_ttl_secs(),
            accounts_db: None,
            seed_demo_account: default_seed_demo_account(),
            bcrypt_cost: default_bcrypt_cost(),
            password_scheme: PasswordScheme::default(),
            analytics_validation: AnalyticsValidation::default(),
            missing_field_policy: MissingFieldPolicy::default(),
            config_path: None,
        }
    }
}

/// 覆盖会话密钥的环境变量
pub const SESSION_SECRET_ENV: &str = "CALLBOARD_SESSION_SECRET";

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 用环境变量覆盖敏感配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(SESSION_SECRET_ENV) {
            if !secret.trim().is_empty() {
                self.session_secret = Some(secret);
            }
        }
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load("/nonexistent/callboard/config.json").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.analytics_validation, AnalyticsValidation::Strict);
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Reject);
        assert!(config.seed_demo_account);
        assert!(config.config_path().is_some());
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let json = r#"{
            "port": 9001,
            "datasets": { "callLogsUrl": "http://blob/calls.csv" },
            "analyticsValidation": "lenient",
            "missingFieldPolicy": "default",
            "passwordScheme": "legacy",
            "accountsDb": "accounts.db"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.datasets.call_logs_url, "http://blob/calls.csv");
        assert_eq!(
            config.datasets.user_analytics_url,
            default_user_analytics_url()
        );
        assert_eq!(config.analytics_validation, AnalyticsValidation::Lenient);
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Default);
        assert_eq!(config.password_scheme, PasswordScheme::Legacy);
        assert_eq!(config.accounts_db.as_deref(), Some("accounts.db"));
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
