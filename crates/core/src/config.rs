use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub crm: CrmConfig,
    pub notify: NotifyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CrmConfig {
    pub api_key: SecretString,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: SecretString,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub crm_api_key: Option<String>,
    pub crm_base_url: Option<String>,
    pub llm_model: Option<String>,
    pub notify_sender: Option<String>,
    pub notify_password: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                base_url: None,
                model: "gpt-4".to_string(),
                timeout_secs: 30,
            },
            crm: CrmConfig {
                api_key: String::new().into(),
                base_url: "https://api.hubapi.com".to_string(),
            },
            notify: NotifyConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                sender: String::new(),
                password: String::new().into(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("crmpilot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(crm) = patch.crm {
            if let Some(crm_api_key_value) = crm.api_key {
                self.crm.api_key = secret_value(crm_api_key_value);
            }
            if let Some(base_url) = crm.base_url {
                self.crm.base_url = base_url;
            }
        }

        if let Some(notify) = patch.notify {
            if let Some(smtp_host) = notify.smtp_host {
                self.notify.smtp_host = smtp_host;
            }
            if let Some(smtp_port) = notify.smtp_port {
                self.notify.smtp_port = smtp_port;
            }
            if let Some(sender) = notify.sender {
                self.notify.sender = sender;
            }
            if let Some(notify_password_value) = notify.password {
                self.notify.password = secret_value(notify_password_value);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CRMPILOT_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("CRMPILOT_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("CRMPILOT_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("CRMPILOT_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("CRMPILOT_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CRMPILOT_CRM_API_KEY") {
            self.crm.api_key = secret_value(value);
        }
        if let Some(value) = read_env("CRMPILOT_CRM_BASE_URL") {
            self.crm.base_url = value;
        }

        if let Some(value) = read_env("CRMPILOT_NOTIFY_SMTP_HOST") {
            self.notify.smtp_host = value;
        }
        if let Some(value) = read_env("CRMPILOT_NOTIFY_SMTP_PORT") {
            self.notify.smtp_port = parse_u16("CRMPILOT_NOTIFY_SMTP_PORT", &value)?;
        }
        if let Some(value) = read_env("CRMPILOT_NOTIFY_SENDER") {
            self.notify.sender = value;
        }
        if let Some(value) = read_env("CRMPILOT_NOTIFY_PASSWORD") {
            self.notify.password = secret_value(value);
        }

        let log_level =
            read_env("CRMPILOT_LOGGING_LEVEL").or_else(|| read_env("CRMPILOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CRMPILOT_LOGGING_FORMAT").or_else(|| read_env("CRMPILOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(crm_api_key) = overrides.crm_api_key {
            self.crm.api_key = secret_value(crm_api_key);
        }
        if let Some(crm_base_url) = overrides.crm_base_url {
            self.crm.base_url = crm_base_url;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(notify_sender) = overrides.notify_sender {
            self.notify.sender = notify_sender;
        }
        if let Some(notify_password) = overrides.notify_password {
            self.notify.password = secret_value(notify_password);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_crm(&self.crm)?;
        validate_notify(&self.notify)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("crmpilot.toml"), PathBuf::from("config/crmpilot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    Ok(())
}

fn validate_crm(crm: &CrmConfig) -> Result<(), ConfigError> {
    if crm.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "crm.api_key is required. Create a private app access token in your HubSpot account and set CRMPILOT_CRM_API_KEY".to_string(),
        ));
    }

    let base_url = crm.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "crm.base_url must start with http:// or https://".to_string(),
        ));
    }

    Ok(())
}

fn validate_notify(notify: &NotifyConfig) -> Result<(), ConfigError> {
    if notify.smtp_host.trim().is_empty() {
        return Err(ConfigError::Validation("notify.smtp_host must not be empty".to_string()));
    }

    if notify.smtp_port == 0 {
        return Err(ConfigError::Validation(
            "notify.smtp_port must be greater than zero".to_string(),
        ));
    }

    // An empty sender is allowed: notifications are skipped per request when
    // no recipient is present, and `doctor` reports send readiness.
    if !notify.sender.trim().is_empty() && !notify.sender.contains('@') {
        return Err(ConfigError::Validation(
            "notify.sender must be an email address".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    crm: Option<CrmPatch>,
    notify: Option<NotifyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CrmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NotifyPatch {
    smtp_host: Option<String>,
    smtp_port: Option<u16>,
    sender: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
