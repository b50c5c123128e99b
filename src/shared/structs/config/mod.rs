use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::Level;

pub const CONFIG_DIRECTORY_ENV: &str = "CONFIG_DIRECTORY";
pub const CONFIG_FILE_NAME_ENV: &str = "CONFIG_FILE_NAME";

/// What to do with a command name that has no handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCommandPolicy {
    /// Log it and answer with an empty 200.
    #[default]
    Ignore,
    /// Answer with an ephemeral "unknown command" message.
    Reply,
}

impl FromStr for UnknownCommandPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnknownCommandPolicy::Ignore),
            "reply" => Ok(UnknownCommandPolicy::Reply),
            other => Err(anyhow::anyhow!(
                "Unknown command policy must be `ignore` or `reply`, got `{other}`."
            )),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub server_bind_point: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub unknown_command: UnknownCommandPolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Configuration {
            server_bind_point: "0.0.0.0".into(),
            port: 8080,
            log_level: "DEBUG".into(),
            unknown_command: UnknownCommandPolicy::Ignore,
        }
    }

    /// Loads the config file when `CONFIG_DIRECTORY` and `CONFIG_FILE_NAME`
    /// are both set, then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Setting only one of the two file variables is an error; the file
    /// would otherwise be skipped without notice.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = match (lookup(CONFIG_DIRECTORY_ENV), lookup(CONFIG_FILE_NAME_ENV)) {
            (Some(directory), Some(file_name)) => {
                Self::load_from_config_file(Path::new(&directory), &file_name)?
            }
            (None, None) => Self::new(),
            (Some(_), None) => anyhow::bail!(
                "{CONFIG_DIRECTORY_ENV} is set but {CONFIG_FILE_NAME_ENV} is not; set both or neither."
            ),
            (None, Some(_)) => anyhow::bail!(
                "{CONFIG_FILE_NAME_ENV} is set but {CONFIG_DIRECTORY_ENV} is not; set both or neither."
            ),
        };

        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Reads the TOML file, writing a default one first if it does not exist.
    pub fn load_from_config_file(config_directory: &Path, file_name: &str) -> anyhow::Result<Self> {
        if !config_directory.exists() {
            std::fs::create_dir_all(config_directory).with_context(|| {
                format!("Failed to create config directory {}", config_directory.display())
            })?;
        }

        let configuration_path = config_directory.join(file_name);
        if !configuration_path.exists() {
            let new_config = Configuration::new();
            let serialized = toml::to_string_pretty(&new_config)?;
            std::fs::write(&configuration_path, serialized)?;
            Ok(new_config)
        } else {
            let raw_config = std::fs::read_to_string(&configuration_path)?;
            let deserialized: Configuration = toml::from_str(&raw_config).with_context(|| {
                format!("Failed to parse config file {}", configuration_path.display())
            })?;
            Ok(deserialized)
        }
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(bind_point) = lookup("SERVER_BIND_POINT") {
            self.server_bind_point = bind_point;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }

        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(policy) = lookup("UNKNOWN_COMMAND") {
            self.unknown_command = policy.parse()?;
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_bind_point, self.port)
    }

    pub fn tracing_level(&self) -> Level {
        match self.log_level.as_str() {
            "TRACE" => Level::TRACE,
            "INFO" => Level::INFO,
            "WARN" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => Level::DEBUG,
        }
    }
}
