use std::{
    borrow::Cow,
    fmt,
    io::IsTerminal,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::{Parser, ValueEnum};
use config::Config;
use logforth::filter::EnvFilter;
use secrecy::SecretString;

const DEFAULT_PORT: u16 = 3000;

/// Loads `KEY=value` pairs from a `.env` file into the process environment.
///
/// Must run before parsing the arguments, so the variables act as fallbacks for
/// the `env` flags. Variables that are already set are not overwritten.
pub fn load_env_file(path: &Path) -> Option<PathBuf> {
    dotenv::from_path(path).ok().map(|()| path.to_path_buf())
}

#[derive(Debug, Parser)]
#[command(name = "Graphchain", version, long_about = concat!("Graphchain chat backend v", env!("CARGO_PKG_VERSION")))]
pub struct Args {
    /// IP address on which the server will listen for incoming connections.
    /// Takes precedence over --port.
    #[arg(short, long, env = "GRAPHCHAIN_LISTEN_ADDRESS")]
    pub listen_address: Option<SocketAddr>,
    /// Port to listen on, on all interfaces. Default: 127.0.0.1:3000
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
    /// Alternative name for --port.
    #[arg(long, env = "SERVER_PORT", hide = true)]
    pub server_port: Option<u16>,
    /// Path to the TOML configuration file
    #[arg(long, short, env = "GRAPHCHAIN_CONFIG_PATH", default_value = "./graphchain.toml")]
    pub config: PathBuf,
    /// Groq API key. The server refuses to start without one.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Groq model identifier
    #[arg(long, env = "GROQ_MODEL")]
    pub model: Option<String>,
    /// Sampling temperature, between 0 and 2
    #[arg(long, env = "GROQ_TEMPERATURE")]
    pub temperature: Option<f32>,
    /// Instruction prepended to every conversation
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,
    /// Set the logging level, this applies to all logs.
    #[arg(long = "log", env = "GRAPHCHAIN_LOG", default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
    /// Set the style of log output
    #[arg(long, env = "GRAPHCHAIN_LOG_STYLE", default_value_t = LogStyle::default())]
    pub log_style: LogStyle,
}

impl Args {
    /// Loads the configuration file, if any, and applies command line and environment overrides.
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = if self.config.exists() {
            Config::load(&self.config)?
        } else {
            log::debug!("No configuration file at {}, using defaults", self.config.display());
            Config::default()
        };

        if let Some(api_key) = &self.api_key {
            config.chat.api_key = Some(SecretString::from(api_key.trim().to_string()));
        }

        if let Some(model) = &self.model {
            config.chat.model = model.clone();
        }

        if let Some(temperature) = self.temperature {
            config.chat.temperature = temperature;
        }

        if let Some(system_prompt) = &self.system_prompt {
            config.chat.system_prompt = Some(system_prompt.clone());
        }

        config.validate()?;

        Ok(config)
    }

    pub fn listen_address(&self, config: &Config) -> SocketAddr {
        if let Some(address) = self.listen_address {
            return address;
        }

        if let Some(port) = self.port.or(self.server_port) {
            return SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        }

        config
            .server
            .listen_address
            .unwrap_or(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogStyle {
    /// Colorized text, used as the default with TTY output
    Color,
    /// Standard text, used as the default with non-TTY output
    Text,
    /// JSON objects
    Json,
}

impl Default for LogStyle {
    fn default() -> Self {
        if std::io::stdout().is_terminal() {
            LogStyle::Color
        } else {
            LogStyle::Text
        }
    }
}

impl AsRef<str> for LogStyle {
    fn as_ref(&self) -> &str {
        match self {
            LogStyle::Color => "color",
            LogStyle::Text => "text",
            LogStyle::Json => "json",
        }
    }
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Disable logging
    Off,
    /// Only log errors
    Error,
    /// Log errors, and warnings
    Warn,
    /// Log errors, warnings, and info messages
    #[default]
    Info,
    /// Log errors, warnings, info, and debug messages
    Debug,
    /// Log errors, warnings, info, debug, and trace messages
    Trace,
}

impl LogLevel {
    pub fn env_filter(self) -> EnvFilter {
        let filter_str = match self {
            LogLevel::Off => Cow::Borrowed("off"),
            // Dependencies stay at warn, workspace crates use the selected level.
            level => Cow::Owned(format!(
                "warn,graphchain={level},server={level},config={level},chat={level}"
            )),
        };

        EnvFilter::from_str(&filter_str).expect("These all are valid env filters.")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
