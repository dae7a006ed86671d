use std::path::Path;

use anyhow::{Context, bail};
use indoc::indoc;
use secrecy::ExposeSecret;

use crate::{AnyOrArray, Config};

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    let chat = &config.chat;

    let has_api_key = chat
        .api_key
        .as_ref()
        .is_some_and(|key| !key.expose_secret().trim().is_empty());

    if !has_api_key {
        bail!(indoc! {r#"
            Missing Groq API key. The service cannot answer chat requests without it.

            Set it in the environment:

              GROQ_API_KEY=gsk_... graphchain

            in a .env file in the working directory:

              GROQ_API_KEY=gsk_...

            or in the configuration file:

              [chat]
              api_key = "gsk_..."
        "#});
    }

    if chat.model.trim().is_empty() {
        bail!("The chat model identifier must not be empty");
    }

    if !chat.temperature.is_finite() || !(0.0..=2.0).contains(&chat.temperature) {
        bail!(
            "The chat temperature must be between 0 and 2, got {}",
            chat.temperature
        );
    }

    if !chat.path.starts_with('/') {
        bail!("The chat path must start with '/', got '{}'", chat.path);
    }

    if let Some(cors) = &config.server.cors
        && cors.allow_credentials
        && matches!(cors.allow_origins, Some(AnyOrArray::Any))
    {
        bail!("CORS credentials cannot be allowed together with any origin; list the allowed origins explicitly");
    }

    let health = &config.server.health;

    if health.enabled && health.path.trim_end_matches('/') == chat.path.trim_end_matches('/') {
        bail!("The chat path '{}' collides with the health endpoint", chat.path);
    }

    Ok(())
}
