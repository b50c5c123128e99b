use std::fmt;

use anyhow::Context;

use crate::controller::discord::interaction::{COMMANDS, CommandDefinition};
use crate::shared::structs::config::UnknownCommandPolicy;

pub mod config;
pub mod discord;

pub const PUBLIC_KEY_ENV: &str = "DISCORD_APP_PUBLIC_KEY";
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// The sender's Ed25519 verifying key, decoded once at startup.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ApplicationPublicKey([u8; PUBLIC_KEY_LENGTH]);

impl ApplicationPublicKey {
    pub fn from_hex(value: &str) -> anyhow::Result<Self> {
        let bytes =
            hex::decode(value.trim()).context("Failed to decode public key from hex value.")?;

        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!(
                "Public key must be {PUBLIC_KEY_LENGTH} bytes long, got {} bytes.",
                bytes.len()
            )
        })?;

        Ok(ApplicationPublicKey(bytes))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let value = std::env::var(PUBLIC_KEY_ENV)
            .with_context(|| format!("{PUBLIC_KEY_ENV} must be set."))?;

        if value.trim().is_empty() {
            anyhow::bail!("{PUBLIC_KEY_ENV} must not be empty.");
        }

        Self::from_hex(&value)
    }

    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        ApplicationPublicKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ApplicationPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApplicationPublicKey")
            .field(&hex::encode(self.0))
            .finish()
    }
}

/// Read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub public_key: ApplicationPublicKey,
    pub commands: &'static [CommandDefinition],
    pub unknown_command: UnknownCommandPolicy,
}

impl AppState {
    pub fn new(public_key: ApplicationPublicKey, unknown_command: UnknownCommandPolicy) -> Self {
        AppState {
            public_key,
            commands: COMMANDS,
            unknown_command,
        }
    }

    #[cfg(test)]
    pub fn with_commands(mut self, commands: &'static [CommandDefinition]) -> Self {
        self.commands = commands;
        self
    }
}
