use anyhow::Context;
use reqwest::header::{AUTHORIZATION, USER_AGENT as USER_AGENT_HEADER};
use serde::{Deserialize, Serialize};

use crate::controller::discord::interaction::CommandDefinition;
use crate::shared::{
    DISCORD_GLOBAL_COMMANDS_ENDPOINT, DISCORD_GUILD_COMMANDS_ENDPOINT, USER_AGENT,
};

const CHAT_INPUT_COMMAND_TYPE: u8 = 1;

/// Where and as whom the command catalog gets published.
#[derive(Debug, Clone)]
pub struct RegistrationTarget {
    pub bot_token: String,
    pub application_id: String,
    pub guild_id: Option<String>,
}

impl RegistrationTarget {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{key} must be set."))
        };

        Ok(RegistrationTarget {
            bot_token: required("DISCORD_BOT_TOKEN")?,
            application_id: required("DISCORD_APP_ID")?,
            guild_id: lookup("DISCORD_GUILD_ID").filter(|value| !value.trim().is_empty()),
        })
    }

    /// Guild-scoped when a guild id is present, global otherwise.
    pub fn endpoint(&self, root: &str) -> String {
        let path = match &self.guild_id {
            Some(guild_id) => DISCORD_GUILD_COMMANDS_ENDPOINT
                .replace("$APPLICATION_ID", &self.application_id)
                .replace("$GUILD_ID", guild_id),
            None => DISCORD_GLOBAL_COMMANDS_ENDPOINT.replace("$APPLICATION_ID", &self.application_id),
        };

        format!("{}{}", root.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPayload<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "type")]
    pub kind: u8,
}

pub fn build_payload(commands: &[CommandDefinition]) -> Vec<CommandPayload<'_>> {
    commands
        .iter()
        .map(|command| CommandPayload {
            name: command.name,
            description: command.description,
            kind: CHAT_INPUT_COMMAND_TYPE,
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Replaces the whole published catalog with `commands`.
pub async fn bulk_overwrite_commands(
    client: &reqwest::Client,
    root: &str,
    target: &RegistrationTarget,
    commands: &[CommandDefinition],
) -> anyhow::Result<Vec<RegisteredCommand>> {
    let endpoint = target.endpoint(root);
    tracing::debug!("Overwriting commands at {}", &endpoint);

    let response = client
        .put(&endpoint)
        .header(AUTHORIZATION, format!("Bot {}", &target.bot_token))
        .header(USER_AGENT_HEADER, USER_AGENT)
        .json(&build_payload(commands))
        .send()
        .await
        .context("Failed to send command registration request.")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let error_msg = format!("Could not register commands: {status} {body}");
        tracing::error!("{}", &error_msg);
        return Err(anyhow::anyhow!("{}", error_msg));
    }

    response
        .json::<Vec<RegisteredCommand>>()
        .await
        .context("Failed to decode registered commands.")
}
