use serde::{Deserialize, Serialize};

/// Message flag that makes a reply visible only to the invoking user.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    ApplicationCommandAutocomplete,
    ModalSubmit,
    Unknown(u8),
}

impl From<u8> for InteractionType {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            3 => InteractionType::MessageComponent,
            4 => InteractionType::ApplicationCommandAutocomplete,
            5 => InteractionType::ModalSubmit,
            other => InteractionType::Unknown(other),
        }
    }
}

impl From<InteractionType> for u8 {
    fn from(value: InteractionType) -> Self {
        match value {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::MessageComponent => 3,
            InteractionType::ApplicationCommandAutocomplete => 4,
            InteractionType::ModalSubmit => 5,
            InteractionType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub data: Option<CommandData>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub member: Option<Member>,
}

impl Interaction {
    /// The invoking user, whether the command came from a guild or a DM.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .or(self.user.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandData {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Member {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionResponseType {
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
    DeferredUpdateMessage,
    UpdateMessage,
    Unknown(u8),
}

impl From<u8> for InteractionResponseType {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionResponseType::Pong,
            4 => InteractionResponseType::ChannelMessageWithSource,
            5 => InteractionResponseType::DeferredChannelMessageWithSource,
            6 => InteractionResponseType::DeferredUpdateMessage,
            7 => InteractionResponseType::UpdateMessage,
            other => InteractionResponseType::Unknown(other),
        }
    }
}

impl From<InteractionResponseType> for u8 {
    fn from(value: InteractionResponseType) -> Self {
        match value {
            InteractionResponseType::Pong => 1,
            InteractionResponseType::ChannelMessageWithSource => 4,
            InteractionResponseType::DeferredChannelMessageWithSource => 5,
            InteractionResponseType::DeferredUpdateMessage => 6,
            InteractionResponseType::UpdateMessage => 7,
            InteractionResponseType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<InteractionResponseData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionResponseData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        InteractionResponse {
            kind: InteractionResponseType::Pong,
            data: None,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                flags: None,
            }),
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                flags: Some(EPHEMERAL_FLAG),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ping_without_data() {
        let interaction: Interaction = serde_json::from_str(r#"{"type":1}"#).unwrap();

        assert_eq!(interaction.kind, InteractionType::Ping);
        assert!(interaction.data.is_none());
    }

    #[test]
    fn decodes_command_with_options_and_ignores_unknown_fields() {
        let raw = r#"{
            "type": 2,
            "id": "1180",
            "token": "abc",
            "version": 1,
            "member": {"user": {"id": "42", "username": "reader"}, "roles": []},
            "data": {
                "id": "99",
                "name": "ping",
                "type": 1,
                "options": [{"name": "pages", "type": 4, "value": 12}]
            }
        }"#;

        let interaction: Interaction = serde_json::from_str(raw).unwrap();
        let data = interaction.data.as_ref().unwrap();

        assert_eq!(interaction.kind, InteractionType::ApplicationCommand);
        assert_eq!(data.name, "ping");
        assert_eq!(data.options[0].value, Some(serde_json::json!(12)));
        assert_eq!(interaction.invoker().unwrap().id, "42");
    }

    #[test]
    fn keeps_unrecognized_interaction_types() {
        let interaction: Interaction = serde_json::from_str(r#"{"type":42}"#).unwrap();

        assert_eq!(interaction.kind, InteractionType::Unknown(42));
    }

    #[test]
    fn rejects_payloads_without_a_type() {
        assert!(serde_json::from_str::<Interaction>(r#"{"data":{"name":"ping"}}"#).is_err());
        assert!(serde_json::from_str::<Interaction>(r#"{"type":"ping"}"#).is_err());
    }

    #[test]
    fn pong_omits_data() {
        let encoded = serde_json::to_string(&InteractionResponse::pong()).unwrap();

        assert_eq!(encoded, r#"{"type":1}"#);
    }

    #[test]
    fn message_omits_empty_flags() {
        let encoded = serde_json::to_string(&InteractionResponse::message("Pong!")).unwrap();

        assert_eq!(encoded, r#"{"type":4,"data":{"content":"Pong!"}}"#);
    }

    #[test]
    fn ephemeral_sets_the_flag() {
        let encoded = serde_json::to_string(&InteractionResponse::ephemeral("hidden")).unwrap();

        assert_eq!(encoded, r#"{"type":4,"data":{"content":"hidden","flags":64}}"#);
    }
}
