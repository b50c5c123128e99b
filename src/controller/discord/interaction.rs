use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::controller::discord::ping::PING_COMMAND;
use crate::shared::error::InteractionError;
use crate::shared::structs::AppState;
use crate::shared::structs::config::UnknownCommandPolicy;
use crate::shared::structs::discord::interaction::{
    CommandData, Interaction, InteractionResponse, InteractionType,
};

pub type CommandHandler = fn(&CommandData) -> InteractionResponse;

/// A slash command as advertised to Discord and as dispatched here.
#[derive(Debug, Clone, Copy)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

/// Every supported command. Registration publishes exactly this list.
pub static COMMANDS: &[CommandDefinition] = &[PING_COMMAND];

pub fn find_command<'a>(
    commands: &'a [CommandDefinition],
    name: &str,
) -> Option<&'a CommandDefinition> {
    commands.iter().find(|command| command.name == name)
}

pub async fn handle_interaction(State(state): State<AppState>, request: Bytes) -> Response {
    match respond(&state, &request) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn respond(state: &AppState, bytes: &[u8]) -> Result<Response, InteractionError> {
    let interaction = serde_json::from_slice::<Interaction>(bytes).map_err(|e| {
        InteractionError::MalformedRequest(format!("Failed to deserialize incoming payload: {e}"))
    })?;

    tracing::debug!(
        kind = ?interaction.kind,
        id = interaction.id.as_deref().unwrap_or("unknown"),
        command = interaction.data.as_ref().map(|data| data.name.as_str()).unwrap_or("none"),
        "Received incoming interaction."
    );

    match dispatch(state, &interaction)? {
        Some(response) => encode(&response),
        None => Ok(StatusCode::OK.into_response()),
    }
}

/// Picks the reply for an interaction. `None` means the request is left
/// unanswered and gets an empty 200.
pub fn dispatch(
    state: &AppState,
    interaction: &Interaction,
) -> Result<Option<InteractionResponse>, InteractionError> {
    match interaction.kind {
        InteractionType::Ping => Ok(Some(InteractionResponse::pong())),
        InteractionType::ApplicationCommand => {
            let data = interaction.data.as_ref().ok_or_else(|| {
                InteractionError::MalformedRequest(
                    "application command interaction without data".into(),
                )
            })?;

            Ok(handle_command_interaction(state, interaction, data))
        }
        other => {
            tracing::info!("Ignoring unsupported interaction type: {other:?}");
            Ok(None)
        }
    }
}

fn handle_command_interaction(
    state: &AppState,
    interaction: &Interaction,
    data: &CommandData,
) -> Option<InteractionResponse> {
    let invoker = interaction
        .invoker()
        .map(|user| user.id.as_str())
        .unwrap_or("unknown");

    match find_command(state.commands, &data.name) {
        Some(command) => {
            tracing::info!(command = command.name, invoker, "Handling command interaction.");
            Some((command.handler)(data))
        }
        None => {
            tracing::warn!(invoker, "Unknown command: {}", &data.name);

            match state.unknown_command {
                UnknownCommandPolicy::Ignore => None,
                UnknownCommandPolicy::Reply => Some(InteractionResponse::ephemeral(format!(
                    "Unknown command: `{}`",
                    data.name
                ))),
            }
        }
    }
}

pub fn encode(response: &InteractionResponse) -> Result<Response, InteractionError> {
    let body = serde_json::to_vec(response)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::structs::ApplicationPublicKey;
    use crate::shared::structs::discord::interaction::{EPHEMERAL_FLAG, InteractionResponseType};

    fn echo(data: &CommandData) -> InteractionResponse {
        InteractionResponse::message(format!("echo {}", data.name))
    }

    static TEST_COMMANDS: &[CommandDefinition] = &[CommandDefinition {
        name: "echo",
        description: "Echoes the command name.",
        handler: echo,
    }];

    fn state(policy: UnknownCommandPolicy) -> AppState {
        AppState::new(ApplicationPublicKey::from_bytes([1u8; 32]), policy)
    }

    fn interaction(raw: &str) -> Interaction {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn ping_interaction_gets_a_pong() {
        let response = dispatch(&state(UnknownCommandPolicy::Ignore), &interaction(r#"{"type":1}"#))
            .unwrap()
            .unwrap();

        assert_eq!(response, InteractionResponse::pong());
    }

    #[test]
    fn ping_command_replies_pong() {
        let response = dispatch(
            &state(UnknownCommandPolicy::Ignore),
            &interaction(r#"{"type":2,"data":{"name":"ping"}}"#),
        )
        .unwrap()
        .unwrap();

        assert_eq!(response.kind, InteractionResponseType::ChannelMessageWithSource);
        assert_eq!(response.data.unwrap().content.as_deref(), Some("Pong!"));
    }

    #[test]
    fn unknown_command_is_left_unanswered_by_default() {
        let response = dispatch(
            &state(UnknownCommandPolicy::Ignore),
            &interaction(r#"{"type":2,"data":{"name":"hello"}}"#),
        )
        .unwrap();

        assert!(response.is_none());
    }

    #[test]
    fn unknown_command_gets_an_ephemeral_reply_when_configured() {
        let response = dispatch(
            &state(UnknownCommandPolicy::Reply),
            &interaction(r#"{"type":2,"data":{"name":"hello"}}"#),
        )
        .unwrap()
        .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data.content.as_deref(), Some("Unknown command: `hello`"));
        assert_eq!(data.flags, Some(EPHEMERAL_FLAG));
    }

    #[test]
    fn command_without_data_is_malformed() {
        let result = dispatch(&state(UnknownCommandPolicy::Ignore), &interaction(r#"{"type":2}"#));

        assert!(matches!(result, Err(InteractionError::MalformedRequest(_))));
    }

    #[test]
    fn other_interaction_types_are_left_unanswered() {
        for raw in [r#"{"type":3}"#, r#"{"type":4}"#, r#"{"type":5}"#, r#"{"type":9}"#] {
            let response = dispatch(&state(UnknownCommandPolicy::Reply), &interaction(raw)).unwrap();
            assert!(response.is_none(), "{raw} should not be answered");
        }
    }

    #[test]
    fn dispatch_consults_the_injected_table() {
        let state = state(UnknownCommandPolicy::Ignore).with_commands(TEST_COMMANDS);

        let echoed = dispatch(&state, &interaction(r#"{"type":2,"data":{"name":"echo"}}"#))
            .unwrap()
            .unwrap();
        let ping = dispatch(&state, &interaction(r#"{"type":2,"data":{"name":"ping"}}"#)).unwrap();

        assert_eq!(echoed.data.unwrap().content.as_deref(), Some("echo echo"));
        assert!(ping.is_none());
    }

    #[test]
    fn command_names_are_unique() {
        for (index, command) in COMMANDS.iter().enumerate() {
            assert!(
                COMMANDS[index + 1..].iter().all(|other| other.name != command.name),
                "duplicate command {}",
                command.name
            );
        }
    }

    #[test]
    fn encode_sets_json_content_type() {
        let response = encode(&InteractionResponse::pong()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn interaction_token_stays_out_of_the_logs() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let raw = r#"{"type":2,"id":"1180","token":"very-secret-token","data":{"name":"ping"}}"#;
        tracing::subscriber::with_default(subscriber, || {
            let response = respond(&state(UnknownCommandPolicy::Ignore), raw.as_bytes()).unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("1180"));
        assert!(logs.contains("ping"));
        assert!(!logs.contains("very-secret-token"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let response = handle_interaction(
            State(state(UnknownCommandPolicy::Ignore)),
            Bytes::from_static(b"not json"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
