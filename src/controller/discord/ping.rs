use command_macros::command_handler;

use crate::shared::structs::discord::interaction::{CommandData, InteractionResponse};

#[command_handler(description = "Checks that the bot is reachable.")]
pub fn ping(_data: &CommandData) -> InteractionResponse {
    InteractionResponse::message("Pong!")
}
