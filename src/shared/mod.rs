pub mod error;
pub mod middleware;
pub mod structs;
pub mod utility;

pub const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/omutucat/reading-counter-dc, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

pub const DISCORD_ROOT_ENDPOINT: &str = "https://discord.com/api/v10";
pub const DISCORD_GLOBAL_COMMANDS_ENDPOINT: &str = "/applications/$APPLICATION_ID/commands";
pub const DISCORD_GUILD_COMMANDS_ENDPOINT: &str =
    "/applications/$APPLICATION_ID/guilds/$GUILD_ID/commands";
