use reading_counter::controller::discord::interaction::COMMANDS;
use reading_counter::shared::DISCORD_ROOT_ENDPOINT;
use reading_counter::shared::structs::config::Configuration;
use reading_counter::shared::utility::command_registration::{
    RegistrationTarget, bulk_overwrite_commands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Configuration::new();
    config.apply_overrides(|key| std::env::var(key).ok())?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .pretty()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!(
            "Initialization of tracing subscriber failed with error: {}",
            e
        );
    }

    let target = RegistrationTarget::from_env()?;

    match &target.guild_id {
        Some(guild_id) => tracing::info!(
            "Registering {} commands for guild {}...",
            COMMANDS.len(),
            guild_id
        ),
        None => tracing::info!("Registering {} global commands...", COMMANDS.len()),
    }

    let client = reqwest::Client::new();
    let registered =
        bulk_overwrite_commands(&client, DISCORD_ROOT_ENDPOINT, &target, COMMANDS).await?;

    for command in registered.iter() {
        tracing::debug!(id = %command.id, name = %command.name, "Registered command.");
    }

    println!("Successfully registered {} commands.", registered.len());

    Ok(())
}
