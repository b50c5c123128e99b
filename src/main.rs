use reading_counter::controller::router;
use reading_counter::shared::structs::config::Configuration;
use reading_counter::shared::structs::{AppState, ApplicationPublicKey};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Configuration::load()?;

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

    let public_key = ApplicationPublicKey::from_env().inspect_err(|e| {
        tracing::error!("Refusing to start without a valid public key: {e:?}");
    })?;

    let state = AppState::new(public_key, config.unknown_command);
    let app = router(state);

    let server_bind_point = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&server_bind_point).await?;
    tracing::info!(
        "Listening for interactions on {} (unknown commands: {:?})",
        &server_bind_point,
        config.unknown_command
    );

    axum::serve(listener, app).await?;

    Ok(())
}
