//! Gridlock - unified CLI
//!
//! Relay hosting, online play and offline hotseat play.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use gridlock::{AppConfig, Cli, Command, ConsolePresenter, HELP, run_match};
use gridlock_net::{LocalRole, LoopbackTransport, MatchController, RelayClient, RelayServer};
use gridlock_tictactoe::GameRules;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gridlock=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Relay { host, port } => {
            let host = host.unwrap_or_else(|| config.relay().host().clone());
            let port = port.unwrap_or(*config.relay().port());
            run_relay(host, port).await
        }
        Command::Play { server, room, name } => {
            let server = server.unwrap_or_else(|| config.relay_addr());
            let name = name.unwrap_or_else(|| config.name().clone());
            run_online(config.rules()?, server, room, name).await
        }
        Command::Offline => run_offline(config.rules()?).await,
    }
}

/// Run the room relay until interrupted
#[instrument]
async fn run_relay(host: String, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host.as_str(), port)).await?;
    info!(addr = ?listener.local_addr()?, "Relay listening");

    tokio::select! {
        result = RelayServer::new().serve(listener) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down relay"),
    }
    Ok(())
}

/// Join a room and play one side
#[instrument(skip(rules))]
async fn run_online(
    rules: GameRules,
    server: String,
    room: Option<String>,
    name: String,
) -> Result<()> {
    let (client, mut events) = RelayClient::connect(server.as_str(), name, room, rules).await?;
    println!("Connected to {}, waiting for a seat. {}", server, HELP);

    let mut controller = MatchController::new(
        rules,
        LocalRole::Pending,
        client,
        ConsolePresenter::new(std::io::stdout()),
    );
    run_match(&mut controller, &mut events, BufReader::new(tokio::io::stdin())).await
}

/// Play both sides in this terminal
#[instrument(skip(rules))]
async fn run_offline(rules: GameRules) -> Result<()> {
    let (transport, mut events) = LoopbackTransport::new();
    println!("Offline game. {}", HELP);

    let mut controller = MatchController::new(
        rules,
        LocalRole::Offline,
        transport,
        ConsolePresenter::new(std::io::stdout()),
    );
    run_match(&mut controller, &mut events, BufReader::new(tokio::io::stdin())).await
}
