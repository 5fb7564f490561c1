//! Persons gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │               PERSONS GATEWAY                │
//!   Client Request       │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────────┼─▶│  http  │──▶│ service  │──▶│   models   │  │
//!                        │  │ server │   │ manager  │   │ person,    │  │
//!                        │  └────────┘   └──────────┘   │ notifs     │  │
//!                        │                              └─────┬──────┘  │
//!                        │                                    ▼         │
//!                        │                         ┌────────────────┐   │
//!                        │                         │   connectors   │───┼──▶ Person service
//!                        │                         │ rest / persons │   │
//!                        │                         │ kafka producer │───┼──▶ Notification topic
//!                        │                         └────────────────┘   │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use persons_gateway::config::load_config;
use persons_gateway::connectors::{KafkaProducer, LogTransport};
use persons_gateway::http::HttpServer;
use persons_gateway::lifecycle::{build_manager, Shutdown};
use persons_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "persons-gateway")]
#[command(about = "REST gateway for the person service", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability)?;

    tracing::info!(
        instance = %config.service.instance_name,
        environment = config.service.environment.as_deref().unwrap_or("unset"),
        "persons-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        service_url = %config.persons.service_url,
        service_timeout_secs = config.persons.request_timeout_secs,
        delete_topic = %config.persons.delete_notification_topic,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let producer = Arc::new(KafkaProducer::new());
    producer.init(Arc::new(LogTransport))?;

    let manager = build_manager(&config, producer.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Start listening");

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let server = HttpServer::new(config, Arc::new(manager));
    server.run(listener, shutdown.subscribe()).await?;

    producer.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
