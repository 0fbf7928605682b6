//! Stand-alone Engine API server.
//!
//! Serves the authenticated `engine_` endpoint over an in-memory chain store
//! and a stub importer, which is enough for consensus-client integration
//! smoke tests: a fresh node answers `SYNCING` on the head-driving methods
//! while the auxiliary methods are fully functional.

use clap::Parser;
use ember_beacon_consensus::{engine_channel, BeaconImportQueue, BeaconReply, BeaconRequest};
use ember_provider::InMemoryChainStore;
use ember_rpc_api::EngineApiServer;
use ember_rpc_engine_api::EngineServer;
use ember_rpc_layer::{AuthLayer, JwtAuthValidator, JwtSecret};
use ember_rpc_types::engine::{PayloadStatus, PayloadStatusEnum};
use std::{net::IpAddr, path::PathBuf};
use tracing::{debug, info};

mod builder;

#[derive(Debug, Parser)]
#[command(name = "ember", about = "Engine API server for a proof-of-stake execution node")]
struct Cli {
    /// Address to bind the authenticated engine endpoint to.
    #[arg(long = "authrpc.addr", default_value = "127.0.0.1")]
    addr: IpAddr,

    /// Port of the authenticated engine endpoint.
    #[arg(long = "authrpc.port", default_value_t = 8551)]
    port: u16,

    /// Path to the JWT secret shared with the consensus client, as 64 hex
    /// characters. A fresh secret is generated there when the file is absent.
    #[arg(long = "authrpc.jwtsecret", default_value = "jwt.hex")]
    jwt_secret: PathBuf,

    /// Do not serve block building (getPayload and forkchoiceUpdated with
    /// attributes).
    #[arg(long = "proposer.disable", default_value_t = false)]
    proposer_disable: bool,

    /// Chain spec to run with: "dev" or "mainnet".
    #[arg(long, default_value = "dev")]
    chain: String,

    /// Logging verbosity. Repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let default_directive = match cli.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let chain_spec = match cli.chain.as_str() {
        "dev" => ember_primitives::DEV.clone(),
        "mainnet" => ember_primitives::MAINNET.clone(),
        other => eyre::bail!("unknown chain: {other}"),
    };

    let secret = if cli.jwt_secret.exists() {
        JwtSecret::from_file(&cli.jwt_secret)?
    } else {
        info!(target: "ember::node", path = %cli.jwt_secret.display(), "Generating JWT secret");
        JwtSecret::try_create_random(&cli.jwt_secret)?
    };

    let (beacon_handle, import_queue) = engine_channel();
    tokio::spawn(run_importer_stub(import_queue));

    let store = InMemoryChainStore::default();
    let builder_func = builder::dev_builder_func(store.clone(), chain_spec.clone());

    let server = EngineServer::new(
        chain_spec,
        store,
        beacon_handle,
        builder_func,
        !cli.proposer_disable,
    );

    let middleware =
        tower::ServiceBuilder::new().layer(AuthLayer::new(JwtAuthValidator::new(secret)));
    let http = jsonrpsee::server::Server::builder()
        .set_http_middleware(middleware)
        .build((cli.addr, cli.port))
        .await?;
    let local_addr = http.local_addr()?;
    info!(target: "ember::node", %local_addr, "Engine API endpoint listening");

    let handle = http.start(server.into_rpc());
    handle.stopped().await;

    Ok(())
}

/// Stands in for the staged-sync loop: nothing is ever imported, so every
/// request that reaches the queue is answered with `SYNCING`.
async fn run_importer_stub(mut queue: BeaconImportQueue) {
    while let Some(request) = queue.next_request().await {
        match &request {
            BeaconRequest::NewPayload(block) => {
                debug!(target: "ember::node", hash = %block.hash(), "Importer stub: payload request")
            }
            BeaconRequest::ForkChoice(state) => {
                debug!(target: "ember::node", head = %state.head_block_hash, "Importer stub: forkchoice request")
            }
        }
        queue
            .send_reply(BeaconReply::Status(PayloadStatus::from_status(
                PayloadStatusEnum::Syncing,
            )))
            .await;
    }
}
