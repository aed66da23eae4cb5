/// Apelle Watch - follow a shared queue from the terminal
use apelle_client::ApelleClient;
use apelle_core::{EventSource, QueueApi, QueueId};
use apelle_sync::{QueueSubscription, SongCache};
use apelle_watch::{config::WatchConfig, render};
use clap::{Args, Parser};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "apelle-watch")]
#[command(about = "Follow an Apelle queue and log its state", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server URL, overriding the configuration
    #[arg(long)]
    url: Option<String>,

    /// Advance the queue when the current song ends
    #[arg(long)]
    autoplay: bool,

    /// Ask the server to resend the whole queue state once subscribed
    #[arg(long)]
    resync: bool,

    #[command(flatten)]
    target: Target,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Queue id
    #[arg(long)]
    id: Option<QueueId>,

    /// Queue code
    #[arg(long)]
    code: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apelle_watch=info,apelle_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = WatchConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.server.url = url;
    }
    if cli.autoplay {
        config.sync.autoplay = true;
    }
    config.validate()?;

    let client = Arc::new(ApelleClient::new(config.client_config())?);
    tracing::info!("Server: {}", client.url());

    let queue_id = match (cli.target.id, cli.target.code) {
        (Some(id), _) => id,
        (None, Some(code)) => client.queues().get_queue_by_code(&code).await?.id,
        (None, None) => anyhow::bail!("either --id or --code is required"),
    };

    let api: Arc<dyn QueueApi> = client.clone();
    let events: Arc<dyn EventSource> = client.clone();
    let subscription = QueueSubscription::new(
        queue_id,
        api,
        events,
        SongCache::new(),
        config.sync_config(),
    );

    let token = subscription.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping");
            token.cancel();
        }
    });

    let mut resync = cli.resync.then(|| client.clone());
    let end = subscription
        .run(move |queue| {
            if let Some(client) = resync.take() {
                tokio::spawn(async move {
                    if let Err(e) = client.queues().push_sync_event(queue_id).await {
                        tracing::warn!(error = %e, "Resync request failed");
                    }
                });
            }
            render::log_queue(queue);
        })
        .await?;

    tracing::info!(queue = %queue_id, reason = ?end, "Stopped following queue");
    Ok(())
}
