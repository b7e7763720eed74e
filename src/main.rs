use prizepal::db::store::GiveawayStore;
use prizepal::services::giveaway::registry::Registry;
use prizepal::services::log_channel::LogSink;
use prizepal::{bot, config::Settings};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PrizePal Discord Bot");

    // Load settings
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let (log, log_rx) = LogSink::channel();

    let store = GiveawayStore::new(settings.giveaways_file.clone());
    let registry = Registry::new(store, log.clone());

    let pending = registry.all().await.len();
    info!(
        "Loaded {} ongoing giveaway(s) from {}",
        pending,
        settings.giveaways_file.display()
    );

    // Start the bot
    if let Err(e) = bot::framework::run(settings, registry, log, log_rx).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}
