use std::error::Error;
use std::sync::Arc;

use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use mpesa_subscriptions::adapters::{
    app_router, InMemorySubscriptionStore, MpesaAppState, PostgrestConfig,
    PostgrestSubscriptionStore,
};
use mpesa_subscriptions::config::{AppConfig, WriteMode};
use mpesa_subscriptions::domain::payment::CallbackNormalizer;
use mpesa_subscriptions::ports::SubscriptionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let store = build_store(&config)?;
    let state = MpesaAppState::new(
        store,
        CallbackNormalizer::new(config.mpesa.c2b_phone_field.trim()),
        config.subscription.policy(),
    );
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        write_mode = ?config.store.write_mode,
        "Starting M-Pesa subscription service"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_store(config: &AppConfig) -> Result<Arc<dyn SubscriptionStore>, Box<dyn Error>> {
    let store: Arc<dyn SubscriptionStore> = match config.store.write_mode {
        WriteMode::InMemory => {
            tracing::warn!("Using in-memory subscription store; records are not persisted");
            Arc::new(InMemorySubscriptionStore::new())
        }
        mode => {
            let api_key = config
                .store
                .api_key
                .clone()
                .unwrap_or_else(|| SecretString::new(String::new()));
            let postgrest = PostgrestConfig::new(config.store.url.clone(), api_key)
                .with_table(config.store.table.clone())
                .with_timeout(config.store.timeout())
                .with_native_upsert(mode == WriteMode::NativeUpsert);
            Arc::new(PostgrestSubscriptionStore::new(postgrest)?)
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
