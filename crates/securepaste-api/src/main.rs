use securepaste_api::setup;
use securepaste_core::Config;

// Use mimalloc as the global allocator; fragment buffers churn through the heap quickly.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, store, services, routes)
    let (state, router) = setup::initialize_app(config.clone()).await?;

    let reaper = setup::services::start_background_tasks(&config, &state);

    // Start the server
    setup::server::start_server(&config, router).await?;

    if let Some(handle) = reaper {
        handle.abort();
    }

    Ok(())
}
