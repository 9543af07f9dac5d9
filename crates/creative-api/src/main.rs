use creative_core::Config;

// mimalloc as the global allocator; upload buffers are large and short-lived.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = creative_api::setup::initialize_app(config.clone()).await?;

    creative_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
