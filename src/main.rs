use color_eyre::eyre::Result;
use dotenv::dotenv;
use signage_api::{config::ApiConfig, repository::ScheduleRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Start API server
    signage_api::start_server(config, ScheduleRepository::new()).await?;

    Ok(())
}
