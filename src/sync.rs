use chrono::Local;
use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use signage_api::config::parse_log_level;
use signage_client::{ClientConfig, HttpScheduleService};
use signage_core::{models::program::EffectiveProgram, store::ScheduleStore};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

fn print_program(program: &EffectiveProgram) {
    println!("{} {} {}", program.screen_id, program.day_of_week, program.date);
    if program.is_empty() {
        println!("  (nothing scheduled)");
    }
    for interval in &program.intervals {
        let source = &interval.source;
        println!(
            "  {}-{}  {:?}  {}  priority {}",
            interval.start,
            interval.end,
            source.block_type,
            source.playlist_id.as_deref().unwrap_or("-"),
            source.priority.value()
        );
    }
    for warning in &program.warnings {
        warn!(
            "{} {}: equal-priority overlap {}-{}",
            program.screen_id, program.day_of_week, warning.overlap_start, warning.overlap_end
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let level = std::env::var("LOG_LEVEL")
        .map(|level| parse_log_level(&level))
        .unwrap_or(tracing::Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = ClientConfig::from_env()?;
    if config.screens.is_empty() {
        return Err(eyre!("SIGNAGE_SCREENS must name at least one screen"));
    }

    let date = config.date.unwrap_or_else(|| Local::now().date_naive());
    let service = HttpScheduleService::new(&config)?;
    let mut store = ScheduleStore::new(config.scope(), date);

    info!("Loading schedule from {}", config.api_url);
    store.get_schedule(&service).await?;
    info!("Loaded {} block(s)", store.blocks().count());

    for program in store.programs() {
        print_program(&program);
    }

    Ok(())
}
