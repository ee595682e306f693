use anyhow::Result;
use weather_narrator::{NarratorConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NarratorConfig::load()?;
    telemetry::init(&config.logging)?;
    web::run(&config).await
}
