use anyhow::Result;
use tracing::info;

use stock_scout::chrome::ChromeDriver;
use stock_scout::config::AppConfig;
use stock_scout::notify::TelegramNotifier;
use stock_scout::session::Session;
use stock_scout::stock_checker::StockChecker;
use stock_scout::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guards = logging::init(config.logging.dir.as_ref())?;

    info!(urls = config.urls.len(), "starting stock scout");

    let driver = ChromeDriver::launch(&config)?;
    let session = Session::new(Box::new(driver), config.waits.clone());
    let notifier = TelegramNotifier::new(config.telegram.clone());

    StockChecker::new(session, Box::new(notifier))
        .run(&config.urls)
        .await?;

    info!("stock check run finished");
    Ok(())
}
