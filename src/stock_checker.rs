use tracing::{error, info};

use crate::driver::NodeHandle;
use crate::error::Result;
use crate::notify::Notifier;
use crate::pages::{product, sidebar};
use crate::report::Report;
use crate::session::Session;

/// Nudges the page down far enough to trigger the lazy-loaded availability
/// section.
const SCROLL_NUDGE: &str = "window.scrollTo(0, document.body.scrollHeight*0.2);";

/// Drives one browser session through the stock check for every configured
/// product URL and hands each finished report to the notifier.
pub struct StockChecker {
    session: Session,
    notifier: Box<dyn Notifier>,
}

impl StockChecker {
    pub fn new(session: Session, notifier: Box<dyn Notifier>) -> Self {
        Self { session, notifier }
    }

    /// Process the URLs in order. The first failing URL aborts the remainder
    /// of the run; the browser session is closed either way, exactly once.
    pub async fn run(mut self, urls: &[String]) -> Result<()> {
        let mut outcome = Ok(());
        for url in urls {
            if let Err(err) = self.check_url(url).await {
                error!(%url, %err, "stock check failed");
                outcome = Err(err);
                break;
            }
        }

        if let Err(err) = self.session.close() {
            error!(%err, "failed to close browser session");
        }
        outcome
    }

    async fn check_url(&self, url: &str) -> Result<()> {
        self.session.visit(url)?;

        let product_name = self.session.get_text(&product::NAME)?;
        info!(product = %product_name, "checking stock");
        let mut report = Report::for_product(&product_name);

        self.session.execute_script(SCROLL_NUDGE)?;
        self.session.wait_appear(&product::FIND_IN_STORE_LINK)?;
        self.session.click(&product::FIND_IN_STORE_LINK)?;
        self.session.click(&sidebar::STOCK_SELECTOR)?;

        let shops = self.session.find_all(&sidebar::SHOP);
        let stocks = self.session.find_all(&sidebar::STOCK);

        if shops.len() == stocks.len() {
            for (shop, stock) in shops.into_iter().zip(stocks) {
                let shop_name = self.display_text(shop)?;
                let stock_value = self.display_text(stock)?;
                info!(shop = %shop_name, stock = %stock_value, "shop stock");
                report.push_shop(&shop_name, &stock_value);
            }
        } else {
            // The report still goes out, just without the per-shop lines.
            error!(
                shops = shops.len(),
                stocks = stocks.len(),
                "shop and stock counts do not match"
            );
        }

        // Fire and forget: delivery failures never abort the URL loop.
        if let Err(err) = self.notifier.send(report.as_str()).await {
            error!(%err, "failed to send report");
        }
        Ok(())
    }

    /// Trimmed visible text, reading the innerText attribute only when the
    /// visible text is empty.
    fn display_text(&self, node: NodeHandle) -> Result<String> {
        let text = self.session.text_of(node)?;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        Ok(self
            .session
            .attribute_of(node, "innerText")?
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}
