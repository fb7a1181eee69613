use crate::locator::Locator;

/// Control that expands the per-shop stock list.
pub const STOCK_SELECTOR: Locator = Locator::xpath("//div[@data-section='stock-selector']");

/// Shop name nodes; paired positionally with [`STOCK`].
pub const SHOP: Locator = Locator::xpath("//div[@class='shop']//div[@id='store']/p[1]");

/// Stock level nodes; paired positionally with [`SHOP`].
pub const STOCK: Locator = Locator::xpath("//div[@class='shop']//div[@id='store']/p[2]");
