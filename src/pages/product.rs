use crate::locator::Locator;

/// Product title shown at the top of the listing.
pub const NAME: Locator = Locator::xpath("//a[@class='itemName']/h3");

/// Link that opens the in-store availability panel.
pub const FIND_IN_STORE_LINK: Locator = Locator::xpath("//a[@id='findIt-inStore_link']");
