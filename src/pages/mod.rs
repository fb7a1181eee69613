//! Static locators for the product page regions the workflow touches.

pub mod product;
pub mod sidebar;
