use std::fmt;

use crate::error::{AppError, Result};

/// Lookup strategy for a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Css,
    XPath,
}

/// A (strategy, selector) pair identifying zero or more elements on a page.
///
/// Locators are plain descriptors with no lifecycle of their own; page modules
/// declare them as constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: &'static str,
}

impl Locator {
    pub const fn css(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::Css,
            selector,
        }
    }

    pub const fn xpath(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector,
        }
    }

    /// Checks CSS selectors for well-formedness before they reach the browser.
    /// XPath expressions are only validated by the page itself, so they pass
    /// through here untouched.
    pub fn check_syntax(&self) -> Result<()> {
        match self.strategy {
            Strategy::Css => scraper::Selector::parse(self.selector)
                .map(|_| ())
                .map_err(|_| AppError::InvalidSelector {
                    selector: self.selector.to_string(),
                }),
            Strategy::XPath => Ok(()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::Css => write!(f, "css={}", self.selector),
            Strategy::XPath => write!(f, "xpath={}", self.selector),
        }
    }
}
