use serde_json::Value;

use crate::error::Result;
use crate::locator::Locator;

/// Handle to an element located by a previous [`BrowserDriver::query`] call.
/// Handles are only valid for the page they were resolved on; a navigation
/// invalidates them.
pub type NodeHandle = u64;

/// The narrow capability surface of a browser automation backend.
///
/// The orchestration layer only ever talks to this trait, so tests can swap in
/// a scripted fake and exercise the full workflow without a real browser.
pub trait BrowserDriver: Send {
    /// Load `url` and block until the navigation settles.
    fn goto(&self, url: &str) -> Result<()>;

    /// Execute an expression in page context and return its JSON value.
    fn evaluate(&self, script: &str) -> Result<Value>;

    /// Resolve all elements currently matching `locator`, in document order.
    /// A malformed selector is an error; zero matches is an empty collection.
    fn query(&self, locator: &Locator) -> Result<Vec<NodeHandle>>;

    /// Rendered text of the element.
    fn text(&self, node: NodeHandle) -> Result<String>;

    /// Attribute value, falling back to the like-named DOM property when no
    /// attribute is present (so `innerText` behaves like a readable attribute).
    fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>>;

    /// Whether the element is rendered, visible and enabled.
    fn is_clickable(&self, node: NodeHandle) -> Result<bool>;

    /// Scroll the element into view and activate it.
    fn click(&self, node: NodeHandle) -> Result<()>;

    /// Run a JavaScript function body with `this` bound to the element.
    fn call_js(&self, node: NodeHandle, function: &str) -> Result<Value>;

    /// PNG capture of the current viewport.
    fn screenshot_png(&self) -> Result<Vec<u8>>;

    /// Release the underlying browser. Behavior of further calls is undefined.
    fn close(&mut self) -> Result<()>;
}
