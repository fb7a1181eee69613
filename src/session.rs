use std::collections::HashMap;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error};

use crate::config::WaitConfig;
use crate::driver::{BrowserDriver, NodeHandle};
use crate::error::{AppError, Result};
use crate::locator::Locator;

/// Expression polled until the page reports itself fully loaded.
const READY_STATE_SCRIPT: &str = "document.readyState";

/// Readiness polling: one initial check plus this many retries.
const READY_POLL_RETRIES: u32 = 5;
const READY_POLL_BACKOFF: Duration = Duration::from_millis(500);

/// How often blocking waits re-check the page.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One live browser-automation session, shared across all URLs of a run.
///
/// Wraps a [`BrowserDriver`] with the waiting, polling and logging the
/// workflow relies on. All explicit waits share `waits.timeout`; plural
/// lookups poll within `waits.implicit_wait` before settling for what is
/// there.
pub struct Session {
    driver: Box<dyn BrowserDriver>,
    waits: WaitConfig,
}

impl Session {
    pub fn new(driver: Box<dyn BrowserDriver>, waits: WaitConfig) -> Self {
        Self { driver, waits }
    }

    /// Load `url` and block until the page reports a complete ready-state.
    pub fn visit(&self, url: &str) -> Result<()> {
        debug!(%url, "visiting url");
        self.driver.goto(url)?;
        self.wait_page_loaded(url)
    }

    /// Polls the ready-state until it reaches "complete". Script failures and
    /// intermediate states both consume one attempt from the retry budget.
    fn page_load_complete(&self) -> bool {
        for _ in 0..=READY_POLL_RETRIES {
            match self.driver.evaluate(READY_STATE_SCRIPT) {
                Ok(state) if state.as_str() == Some("complete") => return true,
                Ok(_) | Err(_) => thread::sleep(READY_POLL_BACKOFF),
            }
        }
        false
    }

    fn wait_page_loaded(&self, url: &str) -> Result<()> {
        debug!("waiting for page load");
        let started = Instant::now();
        if !self.page_load_complete() {
            return Err(AppError::LoadTimeout {
                url: url.to_string(),
                attempts: READY_POLL_RETRIES + 1,
            });
        }
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "page load complete");
        Ok(())
    }

    /// Current match count, with a malformed selector counting as zero.
    fn count_now(&self, locator: &Locator) -> usize {
        match self.driver.query(locator) {
            Ok(nodes) => nodes.len(),
            Err(err) => {
                error!(%locator, %err, "plural element query failed");
                0
            }
        }
    }

    /// Block until at least one element matches `locator`.
    pub fn wait_appear(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "waiting for element to appear");
        self.wait_for_count(locator, "element to appear", |count| count > 0)
    }

    /// Block until no element matches `locator`.
    pub fn wait_disappear(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "waiting for element to disappear");
        self.wait_for_count(locator, "element to disappear", |count| count == 0)
    }

    fn wait_for_count(
        &self,
        locator: &Locator,
        condition: &'static str,
        satisfied: impl Fn(usize) -> bool,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(self.waits.timeout);
        loop {
            if satisfied(self.count_now(locator)) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::WaitTimeout {
                    condition,
                    selector: locator.selector.to_string(),
                    timeout_secs: self.waits.timeout,
                });
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Find the first element matching `locator`, waiting for it to be
    /// present. A malformed selector is logged and re-raised, not retried.
    pub fn find(&self, locator: &Locator) -> Result<NodeHandle> {
        debug!(%locator, "finding element");
        let deadline = Instant::now() + Duration::from_secs(self.waits.timeout);
        loop {
            match self.driver.query(locator) {
                Ok(nodes) if !nodes.is_empty() => return Ok(nodes[0]),
                Ok(_) => {}
                Err(err @ AppError::InvalidSelector { .. }) => {
                    error!(%locator, "could not find element");
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
            if Instant::now() >= deadline {
                return Err(AppError::WaitTimeout {
                    condition: "element",
                    selector: locator.selector.to_string(),
                    timeout_secs: self.waits.timeout,
                });
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Find every element matching `locator`. Unlike [`Session::find`], a
    /// malformed selector is swallowed here and yields an empty collection;
    /// callers must treat empty as a valid result.
    pub fn find_all(&self, locator: &Locator) -> Vec<NodeHandle> {
        debug!(%locator, "finding all elements");
        let deadline = Instant::now() + Duration::from_secs(self.waits.implicit_wait);
        loop {
            match self.driver.query(locator) {
                Ok(nodes) if !nodes.is_empty() => return nodes,
                Ok(nodes) => {
                    if Instant::now() >= deadline {
                        return nodes;
                    }
                }
                Err(err) => {
                    error!(%locator, %err, "invalid selector");
                    return Vec::new();
                }
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Wait for the element to become interactable, then activate it.
    pub fn click(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "clicking element");
        let node = self.find(locator)?;
        let deadline = Instant::now() + Duration::from_secs(self.waits.timeout);
        loop {
            if self.driver.is_clickable(node)? {
                return self.driver.click(node);
            }
            if Instant::now() >= deadline {
                return Err(AppError::WaitTimeout {
                    condition: "element to become clickable",
                    selector: locator.selector.to_string(),
                    timeout_secs: self.waits.timeout,
                });
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Rendered text of the first matching element.
    pub fn get_text(&self, locator: &Locator) -> Result<String> {
        debug!(%locator, "getting element text");
        let node = self.find(locator)?;
        self.driver.text(node)
    }

    /// Attribute (or like-named property) of the first matching element.
    pub fn get_attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        debug!(%locator, name, "getting element attribute");
        let node = self.find(locator)?;
        self.driver.attribute(node, name)
    }

    /// Rendered text of an already-resolved element.
    pub fn text_of(&self, node: NodeHandle) -> Result<String> {
        self.driver.text(node)
    }

    /// Attribute of an already-resolved element.
    pub fn attribute_of(&self, node: NodeHandle, name: &str) -> Result<Option<String>> {
        self.driver.attribute(node, name)
    }

    /// Execute a script in page context and return its result.
    pub fn execute_script(&self, script: &str) -> Result<Value> {
        debug!(script, "executing script");
        self.driver.evaluate(script)
    }

    /// Store key/value pairs in the page's session storage. Non-string values
    /// are stored as their JSON encoding.
    pub fn set_session_storage(&self, content: &HashMap<String, Value>) -> Result<()> {
        for (key, value) in content {
            let stored = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            debug!(key = %key, value = %stored, "setting session storage");
            let script = format!(
                "sessionStorage.setItem({}, {});",
                serde_json::to_string(key)?,
                serde_json::to_string(&stored)?
            );
            self.driver.evaluate(&script)?;
        }
        Ok(())
    }

    /// Set the value on a horizontal slider, rejecting values outside the
    /// slider's own min/max range before touching the page.
    pub fn set_slider_value(&self, locator: &Locator, value: f64) -> Result<()> {
        let node = self.find(locator)?;
        let min = self.slider_bound(node, "min", 0.0)?;
        let max = self.slider_bound(node, "max", 100.0)?;

        if value < min || value > max {
            return Err(AppError::SliderValueOutOfRange { value, min, max });
        }

        debug!(%locator, value, "setting slider value");
        let function = format!(
            "function() {{ this.value = {value}; this.dispatchEvent(new Event('input', {{ bubbles: true }})); }}"
        );
        self.driver.call_js(node, &function)?;
        Ok(())
    }

    fn slider_bound(&self, node: NodeHandle, name: &str, fallback: f64) -> Result<f64> {
        Ok(self
            .driver
            .attribute(node, name)?
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(fallback))
    }

    /// Capture the current page as a PNG file.
    pub fn screenshot(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "taking screenshot");
        let png = self.driver.screenshot_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Release the browser. Calling any other operation afterwards is
    /// undefined.
    pub fn close(&mut self) -> Result<()> {
        debug!("closing browser window");
        self.driver.close()
    }
}
