// Shared fixtures for the end-to-end stock check tests: a scripted browser
// backend and a recording notifier, so no real browser or network is needed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use stock_scout::Result;
use stock_scout::driver::{BrowserDriver, NodeHandle};
use stock_scout::error::AppError;
use stock_scout::locator::Locator;
use stock_scout::notify::Notifier;

/// One page worth of scripted DOM state. Navigating consumes the next fixture.
#[derive(Default, Clone)]
pub struct PageFixture {
    /// selector -> matching element handles, in document order
    pub nodes: HashMap<&'static str, Vec<NodeHandle>>,
    /// handle -> rendered text
    pub texts: HashMap<NodeHandle, &'static str>,
    /// (handle, attribute name) -> value
    pub attrs: HashMap<(NodeHandle, &'static str), &'static str>,
}

#[derive(Default)]
pub struct BrowserState {
    pub pages: VecDeque<PageFixture>,
    pub current: PageFixture,
    /// Scripted outcomes for ready-state polls; exhausted queue means "complete".
    pub ready: VecDeque<std::result::Result<&'static str, &'static str>>,
    pub visited: Vec<String>,
    pub clicked: Vec<NodeHandle>,
    pub scripts: Vec<String>,
    pub attribute_reads: Vec<(NodeHandle, String)>,
    pub closed: bool,
}

/// Scripted [`BrowserDriver`]. Clone it before boxing to keep a handle for
/// assertions.
#[derive(Default, Clone)]
pub struct FakeBrowser {
    pub state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn with_pages(pages: Vec<PageFixture>) -> Self {
        let browser = Self::default();
        browser.state.lock().unwrap().pages = pages.into();
        browser
    }

    pub fn script_ready(&self, outcomes: Vec<std::result::Result<&'static str, &'static str>>) {
        self.state.lock().unwrap().ready = outcomes.into();
    }
}

impl BrowserDriver for FakeBrowser {
    fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        if let Some(page) = state.pages.pop_front() {
            state.current = page;
        }
        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        if script == "document.readyState" {
            return match state.ready.pop_front() {
                None => Ok(Value::String("complete".to_string())),
                Some(Ok(ready_state)) => Ok(Value::String(ready_state.to_string())),
                Some(Err(message)) => Err(AppError::Browser(message.to_string())),
            };
        }
        state.scripts.push(script.to_string());
        Ok(Value::Null)
    }

    fn query(&self, locator: &Locator) -> Result<Vec<NodeHandle>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .current
            .nodes
            .get(locator.selector)
            .cloned()
            .unwrap_or_default())
    }

    fn text(&self, node: NodeHandle) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .current
            .texts
            .get(&node)
            .map(|t| t.to_string())
            .ok_or(AppError::StaleElement(node))
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.attribute_reads.push((node, name.to_string()));
        Ok(state
            .current
            .attrs
            .iter()
            .find(|((n, a), _)| *n == node && *a == name)
            .map(|(_, v)| v.to_string()))
    }

    fn is_clickable(&self, _node: NodeHandle) -> Result<bool> {
        Ok(true)
    }

    fn click(&self, node: NodeHandle) -> Result<()> {
        self.state.lock().unwrap().clicked.push(node);
        Ok(())
    }

    fn call_js(&self, _node: NodeHandle, _function: &str) -> Result<Value> {
        Ok(Value::Bool(true))
    }

    fn screenshot_png(&self) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Notifier capturing every message it is handed.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(AppError::Browser("delivery refused".to_string()));
        }
        Ok(())
    }
}
