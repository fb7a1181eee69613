use std::ffi::{OsStr, OsString};
use std::sync::Arc;

use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::driver::{BrowserDriver, NodeHandle};
use crate::error::{AppError, Result};
use crate::locator::{Locator, Strategy};

/// Page-global array the query snippets park resolved nodes in. Handles are
/// indices into it and die with the page.
const NODE_REGISTRY: &str = "window.__scoutNodes";

/// Browser backend driving a local Chrome over the DevTools protocol.
pub struct ChromeDriver {
    // Kept alive for the tab lifetime; dropped on close().
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeDriver {
    /// Launch Chrome with the configured argument list. Debug runs have the
    /// headless switch stripped by the configuration layer.
    pub fn launch(config: &AppConfig) -> Result<Self> {
        if config.driver.browser != "chrome" {
            return Err(AppError::UnsupportedBrowser(config.driver.browser.clone()));
        }

        let mut args = config.driver.launch_args(config.debug)?;
        // headless_chrome wants the headless switch as a launch option, not an argument.
        let headless = args.iter().any(|a| a.starts_with("--headless"));
        args.retain(|a| !a.starts_with("--headless"));

        info!(headless, ?args, "launching chrome");

        let arg_strings: Vec<OsString> = args.iter().map(OsString::from).collect();
        let arg_refs: Vec<&OsStr> = arg_strings.iter().map(OsString::as_os_str).collect();

        let launch_options = LaunchOptions::default_builder()
            .headless(headless)
            .args(arg_refs)
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| AppError::Browser("browser session is closed".to_string()))
    }

    /// JavaScript that resolves all matches for `locator` and returns their
    /// registry indices, or `{error}` when the selector itself is rejected.
    fn query_script(locator: &Locator) -> String {
        let selector = serde_json::to_string(locator.selector).unwrap_or_default();
        let collect = match locator.strategy {
            Strategy::Css => format!("Array.from(document.querySelectorAll({selector}))"),
            Strategy::XPath => format!(
                r#"(() => {{
                    const result = document.evaluate({selector}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                    const nodes = [];
                    for (let i = 0; i < result.snapshotLength; i++) {{
                        nodes.push(result.snapshotItem(i));
                    }}
                    return nodes;
                }})()"#
            ),
        };
        format!(
            r#"(() => {{
                try {{
                    const found = {collect};
                    if (!{NODE_REGISTRY}) {{ {NODE_REGISTRY} = []; }}
                    return {{ ids: found.map((n) => {NODE_REGISTRY}.push(n) - 1) }};
                }} catch (e) {{
                    return {{ error: String(e) }};
                }}
            }})()"#
        )
    }

    /// Run a snippet against a registered node; `null` means the handle went
    /// stale (navigation cleared the registry).
    fn with_node(&self, node: NodeHandle, body: &str) -> Result<Value> {
        let script = format!(
            r#"(() => {{
                const n = ({NODE_REGISTRY} || [])[{node}];
                if (!n) {{ return null; }}
                {body}
            }})()"#
        );
        let value = self.evaluate(&script)?;
        if value.is_null() {
            return Err(AppError::StaleElement(node));
        }
        Ok(value)
    }
}

impl BrowserDriver for ChromeDriver {
    fn goto(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| AppError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::Browser(format!("Navigation did not settle for {}: {}", url, e)))?;
        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .tab()?
            .evaluate(script, false)
            .map_err(|e| AppError::Browser(format!("JavaScript evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    fn query(&self, locator: &Locator) -> Result<Vec<NodeHandle>> {
        locator.check_syntax()?;

        let outcome = self.evaluate(&Self::query_script(locator))?;
        if outcome.get("error").is_some() {
            // The page rejected the selector (XPath syntax errors land here).
            return Err(AppError::InvalidSelector {
                selector: locator.selector.to_string(),
            });
        }

        let ids = outcome
            .get("ids")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_u64).collect())
            .unwrap_or_default();
        Ok(ids)
    }

    fn text(&self, node: NodeHandle) -> Result<String> {
        let value = self.with_node(node, "return n.innerText;")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> Result<Option<String>> {
        let name = serde_json::to_string(name)?;
        let value = self.with_node(
            node,
            &format!(
                r#"const attr = n.getAttribute({name});
                if (attr !== null) {{ return {{ value: attr }}; }}
                const prop = n[{name}];
                return {{ value: prop === undefined || prop === null ? null : String(prop) }};"#
            ),
        )?;
        Ok(value
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn is_clickable(&self, node: NodeHandle) -> Result<bool> {
        let value = self.with_node(
            node,
            r#"const rect = n.getBoundingClientRect();
            const style = window.getComputedStyle(n);
            return rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden' && style.display !== 'none'
                && !n.disabled;"#,
        )?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn click(&self, node: NodeHandle) -> Result<()> {
        debug!(node, "clicking element");
        self.with_node(
            node,
            r#"n.scrollIntoView({ block: 'center' });
            n.click();
            return true;"#,
        )?;
        Ok(())
    }

    fn call_js(&self, node: NodeHandle, function: &str) -> Result<Value> {
        self.with_node(node, &format!("return ({function}).call(n) ?? true;"))
    }

    fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.tab()?
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| AppError::Browser(format!("Screenshot capture failed: {}", e)))
    }

    fn close(&mut self) -> Result<()> {
        debug!("closing browser");
        self.tab.take();
        // Dropping the browser tears down the Chrome process.
        self.browser.take();
        Ok(())
    }
}
