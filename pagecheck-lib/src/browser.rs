//! Headless browser access for rendered checks.
//!
//! A [`BrowserSession`] owns one Chrome process and one tab showing the
//! fixture. Dropping the session kills the process. [`LazySession`] launches
//! the session on first use and remembers a failed launch.

use crate::config::BrowserOptions;
use crate::error::{PageCheckError, Result};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// How a rendered check finds its element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// First element with the class.
    ClassName(String),
    /// First element with the tag.
    TagName(String),
    /// Last element with the tag.
    LastOfTag(String),
    /// First `tag` element inside the element found by `parent`.
    Within { parent: Box<Locator>, tag: String },
}

impl Locator {
    pub fn class_name(name: &str) -> Self {
        Locator::ClassName(name.to_string())
    }

    pub fn tag_name(tag: &str) -> Self {
        Locator::TagName(tag.to_string())
    }

    pub fn last_of_tag(tag: &str) -> Self {
        Locator::LastOfTag(tag.to_string())
    }

    pub fn within(parent: Locator, tag: &str) -> Self {
        Locator::Within {
            parent: Box::new(parent),
            tag: tag.to_string(),
        }
    }

    /// JavaScript expression evaluating to the element or `undefined`.
    pub fn to_js(&self) -> String {
        match self {
            Locator::ClassName(name) => {
                format!("document.getElementsByClassName({})[0]", js_string(name))
            }
            Locator::TagName(tag) => {
                format!("document.getElementsByTagName({})[0]", js_string(tag))
            }
            Locator::LastOfTag(tag) => format!(
                "(function (l) {{ return l[l.length - 1]; }})(document.getElementsByTagName({}))",
                js_string(tag)
            ),
            Locator::Within { parent, tag } => format!(
                "(function (p) {{ return p ? p.getElementsByTagName({})[0] : undefined; }})({})",
                js_string(tag),
                parent.to_js()
            ),
        }
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// What the page reports about one element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    /// Rendered text (`innerText`).
    pub text: String,
    /// Requested computed style properties.
    #[serde(default)]
    pub properties: HashMap<String, String>,
    /// Content-box width of the parent element in px.
    #[serde(default)]
    pub containing_width: Option<f64>,
    /// Rendered text of every `<b>` descendant.
    #[serde(default)]
    pub bold_texts: Vec<String>,
}

impl ElementSnapshot {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Script returning a JSON string with an [`ElementSnapshot`] or `null`.
pub fn snapshot_script(locator: &Locator, properties: &[&str]) -> String {
    let properties = serde_json::to_string(properties).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(function () {{
    var el = {locator};
    if (!el) {{ return JSON.stringify(null); }}
    var cs = window.getComputedStyle(el);
    var names = {properties};
    var values = {{}};
    for (var i = 0; i < names.length; i++) {{
        values[names[i]] = cs.getPropertyValue(names[i]);
    }}
    var width = null;
    var parent = el.parentElement;
    if (parent) {{
        var ps = window.getComputedStyle(parent);
        width = parent.clientWidth - parseFloat(ps.paddingLeft) - parseFloat(ps.paddingRight);
    }}
    var bold = Array.prototype.map.call(el.getElementsByTagName('b'), function (b) {{
        return b.innerText;
    }});
    return JSON.stringify({{
        text: el.innerText,
        properties: values,
        containingWidth: width,
        boldTexts: bold
    }});
}})()"#,
        locator = locator.to_js(),
        properties = properties,
    )
}

/// Parses the JSON string returned by [`snapshot_script`].
pub fn parse_snapshot(raw: &str) -> Result<Option<ElementSnapshot>> {
    serde_json::from_str(raw).map_err(|e| PageCheckError::Snapshot(e.to_string()))
}

/// Read access to a rendered page.
pub trait PageProbe {
    /// Snapshot of the element `locator` finds, `None` if there is none.
    fn snapshot(&self, locator: &Locator, properties: &[&str]) -> Result<Option<ElementSnapshot>>;
}

/// Converts a fixture path into an absolute `file://` URL.
pub fn file_url(path: &Path) -> Result<Url> {
    let absolute = fs::canonicalize(path).map_err(|source| PageCheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Url::from_file_path(&absolute).map_err(|()| PageCheckError::FileUrl(absolute))
}

/// A running headless browser with the fixture loaded.
pub struct BrowserSession {
    // Field order matters: the tab must go before the browser process.
    tab: Arc<Tab>,
    _browser: Browser,
    url: Url,
}

impl BrowserSession {
    pub fn launch(options: &BrowserOptions, fixture: &Path) -> Result<Self> {
        let url = file_url(fixture)?;

        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(true)
            .sandbox(options.sandbox)
            .window_size(Some(options.window_size))
            .idle_browser_timeout(options.idle_timeout)
            .args(vec![
                OsStr::new("--allow-file-access-from-files"),
                OsStr::new("--force-device-scale-factor=1"),
                OsStr::new("--hide-scrollbars"),
                OsStr::new("--disable-gpu"),
            ]);
        if let Some(path) = &options.chrome_path {
            builder.path(Some(path.clone()));
        }
        let launch_options = builder.build().map_err(PageCheckError::browser)?;

        info!("launching headless browser for {}", url);
        let browser = Browser::new(launch_options).map_err(PageCheckError::browser)?;
        let tab = browser.new_tab().map_err(PageCheckError::browser)?;
        tab.navigate_to(url.as_str())
            .map_err(PageCheckError::browser)?;
        tab.wait_until_navigated().map_err(PageCheckError::browser)?;
        debug!("fixture loaded in browser tab");

        Ok(BrowserSession {
            tab,
            _browser: browser,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl PageProbe for BrowserSession {
    fn snapshot(&self, locator: &Locator, properties: &[&str]) -> Result<Option<ElementSnapshot>> {
        let script = snapshot_script(locator, properties);
        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(PageCheckError::browser)?;
        let value = result
            .value
            .ok_or_else(|| PageCheckError::Snapshot("no value returned".to_string()))?;
        let raw = value
            .as_str()
            .ok_or_else(|| PageCheckError::Snapshot(format!("expected a JSON string, got {}", value)))?;
        parse_snapshot(raw)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        info!("closing browser session for {}", self.url);
    }
}

enum SessionState {
    Idle,
    Ready(BrowserSession),
    Failed(String),
}

/// A browser session acquired on first use and released explicitly or on drop.
pub struct LazySession {
    options: BrowserOptions,
    fixture: PathBuf,
    state: SessionState,
}

impl LazySession {
    pub fn new(options: BrowserOptions, fixture: impl Into<PathBuf>) -> Self {
        LazySession {
            options,
            fixture: fixture.into(),
            state: SessionState::Idle,
        }
    }

    /// Launches the browser if needed. A failed launch is not retried until
    /// [`release`](Self::release).
    pub fn acquire(&mut self) -> std::result::Result<&BrowserSession, String> {
        if let SessionState::Idle = self.state {
            self.state = match BrowserSession::launch(&self.options, &self.fixture) {
                Ok(session) => SessionState::Ready(session),
                Err(err) => SessionState::Failed(err.to_string()),
            };
        }
        match &self.state {
            SessionState::Ready(session) => Ok(session),
            SessionState::Failed(message) => Err(message.clone()),
            SessionState::Idle => Err("browser session was not started".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Drops the browser, if one was launched.
    pub fn release(&mut self) {
        if let SessionState::Ready(_) = self.state {
            debug!("releasing browser session");
        }
        self.state = SessionState::Idle;
    }
}
