use crate::checks::CheckGroup;
use crate::style::style_block::CssMode;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FIXTURE: &str = "index.html";

/// Everything a suite run needs to know.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub fixture: PathBuf,
    pub suites: SuiteSelection,
    pub css_mode: CssMode,
    pub browser: BrowserOptions,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            fixture: PathBuf::from(DEFAULT_FIXTURE),
            suites: SuiteSelection::STATIC,
            css_mode: CssMode::default(),
            browser: BrowserOptions::default(),
        }
    }
}

/// Which check groups run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSelection {
    pub markup: bool,
    pub style: bool,
    pub rendered: bool,
}

impl SuiteSelection {
    /// Markup and style block checks, no browser.
    pub const STATIC: SuiteSelection = SuiteSelection {
        markup: true,
        style: true,
        rendered: false,
    };

    pub const ALL: SuiteSelection = SuiteSelection {
        markup: true,
        style: true,
        rendered: true,
    };

    pub fn only(group: CheckGroup) -> Self {
        SuiteSelection {
            markup: group == CheckGroup::Markup,
            style: group == CheckGroup::Style,
            rendered: group == CheckGroup::Rendered,
        }
    }

    pub fn includes(&self, group: CheckGroup) -> bool {
        match group {
            CheckGroup::Markup => self.markup,
            CheckGroup::Style => self.style,
            CheckGroup::Rendered => self.rendered,
        }
    }
}

/// Launch settings for the headless browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Chrome/Chromium executable; autodetected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub window_size: (u32, u32),
    pub idle_timeout: Duration,
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        BrowserOptions {
            chrome_path: None,
            window_size: (800, 600),
            idle_timeout: Duration::from_secs(60),
            sandbox: true,
        }
    }
}
