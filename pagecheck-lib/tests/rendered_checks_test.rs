//! Rendered checks against a real headless Chrome. Skipped when no browser
//! executable can be found.

use pagecheck_lib::browser::{BrowserSession, LazySession, Locator, PageProbe};
use pagecheck_lib::page_suite::page_check;
use pagecheck_lib::{BrowserOptions, CheckGroup};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/index.html")
}

fn browser_options() -> Option<BrowserOptions> {
    let chrome_path = match std::env::var_os("PAGECHECK_CHROME_PATH") {
        Some(path) => PathBuf::from(path),
        None => headless_chrome::browser::default_executable().ok()?,
    };
    Some(BrowserOptions {
        chrome_path: Some(chrome_path),
        sandbox: false,
        ..BrowserOptions::default()
    })
}

#[test]
fn test_rendered_fixture() {
    let _ = env_logger::builder().is_test(true).try_init();
    let Some(options) = browser_options() else {
        eprintln!("no Chrome executable found, skipping rendered checks");
        return;
    };

    let mut session = LazySession::new(options.clone(), fixture_path());
    assert!(!session.is_active());

    let outcomes = page_check::run_rendered(&mut session);
    assert!(session.is_active());
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.passed())
        .map(ToString::to_string)
        .collect();
    assert_eq!(failed, Vec::<String>::new());
    assert!(outcomes.iter().all(|o| o.group == CheckGroup::Rendered));

    session.release();
    assert!(!session.is_active());

    let browser = BrowserSession::launch(&options, &fixture_path()).expect("launch");
    let missing = browser
        .snapshot(&Locator::tag_name("table"), &["width"])
        .expect("evaluate");
    assert_eq!(missing, None);

    let aside = browser
        .snapshot(&Locator::tag_name("aside"), &["float", "width"])
        .expect("evaluate")
        .expect("aside rendered");
    assert_eq!(aside.property("float"), Some("left"));
    assert_eq!(aside.property("width"), Some("95px"));
}
