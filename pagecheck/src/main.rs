use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::error;
use pagecheck_lib::page_suite::page_check;
use pagecheck_lib::parser::page_html;
use pagecheck_lib::style::style_block::CssMode;
use pagecheck_lib::{BrowserOptions, CheckConfig, CheckGroup, SuiteReport, SuiteSelection};
use std::path::PathBuf;
use std::process::ExitCode;

const PAGECHECK_INTRO: &str = r#"
     ___  ___ ____ ____ ____ _  _ ____ ____ _  _
     |__] |__| | __ |___ |    |__| |___ |    |_/
     |    |  | |__] |___ |___ |  | |___ |___ | \_

    pagecheck - markup, style and rendering checks for index.html
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Suite {
    Markup,
    Style,
    Rendered,
    /// Markup and style, no browser.
    Static,
    All,
}

impl From<Suite> for SuiteSelection {
    fn from(suite: Suite) -> Self {
        match suite {
            Suite::Markup => SuiteSelection::only(CheckGroup::Markup),
            Suite::Style => SuiteSelection::only(CheckGroup::Style),
            Suite::Rendered => SuiteSelection::only(CheckGroup::Rendered),
            Suite::Static => SuiteSelection::STATIC,
            Suite::All => SuiteSelection::ALL,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pagecheck")]
#[command(about = "Check an HTML exercise page's markup, styles and rendering")]
struct Args {
    /// Fixture HTML file.
    #[arg(default_value = pagecheck_lib::config::DEFAULT_FIXTURE)]
    input: PathBuf,

    /// Which checks to run.
    #[arg(long, value_enum, default_value_t = Suite::Static)]
    suite: Suite,

    /// Reject malformed CSS in the style block instead of skipping it.
    #[arg(long)]
    strict_css: bool,

    /// Chrome/Chromium executable for rendered checks.
    #[arg(long, env = "PAGECHECK_CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    #[arg(long, default_value_t = 800, env = "PAGECHECK_WINDOW_WIDTH")]
    window_width: u32,

    #[arg(long, default_value_t = 600, env = "PAGECHECK_WINDOW_HEIGHT")]
    window_height: u32,

    /// Launch the browser without its sandbox (needed in some containers).
    #[arg(long, env = "PAGECHECK_NO_SANDBOX")]
    no_sandbox: bool,

    /// Print the parsed document outline before the checks.
    #[arg(long)]
    outline: bool,

    /// Skip the banner.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn to_config(&self) -> CheckConfig {
        CheckConfig {
            fixture: self.input.clone(),
            suites: self.suite.into(),
            css_mode: if self.strict_css {
                CssMode::Strict
            } else {
                CssMode::Lenient
            },
            browser: BrowserOptions {
                chrome_path: self.chrome_path.clone(),
                window_size: (self.window_width, self.window_height),
                sandbox: !self.no_sandbox,
                ..BrowserOptions::default()
            },
        }
    }
}

fn exit_code(report: &SuiteReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // parse the args given in terminal
    let args = Args::parse();
    if !args.quiet {
        println!("{}", PAGECHECK_INTRO);
    }

    if args.outline {
        match page_html::load_document(&args.input) {
            Ok(document) => println!("{}", page_html::outline(&document)),
            Err(e) => {
                error!("{}", e);
                return ExitCode::from(2);
            }
        }
    }

    match page_check::run(&args.to_config()) {
        Ok(report) => {
            println!("{}", report);
            exit_code(&report)
        }
        Err(e) => {
            eprintln!("Error running checks: {}", e);
            ExitCode::from(2)
        }
    }
}
