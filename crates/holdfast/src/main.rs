use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use holdfast_e::WebDriverBackend;
use holdfast_engine::backend::Backend;
use holdfast_engine::cli::{self, FileErrorMode, FileOptions, OutputHandlers, ReplOptions};
use holdfast_engine::config::schema::BrowserConfig;
use holdfast_engine::config::{BrowserKind, ConfigLoader};
use holdfast_engine::scenario::ScenarioRunner;
use holdfast_engine::steps::registration_steps;
use holdfast_h::HeadlessBackend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "holdfast", version, about = "Resilient form automation for the registration flow")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Config file (default: ./holdfast.yaml, then ~/.holdfast/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Browser engine: chromium, firefox or webkit
    #[arg(long, global = true)]
    browser: Option<BrowserKind>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Application under test, overriding the configured base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run scenario files (globs allowed), one browser session per scenario
    Run {
        #[arg(required = true)]
        files: Vec<String>,

        /// Scenarios to run at once
        #[arg(long, default_value_t = 1)]
        jobs: usize,

        /// Keep going after a failed scenario (sequential runs only)
        #[arg(long)]
        keep_going: bool,
    },
    /// Enter step lines against one live session
    Repl,
    /// List the step patterns scenarios may use
    Steps,
}

/// Chromium is driven over CDP unless a WebDriver endpoint is configured;
/// the other engines always go through WebDriver.
fn new_backend(config: &BrowserConfig) -> Box<dyn Backend> {
    match (config.kind, &config.webdriver_url) {
        (BrowserKind::Chromium, None) => Box::new(HeadlessBackend::new(config.clone())),
        _ => Box::new(WebDriverBackend::new(config.clone())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("holdfast=info,holdfast_engine=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref())
        .await
        .context("loading configuration")?;
    if let Some(kind) = args.browser {
        config.browser.kind = kind;
    }
    if args.headed {
        config.browser.headless = false;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    ConfigLoader::validate(&config)?;

    let output = OutputHandlers {
        out: |msg| println!("{}", msg),
        err: |msg| eprintln!("{}", msg),
    };
    let browser = config.browser.clone();
    let runner = ScenarioRunner::new(config, registration_steps()?);

    match args.mode {
        Mode::Steps => {
            for pattern in runner.steps().patterns() {
                println!("{}", pattern);
            }
        }
        Mode::Run {
            files,
            jobs,
            keep_going,
        } => {
            let paths = cli::expand_patterns(&files)?;
            let mut failed = 0;
            for path in &paths {
                let reports = cli::run_file(
                    &runner,
                    || new_backend(&browser),
                    output,
                    path,
                    FileOptions {
                        stop_on_error: !keep_going,
                        error_mode: FileErrorMode::WithPath,
                        jobs: jobs.max(1),
                    },
                )
                .await
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
                failed += reports.iter().filter(|r| !r.passed()).count();
                if failed > 0 && !keep_going && jobs <= 1 {
                    break;
                }
            }
            if failed > 0 {
                bail!("{} scenario(s) failed", failed);
            }
        }
        Mode::Repl => {
            let mut backend = new_backend(&browser);
            backend.launch().await.context("launching browser")?;
            let repl_options = ReplOptions {
                banner_lines: &[
                    "Session ready. Enter step lines, e.g. 'I navigate to the registration page'.",
                    "Type 'exit' or 'quit' to close.",
                ],
                prompt: "> ",
                exit_commands: &["exit", "quit"],
                handle_ctrl_c: true,
                ctrl_c_message: Some("Interrupted, closing session."),
            };
            let session = cli::run_repl(backend.as_mut(), &runner, output, repl_options).await;
            backend.close().await?;
            session.map_err(|e| anyhow::anyhow!("{}", e))?;
        }
    }

    Ok(())
}
