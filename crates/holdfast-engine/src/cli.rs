use crate::backend::Backend;
use crate::executor::ActionExecutor;
use crate::formatter::{format_scenario_report, format_summary};
use crate::scenario::{ScenarioReport, ScenarioRunner, execute_command, load_scenarios};
use futures::{StreamExt, stream};
use holdfast_common::formatter::format_result;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

pub enum FileErrorMode {
    Plain,
    WithPath,
}

pub struct FileOptions {
    pub stop_on_error: bool,
    pub error_mode: FileErrorMode,
    /// Scenarios run concurrently, each in its own session. `stop_on_error`
    /// only applies when this is 1.
    pub jobs: usize,
}

pub struct ReplOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
    pub handle_ctrl_c: bool,
    pub ctrl_c_message: Option<&'a str>,
}

/// Run one step line against a live session and render what happened.
async fn execute_line<B: Backend + ?Sized>(
    backend: &mut B,
    runner: &ScenarioRunner,
    executor: &mut ActionExecutor,
    line: &str,
) -> Result<String, String> {
    let commands = runner.steps().resolve(line).map_err(|e| e.to_string())?;
    let mut lines = Vec::new();
    for command in commands {
        let shown = command.to_string();
        match execute_command(backend, executor, &runner.config().base_url, command).await {
            Ok(Some(result)) => lines.push(format_result(&result)),
            Ok(None) => lines.push(format!("ok {}", shown)),
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok(lines.join("\n"))
}

fn emit(report: &ScenarioReport, output: OutputHandlers, path: &Path, mode: &FileErrorMode) {
    let rendered = format_scenario_report(report);
    if report.passed() {
        (output.out)(&rendered);
        return;
    }
    match mode {
        FileErrorMode::Plain => (output.err)(&rendered),
        FileErrorMode::WithPath => (output.err)(&format!("{}: {}", path.display(), rendered)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid file pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Unreadable path: {0}")]
    Unreadable(#[from] glob::GlobError),
    #[error("No scenario files match {0:?}")]
    NoMatch(String),
}

/// Expand file arguments. Each argument is a glob; one that matches nothing
/// is an error rather than a silently empty run.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, PatternError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| PatternError::Invalid {
            pattern: pattern.clone(),
            source,
        })?;
        let mut matched = false;
        for path in paths {
            let path = path?;
            if !path.is_file() {
                continue;
            }
            matched = true;
            if !files.contains(&path) {
                files.push(path);
            }
        }
        if !matched {
            return Err(PatternError::NoMatch(pattern.clone()));
        }
    }
    Ok(files)
}

/// Run every scenario in a file, each on a fresh backend from `new_backend`.
pub async fn run_file<F>(
    runner: &ScenarioRunner,
    mut new_backend: F,
    output: OutputHandlers,
    path: &Path,
    options: FileOptions,
) -> Result<Vec<ScenarioReport>, Box<dyn Error>>
where
    F: FnMut() -> Box<dyn Backend>,
{
    let scenarios = load_scenarios(path).await?;
    let mut reports = Vec::new();

    if options.jobs > 1 {
        let sessions: Vec<_> = scenarios.iter().map(|s| (s, new_backend())).collect();
        let mut running = stream::iter(sessions)
            .map(|(scenario, mut backend)| async move { runner.run(backend.as_mut(), scenario).await })
            .buffered(options.jobs);
        while let Some(report) = running.next().await {
            emit(&report, output, path, &options.error_mode);
            reports.push(report);
        }
    } else {
        for scenario in &scenarios {
            let mut backend = new_backend();
            let report = runner.run(backend.as_mut(), scenario).await;
            emit(&report, output, path, &options.error_mode);
            let failed = !report.passed();
            reports.push(report);
            if failed && options.stop_on_error {
                break;
            }
        }
    }

    (output.out)(&format_summary(&reports));
    Ok(reports)
}

/// Possible outcomes from reading a single REPL line.
enum ReadLineResult {
    /// A non-empty input line to process.
    Input(String),
    /// Empty line or no input yet -- skip and re-prompt.
    Skip,
    /// EOF or exit command -- terminate the loop.
    Exit,
    /// I/O error while reading.
    Error(io::Error),
}

async fn read_line(
    reader: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    exit_commands: &[&str],
    handle_ctrl_c: bool,
    ctrl_c_message: Option<&str>,
    output: OutputHandlers,
) -> ReadLineResult {
    if handle_ctrl_c {
        tokio::select! {
            line = reader.next_line() => {
                classify_line(line, exit_commands)
            }
            _ = tokio::signal::ctrl_c() => {
                if let Some(message) = ctrl_c_message {
                    (output.out)(message);
                }
                ReadLineResult::Exit
            }
        }
    } else {
        classify_line(reader.next_line().await, exit_commands)
    }
}

fn classify_line(
    result: Result<Option<String>, io::Error>,
    exit_commands: &[&str],
) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() {
                ReadLineResult::Skip
            } else if exit_commands.contains(&trimmed.as_str()) {
                ReadLineResult::Exit
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

/// Interactive step lines against one session. The backend must be launched.
pub async fn run_repl<B: Backend + ?Sized>(
    backend: &mut B,
    runner: &ScenarioRunner,
    output: OutputHandlers,
    options: ReplOptions<'_>,
) -> Result<(), Box<dyn Error>> {
    for line in options.banner_lines {
        (output.out)(line);
    }

    let mut executor = runner.executor();
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        match read_line(
            &mut reader,
            options.exit_commands,
            options.handle_ctrl_c,
            options.ctrl_c_message,
            output,
        )
        .await
        {
            ReadLineResult::Input(line) => match execute_line(backend, runner, &mut executor, &line).await {
                Ok(result) => (output.out)(&result),
                Err(err) => (output.err)(&format!("Error: {}", err)),
            },
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        }
    }
    Ok(())
}
