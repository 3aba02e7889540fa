//! Scenario files and the per-scenario session lifecycle.
//!
//! A scenario runs against a backend of its own: the runner launches it,
//! drives the steps in order under one overall deadline, screenshots the
//! page if anything failed, and always closes it. Nothing is shared between
//! scenarios except the artifact directory.

use crate::artifacts::ArtifactStore;
use crate::backend::{Backend, BackendError};
use crate::config::HoldfastConfig;
use crate::executor::{ActionExecutor, ExecutorError};
use crate::sink::{EventSink, TracingSink};
use crate::steps::registry::strip_keyword;
use crate::steps::{StepCommand, StepError, StepRegistry};
use holdfast_common::result::ExecutionResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Session could not start: {0}")]
    SessionInit(BackendError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Intent(#[from] ExecutorError),

    #[error("Navigation failed: {0}")]
    Navigation(BackendError),

    #[error("Expected URL containing {expected:?}, got {actual:?}")]
    UrlMismatch { expected: String, actual: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Scenario timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<String>,
}

fn is_step_line(line: &str) -> bool {
    strip_keyword(line) != line.trim()
}

/// Parse a `.feature`-style file.
///
/// `Scenario:` starts a scenario and `Background:` steps are prepended to
/// every scenario. `Feature:` headers, free-text descriptions (under any header),
/// `@tags` and `#` comments are ignored. Keyword lines outside any block form one implicit
/// scenario named `default_name`.
pub fn parse_scenarios(source: &str, default_name: &str) -> Vec<Scenario> {
    enum Block {
        Preamble,
        Background,
        Scenario,
    }

    let mut background = Vec::new();
    let mut implicit = Vec::new();
    let mut scenarios: Vec<Scenario> = Vec::new();
    let mut block = Block::Preamble;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
            continue;
        }
        if line.starts_with("Feature:") {
            block = Block::Preamble;
            continue;
        }
        if line.starts_with("Background:") {
            block = Block::Background;
            continue;
        }
        if let Some(name) = line.strip_prefix("Scenario:") {
            scenarios.push(Scenario {
                name: name.trim().to_string(),
                steps: Vec::new(),
            });
            block = Block::Scenario;
            continue;
        }

        match block {
            _ if !is_step_line(line) => {}
            Block::Preamble => implicit.push(line.to_string()),
            Block::Background => background.push(line.to_string()),
            Block::Scenario => {
                if let Some(current) = scenarios.last_mut() {
                    current.steps.push(line.to_string());
                }
            }
        }
    }

    if !implicit.is_empty() {
        scenarios.insert(
            0,
            Scenario {
                name: default_name.to_string(),
                steps: implicit,
            },
        );
    }

    for scenario in &mut scenarios {
        let mut steps = background.clone();
        steps.append(&mut scenario.steps);
        scenario.steps = steps;
    }
    scenarios
}

pub async fn load_scenarios(path: &Path) -> Result<Vec<Scenario>, ScenarioError> {
    let content = tokio::fs::read_to_string(path).await?;
    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("steps");
    Ok(parse_scenarios(&content, default_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub text: String,
    pub status: StepStatus,
    /// One result per intent the step ran.
    pub results: Vec<ExecutionResult>,
    pub error: Option<String>,
}

impl StepReport {
    fn new(text: &str, status: StepStatus, results: Vec<ExecutionResult>) -> Self {
        Self {
            text: text.to_string(),
            status,
            results,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
    pub failure: Option<ScenarioError>,
    /// Screenshot taken after the scenario failed.
    pub artifact: Option<PathBuf>,
    pub duration: Duration,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// The exhausted intent that failed the scenario, if that is what happened.
    pub fn failed_intent(&self) -> Option<&ExecutionResult> {
        match &self.failure {
            Some(ScenarioError::Intent(e)) => e.result(),
            _ => None,
        }
    }
}

/// Join a step path onto the base URL. Absolute URLs pass through.
pub fn resolve_url(base_url: &str, path: &str) -> Result<Url, ScenarioError> {
    Ok(Url::parse(base_url)?.join(path)?)
}

/// Run one step command against a live session.
pub async fn execute_command<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut ActionExecutor,
    base_url: &str,
    command: StepCommand,
) -> Result<Option<ExecutionResult>, ScenarioError> {
    match command {
        StepCommand::Navigate(path) => {
            let url = resolve_url(base_url, &path)?;
            let nav = backend
                .navigate(url.as_str())
                .await
                .map_err(ScenarioError::Navigation)?;
            info!(url = %nav.url, title = %nav.title, "navigated");
            Ok(None)
        }
        StepCommand::Back => {
            backend.go_back().await.map_err(ScenarioError::Navigation)?;
            Ok(None)
        }
        StepCommand::Run(intent) => Ok(Some(executor.execute(backend, intent).await?)),
        StepCommand::ExpectUrlContains(expected) => {
            // Clicks that navigate return before the new URL commits.
            let settings = executor.settings();
            let start = Instant::now();
            loop {
                let actual = backend
                    .current_url()
                    .await
                    .map_err(ScenarioError::Navigation)?;
                if actual.contains(&expected) {
                    return Ok(None);
                }
                if start.elapsed() >= settings.candidate_timeout {
                    return Err(ScenarioError::UrlMismatch { expected, actual });
                }
                tokio::time::sleep(settings.poll_interval).await;
            }
        }
    }
}

pub struct ScenarioRunner {
    config: HoldfastConfig,
    steps: StepRegistry,
    artifacts: Arc<ArtifactStore>,
    sink: Arc<dyn EventSink>,
}

impl ScenarioRunner {
    pub fn new(config: HoldfastConfig, steps: StepRegistry) -> Self {
        let artifacts = Arc::new(ArtifactStore::new(config.artifacts.dir.clone()));
        Self {
            config,
            steps,
            artifacts,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &HoldfastConfig {
        &self.config
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn artifacts(&self) -> Arc<ArtifactStore> {
        self.artifacts.clone()
    }

    /// Executor wired to this runner's config, artifact store and sink.
    pub fn executor(&self) -> ActionExecutor {
        ActionExecutor::from_config(&self.config, self.artifacts.clone()).with_sink(self.sink.clone())
    }

    /// Run a scenario on `backend`, which must not be launched yet.
    pub async fn run<B: Backend + ?Sized>(&self, backend: &mut B, scenario: &Scenario) -> ScenarioReport {
        let started = Instant::now();
        info!(scenario = %scenario.name, steps = scenario.steps.len(), "scenario started");

        if let Err(e) = backend.launch().await {
            error!(scenario = %scenario.name, error = %e, "session could not start");
            return ScenarioReport {
                name: scenario.name.clone(),
                steps: scenario
                    .steps
                    .iter()
                    .map(|s| StepReport::new(s, StepStatus::Skipped, Vec::new()))
                    .collect(),
                failure: Some(ScenarioError::SessionInit(e)),
                artifact: None,
                duration: started.elapsed(),
            };
        }

        let mut executor = self.executor();
        let mut steps = Vec::new();
        let deadline = self.config.scenario.timeout();
        let outcome = tokio::time::timeout(
            deadline,
            self.run_steps(backend, &mut executor, scenario, &mut steps),
        )
        .await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(_) => {
                if let Some(text) = scenario.steps.get(steps.len()) {
                    let mut report = StepReport::new(text, StepStatus::Failed, Vec::new());
                    report.error = Some(format!("interrupted after {:?}", deadline));
                    steps.push(report);
                }
                Some(ScenarioError::TimedOut(deadline))
            }
        };
        for text in scenario.steps.iter().skip(steps.len()) {
            steps.push(StepReport::new(text, StepStatus::Skipped, Vec::new()));
        }

        let mut artifact = None;
        if let Some(failure) = &failure {
            warn!(scenario = %scenario.name, error = %failure, "scenario failed");
            artifact = self.capture_failure(backend, &scenario.name).await;
        }

        if let Err(e) = backend.close().await {
            warn!(scenario = %scenario.name, error = %e, "failed to close session");
        }

        let report = ScenarioReport {
            name: scenario.name.clone(),
            steps,
            failure,
            artifact,
            duration: started.elapsed(),
        };
        info!(
            scenario = %report.name,
            passed = report.passed(),
            duration_ms = report.duration.as_millis() as u64,
            "scenario finished"
        );
        report
    }

    async fn run_steps<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        executor: &mut ActionExecutor,
        scenario: &Scenario,
        reports: &mut Vec<StepReport>,
    ) -> Result<(), ScenarioError> {
        for text in &scenario.steps {
            let commands = match self.steps.resolve(text) {
                Ok(commands) => commands,
                Err(e) => {
                    let mut report = StepReport::new(text, StepStatus::Failed, Vec::new());
                    report.error = Some(e.to_string());
                    reports.push(report);
                    return Err(e.into());
                }
            };

            let mut results = Vec::new();
            for command in commands {
                match execute_command(backend, executor, &self.config.base_url, command).await {
                    Ok(Some(result)) => results.push(result),
                    Ok(None) => {}
                    Err(e) => {
                        let mut report = StepReport::new(text, StepStatus::Failed, results);
                        report.error = Some(e.to_string());
                        reports.push(report);
                        return Err(e);
                    }
                }
            }
            reports.push(StepReport::new(text, StepStatus::Passed, results));
        }
        Ok(())
    }

    async fn capture_failure<B: Backend + ?Sized>(&self, backend: &mut B, name: &str) -> Option<PathBuf> {
        if !backend.is_ready().await {
            return None;
        }
        let png = match backend.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!(error = %e, "could not screenshot failed scenario");
                return None;
            }
        };
        match self
            .artifacts
            .capture_named(&format!("failed-{}", name), &png)
            .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "could not save failure screenshot");
                None
            }
        }
    }
}
