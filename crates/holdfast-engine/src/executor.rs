//! The resilient action executor.
//!
//! `execute` turns one [`Intent`] into a plan (ordered candidates, the action
//! to perform, the post-condition proving it worked) and walks the candidates
//! strictly in order. Each candidate gets one bounded resolution wait, one
//! action and one verification. The first verified candidate wins. When none
//! is left, a screenshot is written and the full attempt log is returned as
//! [`ExecutorError::IntentExhausted`].

use crate::artifacts::ArtifactStore;
use crate::backend::{Backend, BackendError};
use crate::catalog::{self, Catalog};
use crate::config::HoldfastConfig;
use crate::config::schema::ExecutorConfig;
use crate::resolution::{resolve_once, resolve_within};
use crate::sink::{EventSink, ExecutionEvent, TracingSink};
use crate::verifier::{PostCondition, verify};
use holdfast_common::formatter::format_result;
use holdfast_common::intent::{Intent, IntentKind, Target};
use holdfast_common::locator::{LocatorCandidate, Requirement, Strategy};
use holdfast_common::matching::closest;
use holdfast_common::protocol::ElementSnapshot;
use holdfast_common::result::{AttemptFailure, AttemptRecord, ExecutionResult, MatchedCandidate};
use holdfast_common::roles::{RoleAliasTable, RoleLookup};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Every candidate failed. Carries the full attempt log and artifact path.
    #[error("Intent exhausted: {}", format_result(.0))]
    IntentExhausted(Box<ExecutionResult>),

    #[error("Session failure: {0}")]
    Session(BackendError),

    #[error("Cannot {kind} \"{target}\": {reason}")]
    Unsupported {
        kind: IntentKind,
        target: String,
        reason: String,
    },
}

impl ExecutorError {
    /// The failed result, when the error is an exhausted intent.
    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            Self::IntentExhausted(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub candidate_timeout: Duration,
    pub poll_interval: Duration,
    pub verify_timeout: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from(&ExecutorConfig::default())
    }
}

impl From<&ExecutorConfig> for ExecutorSettings {
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            candidate_timeout: config.candidate_timeout(),
            poll_interval: config.poll_interval(),
            verify_timeout: config.verify_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    None,
    Fill(String),
    Click,
    Check,
}

#[derive(Debug)]
struct Plan {
    candidates: Vec<LocatorCandidate>,
    requirement: Requirement,
    action: Action,
    post: PostCondition,
    /// Dropdown triggers to try when no option is visible yet.
    reveal: Option<Vec<LocatorCandidate>>,
    rendered_label: Option<String>,
    /// Scope whose rendered texts are logged next to a failure.
    diagnostic_scope: Option<&'static str>,
}

impl Plan {
    fn new(candidates: Vec<LocatorCandidate>, kind: IntentKind) -> Self {
        let (requirement, action, post) = match kind {
            IntentKind::VerifyVisible => (Requirement::Visible, Action::None, PostCondition::Visible),
            IntentKind::VerifyChecked => (Requirement::Present, Action::None, PostCondition::Checked),
            IntentKind::Check => (Requirement::Actionable, Action::Check, PostCondition::Checked),
            IntentKind::Click | IntentKind::SelectOption | IntentKind::Fill => {
                (Requirement::Actionable, Action::Click, PostCondition::None)
            }
        };
        Self {
            candidates,
            requirement,
            action,
            post,
            reveal: None,
            rendered_label: None,
            diagnostic_scope: None,
        }
    }
}

pub struct ActionExecutor {
    catalog: Catalog,
    roles: RoleAliasTable,
    artifacts: Arc<ArtifactStore>,
    settings: ExecutorSettings,
    sink: Arc<dyn EventSink>,
}

impl ActionExecutor {
    pub fn new(
        catalog: Catalog,
        roles: RoleAliasTable,
        artifacts: Arc<ArtifactStore>,
        settings: ExecutorSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            catalog,
            roles,
            artifacts,
            settings,
            sink,
        }
    }

    /// Executor for the registration form, with config overrides applied
    /// and events going to `tracing`.
    pub fn from_config(config: &HoldfastConfig, artifacts: Arc<ArtifactStore>) -> Self {
        Self::new(
            Catalog::registration().with_overrides(&config.fields),
            config.roles.table(),
            artifacts,
            ExecutorSettings::from(&config.executor),
            Arc::new(TracingSink),
        )
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> ExecutorSettings {
        self.settings
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub async fn execute<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        intent: Intent,
    ) -> Result<ExecutionResult, ExecutorError> {
        if !backend.is_ready().await {
            return Err(ExecutorError::Session(BackendError::NotReady));
        }

        let plan = self.plan(backend, &intent).await?;
        self.sink.record(ExecutionEvent::IntentStarted {
            intent: intent.clone(),
            candidates: plan.candidates.len(),
        });

        if let Some(triggers) = &plan.reveal {
            self.reveal(backend, triggers).await;
        }

        let mut log = Vec::new();
        for (index, candidate) in plan.candidates.iter().enumerate() {
            match self.attempt(backend, &plan, candidate).await {
                Ok(element) => {
                    self.sink.record(ExecutionEvent::CandidateSucceeded {
                        intent: intent.clone(),
                        index,
                        candidate: candidate.clone(),
                    });
                    let matched = MatchedCandidate {
                        index,
                        candidate: candidate.clone(),
                        element: element.id,
                    };
                    return Ok(ExecutionResult::succeeded(
                        intent,
                        matched,
                        log,
                        plan.rendered_label,
                    ));
                }
                Err(failure) => {
                    self.sink.record(ExecutionEvent::CandidateFailed {
                        intent: intent.clone(),
                        index,
                        candidate: candidate.clone(),
                        failure: failure.clone(),
                    });
                    log.push(AttemptRecord {
                        index,
                        candidate: candidate.clone(),
                        failure,
                    });
                }
            }
        }

        if let Some(scope) = plan.diagnostic_scope {
            self.log_closest(backend, scope, intent.target.label()).await;
        }

        let artifact = self.capture(backend, intent.kind).await;
        self.sink.record(ExecutionEvent::IntentExhausted {
            intent: intent.clone(),
            attempts: log.len(),
            artifact: artifact.clone(),
        });
        Err(ExecutorError::IntentExhausted(Box::new(
            ExecutionResult::exhausted(intent, log, artifact, plan.rendered_label),
        )))
    }

    async fn attempt<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        plan: &Plan,
        candidate: &LocatorCandidate,
    ) -> Result<ElementSnapshot, AttemptFailure> {
        let element = resolve_within(
            backend,
            &candidate.strategy,
            plan.requirement,
            self.settings.candidate_timeout,
            self.settings.poll_interval,
        )
        .await?;

        let acted = match &plan.action {
            Action::None => Ok(()),
            Action::Fill(text) => backend.fill(element.id, text).await,
            Action::Click => backend.click(element.id).await,
            Action::Check => backend.check(element.id).await,
        };
        acted.map_err(|e| AttemptFailure::ActionFailed {
            message: e.to_string(),
        })?;

        verify(
            backend,
            element.id,
            &plan.post,
            self.settings.verify_timeout,
            self.settings.poll_interval,
        )
        .await?;

        Ok(element)
    }

    async fn plan<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        intent: &Intent,
    ) -> Result<Plan, ExecutorError> {
        let unsupported = |reason: &str| ExecutorError::Unsupported {
            kind: intent.kind,
            target: intent.target.to_string(),
            reason: reason.to_string(),
        };

        match &intent.target {
            Target::Field(name) => {
                let candidates = self
                    .catalog
                    .field(name)
                    .ok_or_else(|| unsupported("no candidates for this field"))?
                    .to_vec();
                match intent.kind {
                    IntentKind::Fill => {
                        let payload = intent
                            .payload
                            .clone()
                            .ok_or_else(|| unsupported("fill needs a payload"))?;
                        let mut plan = Plan::new(candidates, intent.kind);
                        plan.post = PostCondition::ValueEquals(payload.clone());
                        plan.action = Action::Fill(payload);
                        Ok(plan)
                    }
                    IntentKind::SelectOption => Err(unsupported(
                        "select-option takes an \"organization:\" or \"role:\" target",
                    )),
                    kind => Ok(Plan::new(candidates, kind)),
                }
            }

            Target::Organization(name) => match intent.kind {
                IntentKind::SelectOption | IntentKind::Click => {
                    let mut plan =
                        Plan::new(catalog::organization_candidates(name), intent.kind);
                    plan.reveal = Some(
                        self.catalog
                            .field("organization dropdown")
                            .map(<[LocatorCandidate]>::to_vec)
                            .unwrap_or_default(),
                    );
                    plan.post = PostCondition::AnyVisible(catalog::ROLE_RADIOS.to_string());
                    plan.diagnostic_scope = Some(catalog::ORGANIZATION_OPTIONS);
                    Ok(plan)
                }
                IntentKind::VerifyVisible => {
                    let mut plan =
                        Plan::new(catalog::organization_candidates(name), intent.kind);
                    plan.diagnostic_scope = Some(catalog::ORGANIZATION_OPTIONS);
                    Ok(plan)
                }
                _ => Err(unsupported("organizations can only be selected or verified visible")),
            },

            Target::Role(requested) => {
                let (label, lookup) = self.rendered_role_label(backend, requested).await?;
                let value = lookup.value().to_string();
                let mut plan = match intent.kind {
                    IntentKind::SelectOption | IntentKind::Check | IntentKind::Click => {
                        let mut plan = Plan::new(
                            catalog::role_candidates(&label, &value),
                            IntentKind::Click,
                        );
                        // The value is verified, never the label.
                        plan.post = PostCondition::AnyChecked(catalog::role_radio(&value));
                        plan
                    }
                    IntentKind::VerifyChecked => Plan::new(
                        catalog::role_checked_candidates(&label, &value),
                        intent.kind,
                    ),
                    IntentKind::VerifyVisible => {
                        Plan::new(catalog::role_candidates(&label, &value), intent.kind)
                    }
                    IntentKind::Fill => return Err(unsupported("roles cannot be filled")),
                };
                plan.rendered_label = Some(label);
                plan.diagnostic_scope = Some(catalog::ROLE_LABELS);
                Ok(plan)
            }

            Target::Text(text) => match intent.kind {
                IntentKind::VerifyVisible | IntentKind::Click => {
                    Ok(Plan::new(catalog::text_candidates(text), intent.kind))
                }
                _ => Err(unsupported("text targets can only be clicked or verified visible")),
            },

            Target::Link(text) => match intent.kind {
                IntentKind::VerifyVisible | IntentKind::Click => {
                    Ok(Plan::new(catalog::link_candidates(text), intent.kind))
                }
                _ => Err(unsupported("links can only be clicked or verified visible")),
            },

            Target::Button(text) => match intent.kind {
                IntentKind::VerifyVisible | IntentKind::Click => {
                    Ok(Plan::new(catalog::button_candidates(text), intent.kind))
                }
                _ => Err(unsupported("buttons can only be clicked or verified visible")),
            },
        }
    }

    /// Which label variant of a role is on screen right now.
    ///
    /// Organization-specific variants are probed in table order; the plain
    /// label (last) is used when none of them is visible. Runs on every call
    /// because selecting another organization relabels the same radios.
    async fn rendered_role_label<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        requested: &str,
    ) -> Result<(String, RoleLookup), ExecutorError> {
        let lookup = self.roles.lookup(requested);
        let labels = lookup.labels();
        let (fallback, variants) = match labels.split_last() {
            Some((last, rest)) => (last.clone(), rest),
            None => (lookup.value().to_string(), &[][..]),
        };

        let mut chosen = fallback;
        for variant in variants {
            let probe = resolve_once(
                backend,
                &Strategy::exact_text(catalog::ROLE_LABELS, variant),
                Requirement::Visible,
            )
            .await;
            match probe {
                Ok(probe) if probe.found.is_some() => {
                    chosen = variant.clone();
                    break;
                }
                Ok(_) => {}
                Err(BackendError::NotReady) => {
                    return Err(ExecutorError::Session(BackendError::NotReady));
                }
                Err(_) => {}
            }
        }

        self.sink.record(ExecutionEvent::RoleLabelResolved {
            requested: requested.to_string(),
            label: chosen.clone(),
            value: lookup.value().to_string(),
            listed: matches!(lookup, RoleLookup::Listed { .. }),
        });
        Ok((chosen, lookup))
    }

    /// Open the dropdown unless an option is already showing. The first
    /// trigger that resolves and clicks wins.
    async fn reveal<B: Backend + ?Sized>(&self, backend: &mut B, triggers: &[LocatorCandidate]) {
        let open = backend
            .query(catalog::ORGANIZATION_OPTIONS)
            .await
            .map(|options| options.iter().any(|o| o.visible))
            .unwrap_or(false);
        if open {
            self.sink.record(ExecutionEvent::RevealSkipped);
            return;
        }

        for trigger in triggers {
            let resolved = resolve_within(
                backend,
                &trigger.strategy,
                Requirement::Actionable,
                self.settings.candidate_timeout,
                self.settings.poll_interval,
            )
            .await;
            if let Ok(element) = resolved
                && backend.click(element.id).await.is_ok()
            {
                self.sink.record(ExecutionEvent::RevealOpened {
                    candidate: trigger.clone(),
                });
                return;
            }
        }
        self.sink.record(ExecutionEvent::RevealFailed {
            tried: triggers.len(),
        });
    }

    async fn log_closest<B: Backend + ?Sized>(&self, backend: &mut B, scope: &str, wanted: &str) {
        let Ok(rendered) = backend.query(scope).await else {
            return;
        };
        let texts: Vec<&str> = rendered
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.text.as_str())
            .collect();
        let closest = closest(wanted, texts, 3);
        if !closest.is_empty() {
            self.sink.record(ExecutionEvent::ClosestTexts {
                wanted: wanted.to_string(),
                closest,
            });
        }
    }

    async fn capture<B: Backend + ?Sized>(&self, backend: &mut B, kind: IntentKind) -> Option<PathBuf> {
        let png = match backend.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                self.sink.record(ExecutionEvent::ArtifactFailed {
                    message: e.to_string(),
                });
                return None;
            }
        };
        match self.artifacts.capture(kind, &png).await {
            Ok(path) => Some(path),
            Err(e) => {
                self.sink.record(ExecutionEvent::ArtifactFailed {
                    message: e.to_string(),
                });
                None
            }
        }
    }
}
