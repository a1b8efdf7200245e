// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Backend, Cancelled, ExecutionOutcome, Script, Target};
use tokio_util::sync::CancellationToken;

use super::{EmbeddedError, EmbeddedRunner, ExternalRunner, RemoteRunner, ScriptRunner};
use crate::env::RunnerConfig;

/// Backend chosen for one script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Embedded,
    External,
    Remote,
}

pf_core::simple_display! {
    Route {
        Embedded => "embedded",
        External => "external",
        Remote => "remote",
    }
}

impl Route {
    /// A remote target always wins over the script's preference.
    pub fn select(script: &Script, target: &Target) -> Route {
        match (target, script.backend) {
            (Target::Remote(_), _) => Route::Remote,
            (Target::Local, Backend::External) => Route::External,
            (Target::Local, Backend::Embedded) => Route::Embedded,
        }
    }
}

/// Dispatches scripts to the backend their target and preference call for.
#[derive(Debug, Clone)]
pub struct BackendRouter {
    embedded: EmbeddedRunner,
    external: ExternalRunner,
    remote: RemoteRunner,
}

impl BackendRouter {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            embedded: EmbeddedRunner::new().timeout(config.timeout),
            external: ExternalRunner::new(config.clone()),
            remote: RemoteRunner::new(config),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RunnerConfig::from_env())
    }
}

#[async_trait]
impl ScriptRunner for BackendRouter {
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled> {
        let route = Route::select(script, target);
        tracing::debug!(script = %script.name, %route, "routing script");
        match route {
            Route::Remote => self.remote.run(script, target, cancel).await,
            Route::External => self.external.run(script, target, cancel).await,
            Route::Embedded => match self.embedded.try_run(script, cancel).await {
                Ok(outcome) => Ok(outcome),
                Err(EmbeddedError::Cancelled) => Err(Cancelled),
                Err(EmbeddedError::Unsupported(feature)) => {
                    tracing::warn!(
                        script = %script.name,
                        %feature,
                        "embedded session cannot run script, falling back to external interpreter"
                    );
                    self.external.run(script, target, cancel).await
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
