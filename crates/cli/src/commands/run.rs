// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf run`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{ArgGroup, Args};
use pf_adapters::BackendRouter;
use pf_core::{Clock, Credentials, FixInput, FixVerdict, PrinterContext, SystemClock, Target};
use pf_engine::{Engine, FixRequest, Registry, RegistryEntry};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::color;
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{entry_text, format_or_json, OutputFormat};
use crate::run_log::RunLogger;

#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("source").args(["input_file", "input_share", "input_auto"])))]
pub struct RunArgs {
    /// Fixer to run (see `pf list`)
    #[arg(required_unless_present = "symptom")]
    pub fixer: Option<String>,

    /// Run the first fixer claiming this symptom instead of naming one
    #[arg(long, conflicts_with = "fixer")]
    pub symptom: Option<String>,

    /// CUPS queue to repair
    #[arg(long, short = 'p')]
    pub printer: Option<String>,

    /// Remote host, as `[user@]host[:port]`
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Remote login name (overrides `user@` in --host)
    #[arg(long, requires = "host")]
    pub user: Option<String>,

    /// Private key for the remote login
    #[arg(long, short = 'i', requires = "host", value_name = "FILE")]
    pub identity: Option<PathBuf>,

    /// Remote ssh port (overrides `:port` in --host)
    #[arg(long, requires = "host")]
    pub port: Option<u16>,

    /// Driver source: a local PPD file
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Driver source: a PPD on a network share (any URL curl can fetch)
    #[arg(long, value_name = "SHARE")]
    pub input_share: Option<String>,

    /// Driver source: pick one automatically
    #[arg(long)]
    pub input_auto: bool,
}

impl RunArgs {
    fn target(&self) -> Result<Target> {
        let Some(host) = &self.host else {
            return Ok(Target::Local);
        };
        let Target::Remote(mut remote) = host.parse::<Target>()? else {
            return Ok(Target::Local);
        };
        if let Some(port) = self.port {
            remote.port = Some(port);
        }
        if self.user.is_some() || self.identity.is_some() {
            let existing = remote.credentials.take().unwrap_or_default();
            remote.credentials = Some(Credentials {
                username: self.user.clone().or(existing.username),
                identity_file: self.identity.clone().or(existing.identity_file),
            });
        }
        Ok(Target::Remote(remote))
    }

    fn input(&self) -> Option<FixInput> {
        if let Some(path) = &self.input_file {
            return Some(FixInput::File(path.clone()));
        }
        if let Some(share) = &self.input_share {
            return Some(FixInput::NetworkShare(share.clone()));
        }
        self.input_auto.then_some(FixInput::Automatic)
    }

    pub fn request(&self) -> Result<FixRequest> {
        let mut request = FixRequest::new().target(self.target()?);
        if let Some(printer) = &self.printer {
            request = request.printer(PrinterContext::new(printer.as_str()));
        }
        if let Some(input) = self.input() {
            request = request.input(input);
        }
        Ok(request)
    }

    pub fn resolve<'r>(&self, registry: &'r Registry) -> Result<&'r RegistryEntry> {
        if let Some(name) = &self.fixer {
            return registry
                .by_name(name)
                .ok_or_else(|| anyhow!("unknown fixer `{}` (see `pf list`)", name));
        }
        let symptom = self.symptom.as_deref().unwrap_or_default();
        registry
            .by_code(symptom)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no fixer claims `{}`", symptom))
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    run_id: &'a str,
    fixer: &'a str,
    target: String,
    log: &'a Path,
    #[serde(flatten)]
    verdict: &'a FixVerdict,
}

pub async fn handle(args: RunArgs, registry: &Registry, format: OutputFormat) -> Result<()> {
    let entry = args.resolve(registry)?;
    let request = args.request()?;
    let fixer = entry.name();
    let target = request.target.to_string();

    let run_id = uuid::Uuid::new_v4().to_string();
    let logger = RunLogger::new(&env::state_dir()?.join("logs"), &run_id);
    logger.start(fixer, &target, SystemClock.epoch_ms());
    tracing::info!(%run_id, fixer, %target, "run started");

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let engine = Engine::new(BackendRouter::from_env(), SystemClock);
    let (handle, mut entries) = engine.spawn_apply(Arc::clone(entry.fixer()), request, cancel);
    while let Some(logged) = entries.recv().await {
        logger.append(&logged);
        if format == OutputFormat::Text {
            println!("{}", color::level(logged.level, &entry_text(&logged)));
        }
    }
    let verdict = handle.await?;
    ctrl_c.abort();
    logger.finish(&verdict, SystemClock.epoch_ms());

    let report = RunReport { run_id: &run_id, fixer, target, log: logger.path(), verdict: &verdict };
    format_or_json(format, &report, || {
        println!("{}", color::muted(&format!("run log: {}", logger.path().display())));
    })?;

    match ExitError::from_verdict(&verdict) {
        Some(exit) => Err(exit.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
