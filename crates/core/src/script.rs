// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command units: an opaque script body plus the backend it needs.

/// Backend a script asks for on the local machine.
///
/// Remote targets ignore this; they always go through the remote envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// In-process session. Restricted shell subset: no pipes, redirections,
    /// globs, substitutions or compound commands.
    Embedded,
    /// The platform interpreter in a child process.
    External,
}

crate::simple_display! {
    Backend {
        Embedded => "embedded",
        External => "external",
    }
}

/// One script to run against a target.
///
/// `vars` reach the script as variables (environment for child processes),
/// never by splicing text into `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Short step identifier, used in logs and by test fakes.
    pub name: String,
    pub body: String,
    pub vars: Vec<(String, String)>,
    pub backend: Backend,
}

impl Script {
    pub fn embedded(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self { name: name.into(), body: body.into(), vars: Vec::new(), backend: Backend::Embedded }
    }

    pub fn external(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self { name: name.into(), body: body.into(), vars: Vec::new(), backend: Backend::External }
    }

    /// Add a variable visible to the script as `$name`.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((name.into(), value.into()));
        self
    }
}
