// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Where a script runs: the local machine or a remote host.
///
/// Parses from `local` (or an empty string) and `[user@]host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Local,
    Remote(RemoteHost),
}

/// A remote machine plus optional pass-through credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub host: String,
    pub port: Option<u16>,
    pub credentials: Option<Credentials>,
}

/// Opaque login material handed to the remote transport as-is.
///
/// Never logged or written anywhere by the engine.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub identity_file: Option<PathBuf>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("identity_file", &self.identity_file.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("empty host in `{0}`")]
    EmptyHost(String),
    #[error("invalid port in `{0}`")]
    InvalidPort(String),
}

impl Target {
    pub fn remote(host: impl Into<String>) -> Self {
        Target::Remote(RemoteHost { host: host.into(), port: None, credentials: None })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Target::Remote(_))
    }

    /// Attach credentials to a remote target. No-op for `Local`.
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        match self {
            Target::Local => Target::Local,
            Target::Remote(remote) => {
                Target::Remote(RemoteHost { credentials: Some(credentials), ..remote })
            }
        }
    }

    /// Key used to serialize runs against the same machine.
    pub fn key(&self) -> String {
        match self {
            Target::Local => "local".to_string(),
            Target::Remote(remote) => remote.host.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Local => f.write_str("local"),
            Target::Remote(remote) => match remote.port {
                Some(port) => write!(f, "{}:{}", remote.host, port),
                None => f.write_str(&remote.host),
            },
        }
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "local" {
            return Ok(Target::Local);
        }

        let (username, rest) = match s.split_once('@') {
            Some((user, rest)) => (Some(user.to_string()), rest),
            None => (None, s),
        };
        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| TargetParseError::InvalidPort(s.to_string()))?;
                (host, Some(port))
            }
            None => (rest, None),
        };
        if host.is_empty() {
            return Err(TargetParseError::EmptyHost(s.to_string()));
        }

        let credentials = username.map(|u| Credentials { username: Some(u), identity_file: None });
        Ok(Target::Remote(RemoteHost { host: host.to_string(), port, credentials }))
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
