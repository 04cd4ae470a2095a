//! Workload environment
//!
//! The containerized workload is configured entirely through environment
//! variables handed to `env` in front of its start command. [`WorkloadEnv`]
//! is the validated, immutable record of those values and owns their
//! serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkloadError;

/// Chat id used when `--public-chat-id` is given without a value
pub const DEFAULT_PUBLIC_CHAT_ID: &str = "test200";

/// Unvalidated workload parameters, as collected from flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    /// Number of messages to send (0 = unbounded)
    pub messages: u32,
    /// Number of seconds to run (0 = unbounded)
    pub seconds: u32,
    /// Number of application ids to simulate
    pub applications: u32,
    pub datasync: bool,
    pub discovery: bool,
    /// Public chat to publish to, if any
    pub public_chat_id: Option<String>,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            messages: 0,
            seconds: 0,
            applications: 1,
            datasync: false,
            discovery: false,
            public_chat_id: None,
        }
    }
}

/// Validated workload environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadEnv {
    spec: WorkloadSpec,
}

impl WorkloadEnv {
    pub fn new(spec: WorkloadSpec) -> Result<Self, WorkloadError> {
        if spec.applications == 0 {
            return Err(WorkloadError::ZeroApplications);
        }

        if let Some(id) = &spec.public_chat_id {
            let bad = id.is_empty()
                || id
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '=' | '"' | '\''));
            if bad {
                return Err(WorkloadError::InvalidChatId(id.clone()));
            }
        }

        Ok(Self { spec })
    }

    pub fn spec(&self) -> &WorkloadSpec {
        &self.spec
    }

    /// Comma-separated application ids: `id1,id2,...,idN`
    pub fn application_ids(&self) -> String {
        (1..=self.spec.applications)
            .map(|n| format!("id{n}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Ordered `(name, value)` pairs
    pub fn env_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("MESSAGES", self.spec.messages.to_string()),
            ("SECONDS", self.spec.seconds.to_string()),
            ("APPLICATIONS", self.application_ids()),
            ("DATASYNC", self.spec.datasync.to_string()),
            ("DISCOVERY", self.spec.discovery.to_string()),
        ];
        if let Some(id) = &self.spec.public_chat_id {
            pairs.push(("PUBLIC_CHAT_ID", id.clone()));
        }
        pairs
    }

    /// `K=V` assignments joined by single spaces
    pub fn env_string(&self) -> String {
        self.to_string()
    }

    /// Container argv: `env K=V ... <command words>`
    pub fn command_argv(&self, command: &str) -> Vec<String> {
        std::iter::once("env".to_string())
            .chain(self.env_pairs().into_iter().map(|(k, v)| format!("{k}={v}")))
            .chain(command.split_whitespace().map(str::to_string))
            .collect()
    }

    /// Human-readable form of [`Self::command_argv`]
    pub fn command_line(&self, command: &str) -> String {
        self.command_argv(command).join(" ")
    }
}

impl fmt::Display for WorkloadEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.env_pairs().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
