// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Advisory Text Generation

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::AttackMode;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures from the external advisory generator. None of these are fatal:
/// the simulation logs a fallback notice and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory generator is disabled (no credential configured)")]
    Disabled,
    #[error("advisory generator unavailable: {0}")]
    Unavailable(String),
    #[error("advisory generator returned an empty analysis")]
    Empty,
}

// ---------------------------------------------------------------------------
// Request / provider interface
// ---------------------------------------------------------------------------

/// Threat and network readings handed to the generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub attack_mode: AttackMode,
    pub total_nodes: u32,
    pub compromised_count: u32,
    pub frequency_mhz: u32,
}

/// Fire-and-forget advisory source. `request` never blocks; completions
/// (success or failure) surface later through `poll`, which the simulation
/// drains once per frame. The core never gates progress on this.
pub trait AdvisoryProvider {
    fn request(&mut self, req: AdvisoryRequest);
    fn poll(&mut self) -> Option<Result<String, AdvisoryError>>;
}

// ---------------------------------------------------------------------------
// Shipped providers
// ---------------------------------------------------------------------------

/// Permanently disabled generator (e.g. missing credential). Every request
/// resolves to `AdvisoryError::Disabled`.
#[derive(Debug, Default)]
pub struct NullAdvisory {
    inflight: usize,
}

impl NullAdvisory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdvisoryProvider for NullAdvisory {
    fn request(&mut self, _req: AdvisoryRequest) {
        self.inflight += 1;
    }

    fn poll(&mut self) -> Option<Result<String, AdvisoryError>> {
        if self.inflight == 0 {
            return None;
        }
        self.inflight -= 1;
        Some(Err(AdvisoryError::Disabled))
    }
}

/// Canned generator for tests and headless runs: each request consumes the
/// next scripted response; once the script runs out, requests resolve to
/// `AdvisoryError::Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedAdvisory {
    script: VecDeque<Result<String, AdvisoryError>>,
    inflight: VecDeque<Result<String, AdvisoryError>>,
    pub requests_seen: Vec<AdvisoryRequest>,
}

impl ScriptedAdvisory {
    pub fn new(script: Vec<Result<String, AdvisoryError>>) -> Self {
        Self {
            script: script.into(),
            inflight: VecDeque::new(),
            requests_seen: Vec::new(),
        }
    }

    /// Convenience: a script of plain success strings.
    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }
}

impl AdvisoryProvider for ScriptedAdvisory {
    fn request(&mut self, req: AdvisoryRequest) {
        self.requests_seen.push(req);
        let response = self
            .script
            .pop_front()
            .unwrap_or_else(|| Err(AdvisoryError::Unavailable("script exhausted".into())));
        self.inflight.push_back(response);
    }

    fn poll(&mut self) -> Option<Result<String, AdvisoryError>> {
        self.inflight.pop_front()
    }
}
