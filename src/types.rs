// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Type Definitions

use serde::{Serialize, Deserialize};

// ─── Node Role ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Source = 0,
    Target = 1,
    Router = 2,
}

// ─── Node Lifecycle State ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    Idle = 0,
    Analyzing = 1,
    Routing = 2,
    Hopping = 3,
    Compromised = 4,
    Locked = 5,
}

impl NodeState {
    /// States in which a node accepts a packet-arrival event.
    pub fn accepts_arrival(&self) -> bool {
        matches!(self, Self::Idle | Self::Hopping)
    }
}

// ─── Attack Mode ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttackMode {
    None = 0,
    Sniffing = 1,
    Mitm = 2,
    Hijacking = 3,
}

impl AttackMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Sniffing => "SNIFFING",
            Self::Mitm => "MITM",
            Self::Hijacking => "HIJACKING",
        }
    }

    /// Victim slots drawn per injection wave.
    pub fn victims_per_wave(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Hijacking => 2,
            _ => 1,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != Self::None
    }

    /// Indexed form used by the JS control surface.
    pub fn from_index(idx: u8) -> Self {
        match idx {
            1 => Self::Sniffing,
            2 => Self::Mitm,
            3 => Self::Hijacking,
            _ => Self::None,
        }
    }
}

// ─── Log Tags ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogOrigin {
    System = 0,
    AiKernel = 1,
    AttackSim = 2,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info = 0,
    Warning = 1,
    Error = 2,
    Success = 3,
}

// ─── SimNode ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimNode {
    pub id: u32,
    pub label: String,
    pub role: NodeRole,
    pub state: NodeState,
    /// Feed-forward layer index (0 = SRC layer, 4 = DST layer).
    pub layer: u8,
    /// Position within the layer, for renderer layout only.
    pub lane: u8,
}

// ─── SimLink ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimLink {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    pub frequency_mhz: u32,
    /// Cosmetic: true while at least one packet is in flight on this link.
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub compromised: bool,
}

impl SimLink {
    /// Undirected endpoint check.
    pub fn connects(&self, a: u32, b: u32) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

// ─── SimPacket ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimPacket {
    pub id: u64,
    /// Link the packet is traversing.
    pub link: u32,
    /// Origin endpoint of the traversal (not necessarily the link's `source`).
    pub from: u32,
    pub to: u32,
    /// Progress ratio in [0, 1] along the link; monotone until consumption.
    pub progress: f64,
    /// False when the traversed link was compromised at spawn time.
    pub encrypted: bool,
}

// ─── LogEntry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp_ms: f64,
    pub origin: LogOrigin,
    pub severity: Severity,
    pub message: String,
}

// ─── DefenseState ────────────────────────────────────────────────────────────

/// Shared registers handed to the renderer every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseState {
    pub frame: u64,
    pub clock_ms: f64,
    pub frequency_mhz: u32,
    pub attack_mode: AttackMode,
    pub mitigation_strength: f64,

    pub compromised_nodes: u32,
    pub compromised_links: u32,
    pub packets_in_flight: u32,
    pub packets_spawned: u64,
    pub packets_delivered: u64,
    pub nodes_compromised_total: u64,
    pub nodes_recovered_total: u64,

    #[serde(default)]
    pub viewport_width: f64,
    #[serde(default)]
    pub viewport_height: f64,
}

// ─── FrameSnapshot ───────────────────────────────────────────────────────────

/// Read-only per-frame handoff to the external renderer. The renderer never
/// feeds events back into the core.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub state: DefenseState,
    pub nodes: Vec<SimNode>,
    pub links: Vec<SimLink>,
    pub packets: Vec<SimPacket>,
    /// Retained log window, newest last.
    pub log: Vec<LogEntry>,
}
