// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Attack Injection

use rand::Rng;

use crate::eventlog::EventLog;
use crate::types::{AttackMode, LogOrigin, NodeRole, NodeState, Severity, SimLink, SimNode};

/// Period between injection waves while an attack mode is active.
pub const INJECTION_PERIOD_MS: f64 = 2000.0;

/// Per-wave chance that any given link picks up a sticky tap.
pub const LINK_COMPROMISE_PROBABILITY: f64 = 0.10;

/// Mitigation strength on attack activation.
pub const MITIGATION_INITIAL: f64 = 0.2;

/// Mitigation growth per injection period.
pub const MITIGATION_STEP: f64 = 0.15;

/// Mitigation ceiling.
pub const MITIGATION_CEILING: f64 = 0.95;

/// Outcome of one controller tick, for the shared counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectionReport {
    pub waves: u32,
    pub nodes_hit: u32,
    pub links_tapped: u32,
}

/// Owns the selected attack mode, its injection timer, and the mitigation
/// strength register. Compromise is applied here and only here; recovery
/// belongs to the frequency cycle.
#[derive(Debug, Clone)]
pub struct AttackController {
    mode: AttackMode,
    mitigation_strength: f64,
    next_wave_ms: f64,
}

impl Default for AttackController {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackController {
    pub fn new() -> Self {
        Self {
            mode: AttackMode::None,
            mitigation_strength: 0.0,
            next_wave_ms: 0.0,
        }
    }

    pub fn mode(&self) -> AttackMode {
        self.mode
    }

    pub fn mitigation_strength(&self) -> f64 {
        self.mitigation_strength
    }

    /// Toggle semantics: selecting the active mode (or NONE) deactivates;
    /// selecting a different mode switches directly. Deactivation reverts
    /// every compromised node and link synchronously and is idempotent.
    pub fn select_mode(
        &mut self,
        requested: AttackMode,
        now_ms: f64,
        nodes: &mut [SimNode],
        links: &mut [SimLink],
        log: &mut EventLog,
    ) {
        if requested == self.mode || requested == AttackMode::None {
            self.deactivate(now_ms, nodes, links, log);
        } else {
            self.activate(requested, now_ms, log);
        }
    }

    fn activate(&mut self, mode: AttackMode, now_ms: f64, log: &mut EventLog) {
        self.mode = mode;
        self.mitigation_strength = MITIGATION_INITIAL;
        self.next_wave_ms = now_ms + INJECTION_PERIOD_MS;
        log.append(
            now_ms,
            LogOrigin::AttackSim,
            Severity::Error,
            format!("Injecting {} attack traffic into the mesh", mode.label()),
        );
    }

    fn deactivate(
        &mut self,
        now_ms: f64,
        nodes: &mut [SimNode],
        links: &mut [SimLink],
        log: &mut EventLog,
    ) {
        let was_active = self.mode.is_active();
        self.mode = AttackMode::None;
        self.mitigation_strength = 0.0;
        clear_compromise(nodes, links);
        if was_active {
            log.append(
                now_ms,
                LogOrigin::System,
                Severity::Success,
                "Attack traffic neutralized; all nodes restored",
            );
        }
    }

    /// Run any injection waves that have come due. Idle while NONE.
    pub fn tick(
        &mut self,
        now_ms: f64,
        nodes: &mut [SimNode],
        links: &mut [SimLink],
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) -> InjectionReport {
        let mut report = InjectionReport::default();
        if !self.mode.is_active() {
            return report;
        }
        while now_ms >= self.next_wave_ms {
            let wave_ms = self.next_wave_ms;
            self.inject_wave(wave_ms, nodes, links, rng, log, &mut report);
            self.mitigation_strength =
                (self.mitigation_strength + MITIGATION_STEP).min(MITIGATION_CEILING);
            self.next_wave_ms += INJECTION_PERIOD_MS;
            report.waves += 1;
        }
        report
    }

    fn inject_wave(
        &self,
        now_ms: f64,
        nodes: &mut [SimNode],
        links: &mut [SimLink],
        rng: &mut impl Rng,
        log: &mut EventLog,
        report: &mut InjectionReport,
    ) {
        // Victim slots are drawn independently; a draw landing on SRC, DST,
        // a LOCKED node, or an already-compromised node is wasted.
        for _ in 0..self.mode.victims_per_wave() {
            let idx = rng.gen_range(0..nodes.len());
            let node = &mut nodes[idx];
            if node.role != NodeRole::Router {
                continue;
            }
            if matches!(node.state, NodeState::Locked | NodeState::Compromised) {
                continue;
            }
            node.state = NodeState::Compromised;
            report.nodes_hit += 1;
            log.append(
                now_ms,
                LogOrigin::AttackSim,
                Severity::Warning,
                format!("Node {} compromised by {}", node.label, self.mode.label()),
            );
        }

        // Link taps are sticky: only the NONE-mode reset clears them.
        let mut tapped = 0u32;
        for link in links.iter_mut() {
            if !link.compromised && rng.gen_bool(LINK_COMPROMISE_PROBABILITY) {
                link.compromised = true;
                tapped += 1;
            }
        }
        if tapped > 0 {
            report.links_tapped += tapped;
            log.append(
                now_ms,
                LogOrigin::AttackSim,
                Severity::Warning,
                format!("Signal taps detected on {} link(s)", tapped),
            );
        }
    }
}

/// Revert every compromised node to IDLE and clear every link tap.
/// Idempotent by construction.
pub fn clear_compromise(nodes: &mut [SimNode], links: &mut [SimLink]) {
    for node in nodes.iter_mut() {
        if node.state == NodeState::Compromised {
            node.state = NodeState::Idle;
        }
    }
    for link in links.iter_mut() {
        link.compromised = false;
    }
}
