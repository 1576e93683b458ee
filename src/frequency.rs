// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Frequency Hop / Mitigation Cycle

use rand::Rng;

use crate::eventlog::EventLog;
use crate::lifecycle::{TransitionQueue, HOP_SETTLE_MS};
use crate::types::{AttackMode, LogOrigin, NodeState, Severity, SimLink, SimNode};

/// Period between channel rotations; runs regardless of attack state.
pub const CYCLE_PERIOD_MS: f64 = 2000.0;

/// Frequency draw range in integer MHz: [88, 188).
pub const FREQUENCY_MIN_MHZ: u32 = 88;
pub const FREQUENCY_MAX_MHZ: u32 = 188;

/// Base recovery probability for a compromised node.
pub const RECOVERY_BASE: f64 = 0.3;

/// Hijacking resists mitigation harder.
pub const RECOVERY_BASE_HIJACKING: f64 = 0.1;

/// Weight of mitigation strength in the recovery probability.
pub const RECOVERY_MITIGATION_WEIGHT: f64 = 0.6;

/// Hard ceiling on the recovery probability.
pub const RECOVERY_CEILING: f64 = 0.95;

/// Chance that one rotation frees a compromised node.
pub fn recovery_probability(mode: AttackMode, mitigation_strength: f64) -> f64 {
    let base = if mode == AttackMode::Hijacking {
        RECOVERY_BASE_HIJACKING
    } else {
        RECOVERY_BASE
    };
    (base + mitigation_strength * RECOVERY_MITIGATION_WEIGHT).min(RECOVERY_CEILING)
}

/// Summary of the rotations run in one tick.
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub rotations: u32,
    pub frequency_mhz: u32,
    pub recovered: u32,
    pub resynced: u32,
}

/// Rotates the shared channel and applies the per-rotation node effects:
/// compromised nodes may recover to HOPPING, idle nodes always re-sync to
/// HOPPING, busy (ANALYZING/ROUTING) nodes finish on the old channel.
#[derive(Debug, Clone)]
pub struct FrequencyCycle {
    next_cycle_ms: f64,
}

impl Default for FrequencyCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyCycle {
    pub fn new() -> Self {
        Self { next_cycle_ms: CYCLE_PERIOD_MS }
    }

    /// Run any rotations that have come due. Returns None when the period
    /// has not elapsed.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        now_ms: f64,
        mode: AttackMode,
        mitigation_strength: f64,
        nodes: &mut [SimNode],
        links: &mut [SimLink],
        queue: &mut TransitionQueue,
        rng: &mut impl Rng,
        log: &mut EventLog,
    ) -> Option<CycleReport> {
        let mut report: Option<CycleReport> = None;
        while now_ms >= self.next_cycle_ms {
            let cycle_ms = self.next_cycle_ms;
            let ran = rotate(cycle_ms, mode, mitigation_strength, nodes, links, queue, rng, log);
            report = Some(match report {
                None => ran,
                Some(prev) => CycleReport {
                    rotations: prev.rotations + 1,
                    frequency_mhz: ran.frequency_mhz,
                    recovered: prev.recovered + ran.recovered,
                    resynced: prev.resynced + ran.resynced,
                },
            });
            self.next_cycle_ms += CYCLE_PERIOD_MS;
        }
        report
    }
}

/// One rotation: draw the channel, stamp every link, transition nodes, and
/// schedule the non-cancellable settle timers. Settle timers from earlier
/// cycles may still be pending; they no-op on non-HOPPING nodes.
#[allow(clippy::too_many_arguments)]
fn rotate(
    now_ms: f64,
    mode: AttackMode,
    mitigation_strength: f64,
    nodes: &mut [SimNode],
    links: &mut [SimLink],
    queue: &mut TransitionQueue,
    rng: &mut impl Rng,
    log: &mut EventLog,
) -> CycleReport {
    let frequency_mhz = rng.gen_range(FREQUENCY_MIN_MHZ..FREQUENCY_MAX_MHZ);
    for link in links.iter_mut() {
        link.frequency_mhz = frequency_mhz;
    }
    log.append(
        now_ms,
        LogOrigin::System,
        Severity::Info,
        format!("Frequency hop: channel re-keyed to {} MHz", frequency_mhz),
    );

    let mut recovered = 0u32;
    let mut resynced = 0u32;
    let p_recover = recovery_probability(mode, mitigation_strength);

    for node in nodes.iter_mut() {
        match node.state {
            NodeState::Compromised => {
                if rng.gen_bool(p_recover) {
                    node.state = NodeState::Hopping;
                    recovered += 1;
                    queue.schedule(
                        now_ms + HOP_SETTLE_MS,
                        node.id,
                        NodeState::Hopping,
                        NodeState::Idle,
                    );
                    log.append(
                        now_ms,
                        LogOrigin::AiKernel,
                        Severity::Success,
                        format!("Node {} recovered via frequency hop", node.label),
                    );
                }
            }
            NodeState::Idle => {
                node.state = NodeState::Hopping;
                resynced += 1;
                queue.schedule(
                    now_ms + HOP_SETTLE_MS,
                    node.id,
                    NodeState::Hopping,
                    NodeState::Idle,
                );
            }
            // Busy nodes finish their task on the old channel; LOCKED and
            // HOPPING nodes are left as they are.
            _ => {}
        }
    }

    CycleReport { rotations: 1, frequency_mhz, recovered, resynced }
}
