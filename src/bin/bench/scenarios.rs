// Scenario Definitions — headless attack/defense sweeps over the mesh core

use bastion_engine::{AttackMode, DefenseSimulation};

/// Nominal 60 fps frame delta used for headless runs.
pub const FRAME_DT_MS: f64 = 1000.0 / 60.0;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub frames: u64,
    /// Per-frame control script (attack toggles at given frames).
    pub script: Option<Box<dyn Fn(&mut DefenseSimulation, u64) + Send + Sync>>,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// No compromised nodes or tapped links at the final frame.
    pub require_all_clear_at_end: bool,
    /// Attack mode must be NONE at the final frame.
    pub require_mode_none_at_end: bool,
    /// At least this many packets delivered over the run.
    pub min_delivered: Option<u64>,
    /// The run must (or must not) see compromise at some point.
    pub expect_compromise: bool,
    /// At least one mitigation recovery must occur.
    pub expect_recoveries: bool,
    /// Mitigation strength at the final frame, within 1e-9.
    pub mitigation_at_end: Option<f64>,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            require_all_clear_at_end: false,
            require_mode_none_at_end: false,
            min_delivered: None,
            expect_compromise: false,
            expect_recoveries: false,
            mitigation_at_end: None,
        }
    }
}

// ─── Scenario Set ───────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "BASELINE_QUIET",
            label: "No attack, one minute of ambient traffic",
            frames: 3600,
            script: None,
            criteria: PassCriteria {
                require_all_clear_at_end: true,
                require_mode_none_at_end: true,
                min_delivered: Some(1),
                ..Default::default()
            },
        },
        Scenario {
            name: "SNIFFING_SUSTAINED",
            label: "Sniffing left active for two minutes",
            frames: 7200,
            script: Some(Box::new(|sim, frame| {
                if frame == 60 {
                    sim.select_mode(AttackMode::Sniffing);
                }
            })),
            criteria: PassCriteria {
                expect_compromise: true,
                expect_recoveries: true,
                mitigation_at_end: Some(0.95),
                ..Default::default()
            },
        },
        Scenario {
            name: "MITM_PULSE",
            label: "MITM toggled on, then deselected mid-run",
            frames: 5400,
            script: Some(Box::new(|sim, frame| {
                if frame == 60 {
                    sim.select_mode(AttackMode::Mitm);
                } else if frame == 3600 {
                    // Re-selecting the active mode deactivates it.
                    sim.select_mode(AttackMode::Mitm);
                }
            })),
            criteria: PassCriteria {
                require_all_clear_at_end: true,
                require_mode_none_at_end: true,
                expect_compromise: true,
                ..Default::default()
            },
        },
        Scenario {
            name: "HIJACKING_ENDURANCE",
            label: "Hijacking vs rising mitigation, four minutes",
            frames: 14400,
            script: Some(Box::new(|sim, frame| {
                if frame == 60 {
                    sim.select_mode(AttackMode::Hijacking);
                }
            })),
            criteria: PassCriteria {
                expect_compromise: true,
                expect_recoveries: true,
                mitigation_at_end: Some(0.95),
                ..Default::default()
            },
        },
        Scenario {
            name: "MODE_SWITCH_DIRECT",
            label: "Sniffing straight to Hijacking, then cleared",
            frames: 7200,
            script: Some(Box::new(|sim, frame| {
                match frame {
                    60 => sim.select_mode(AttackMode::Sniffing),
                    2400 => sim.select_mode(AttackMode::Hijacking),
                    6000 => sim.select_mode(AttackMode::None),
                    _ => {}
                }
            })),
            criteria: PassCriteria {
                require_all_clear_at_end: true,
                require_mode_none_at_end: true,
                expect_compromise: true,
                ..Default::default()
            },
        },
    ]
}
