// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Simulation Core

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::advisory::{AdvisoryError, AdvisoryProvider, AdvisoryRequest, NullAdvisory};
use crate::attack::AttackController;
use crate::eventlog::EventLog;
use crate::frequency::FrequencyCycle;
use crate::lifecycle::{self, TransitionQueue};
use crate::packets;
use crate::topology::{self, BASELINE_FREQUENCY_MHZ};
use crate::types::*;

// ─── DefenseSimulation struct ────────────────────────────────────────────────

/// The whole simulation: one fixed mesh, two periodic timers, a frame-driven
/// packet mover, and the soft-transition queue, all advanced on one logical
/// thread by `tick_core`. The renderer only ever sees the returned
/// snapshots.
#[wasm_bindgen]
pub struct DefenseSimulation {
    pub(crate) nodes: Vec<SimNode>,
    pub(crate) links: Vec<SimLink>,
    pub(crate) packets: Vec<SimPacket>,
    pub(crate) state: DefenseState,

    pub(crate) attack: AttackController,
    pub(crate) frequency: FrequencyCycle,
    pub(crate) transitions: TransitionQueue,
    pub(crate) log: EventLog,
    pub(crate) advisory: Box<dyn AdvisoryProvider>,

    pub(crate) rng: ChaCha8Rng,
    pub(crate) packet_id_counter: u64,
    pub(crate) seed: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl DefenseSimulation {
    /// Build a simulation from a seed, with the advisory generator
    /// disabled. Seeded construction keeps topology and attack-victim
    /// selection reproducible under test.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let topo = topology::generate(&mut rng);
        let mut log = EventLog::new();
        log.append(
            0.0,
            LogOrigin::System,
            Severity::Info,
            format!("Mesh initialized: {} nodes, {} links", topo.nodes.len(), topo.links.len()),
        );

        Self {
            state: DefenseState {
                frame: 0,
                clock_ms: 0.0,
                frequency_mhz: BASELINE_FREQUENCY_MHZ,
                attack_mode: AttackMode::None,
                mitigation_strength: 0.0,
                compromised_nodes: 0,
                compromised_links: 0,
                packets_in_flight: 0,
                packets_spawned: 0,
                packets_delivered: 0,
                nodes_compromised_total: 0,
                nodes_recovered_total: 0,
                viewport_width: 0.0,
                viewport_height: 0.0,
            },
            nodes: topo.nodes,
            links: topo.links,
            packets: Vec::new(),
            attack: AttackController::new(),
            frequency: FrequencyCycle::new(),
            transitions: TransitionQueue::default(),
            log,
            advisory: Box::new(NullAdvisory::new()),
            rng,
            packet_id_counter: 0,
            seed,
        }
    }

    /// Swap in a different advisory generator (tests, headless runs).
    pub fn set_advisory_provider(&mut self, provider: Box<dyn AdvisoryProvider>) {
        self.advisory = provider;
    }

    /// Advance one rendering frame. `dt_ms` is the host frame delta; the
    /// packet step is per-frame fixed, the periodic timers go by the
    /// accumulated clock.
    pub fn tick_core(&mut self, dt_ms: f64) -> FrameSnapshot {
        self.state.frame += 1;
        self.state.clock_ms += dt_ms;
        let now = self.state.clock_ms;

        // Packet mover: advance the pre-frame set, deliver arrivals, then
        // append at most one spawn.
        let arrivals = packets::advance(&mut self.packets);
        self.state.packets_delivered += arrivals.len() as u64;
        for node_id in arrivals {
            lifecycle::on_packet_arrival(&mut self.nodes, &mut self.transitions, node_id, now);
        }
        if self.rng.gen_bool(packets::SPAWN_PROBABILITY) {
            if let Some(p) =
                packets::try_spawn(&mut self.rng, &self.nodes, &self.links, &mut self.packet_id_counter)
            {
                self.packets.push(p);
                self.state.packets_spawned += 1;
            }
        }

        // Soft timers: re-check state, apply if unchanged.
        for t in self.transitions.drain_due(now) {
            lifecycle::apply_transition(&mut self.nodes, &mut self.transitions, t);
        }

        // Periodic timers.
        let injection = self.attack.tick(now, &mut self.nodes, &mut self.links, &mut self.rng, &mut self.log);
        self.state.nodes_compromised_total += injection.nodes_hit as u64;

        if let Some(cycle) = self.frequency.tick(
            now,
            self.attack.mode(),
            self.attack.mitigation_strength(),
            &mut self.nodes,
            &mut self.links,
            &mut self.transitions,
            &mut self.rng,
            &mut self.log,
        ) {
            self.state.frequency_mhz = cycle.frequency_mhz;
            self.state.nodes_recovered_total += cycle.recovered as u64;
        }

        self.drain_advisory();
        self.refresh_registers();
        self.build_snapshot()
    }

    /// Select or deselect an attack mode; the only externally triggerable
    /// control besides scripted spawns. Every change files an advisory
    /// request.
    pub fn select_mode(&mut self, requested: AttackMode) {
        let now = self.state.clock_ms;
        self.attack
            .select_mode(requested, now, &mut self.nodes, &mut self.links, &mut self.log);
        self.refresh_registers();
        self.advisory.request(AdvisoryRequest {
            attack_mode: self.attack.mode(),
            total_nodes: self.nodes.len() as u32,
            compromised_count: self.state.compromised_nodes,
            frequency_mhz: self.state.frequency_mhz,
        });
    }

    /// Scripted spawn on a specific link from a specific endpoint. Returns
    /// the packet id, or None when refused (unknown link, foreign origin,
    /// or compromised origin).
    pub fn spawn_packet(&mut self, link_id: u32, origin: u32) -> Option<u64> {
        let packet = packets::spawn_on_link(
            &self.nodes,
            &self.links,
            link_id,
            origin,
            &mut self.packet_id_counter,
        )?;
        let id = packet.id;
        self.packets.push(packet);
        self.state.packets_spawned += 1;
        Some(id)
    }

    /// Debug mutator: force a router into COMPROMISED outside the injector.
    pub fn compromise_node(&mut self, node_id: u32) {
        if let Some(node) = self.nodes.get_mut(node_id as usize) {
            if node.role == NodeRole::Router && node.state != NodeState::Locked {
                node.state = NodeState::Compromised;
            }
        }
    }

    /// Debug mutator: mark a link compromised outside the injector.
    pub fn tap_link(&mut self, link_id: u32) {
        if let Some(link) = self.links.iter_mut().find(|l| l.id == link_id) {
            link.compromised = true;
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub fn packets(&self) -> &[SimPacket] {
        &self.packets
    }

    pub fn node_state(&self, node_id: u32) -> Option<NodeState> {
        self.nodes.get(node_id as usize).map(|n| n.state)
    }

    pub fn attack_mode(&self) -> AttackMode {
        self.attack.mode()
    }

    pub fn mitigation_strength(&self) -> f64 {
        self.attack.mitigation_strength()
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.state.frequency_mhz
    }

    pub fn clock_ms(&self) -> f64 {
        self.state.clock_ms
    }

    pub fn frame(&self) -> u64 {
        self.state.frame
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.to_vec()
    }

    pub fn defense_state(&self) -> DefenseState {
        self.state.clone()
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    /// Drain completed advisory fetches. Failures and empty analyses only
    /// ever produce a fallback log entry.
    fn drain_advisory(&mut self) {
        let now = self.state.clock_ms;
        while let Some(result) = self.advisory.poll() {
            let normalized = match result {
                Ok(text) if text.trim().is_empty() => Err(AdvisoryError::Empty),
                other => other,
            };
            match normalized {
                Ok(text) => {
                    self.log.append(now, LogOrigin::AiKernel, Severity::Info, text);
                }
                Err(err) => {
                    self.log.append(
                        now,
                        LogOrigin::AiKernel,
                        Severity::Warning,
                        format!("Advisory offline ({}); continuing on local heuristics", err),
                    );
                }
            }
        }
    }

    /// Recompute the derived registers and the cosmetic link activity.
    fn refresh_registers(&mut self) {
        self.state.attack_mode = self.attack.mode();
        self.state.mitigation_strength = self.attack.mitigation_strength();
        self.state.compromised_nodes = self
            .nodes
            .iter()
            .filter(|n| n.state == NodeState::Compromised)
            .count() as u32;
        self.state.compromised_links =
            self.links.iter().filter(|l| l.compromised).count() as u32;
        self.state.packets_in_flight = self.packets.len() as u32;
        for link in self.links.iter_mut() {
            link.active = self.packets.iter().any(|p| p.link == link.id);
        }
    }

    fn build_snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            state: self.state.clone(),
            nodes: self.nodes.clone(),
            links: self.links.clone(),
            packets: self.packets.clone(),
            log: self.log.to_vec(),
        }
    }
}
