// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Node Lifecycle Machine

use crate::types::{NodeState, SimNode};

/// Dwell time in ANALYZING after a packet arrival.
pub const ANALYZE_DELAY_MS: f64 = 600.0;

/// Dwell time in ROUTING before returning to IDLE.
pub const ROUTE_DELAY_MS: f64 = 600.0;

/// Settle time before a HOPPING node reverts to IDLE.
pub const HOP_SETTLE_MS: f64 = 1500.0;

// ---------------------------------------------------------------------------
// Soft scheduled transitions
// ---------------------------------------------------------------------------

/// An optimistic delayed transition. There is no cancellation: when the
/// timer fires the node's current state is re-read, and the transition is
/// applied only if it still equals `expect`. A node compromised mid-wait
/// simply makes the stale timer a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTransition {
    pub due_ms: f64,
    pub node: u32,
    pub expect: NodeState,
    pub to: NodeState,
}

/// Queue of soft timers, drained every frame. Overlapping entries for the
/// same node are tolerated; stale ones no-op on firing.
#[derive(Debug, Default, Clone)]
pub struct TransitionQueue {
    pending: Vec<PendingTransition>,
}

impl TransitionQueue {
    pub fn schedule(&mut self, due_ms: f64, node: u32, expect: NodeState, to: NodeState) {
        self.pending.push(PendingTransition { due_ms, node, expect, to });
    }

    /// Remove and return every transition due at or before `now_ms`,
    /// oldest deadline first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<PendingTransition> {
        let mut due: Vec<PendingTransition> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Event handlers
// ---------------------------------------------------------------------------

/// Handle a packet-arrival event against `node_id`.
///
/// Only IDLE and HOPPING nodes react; everything else (including a node id
/// that no longer resolves) is a silent no-op. A reacting node enters
/// ANALYZING immediately and gets a soft timer toward ROUTING.
pub fn on_packet_arrival(
    nodes: &mut [SimNode],
    queue: &mut TransitionQueue,
    node_id: u32,
    now_ms: f64,
) -> bool {
    let Some(node) = nodes.get_mut(node_id as usize) else {
        return false;
    };
    if !node.state.accepts_arrival() {
        return false;
    }
    node.state = NodeState::Analyzing;
    queue.schedule(
        now_ms + ANALYZE_DELAY_MS,
        node_id,
        NodeState::Analyzing,
        NodeState::Routing,
    );
    true
}

/// Fire a due soft timer: re-check the precondition, apply if it holds.
///
/// A successful ANALYZING -> ROUTING hop chains the ROUTING -> IDLE timer.
pub fn apply_transition(
    nodes: &mut [SimNode],
    queue: &mut TransitionQueue,
    transition: PendingTransition,
) -> bool {
    let Some(node) = nodes.get_mut(transition.node as usize) else {
        return false;
    };
    if node.state != transition.expect {
        return false;
    }
    node.state = transition.to;
    if transition.expect == NodeState::Analyzing && transition.to == NodeState::Routing {
        queue.schedule(
            transition.due_ms + ROUTE_DELAY_MS,
            transition.node,
            NodeState::Routing,
            NodeState::Idle,
        );
    }
    true
}
