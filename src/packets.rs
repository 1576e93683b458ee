// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Packet Mover

use rand::Rng;

use crate::types::{NodeState, SimLink, SimNode, SimPacket};

/// Fixed per-frame progress increment (~1.1 s per hop at 60 fps).
pub const PROGRESS_STEP: f64 = 0.015;

/// Chance per frame of attempting one spawn.
pub const SPAWN_PROBABILITY: f64 = 0.06;

/// Advance every live packet by one frame step and consume the finished
/// ones. Returns the destination node id of each consumed packet, in
/// packet order. Advances run over the pre-frame packet set; the caller
/// appends any new spawn afterwards.
pub fn advance(packets: &mut Vec<SimPacket>) -> Vec<u32> {
    let mut arrivals = Vec::new();
    packets.retain_mut(|p| {
        p.progress += PROGRESS_STEP;
        if p.progress >= 1.0 {
            arrivals.push(p.to);
            false
        } else {
            true
        }
    });
    arrivals
}

/// Build a packet travelling from `origin` over `link` toward the other
/// endpoint. The encryption flag mirrors the link's compromise state at
/// spawn time.
fn make_packet(id: u64, link: &SimLink, origin: u32) -> SimPacket {
    let to = if link.source == origin { link.target } else { link.source };
    SimPacket {
        id,
        link: link.id,
        from: origin,
        to,
        progress: 0.0,
        encrypted: !link.compromised,
    }
}

/// Attempt one spawn on a uniformly random link with a uniformly random
/// traversal direction. Refused (None) when there are no links or the
/// chosen origin endpoint is currently COMPROMISED.
pub fn try_spawn(
    rng: &mut impl Rng,
    nodes: &[SimNode],
    links: &[SimLink],
    next_id: &mut u64,
) -> Option<SimPacket> {
    if links.is_empty() {
        return None;
    }
    let link = &links[rng.gen_range(0..links.len())];
    let origin = if rng.gen_bool(0.5) { link.source } else { link.target };
    if nodes.get(origin as usize)?.state == NodeState::Compromised {
        return None;
    }
    let id = *next_id;
    *next_id += 1;
    Some(make_packet(id, link, origin))
}

/// Spawn a packet on a specific link from a specific endpoint. Used by the
/// scripted control surface; applies the same compromised-origin refusal.
pub fn spawn_on_link(
    nodes: &[SimNode],
    links: &[SimLink],
    link_id: u32,
    origin: u32,
    next_id: &mut u64,
) -> Option<SimPacket> {
    let link = links.iter().find(|l| l.id == link_id)?;
    if link.source != origin && link.target != origin {
        return None;
    }
    if nodes.get(origin as usize)?.state == NodeState::Compromised {
        return None;
    }
    let id = *next_id;
    *next_id += 1;
    Some(make_packet(id, link, origin))
}
