// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Topology Generation

use std::collections::HashSet;

use rand::Rng;

use crate::types::{NodeRole, NodeState, SimLink, SimNode};

/// Total node count for the default mesh.
pub const NODE_COUNT: usize = 15;

/// Feed-forward layers: {SRC}, A, B, C, {DST}.
pub const LAYER_SIZES: [usize; 5] = [1, 4, 5, 4, 1];

/// Channel value every link starts on before the first hop cycle.
pub const BASELINE_FREQUENCY_MHZ: u32 = 140;

/// Chance of a same-layer edge between adjacent lanes in the middle layers.
const LATERAL_EDGE_PROBABILITY: f64 = 0.5;

const LAYER_LETTERS: [char; 3] = ['A', 'B', 'C'];

/// A freshly generated mesh: nodes all Idle, links clean and on the
/// baseline frequency.
#[derive(Debug, Clone)]
pub struct Topology {
    pub nodes: Vec<SimNode>,
    pub links: Vec<SimLink>,
}

/// Generate the fixed 15-node feed-forward mesh.
///
/// Every node in a layer gets one mandatory edge plus 1-2 redundant edges
/// into the next layer; redundant draws that collide with an existing edge
/// are silently skipped, not retried. Adjacent lanes inside each middle
/// layer are joined with probability 0.5. Duplicate detection is
/// undirected. The construction is randomized and makes no connectivity
/// promise beyond the mandatory forward edge per non-DST node.
pub fn generate(rng: &mut impl Rng) -> Topology {
    let mut nodes = Vec::with_capacity(NODE_COUNT);
    let mut layers: Vec<Vec<u32>> = Vec::with_capacity(LAYER_SIZES.len());

    let mut next_id: u32 = 0;
    for (layer_idx, &size) in LAYER_SIZES.iter().enumerate() {
        let mut layer = Vec::with_capacity(size);
        for lane in 0..size {
            let (role, label) = match layer_idx {
                0 => (NodeRole::Source, "SRC".to_string()),
                4 => (NodeRole::Target, "DST".to_string()),
                _ => (
                    NodeRole::Router,
                    format!("RTR-{}{}", LAYER_LETTERS[layer_idx - 1], lane + 1),
                ),
            };
            nodes.push(SimNode {
                id: next_id,
                label,
                role,
                state: NodeState::Idle,
                layer: layer_idx as u8,
                lane: lane as u8,
            });
            layer.push(next_id);
            next_id += 1;
        }
        layers.push(layer);
    }

    let mut links: Vec<SimLink> = Vec::new();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();

    let mut try_add = |links: &mut Vec<SimLink>, seen: &mut HashSet<(u32, u32)>, u: u32, v: u32| {
        let key = if u < v { (u, v) } else { (v, u) };
        if !seen.insert(key) {
            return;
        }
        links.push(SimLink {
            id: links.len() as u32,
            source: u,
            target: v,
            frequency_mhz: BASELINE_FREQUENCY_MHZ,
            active: false,
            compromised: false,
        });
    };

    // Forward edges between adjacent layer pairs.
    for pair in layers.windows(2) {
        let (earlier, next) = (&pair[0], &pair[1]);
        for &u in earlier {
            let mandatory = next[rng.gen_range(0..next.len())];
            try_add(&mut links, &mut seen, u, mandatory);

            let redundant = rng.gen_range(1..=2);
            for _ in 0..redundant {
                let v = next[rng.gen_range(0..next.len())];
                try_add(&mut links, &mut seen, u, v);
            }
        }
    }

    // Lateral edges inside the three middle layers.
    for layer in &layers[1..4] {
        for lanes in layer.windows(2) {
            if rng.gen_bool(LATERAL_EDGE_PROBABILITY) {
                try_add(&mut links, &mut seen, lanes[0], lanes[1]);
            }
        }
    }

    Topology { nodes, links }
}
