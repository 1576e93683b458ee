// Bastion Bench Runner — headless scenario sweeps over the defense mesh core
//
// Usage:
//   cargo run --release --bin bench                  # Run all scenarios
//   cargo run --release --bin bench -- MITM_PULSE    # Filter by name
//   cargo run --release --bin bench -- --seed 42     # Custom seed
//   cargo run --release --bin bench -- --json        # Machine-readable report

mod report;
mod scenarios;

use std::time::Instant;

use bastion_engine::advisory::ScriptedAdvisory;
use bastion_engine::{AttackMode, DefenseSimulation, Severity};

use report::{print_report, ScenarioReport};
use scenarios::{scenarios, Scenario, FRAME_DT_MS};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    seed: u64,
    json: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs { seed: 0, json: false, filter: None };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--json" => {
                cli.json = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Scenario Runner ────────────────────────────────────────────────────────

fn run_scenario(scenario: &Scenario, seed: u64) -> ScenarioReport {
    let mut sim = DefenseSimulation::with_seed(seed);
    sim.set_advisory_provider(Box::new(ScriptedAdvisory::with_texts(&[
        "Elevated probe activity; hop cadence holding",
        "Mitigation gaining ground; maintain rotation",
        "Threat neutralized; mesh nominal",
        "All channels clear",
    ])));

    let mut compromised_peak = 0u32;
    let mut last_state = sim.defense_state();
    for frame in 0..scenario.frames {
        if let Some(script) = &scenario.script {
            script(&mut sim, frame);
        }
        let snapshot = sim.tick_core(FRAME_DT_MS);
        compromised_peak = compromised_peak.max(snapshot.state.compromised_nodes);
        last_state = snapshot.state;
    }

    let mut failures = Vec::new();
    let c = &scenario.criteria;
    if c.require_all_clear_at_end
        && (last_state.compromised_nodes > 0 || last_state.compromised_links > 0)
    {
        failures.push(format!(
            "expected all-clear at end, got {} nodes / {} links compromised",
            last_state.compromised_nodes, last_state.compromised_links
        ));
    }
    if c.require_mode_none_at_end && last_state.attack_mode != AttackMode::None {
        failures.push(format!(
            "expected NONE at end, got {}",
            last_state.attack_mode.label()
        ));
    }
    if let Some(min) = c.min_delivered {
        if last_state.packets_delivered < min {
            failures.push(format!(
                "expected >= {} deliveries, got {}",
                min, last_state.packets_delivered
            ));
        }
    }
    if c.expect_compromise && compromised_peak == 0 {
        failures.push("expected compromise during the run, saw none".to_string());
    }
    if !c.expect_compromise && compromised_peak > 0 && scenario.script.is_none() {
        failures.push(format!(
            "quiet run saw {} compromised nodes",
            compromised_peak
        ));
    }
    if c.expect_recoveries && last_state.nodes_recovered_total == 0 {
        failures.push("expected mitigation recoveries, saw none".to_string());
    }
    if let Some(expected) = c.mitigation_at_end {
        if (last_state.mitigation_strength - expected).abs() > 1e-9 {
            failures.push(format!(
                "expected mitigation {} at end, got {}",
                expected, last_state.mitigation_strength
            ));
        }
    }

    let log_tail: Vec<String> = sim
        .log_entries()
        .iter()
        .rev()
        .take(10)
        .map(|e| {
            let sev = match e.severity {
                Severity::Info => "info",
                Severity::Warning => "warn",
                Severity::Error => "error",
                Severity::Success => "ok",
            };
            format!("[{:>9.0}ms {:>5}] {}", e.timestamp_ms, sev, e.message)
        })
        .collect();

    ScenarioReport {
        scenario: scenario.name.to_string(),
        label: scenario.label.to_string(),
        seed,
        frames: scenario.frames,
        packets_spawned: last_state.packets_spawned,
        packets_delivered: last_state.packets_delivered,
        compromised_peak,
        compromised_at_end: last_state.compromised_nodes,
        tapped_links_at_end: last_state.compromised_links,
        nodes_compromised_total: last_state.nodes_compromised_total,
        nodes_recovered_total: last_state.nodes_recovered_total,
        mitigation_at_end: last_state.mitigation_strength,
        frequency_at_end_mhz: last_state.frequency_mhz,
        attack_mode_at_end: last_state.attack_mode.label().to_string(),
        passed: failures.is_empty(),
        failures,
        log_tail,
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter {:?}", cli.filter);
        std::process::exit(2);
    }

    let started = Instant::now();
    let reports: Vec<ScenarioReport> =
        to_run.iter().map(|s| run_scenario(s, cli.seed)).collect();

    print_report(&reports, cli.json);
    if !cli.json {
        println!("elapsed: {:.2?}", started.elapsed());
    }

    if reports.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
}
