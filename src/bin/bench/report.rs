// Structured scenario output for headless validation runs

use serde::Serialize;

// ─── Single-Scenario Result ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub label: String,
    pub seed: u64,
    pub frames: u64,
    pub packets_spawned: u64,
    pub packets_delivered: u64,
    pub compromised_peak: u32,
    pub compromised_at_end: u32,
    pub tapped_links_at_end: u32,
    pub nodes_compromised_total: u64,
    pub nodes_recovered_total: u64,
    pub mitigation_at_end: f64,
    pub frequency_at_end_mhz: u32,
    pub attack_mode_at_end: String,
    pub passed: bool,
    pub failures: Vec<String>,
    pub log_tail: Vec<String>,
}

// ─── Rendering ──────────────────────────────────────────────────────────────

pub fn print_report(reports: &[ScenarioReport], json: bool) {
    if json {
        match serde_json::to_string_pretty(reports) {
            Ok(out) => println!("{}", out),
            Err(err) => eprintln!("report serialization failed: {}", err),
        }
        return;
    }

    println!();
    println!(
        "{:<44} {:>7} {:>9} {:>9} {:>6} {:>6} {:>8} {:>6}  {}",
        "SCENARIO", "FRAMES", "SPAWNED", "DELIVERED", "PEAK", "END", "RECOV", "MITIG", "RESULT"
    );
    println!("{}", "-".repeat(112));
    for r in reports {
        println!(
            "{:<44} {:>7} {:>9} {:>9} {:>6} {:>6} {:>8} {:>6.2}  {}",
            r.label,
            r.frames,
            r.packets_spawned,
            r.packets_delivered,
            r.compromised_peak,
            r.compromised_at_end,
            r.nodes_recovered_total,
            r.mitigation_at_end,
            if r.passed { "PASS" } else { "FAIL" },
        );
        for failure in &r.failures {
            println!("    ! {}", failure);
        }
    }
    println!();

    for r in reports.iter().filter(|r| !r.passed) {
        println!("── {} log tail ──", r.scenario);
        for line in &r.log_tail {
            println!("  {}", line);
        }
        println!();
    }

    let passed = reports.iter().filter(|r| r.passed).count();
    println!("{}/{} scenarios passed", passed, reports.len());
}
