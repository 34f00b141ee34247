use shared_resources::config::SimulatorConfig;
use shared_resources::error::SimResult;

pub mod backlog;
pub mod building;
pub mod controller;
pub mod fleet;
pub mod heuristics;
pub mod logging;
pub mod monitor;
pub mod sim;
pub mod stats;
pub mod traffic;
pub mod unit;

fn main() -> SimResult<()> {
    // READ CONFIGURATION
    let config = SimulatorConfig::get()?;

    // RUN ONCE PER CONFIGURED HEURISTIC PAIR
    let mut reports = Vec::new();
    for &kind in &config.heuristics {
        println!("\n==== simulation run: {} heuristics ====\n", kind.as_str());
        reports.push(sim::run_simulation(kind, &config)?);
    }

    // PRINT THE COLLECTED REPORTS
    println!("\n==== reports ====\n");
    for report in reports {
        println!("{report}");
    }
    Ok(())
}
