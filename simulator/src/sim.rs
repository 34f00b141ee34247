use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use shared_resources::call::Direction;
use shared_resources::config::{HeuristicKind, SimulatorConfig, TimingConfig};
use shared_resources::error::SimResult;
use shared_resources::request::CallRequest;

use crate::building::Building;
use crate::controller::DispatchController;
use crate::fleet::Fleet;
use crate::sim_log;
use crate::stats::StatsRecorder;
use crate::{monitor, traffic, unit};

/// One full simulation: bootstrap, per-unit threads, traffic, cooperative
/// drain, shutdown. Returns the end-of-run report.
pub fn run_simulation(kind: HeuristicKind, config: &SimulatorConfig) -> SimResult<String> {
    let building = Arc::new(Building::new(config.building.num_floors));
    let fleet = Arc::new(Fleet::new(&config.building));
    let controller = Arc::new(DispatchController::new(
        fleet.clone(),
        building.clone(),
        kind,
    ));
    let stats = Arc::new(StatsRecorder::new());
    let running = Arc::new(AtomicBool::new(true));
    let timing = config.timing;

    // INITIALIZE UNIT THREADS
    let mut unit_handles = Vec::new();
    for unit in fleet.units() {
        sim_log!(
            "starting up unit {} on floor {}",
            unit.id(),
            unit.home_floor()
        );
        let unit = unit.clone();
        let building = building.clone();
        let controller = controller.clone();
        let stats = stats.clone();
        let running = running.clone();
        let handle = thread::Builder::new()
            .name(format!("unit-{}", unit.id()))
            .spawn(move || unit::main(unit, building, controller, stats, timing, running))?;
        unit_handles.push(handle);
    }

    // INITIALIZE MONITOR THREAD
    let monitor_handle = if config.live_monitor {
        let fleet = fleet.clone();
        let controller = controller.clone();
        let running = running.clone();
        Some(
            thread::Builder::new()
                .name(String::from("monitor"))
                .spawn(move || {
                    let _ = monitor::main(fleet, controller, running);
                })?,
        )
    } else {
        None
    };

    // GENERATE TRAFFIC
    let generated = traffic::main(
        building.clone(),
        controller.clone(),
        config.traffic.clone(),
        timing,
    )?;

    // DRAIN OUTSTANDING WORK, THEN STOP THE UNIT LOOPS
    drain(&fleet, &building, &controller, &timing)?;
    running.store(false, Ordering::SeqCst);
    for handle in unit_handles {
        let _ = handle.join();
    }
    if let Some(handle) = monitor_handle {
        let _ = handle.join();
    }
    sim_log!(
        "run complete: {} passengers generated, {} trips served",
        generated,
        stats.trips()
    );

    Ok(stats.report(kind.as_str(), config.building.num_floors))
}

/// Cooperative shutdown: poll until every unit is parked at home, the
/// backlog is empty, and no floor has waiting passengers. Entries still in
/// the backlog are re-picked; stranded passengers whose lamp went dark ring
/// again; a lit lamp with noone behind it is force-cleared.
fn drain(
    fleet: &Fleet,
    building: &Building,
    controller: &DispatchController,
    timing: &TimingConfig,
) -> SimResult<()> {
    sim_log!("traffic complete; draining outstanding work before shutdown");
    loop {
        let mut complete = true;

        if !fleet.all_parked() {
            complete = false;
            for unit in fleet.units() {
                if !unit.is_parked() {
                    sim_log!("unit {} is not complete yet", unit.id());
                }
            }
        }

        if !controller.backlog_is_empty() {
            complete = false;
            controller.redispatch_backlog()?;
        }

        let stranded = building.total_waiting();
        if stranded > 0 {
            sim_log!("{} passengers are still waiting for a ride", stranded);
        }

        for floor in building.floors() {
            let (waiting_up, waiting_down) = floor.waiting_directions();
            if waiting_up + waiting_down == 0 {
                for direction in Direction::iter() {
                    if floor.callbox().lamp(direction) {
                        sim_log!(
                            "floor {}: {} lamp lit with noone waiting; force-clearing it",
                            floor.number(),
                            direction.as_str()
                        );
                        floor.callbox().set_lamp(direction, false);
                    }
                }
                continue;
            }

            complete = false;
            sim_log!(
                "floor {} is not done yet -- {} still waiting there",
                floor.number(),
                waiting_up + waiting_down
            );
            for (direction, count) in [(Direction::Up, waiting_up), (Direction::Down, waiting_down)]
            {
                if count == 0 || call_covered(fleet, controller, floor.number(), direction) {
                    continue;
                }
                floor.callbox().press(direction);
                controller.pick(CallRequest::new(floor.number(), direction))?;
            }
        }

        if complete {
            break;
        }
        thread::sleep(timing.drain_poll());
    }
    sim_log!("drain complete: fleet parked, backlog empty, floors clear");
    Ok(())
}

/// A waiting call is covered when its demand is already in the backlog or
/// some car already has the floor queued.
fn call_covered(
    fleet: &Fleet,
    controller: &DispatchController,
    floor: u8,
    direction: Direction,
) -> bool {
    if controller
        .backlog_snapshot()
        .get(&floor)
        .map_or(false, |demand| demand.covers(direction))
    {
        return true;
    }
    fleet
        .units()
        .iter()
        .any(|unit| unit.queue_contains(floor))
}
