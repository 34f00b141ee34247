/// ----- TRAFFIC MODULE -----
/// Generates passengers over scaled simulated time from the configured
/// per-floor weights, places each on their start floor, and rings the
/// callbox toward the dispatch controller. Runs until the configured
/// duration elapses, then returns the number of passengers created.
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shared_resources::config::{TimingConfig, TrafficConfig};
use shared_resources::error::{SimError, SimResult};
use shared_resources::request::CallRequest;

use crate::building::{Building, Passenger};
use crate::controller::DispatchController;
use crate::sim_log;

pub fn main(
    building: Arc<Building>,
    controller: Arc<DispatchController>,
    traffic: TrafficConfig,
    timing: TimingConfig,
) -> SimResult<u32> {
    let starts = WeightedIndex::new(&traffic.start_weights)
        .map_err(|err| SimError::Config(format!("start_weights: {err}")))?;
    let destinations = WeightedIndex::new(&traffic.destination_weights)
        .map_err(|err| SimError::Config(format!("destination_weights: {err}")))?;
    let mut rng = SmallRng::seed_from_u64(traffic.seed);

    let deadline = Instant::now() + timing.scaled(traffic.duration_ms);
    let mut serial: u32 = 0;

    while Instant::now() < deadline {
        thread::sleep(timing.scaled(traffic.spawn_interval_ms));

        for _ in 0..traffic.passengers_per_interval {
            serial += 1;
            let start_floor = starts.sample(&mut rng) as u8 + 1;
            let mut destination = destinations.sample(&mut rng) as u8 + 1;
            while destination == start_floor {
                destination = destinations.sample(&mut rng) as u8 + 1;
            }

            let passenger = Passenger::new(serial, start_floor, destination);
            let direction = passenger.intended_direction();
            sim_log!(
                "person {} appears on floor {} wanting to go {} to floor {}",
                serial,
                start_floor,
                direction.as_str(),
                destination
            );

            let floor = building.floor(start_floor)?;
            floor.add_waiting(passenger);
            if floor.callbox().press(direction) {
                sim_log!(
                    "callbox on floor {} is ringing with {} request",
                    start_floor,
                    direction.as_str()
                );
                controller.pick(CallRequest::new(start_floor, direction))?;
            } else {
                sim_log!(
                    "person {}: the {} button on floor {} is already lit",
                    serial,
                    direction.as_str(),
                    start_floor
                );
            }
        }
    }

    sim_log!("traffic: finished after {} passengers", serial);
    Ok(serial)
}
