use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::building::Passenger;

/// One completed journey, captured when the rider steps off.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub serial: u32,
    pub start_floor: u8,
    pub destination: u8,
    pub wait: Duration,
    pub ride: Duration,
}

/// Collects wait (lamp press to boarding) and ride (boarding to alighting)
/// times from every unit; renders the end-of-run tables.
pub struct StatsRecorder {
    records: Mutex<Vec<TripRecord>>,
}

impl StatsRecorder {
    pub fn new() -> StatsRecorder {
        StatsRecorder {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn record_alighted(&self, passengers: &[Passenger]) {
        let now = Instant::now();
        let mut records = self.records.lock();
        for passenger in passengers {
            let boarded = passenger.boarded_at.unwrap_or(passenger.pressed_at);
            records.push(TripRecord {
                serial: passenger.serial,
                start_floor: passenger.start_floor,
                destination: passenger.destination,
                wait: boarded.duration_since(passenger.pressed_at),
                ride: now.duration_since(boarded),
            });
        }
    }

    pub fn trips(&self) -> usize {
        self.records.lock().len()
    }

    /// Per-floor wait/ride tables plus the run totals, in scaled seconds.
    pub fn report(&self, label: &str, num_floors: u8) -> String {
        let records = self.records.lock();
        let mut out = String::new();

        out.push_str(&format!(
            "+--------------------------------------------------------+\n\
             | TRIP TIMES BY START FLOOR ({label:<10})                 |\n\
             +-------+--------+----------+----------+----------+----------+\n\
             | {0:<5} | {1:<6} | {2:<8} | {3:<8} | {4:<8} | {5:<8} |\n",
            "FLOOR", "TRIPS", "AVG WAIT", "MIN WAIT", "MAX WAIT", "AVG RIDE"
        ));
        for floor in 1..=num_floors {
            let floor_trips: Vec<&TripRecord> = records
                .iter()
                .filter(|record| record.start_floor == floor)
                .collect();
            out.push_str(
                "+-------+--------+----------+----------+----------+----------+\n",
            );
            if floor_trips.is_empty() {
                out.push_str(&format!(
                    "| {floor:<5} | {0:<6} | {1:<8} | {1:<8} | {1:<8} | {1:<8} |\n",
                    0, "-"
                ));
                continue;
            }
            let waits: Vec<f64> = floor_trips
                .iter()
                .map(|record| record.wait.as_secs_f64())
                .collect();
            let rides: Vec<f64> = floor_trips
                .iter()
                .map(|record| record.ride.as_secs_f64())
                .collect();
            let avg_wait = waits.iter().sum::<f64>() / waits.len() as f64;
            let min_wait = waits.iter().copied().fold(f64::INFINITY, f64::min);
            let max_wait = waits.iter().copied().fold(0.0f64, f64::max);
            let avg_ride = rides.iter().sum::<f64>() / rides.len() as f64;
            out.push_str(&format!(
                "| {floor:<5} | {0:<6} | {avg_wait:<8.2} | {min_wait:<8.2} | {max_wait:<8.2} | {avg_ride:<8.2} |\n",
                floor_trips.len()
            ));
        }
        out.push_str("+-------+--------+----------+----------+----------+----------+\n");

        if records.is_empty() {
            out.push_str("no trips were completed in this run\n");
        } else {
            let total_wait: f64 = records.iter().map(|r| r.wait.as_secs_f64()).sum();
            let total_ride: f64 = records.iter().map(|r| r.ride.as_secs_f64()).sum();
            let count = records.len() as f64;
            out.push_str(&format!(
                "{} trips served; average wait {:.2}s, average ride {:.2}s\n",
                records.len(),
                total_wait / count,
                total_ride / count
            ));
            if let Some(slowest) = records.iter().max_by_key(|r| r.wait + r.ride) {
                out.push_str(&format!(
                    "slowest door-to-door trip: person {} (floor {} to {}), {:.2}s waiting + {:.2}s riding\n",
                    slowest.serial,
                    slowest.start_floor,
                    slowest.destination,
                    slowest.wait.as_secs_f64(),
                    slowest.ride.as_secs_f64()
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(serial: u32, start_floor: u8) -> Passenger {
        let mut passenger = Passenger::new(serial, start_floor, start_floor + 1);
        passenger.boarded_at = Some(Instant::now());
        passenger
    }

    #[test]
    fn alighted_passengers_become_trip_records() {
        let stats = StatsRecorder::new();
        stats.record_alighted(&[trip(1, 2), trip(2, 2), trip(3, 4)]);
        assert_eq!(stats.trips(), 3);
    }

    #[test]
    fn report_counts_trips_per_start_floor() {
        let stats = StatsRecorder::new();
        stats.record_alighted(&[trip(1, 2), trip(2, 2)]);
        let report = stats.report("basic", 3);
        assert!(report.contains("2 trips served"));
        assert!(report.contains("| 2     | 2"));
    }

    #[test]
    fn empty_run_reports_no_trips() {
        let stats = StatsRecorder::new();
        let report = stats.report("basic", 2);
        assert!(report.contains("no trips were completed"));
    }
}
