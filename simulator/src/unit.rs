use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use shared_resources::call::Direction;
use shared_resources::config::TimingConfig;
use shared_resources::error::{SimError, SimResult};
use shared_resources::request::CallRequest;

use crate::building::{Building, Passenger};
use crate::controller::DispatchController;
use crate::sim_log;
use crate::stats::StatsRecorder;

#[derive(PartialEq, Debug, Clone, Copy)]
enum State {
    Idle,
    EnRoute,
    Arrived,
    Returning,
}

struct UnitState {
    current_floor: u8,
    direction: Option<Direction>,
    queue: Vec<u8>,
    doors_open: bool,
    passengers: Vec<Passenger>,
}

/// One elevator car. The running state lives behind a per-unit lock that is
/// held only across a single mutation, never across a sleep; the car's own
/// thread (see [`main`]) is the only writer of floor/door state, while the
/// controller pushes destinations in through `add_destination`.
pub struct ElevatorUnit {
    id: u8,
    home_floor: u8,
    capacity: usize,
    num_floors: u8,
    state: Mutex<UnitState>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl ElevatorUnit {
    pub fn new(id: u8, home_floor: u8, capacity: usize, num_floors: u8) -> ElevatorUnit {
        let (wake_tx, wake_rx) = unbounded();
        ElevatorUnit {
            id,
            home_floor,
            capacity,
            num_floors,
            state: Mutex::new(UnitState {
                current_floor: home_floor,
                direction: None,
                // parked units rest with their doors open
                doors_open: true,
                queue: Vec::new(),
                passengers: Vec::new(),
            }),
            wake_tx,
            wake_rx,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn home_floor(&self) -> u8 {
        self.home_floor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_floor(&self) -> u8 {
        self.state.lock().current_floor
    }

    pub fn direction(&self) -> Option<Direction> {
        self.state.lock().direction
    }

    pub fn doors_open(&self) -> bool {
        self.state.lock().doors_open
    }

    pub fn queue_snapshot(&self) -> Vec<u8> {
        self.state.lock().queue.clone()
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    pub fn queue_contains(&self, floor: u8) -> bool {
        self.state.lock().queue.contains(&floor)
    }

    pub fn passenger_count(&self) -> usize {
        self.state.lock().passengers.len()
    }

    pub fn passengers_snapshot(&self) -> Vec<Passenger> {
        self.state.lock().passengers.clone()
    }

    /// Queue empty, no direction, resting at the home floor.
    pub fn is_parked(&self) -> bool {
        let state = self.state.lock();
        state.queue.is_empty()
            && state.direction.is_none()
            && state.current_floor == self.home_floor
    }

    /// Queue a stop for this car.
    ///
    /// `Ok(true)` means the stop is covered (queued now, or the car is
    /// already stopping there). `Ok(false)` is the logged no-op from the
    /// contract: the floor lies behind the car's travel direction (route it
    /// through the backlog instead) or is already queued further on. An
    /// out-of-range floor fails before anything is touched.
    pub fn add_destination(&self, floor: u8) -> SimResult<bool> {
        if floor < 1 || floor > self.num_floors {
            return Err(SimError::InvalidFloor {
                floor,
                num_floors: self.num_floors,
            });
        }

        let accepted = {
            let mut state = self.state.lock();
            let behind = match state.direction {
                Some(Direction::Up) => floor < state.current_floor,
                Some(Direction::Down) => floor > state.current_floor,
                None => false,
            };
            if behind {
                sim_log!(
                    "unit {}: invalid request, floor {} is behind its travel",
                    self.id,
                    floor
                );
                false
            } else if state.queue.contains(&floor) {
                if floor == state.current_floor {
                    // already stopping here; nothing new to queue
                    sim_log!("unit {}: already stopping at floor {}", self.id, floor);
                    true
                } else {
                    sim_log!(
                        "unit {}: floor {} is already on its destination list",
                        self.id,
                        floor
                    );
                    false
                }
            } else {
                state.queue.push(floor);
                if state.queue.len() == 1 {
                    if let Some(direction) = Direction::of_travel(state.current_floor, floor) {
                        state.direction = Some(direction);
                    }
                }
                Self::sort_queue(&mut state);
                sim_log!(
                    "unit {}: adding floor {} to its destination list, now {:?}",
                    self.id,
                    floor,
                    state.queue
                );
                true
            }
        };

        if accepted {
            let _ = self.wake_tx.send(());
        }
        Ok(accepted)
    }

    /// Branch-1 absorption: a car standing at the call floor with no
    /// direction takes on the caller's direction.
    pub(crate) fn align_direction(&self, direction: Direction) {
        let mut state = self.state.lock();
        if state.direction.is_none() {
            state.direction = Some(direction);
        }
    }

    fn sort_queue(state: &mut UnitState) {
        match state.direction {
            Some(Direction::Down) => state.queue.sort_unstable_by(|a, b| b.cmp(a)),
            _ => state.queue.sort_unstable(),
        }
    }

    fn set_direction(&self, direction: Direction) {
        let mut state = self.state.lock();
        state.direction = Some(direction);
        Self::sort_queue(&mut state);
    }

    fn open_doors(&self) {
        self.state.lock().doors_open = true;
    }

    fn close_doors(&self) {
        self.state.lock().doors_open = false;
    }

    /// Come to rest: no direction, doors open.
    fn park(&self) {
        let mut state = self.state.lock();
        state.direction = None;
        state.doors_open = true;
    }

    fn remove_stop(&self, floor: u8) {
        self.state.lock().queue.retain(|&queued| queued != floor);
    }

    /// Stops planned anywhere other than `floor`.
    fn remaining_stops_beyond(&self, floor: u8) -> usize {
        self.state
            .lock()
            .queue
            .iter()
            .filter(|&&queued| queued != floor)
            .count()
    }

    fn carries_rider_for(&self, floor: u8) -> bool {
        self.state
            .lock()
            .passengers
            .iter()
            .any(|p| p.destination == floor)
    }

    fn board(&self, passenger: Passenger) {
        self.state.lock().passengers.push(passenger);
    }

    fn remove_riders_for(&self, floor: u8) -> Vec<Passenger> {
        let mut state = self.state.lock();
        let mut alighted = Vec::new();
        let mut index = 0;
        while index < state.passengers.len() {
            if state.passengers[index].destination == floor {
                alighted.push(state.passengers.remove(index));
            } else {
                index += 1;
            }
        }
        alighted
    }

    /// One travel step: move a floor toward the queue head, arriving when
    /// the head is reached.
    fn step_toward_head(&self) -> State {
        let mut state = self.state.lock();
        let head = match state.queue.first() {
            Some(&head) => head,
            // the queue is only ever popped by this car's own thread
            None => unreachable!("unit {} is en route with an empty queue", self.id),
        };
        match state.direction {
            Some(Direction::Down) if state.current_floor > head => state.current_floor -= 1,
            Some(Direction::Up) if state.current_floor < head => state.current_floor += 1,
            _ => (),
        }
        if state.current_floor == head {
            State::Arrived
        } else {
            sim_log!(
                "unit {}: passing floor {} on the way to {}, {:?}",
                self.id,
                state.current_floor,
                head,
                state.queue
            );
            State::EnRoute
        }
    }
}

/// The car's long-lived task. No lockstep scheduler exists; each car sleeps
/// through its own scaled travel and door times and interleaves with the
/// rest of the fleet on elapsed time alone.
pub fn main(
    unit: Arc<ElevatorUnit>,
    building: Arc<Building>,
    controller: Arc<DispatchController>,
    stats: Arc<StatsRecorder>,
    timing: TimingConfig,
    running: Arc<AtomicBool>,
) {
    let wake_rx = unit.wake_rx.clone();
    let mut state = State::Idle;

    while running.load(Ordering::SeqCst) {
        state = match state {
            State::Idle => idle(&unit, &controller, &wake_rx, &timing),
            State::EnRoute | State::Returning => travel(&unit, &timing),
            State::Arrived => consider_arrival(&unit, &building, &controller, &stats, &timing),
        };
    }
    sim_log!("unit {}: shut down", unit.id());
}

fn idle(
    unit: &ElevatorUnit,
    controller: &DispatchController,
    wake_rx: &Receiver<()>,
    timing: &TimingConfig,
) -> State {
    if !unit.queue_is_empty() {
        return State::EnRoute;
    }

    // feed from the backlog before settling down to wait
    if !controller.backlog_is_empty() {
        sim_log!(
            "unit {}: asking the controller for pending requests",
            unit.id()
        );
        if let Err(err) = controller.deliver_backlog(unit.current_floor(), unit.id()) {
            sim_log!("unit {}: backlog request failed: {}", unit.id(), err);
        }
    }

    select! {
        recv(wake_rx) -> _ => {
            if unit.queue_is_empty() {
                State::Idle
            } else {
                State::EnRoute
            }
        },
        default(timing.idle_timeout()) => {
            if unit.queue_is_empty() && unit.current_floor() != unit.home_floor() {
                sim_log!(
                    "unit {}: timed out; returning to its home floor {}",
                    unit.id(),
                    unit.home_floor()
                );
                match unit.add_destination(unit.home_floor()) {
                    Ok(true) => State::Returning,
                    // a destination raced in ahead of the home trip
                    _ => State::Idle,
                }
            } else {
                State::Idle
            }
        },
    }
}

fn travel(unit: &ElevatorUnit, timing: &TimingConfig) -> State {
    unit.close_doors();
    thread::sleep(timing.floor_travel());
    unit.step_toward_head()
}

/// Everything that happens at a stop: the skip rule, doors, alighting,
/// direction refresh, boarding, backlog reconciliation, and lamp clearing.
fn consider_arrival(
    unit: &ElevatorUnit,
    building: &Building,
    controller: &DispatchController,
    stats: &StatsRecorder,
    timing: &TimingConfig,
) -> State {
    let floor_number = unit.current_floor();
    let floor = match building.floor(floor_number) {
        Ok(floor) => floor,
        Err(_) => unreachable!("unit {} stopped outside the building", unit.id()),
    };

    // skip rule: a queued stop is honored only when a rider on board wants
    // it or the lamp for our travel direction is lit; a stop whose only
    // demand points the other way is requeued rather than lost
    if let Some(direction) = unit.direction() {
        let selected_from_within = unit.carries_rider_for(floor_number);
        let own_lamp = floor.callbox().lamp(direction);
        let opposite_lamp = floor.callbox().lamp(direction.opposite());
        if !selected_from_within && !own_lamp && opposite_lamp && unit.queue_len() > 1 {
            sim_log!(
                "unit {}: skipping floor {} -- heading {} but the floor only asks to go {}; requeueing the request",
                unit.id(),
                floor_number,
                direction.as_str(),
                direction.opposite().as_str()
            );
            unit.remove_stop(floor_number);
            controller.requeue_skipped(floor_number, direction.opposite());
            return State::EnRoute;
        }
    }

    unit.open_doors();
    sim_log!(
        "unit {}: arrived at floor {}; doors open",
        unit.id(),
        floor_number
    );

    // riders for this floor get off
    let alighted = unit.remove_riders_for(floor_number);
    for passenger in &alighted {
        sim_log!(
            "person {} has reached floor {} and exits unit {}",
            passenger.serial,
            floor_number,
            unit.id()
        );
    }
    stats.record_alighted(&alighted);

    // last planned stop with people waiting: turn toward the first in line
    let direction_before = unit.direction();
    if floor.waiting_count() > 0
        && unit.passenger_count() == 0
        && unit.remaining_stops_beyond(floor_number) == 0
    {
        if let Some(first_destination) = floor.first_waiting_destination() {
            if let Some(refreshed) = Direction::of_travel(floor_number, first_destination) {
                unit.set_direction(refreshed);
                if direction_before != Some(refreshed) {
                    sim_log!(
                        "unit {}: direction refreshed to {} for the waiting line",
                        unit.id(),
                        refreshed.as_str()
                    );
                }
            }
        }
    }

    thread::sleep(timing.door_open());

    // board whoever is going our way, up to capacity
    let mut left_behind = 0;
    if let Some(direction) = unit.direction() {
        let space = unit.capacity().saturating_sub(unit.passenger_count());
        let (boarders, skipped) = floor.take_boarders(direction, space);
        left_behind = skipped;
        for mut passenger in boarders {
            passenger.boarded_at = Some(Instant::now());
            sim_log!(
                "person {} enters unit {} at floor {} and presses floor {}",
                passenger.serial,
                unit.id(),
                floor_number,
                passenger.destination
            );
            let destination = passenger.destination;
            unit.board(passenger);
            match unit.add_destination(destination) {
                Ok(_) => (),
                Err(err) => unreachable!("rider pressed a floor outside the building: {err}"),
            }
        }
    }

    // a drained queue or a direction change frees this car for backlog work
    let direction_changed = direction_before != unit.direction();
    let queue_drained = unit.remaining_stops_beyond(floor_number) == 0;
    if (direction_changed || queue_drained) && !controller.backlog_is_empty() {
        sim_log!(
            "unit {}: asking the controller for pending requests",
            unit.id()
        );
        if let Err(err) = controller.deliver_backlog(floor_number, unit.id()) {
            sim_log!("unit {}: backlog request failed: {}", unit.id(), err);
        }
    }

    // the serviced lamp goes dark; same-direction riders left behind by a
    // full car ring it again so the call is not lost
    if let Some(direction) = unit.direction() {
        floor.callbox().set_lamp(direction, false);
        controller.note_serviced(floor_number, direction);
        if left_behind > 0 {
            sim_log!(
                "{} people left behind on floor {} by a full unit {}; they press {} again",
                left_behind,
                floor_number,
                unit.id(),
                direction.as_str()
            );
            if floor.callbox().press(direction) {
                if let Err(err) = controller.pick(CallRequest::new(floor_number, direction)) {
                    sim_log!("unit {}: re-signal failed: {}", unit.id(), err);
                }
            }
        }
    }

    unit.close_doors();
    unit.remove_stop(floor_number);
    if unit.queue_is_empty() {
        unit.park();
        sim_log!(
            "unit {}: doors closed; no further destinations, idling at floor {}",
            unit.id(),
            floor_number
        );
        State::Idle
    } else {
        sim_log!(
            "unit {}: doors closed; continuing to {:?}",
            unit.id(),
            unit.queue_snapshot()
        );
        State::EnRoute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use shared_resources::call::Demand;
    use shared_resources::config::{BuildingConfig, HeuristicKind};

    use crate::fleet::Fleet;

    fn zero_timing() -> TimingConfig {
        TimingConfig {
            floor_travel_ms: 0,
            door_open_ms: 0,
            idle_timeout_ms: 0,
            drain_poll_ms: 0,
            time_scale: 1,
        }
    }

    fn fixture(
        num_floors: u8,
        home_floors: Vec<u8>,
        unit_capacity: usize,
    ) -> (Arc<Fleet>, Arc<Building>, Arc<DispatchController>) {
        let config = BuildingConfig {
            num_floors,
            num_units: home_floors.len() as u8,
            home_floors,
            unit_capacity,
        };
        let fleet = Arc::new(Fleet::new(&config));
        let building = Arc::new(Building::new(num_floors));
        let controller = Arc::new(DispatchController::new(
            fleet.clone(),
            building.clone(),
            HeuristicKind::Basic,
        ));
        (fleet, building, controller)
    }

    #[test]
    fn duplicate_destinations_collapse() {
        let unit = ElevatorUnit::new(1, 2, 4, 10);
        assert!(unit.add_destination(5).unwrap());
        assert!(!unit.add_destination(5).unwrap());
        assert_eq!(unit.queue_snapshot(), vec![5]);
    }

    #[test]
    fn first_destination_derives_the_direction() {
        let unit = ElevatorUnit::new(1, 4, 4, 10);
        unit.add_destination(7).unwrap();
        assert_eq!(unit.direction(), Some(Direction::Up));

        let unit = ElevatorUnit::new(2, 4, 4, 10);
        unit.add_destination(2).unwrap();
        assert_eq!(unit.direction(), Some(Direction::Down));

        // a stop at the current floor implies no direction yet
        let unit = ElevatorUnit::new(3, 4, 4, 10);
        assert!(unit.add_destination(4).unwrap());
        assert_eq!(unit.direction(), None);
        assert_eq!(unit.queue_snapshot(), vec![4]);
    }

    #[test]
    fn queue_is_monotonic_with_direction() {
        let unit = ElevatorUnit::new(1, 2, 4, 10);
        for floor in [5, 3, 9] {
            unit.add_destination(floor).unwrap();
        }
        assert_eq!(unit.queue_snapshot(), vec![3, 5, 9]);
        for floor in unit.queue_snapshot() {
            assert!(floor >= unit.current_floor());
        }

        let unit = ElevatorUnit::new(2, 8, 4, 10);
        for floor in [3, 6, 1] {
            unit.add_destination(floor).unwrap();
        }
        assert_eq!(unit.queue_snapshot(), vec![6, 3, 1]);
        for floor in unit.queue_snapshot() {
            assert!(floor <= unit.current_floor());
        }
    }

    #[test]
    fn floors_behind_the_travel_direction_are_refused() {
        let unit = ElevatorUnit::new(1, 2, 4, 10);
        unit.add_destination(5).unwrap();
        assert!(!unit.add_destination(1).unwrap());
        assert_eq!(unit.queue_snapshot(), vec![5]);
    }

    #[test]
    fn out_of_range_floors_fail_fast() {
        let unit = ElevatorUnit::new(1, 2, 4, 10);
        assert!(matches!(
            unit.add_destination(0),
            Err(SimError::InvalidFloor { floor: 0, .. })
        ));
        assert!(matches!(
            unit.add_destination(11),
            Err(SimError::InvalidFloor { floor: 11, .. })
        ));
        assert!(unit.queue_is_empty());
    }

    #[test]
    fn a_stop_with_only_opposite_demand_is_skipped_and_requeued() {
        // unit at floor 6 moving up, queue [6, 9]; nobody on board wants 6,
        // the up lamp is dark and the down lamp is lit
        let (fleet, building, controller) = fixture(10, vec![1], 4);
        let unit = fleet.unit(1).unwrap();
        {
            let mut state = unit.state.lock();
            state.current_floor = 6;
            state.direction = Some(Direction::Up);
            state.queue = vec![6, 9];
            state.doors_open = false;
        }
        building
            .floor(6)
            .unwrap()
            .callbox()
            .set_lamp(Direction::Down, true);

        let stats = StatsRecorder::new();
        let next = consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        assert_eq!(next, State::EnRoute);
        assert_eq!(unit.queue_snapshot(), vec![9]);
        assert!(!unit.doors_open(), "a skipped stop never opens the doors");
        assert_eq!(controller.backlog_snapshot().get(&6), Some(&Demand::Down));
    }

    #[test]
    fn a_lit_lamp_in_the_travel_direction_is_honored() {
        let (fleet, building, controller) = fixture(10, vec![1], 4);
        let unit = fleet.unit(1).unwrap();
        {
            let mut state = unit.state.lock();
            state.current_floor = 6;
            state.direction = Some(Direction::Up);
            state.queue = vec![6, 9];
            state.doors_open = false;
        }
        building
            .floor(6)
            .unwrap()
            .callbox()
            .set_lamp(Direction::Up, true);

        let stats = StatsRecorder::new();
        let next = consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        assert_eq!(next, State::EnRoute);
        assert_eq!(unit.queue_snapshot(), vec![9]);
        assert!(
            !building.floor(6).unwrap().callbox().lamp(Direction::Up),
            "the serviced lamp goes dark"
        );
        assert!(controller.backlog_is_empty());
    }

    #[test]
    fn arrival_boards_the_waiting_line_and_queues_their_stops() {
        let (fleet, building, controller) = fixture(10, vec![3], 4);
        let unit = fleet.unit(1).unwrap();
        building.floor(3).unwrap().add_waiting(Passenger::new(1, 3, 6));
        unit.add_destination(3).unwrap();

        let stats = StatsRecorder::new();
        let next = consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        assert_eq!(next, State::EnRoute);
        assert_eq!(unit.passenger_count(), 1);
        assert_eq!(unit.direction(), Some(Direction::Up));
        assert_eq!(unit.queue_snapshot(), vec![6]);
        assert_eq!(building.floor(3).unwrap().waiting_count(), 0);
        assert_eq!(stats.trips(), 0);
    }

    #[test]
    fn riders_alight_at_their_destination() {
        let (fleet, building, controller) = fixture(10, vec![3], 4);
        let unit = fleet.unit(1).unwrap();
        building.floor(3).unwrap().add_waiting(Passenger::new(1, 3, 6));
        unit.add_destination(3).unwrap();

        let stats = StatsRecorder::new();
        consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        // jump the travel: the car reaches floor 6
        unit.state.lock().current_floor = 6;
        let next = consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        assert_eq!(next, State::Idle);
        assert_eq!(unit.passenger_count(), 0);
        assert_eq!(stats.trips(), 1);
        assert!(unit.queue_is_empty());
        assert_eq!(unit.direction(), None);
        assert!(unit.doors_open(), "an idle car rests with its doors open");
    }

    #[test]
    fn a_full_car_requeues_the_people_it_leaves_behind() {
        let (fleet, building, controller) = fixture(10, vec![3], 1);
        let unit = fleet.unit(1).unwrap();
        building.floor(3).unwrap().add_waiting(Passenger::new(1, 3, 6));
        building.floor(3).unwrap().add_waiting(Passenger::new(2, 3, 7));
        unit.add_destination(3).unwrap();

        let stats = StatsRecorder::new();
        consider_arrival(unit, &building, &controller, &stats, &zero_timing());

        assert_eq!(unit.passenger_count(), 1);
        assert_eq!(building.floor(3).unwrap().waiting_count(), 1);
        // the leftover pressed the lamp again and, with the only car full,
        // the call fell back into the backlog
        assert!(building.floor(3).unwrap().callbox().lamp(Direction::Up));
        assert_eq!(controller.backlog_snapshot().get(&3), Some(&Demand::Up));
    }

    #[test]
    fn an_idle_car_times_out_and_heads_home() {
        let (fleet, _building, controller) = fixture(10, vec![1], 4);
        let unit = fleet.unit(1).unwrap();
        unit.state.lock().current_floor = 5;

        let wake_rx = unit.wake_rx.clone();
        let next = idle(unit, &controller, &wake_rx, &zero_timing());

        assert_eq!(next, State::Returning);
        assert_eq!(unit.queue_snapshot(), vec![1]);
        assert_eq!(unit.direction(), Some(Direction::Down));
    }

    #[test]
    fn a_unit_thread_serves_a_waiting_passenger() {
        let (fleet, building, controller) = fixture(3, vec![1], 2);
        let stats = Arc::new(StatsRecorder::new());
        let running = Arc::new(AtomicBool::new(true));
        let timing = TimingConfig {
            floor_travel_ms: 1,
            door_open_ms: 1,
            idle_timeout_ms: 5,
            drain_poll_ms: 1,
            time_scale: 1,
        };

        building.floor(3).unwrap().add_waiting(Passenger::new(1, 3, 1));
        building.floor(3).unwrap().callbox().press(Direction::Down);

        let handle = {
            let unit = fleet.unit(1).unwrap().clone();
            let building = building.clone();
            let controller = controller.clone();
            let stats = stats.clone();
            let running = running.clone();
            thread::Builder::new()
                .name(String::from("unit-1"))
                .spawn(move || main(unit, building, controller, stats, timing, running))
                .unwrap()
        };

        controller.pick(CallRequest::new(3, Direction::Down)).unwrap();

        let mut served = false;
        for _ in 0..500 {
            if stats.trips() == 1 {
                served = true;
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();

        assert!(served, "the passenger was never delivered");
        assert_eq!(fleet.unit(1).unwrap().passenger_count(), 0);
        assert!(fleet.unit(1).unwrap().is_parked());
    }
}
