use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use shared_resources::call::Direction;
use shared_resources::error::{SimError, SimResult};

/// Someone who wants a ride. Created by the traffic generator, parked on a
/// floor's waiting list until a unit boards them.
#[derive(Debug, Clone)]
pub struct Passenger {
    pub serial: u32,
    pub start_floor: u8,
    pub destination: u8,
    pub pressed_at: Instant,
    pub boarded_at: Option<Instant>,
}

impl Passenger {
    pub fn new(serial: u32, start_floor: u8, destination: u8) -> Passenger {
        Passenger {
            serial,
            start_floor,
            destination,
            pressed_at: Instant::now(),
            boarded_at: None,
        }
    }

    pub fn intended_direction(&self) -> Direction {
        if self.destination > self.start_floor {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// The two call lamps on one floor. Press is edge-triggered: only the
/// transition from dark to lit counts as a new call.
pub struct Callbox {
    up: AtomicBool,
    down: AtomicBool,
}

impl Callbox {
    fn new() -> Callbox {
        Callbox {
            up: AtomicBool::new(false),
            down: AtomicBool::new(false),
        }
    }

    fn cell(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    pub fn lamp(&self, direction: Direction) -> bool {
        self.cell(direction).load(Ordering::SeqCst)
    }

    pub fn set_lamp(&self, direction: Direction, on: bool) {
        self.cell(direction).store(on, Ordering::SeqCst);
    }

    /// Returns true when this press freshly lit the lamp.
    pub fn press(&self, direction: Direction) -> bool {
        !self.cell(direction).swap(true, Ordering::SeqCst)
    }
}

pub struct Floor {
    number: u8,
    callbox: Callbox,
    waiting: Mutex<Vec<Passenger>>,
}

impl Floor {
    fn new(number: u8) -> Floor {
        Floor {
            number,
            callbox: Callbox::new(),
            waiting: Mutex::new(Vec::new()),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn callbox(&self) -> &Callbox {
        &self.callbox
    }

    pub fn add_waiting(&self, passenger: Passenger) {
        self.waiting.lock().push(passenger);
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.lock().len()
    }

    /// Waiting headcount split by intended direction: (up, down).
    pub fn waiting_directions(&self) -> (usize, usize) {
        let waiting = self.waiting.lock();
        let up = waiting
            .iter()
            .filter(|p| p.intended_direction() == Direction::Up)
            .count();
        (up, waiting.len() - up)
    }

    /// Destination of the longest-waiting passenger, first come first served.
    pub fn first_waiting_destination(&self) -> Option<u8> {
        self.waiting.lock().first().map(|p| p.destination)
    }

    /// Removes up to `space` passengers heading `direction` from the waiting
    /// list, preserving arrival order. Also reports how many same-direction
    /// passengers had to stay behind for lack of space.
    pub fn take_boarders(&self, direction: Direction, space: usize) -> (Vec<Passenger>, usize) {
        let mut waiting = self.waiting.lock();
        let mut boarders = Vec::new();
        let mut left_behind = 0;
        let mut index = 0;
        while index < waiting.len() {
            if waiting[index].intended_direction() == direction {
                if boarders.len() < space {
                    boarders.push(waiting.remove(index));
                    continue;
                }
                left_behind += 1;
            }
            index += 1;
        }
        (boarders, left_behind)
    }
}

/// The floor roster, assembled once at bootstrap and fixed in shape after.
pub struct Building {
    floors: Vec<Floor>,
}

impl Building {
    pub fn new(num_floors: u8) -> Building {
        Building {
            floors: (1..=num_floors).map(Floor::new).collect(),
        }
    }

    pub fn num_floors(&self) -> u8 {
        self.floors.len() as u8
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, floor: u8) -> SimResult<&Floor> {
        let index = usize::from(floor)
            .checked_sub(1)
            .ok_or(SimError::InvalidFloor {
                floor,
                num_floors: self.num_floors(),
            })?;
        self.floors.get(index).ok_or(SimError::InvalidFloor {
            floor,
            num_floors: self.num_floors(),
        })
    }

    pub fn total_waiting(&self) -> usize {
        self.floors.iter().map(Floor::waiting_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_lookup_is_one_based() {
        let building = Building::new(5);
        assert_eq!(building.floor(1).unwrap().number(), 1);
        assert_eq!(building.floor(5).unwrap().number(), 5);
        assert!(matches!(
            building.floor(0),
            Err(SimError::InvalidFloor { floor: 0, .. })
        ));
        assert!(matches!(
            building.floor(6),
            Err(SimError::InvalidFloor { floor: 6, .. })
        ));
    }

    #[test]
    fn lamp_press_is_edge_triggered() {
        let callbox = Callbox::new();
        assert!(callbox.press(Direction::Up));
        assert!(!callbox.press(Direction::Up));
        assert!(callbox.lamp(Direction::Up));
        assert!(!callbox.lamp(Direction::Down));
        callbox.set_lamp(Direction::Up, false);
        assert!(callbox.press(Direction::Up));
    }

    #[test]
    fn boarding_respects_direction_and_space() {
        let floor = Floor::new(3);
        floor.add_waiting(Passenger::new(1, 3, 7));
        floor.add_waiting(Passenger::new(2, 3, 1));
        floor.add_waiting(Passenger::new(3, 3, 9));
        floor.add_waiting(Passenger::new(4, 3, 8));

        let (boarders, left_behind) = floor.take_boarders(Direction::Up, 2);
        let serials: Vec<u32> = boarders.iter().map(|p| p.serial).collect();
        assert_eq!(serials, vec![1, 3]);
        assert_eq!(left_behind, 1);

        // the down passenger and the overflow up passenger are still waiting
        assert_eq!(floor.waiting_count(), 2);
        assert_eq!(floor.waiting_directions(), (1, 1));
    }

    #[test]
    fn first_waiting_destination_is_fifo() {
        let floor = Floor::new(2);
        assert_eq!(floor.first_waiting_destination(), None);
        floor.add_waiting(Passenger::new(1, 2, 6));
        floor.add_waiting(Passenger::new(2, 2, 1));
        assert_eq!(floor.first_waiting_destination(), Some(6));
    }

    #[test]
    fn intended_direction_follows_destination() {
        assert_eq!(Passenger::new(1, 2, 6).intended_direction(), Direction::Up);
        assert_eq!(
            Passenger::new(2, 6, 2).intended_direction(),
            Direction::Down
        );
    }
}
