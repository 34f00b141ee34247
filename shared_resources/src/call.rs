use std::cmp::Ordering;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn iter() -> impl Iterator<Item = Direction> {
        [Direction::Up, Direction::Down].iter().copied()
    }

    /// Direction of travel from `from` toward `to`, `None` when equal.
    pub fn of_travel(from: u8, to: u8) -> Option<Direction> {
        match to.cmp(&from) {
            Ordering::Greater => Some(Direction::Up),
            Ordering::Less => Some(Direction::Down),
            Ordering::Equal => None,
        }
    }
}

/// Unmet demand recorded for one floor in the pending backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    Up,
    Down,
    Both,
}

impl Demand {
    pub fn from_direction(direction: Direction) -> Demand {
        match direction {
            Direction::Up => Demand::Up,
            Direction::Down => Demand::Down,
        }
    }

    pub fn covers(self, direction: Direction) -> bool {
        match self {
            Demand::Up => direction == Direction::Up,
            Demand::Down => direction == Direction::Down,
            Demand::Both => true,
        }
    }

    /// Adding a direction that is already present leaves the demand unchanged.
    pub fn merge(self, direction: Direction) -> Demand {
        if self.covers(direction) {
            self
        } else {
            Demand::Both
        }
    }

    /// `None` means the whole entry is consumed and the key should go away.
    pub fn remove(self, direction: Direction) -> Option<Demand> {
        match self {
            Demand::Both => Some(Demand::from_direction(direction.opposite())),
            _ => None,
        }
    }

    /// The single direction a Both entry collapses to when one must be named.
    pub fn effective_direction(self) -> Direction {
        match self {
            Demand::Down => Direction::Down,
            Demand::Up | Demand::Both => Direction::Up,
        }
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        let directions: &'static [Direction] = match self {
            Demand::Up => &[Direction::Up],
            Demand::Down => &[Direction::Down],
            Demand::Both => &[Direction::Down, Direction::Up],
        };
        directions.iter().copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Demand::Up => "up",
            Demand::Down => "down",
            Demand::Both => "up&down",
        }
    }
}
