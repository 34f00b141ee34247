use std::sync::Arc;

use shared_resources::config::BuildingConfig;
use shared_resources::error::{SimError, SimResult};

use crate::unit::ElevatorUnit;

/// The car roster, assembled once at bootstrap. Ids are stable and start
/// at 1; the roster itself is read-mostly after construction.
pub struct Fleet {
    units: Vec<Arc<ElevatorUnit>>,
    num_floors: u8,
}

impl Fleet {
    pub fn new(config: &BuildingConfig) -> Fleet {
        let units = (1..=config.num_units)
            .map(|id| {
                Arc::new(ElevatorUnit::new(
                    id,
                    config.home_floors[usize::from(id - 1)],
                    config.unit_capacity,
                    config.num_floors,
                ))
            })
            .collect();
        Fleet {
            units,
            num_floors: config.num_floors,
        }
    }

    pub fn units(&self) -> &[Arc<ElevatorUnit>] {
        &self.units
    }

    pub fn num_units(&self) -> u8 {
        self.units.len() as u8
    }

    pub fn num_floors(&self) -> u8 {
        self.num_floors
    }

    pub fn unit(&self, id: u8) -> SimResult<&Arc<ElevatorUnit>> {
        let index = usize::from(id)
            .checked_sub(1)
            .ok_or(SimError::InvalidUnitId {
                unit: id,
                num_units: self.num_units(),
            })?;
        self.units.get(index).ok_or(SimError::InvalidUnitId {
            unit: id,
            num_units: self.num_units(),
        })
    }

    /// Mean destination-queue length over every unit except `excluded`.
    /// The requesting or candidate car never counts toward its own bound.
    pub fn mean_queue_len_excluding(&self, excluded: u8) -> f64 {
        let mut total = 0usize;
        let mut counted = 0usize;
        for unit in &self.units {
            if unit.id() != excluded {
                total += unit.queue_len();
                counted += 1;
            }
        }
        if counted == 0 {
            0.0
        } else {
            total as f64 / counted as f64
        }
    }

    pub fn all_parked(&self) -> bool {
        self.units.iter().all(|unit| unit.is_parked())
    }
}
