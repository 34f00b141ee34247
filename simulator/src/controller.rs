use std::collections::BTreeMap;
use std::sync::Arc;

use shared_resources::call::{Demand, Direction};
use shared_resources::config::HeuristicKind;
use shared_resources::error::{SimError, SimResult};
use shared_resources::request::CallRequest;

use crate::backlog::PendingBacklog;
use crate::building::Building;
use crate::fleet::Fleet;
use crate::heuristics::{
    self, BacklogReconciler, DispatchContext, SelectionHeuristic, SelectionReason,
};
use crate::sim_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Dispatched(u8),
    Backlogged,
}

/// The dispatch coordinator. Owns the pending backlog and the heuristic
/// pair chosen at construction; every consumer holds it by `Arc` handle.
pub struct DispatchController {
    fleet: Arc<Fleet>,
    building: Arc<Building>,
    backlog: PendingBacklog,
    selector: Box<dyn SelectionHeuristic>,
    reconciler: Box<dyn BacklogReconciler>,
}

impl DispatchController {
    pub fn new(fleet: Arc<Fleet>, building: Arc<Building>, kind: HeuristicKind) -> Self {
        let (selector, reconciler) = heuristics::build(kind);
        sim_log!(
            "controller: using {} selection with {} reconciliation",
            selector.name(),
            reconciler.name()
        );
        DispatchController {
            fleet,
            building,
            backlog: PendingBacklog::new(),
            selector,
            reconciler,
        }
    }

    fn context(&self) -> DispatchContext<'_> {
        DispatchContext {
            fleet: &self.fleet,
            building: &self.building,
        }
    }

    fn check_floor(&self, floor: u8) -> SimResult<()> {
        let num_floors = self.fleet.num_floors();
        if floor < 1 || floor > num_floors {
            return Err(SimError::InvalidFloor { floor, num_floors });
        }
        Ok(())
    }

    /// Selects a car for a fresh call; a call no car can take right now
    /// joins the backlog. Every call ends up in exactly one place.
    pub fn pick(&self, request: CallRequest) -> SimResult<PickOutcome> {
        self.check_floor(request.floor)?;
        let CallRequest { floor, direction } = request;
        sim_log!(
            "controller: asked to send a unit to floor {} for {} travel",
            floor,
            direction.as_str()
        );

        match self.selector.pick(&self.context(), floor, direction) {
            Some(selection) => {
                let unit = self.fleet.unit(selection.unit_id)?;
                sim_log!(
                    "controller: unit {} chosen for floor {} ({})",
                    selection.unit_id,
                    floor,
                    selection.reason.describe()
                );
                if selection.reason == SelectionReason::AlreadyAtFloor {
                    unit.align_direction(direction);
                }
                if unit.add_destination(floor)? {
                    Ok(PickOutcome::Dispatched(selection.unit_id))
                } else {
                    // the car moved on between selection and dispatch; the
                    // call must still land somewhere
                    self.backlog.add_entry(floor, direction);
                    sim_log!(
                        "controller: unit {} could no longer take floor {}; request joins the backlog",
                        selection.unit_id,
                        floor
                    );
                    Ok(PickOutcome::Backlogged)
                }
            }
            None => {
                self.backlog.add_entry(floor, direction);
                sim_log!(
                    "controller: no unit available for floor {} going {}; request joins the backlog",
                    floor,
                    direction.as_str()
                );
                Ok(PickOutcome::Backlogged)
            }
        }
    }

    /// Feeds backlog entries to a car that has gone idle or changed
    /// direction. The number of absorbed entries is returned.
    pub fn deliver_backlog(&self, requesting_floor: u8, unit_id: u8) -> SimResult<usize> {
        self.check_floor(requesting_floor)?;
        let unit = self.fleet.unit(unit_id)?;

        // the lock spans selection and consumption so no entry can land on
        // two destination lists
        let mut entries = self.backlog.guard();
        if entries.is_empty() {
            sim_log!("controller: no pending destinations for unit {}", unit_id);
            return Ok(0);
        }

        let picks = self
            .reconciler
            .select(&self.context(), &entries, requesting_floor, unit);
        let mut absorbed = 0;
        for (floor, direction) in picks {
            match unit.add_destination(floor)? {
                true => {
                    PendingBacklog::remove_locked(&mut entries, floor, direction);
                    absorbed += 1;
                    sim_log!(
                        "controller: pending floor {} ({}) handed to unit {}",
                        floor,
                        direction.as_str(),
                        unit_id
                    );
                }
                false => {
                    sim_log!(
                        "controller: unit {} declined pending floor {}",
                        unit_id,
                        floor
                    );
                }
            }
        }
        if absorbed == 0 {
            sim_log!(
                "controller: no deliverable pending destinations for unit {}",
                unit_id
            );
        }
        Ok(absorbed)
    }

    /// A stop the skip rule bounced: the unmet demand points the other way.
    pub fn requeue_skipped(&self, floor: u8, direction: Direction) {
        self.backlog.add_entry(floor, direction);
        sim_log!(
            "controller: floor {} requeued in the backlog for {} travel",
            floor,
            direction.as_str()
        );
    }

    /// A car serviced this floor's lamp; drop the matching backlog demand.
    pub fn note_serviced(&self, floor: u8, direction: Direction) {
        self.backlog.remove_entry(floor, direction);
    }

    pub fn backlog_is_empty(&self) -> bool {
        self.backlog.is_empty()
    }

    pub fn backlog_snapshot(&self) -> BTreeMap<u8, Demand> {
        self.backlog.snapshot()
    }

    /// Shutdown sweep: every remaining entry is re-picked; a component a
    /// car actually takes is consumed on the spot.
    pub fn redispatch_backlog(&self) -> SimResult<()> {
        for (floor, demand) in self.backlog.snapshot() {
            sim_log!(
                "controller: backlog still holds floor {} ({}); redistributing",
                floor,
                demand.as_str()
            );
            for direction in demand.directions() {
                if let PickOutcome::Dispatched(_) = self.pick(CallRequest::new(floor, direction))? {
                    self.backlog.remove_entry(floor, direction);
                }
            }
        }
        Ok(())
    }
}
