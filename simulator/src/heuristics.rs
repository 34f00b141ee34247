use std::collections::BTreeMap;
use std::ops::Bound;

use shared_resources::call::{Demand, Direction};
use shared_resources::config::HeuristicKind;

use crate::building::Building;
use crate::fleet::Fleet;
use crate::unit::ElevatorUnit;

/// Read-only view of the shared state a heuristic may consult.
pub struct DispatchContext<'a> {
    pub fleet: &'a Fleet,
    pub building: &'a Building,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    AlreadyAtFloor,
    UnderMeanSameDirection,
    SameDirection,
    IdleBackup,
}

impl SelectionReason {
    pub fn describe(self) -> &'static str {
        match self {
            SelectionReason::AlreadyAtFloor => "already standing at the floor",
            SelectionReason::UnderMeanSameDirection => {
                "heading that way with a below-average destination list"
            }
            SelectionReason::SameDirection => "heading that way",
            SelectionReason::IdleBackup => "idle backup",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub unit_id: u8,
    pub reason: SelectionReason,
}

/// Chooses a car for a new call. Pure selection: the controller applies the
/// dispatch, and a miss falls back into the backlog.
pub trait SelectionHeuristic: Send + Sync {
    fn name(&self) -> &'static str;
    fn pick(&self, ctx: &DispatchContext<'_>, floor: u8, direction: Direction)
        -> Option<Selection>;
}

/// Chooses backlog entries to feed a requesting car, in service order.
/// Pure selection: the controller pushes the stops and demotes the demand
/// under its own backlog lock.
pub trait BacklogReconciler: Send + Sync {
    fn name(&self) -> &'static str;
    fn select(
        &self,
        ctx: &DispatchContext<'_>,
        entries: &BTreeMap<u8, Demand>,
        requesting_floor: u8,
        unit: &ElevatorUnit,
    ) -> Vec<(u8, Direction)>;
}

pub fn build(kind: HeuristicKind) -> (Box<dyn SelectionHeuristic>, Box<dyn BacklogReconciler>) {
    match kind {
        HeuristicKind::Basic => (Box::new(BasicSelection), Box::new(FarthestAnchorReconciler)),
        HeuristicKind::LoadBalanced => (
            Box::new(LoadBalancedSelection),
            Box::new(NearestAnchorReconciler),
        ),
    }
}

fn has_space(unit: &ElevatorUnit) -> bool {
    unit.passenger_count() < unit.capacity()
}

/// Standing at the call floor with its doors open and a compatible (or no)
/// direction: the call is absorbed on the spot.
fn stationed_at(unit: &ElevatorUnit, floor: u8, direction: Direction) -> bool {
    unit.current_floor() == floor
        && unit.doors_open()
        && unit.direction().map_or(true, |d| d == direction)
}

/// Will pass the call floor while continuing in the caller's direction.
fn heading_toward(unit: &ElevatorUnit, floor: u8, direction: Direction) -> bool {
    match unit.direction() {
        Some(Direction::Up) => direction == Direction::Up && floor >= unit.current_floor(),
        Some(Direction::Down) => direction == Direction::Down && floor <= unit.current_floor(),
        None => false,
    }
}

/// A queued floor is conflicted for a car when the floor's lamp for the
/// opposite of the car's travel direction is lit: the car would arrive
/// still moving its own way and skip-and-requeue the stop.
fn callbox_conflict(ctx: &DispatchContext<'_>, unit: &ElevatorUnit, floor: u8) -> bool {
    if !unit.queue_contains(floor) {
        return false;
    }
    match unit.direction() {
        Some(direction) => match ctx.building.floor(floor) {
            Ok(floor) => floor.callbox().lamp(direction.opposite()),
            Err(_) => false,
        },
        None => false,
    }
}

pub struct BasicSelection;

impl SelectionHeuristic for BasicSelection {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn pick(
        &self,
        ctx: &DispatchContext<'_>,
        floor: u8,
        direction: Direction,
    ) -> Option<Selection> {
        let mut same_direction = None;
        let mut backup = None;

        // ascending id scan; the first hit per branch wins the tie
        for unit in ctx.fleet.units() {
            if !has_space(unit) {
                continue;
            }
            if stationed_at(unit, floor, direction) {
                return Some(Selection {
                    unit_id: unit.id(),
                    reason: SelectionReason::AlreadyAtFloor,
                });
            }
            if same_direction.is_none() && heading_toward(unit, floor, direction) {
                same_direction = Some(unit.id());
            }
            if backup.is_none() && unit.direction().is_none() {
                backup = Some(unit.id());
            }
        }

        same_direction
            .map(|unit_id| Selection {
                unit_id,
                reason: SelectionReason::SameDirection,
            })
            .or(backup.map(|unit_id| Selection {
                unit_id,
                reason: SelectionReason::IdleBackup,
            }))
    }
}

pub struct LoadBalancedSelection;

impl SelectionHeuristic for LoadBalancedSelection {
    fn name(&self) -> &'static str {
        "load_balanced"
    }

    fn pick(
        &self,
        ctx: &DispatchContext<'_>,
        floor: u8,
        direction: Direction,
    ) -> Option<Selection> {
        let mut under_mean = None;
        let mut same_direction = None;
        let mut backup = None;

        for unit in ctx.fleet.units() {
            if !has_space(unit) {
                continue;
            }
            if stationed_at(unit, floor, direction) {
                return Some(Selection {
                    unit_id: unit.id(),
                    reason: SelectionReason::AlreadyAtFloor,
                });
            }
            if heading_toward(unit, floor, direction) && !callbox_conflict(ctx, unit, floor) {
                if under_mean.is_none() {
                    let mean = ctx.fleet.mean_queue_len_excluding(unit.id());
                    if mean >= 1.0 && (unit.queue_len() as f64) <= mean {
                        under_mean = Some(unit.id());
                    }
                }
                if same_direction.is_none() {
                    same_direction = Some(unit.id());
                }
            }
            if backup.is_none()
                && unit.direction().is_none()
                && !callbox_conflict(ctx, unit, floor)
            {
                backup = Some(unit.id());
            }
        }

        under_mean
            .map(|unit_id| Selection {
                unit_id,
                reason: SelectionReason::UnderMeanSameDirection,
            })
            .or(same_direction.map(|unit_id| Selection {
                unit_id,
                reason: SelectionReason::SameDirection,
            }))
            .or(backup.map(|unit_id| Selection {
                unit_id,
                reason: SelectionReason::IdleBackup,
            }))
    }
}

/// A pending floor the requesting car can take without reversing.
fn reachable(direction: Option<Direction>, requesting_floor: u8, floor: u8) -> bool {
    match direction {
        None => true,
        Some(Direction::Up) => floor >= requesting_floor,
        Some(Direction::Down) => floor <= requesting_floor,
    }
}

fn pick_anchor(
    ctx: &DispatchContext<'_>,
    entries: &BTreeMap<u8, Demand>,
    requesting_floor: u8,
    unit: &ElevatorUnit,
    farthest: bool,
    avoid_conflicts: bool,
) -> Option<u8> {
    let unit_direction = unit.direction();
    let mut best: Option<(u8, u8)> = None;
    for &floor in entries.keys() {
        if !reachable(unit_direction, requesting_floor, floor) {
            continue;
        }
        if avoid_conflicts && callbox_conflict(ctx, unit, floor) {
            continue;
        }
        let distance = floor.abs_diff(requesting_floor);
        let better = match best {
            None => true,
            Some((_, best_distance)) => {
                if farthest {
                    distance > best_distance
                } else {
                    distance < best_distance
                }
            }
        };
        if better {
            best = Some((floor, distance));
        }
    }
    best.map(|(floor, _)| floor)
}

/// K in "up to K entries": the mean queue length of the other cars, floored
/// like the reference's integer mean; no bound while the fleet is quiet.
fn mean_queue_cap(ctx: &DispatchContext<'_>, unit: &ElevatorUnit) -> Option<usize> {
    let mean = ctx.fleet.mean_queue_len_excluding(unit.id());
    if mean >= 1.0 {
        Some(mean.floor() as usize)
    } else {
        None
    }
}

/// The anchor plus every deliverable entry between the requesting floor and
/// the anchor, in travel order, capped at `cap` entries in total.
fn collect_toward_anchor(
    ctx: &DispatchContext<'_>,
    entries: &BTreeMap<u8, Demand>,
    requesting_floor: u8,
    anchor: u8,
    unit: &ElevatorUnit,
    cap: Option<usize>,
    avoid_conflicts: bool,
) -> Vec<(u8, Direction)> {
    let anchor_demand = match entries.get(&anchor) {
        Some(&demand) => demand,
        None => unreachable!("anchor floor {anchor} vanished from the backlog"),
    };
    let travel = match Direction::of_travel(requesting_floor, anchor) {
        Some(direction) => direction,
        None => anchor_demand.effective_direction(),
    };
    let anchor_direction = if anchor_demand.covers(travel) {
        travel
    } else {
        anchor_demand.effective_direction()
    };
    let mut picks = vec![(anchor, anchor_direction)];

    let between: Vec<(u8, Demand)> = match travel {
        Direction::Up => entries
            .range((Bound::Included(requesting_floor), Bound::Excluded(anchor)))
            .map(|(&floor, &demand)| (floor, demand))
            .collect(),
        Direction::Down => entries
            .range((Bound::Excluded(anchor), Bound::Included(requesting_floor)))
            .rev()
            .map(|(&floor, &demand)| (floor, demand))
            .collect(),
    };

    for (floor, demand) in between {
        if let Some(cap) = cap {
            if picks.len() >= cap {
                break;
            }
        }
        if !demand.covers(travel) {
            continue;
        }
        if avoid_conflicts && callbox_conflict(ctx, unit, floor) {
            continue;
        }
        picks.push((floor, travel));
    }
    picks
}

/// Basic reconciliation: aim at the farthest reachable pending floor so a
/// single trip sweeps as much of the backlog as possible.
pub struct FarthestAnchorReconciler;

impl BacklogReconciler for FarthestAnchorReconciler {
    fn name(&self) -> &'static str {
        "farthest-anchor"
    }

    fn select(
        &self,
        ctx: &DispatchContext<'_>,
        entries: &BTreeMap<u8, Demand>,
        requesting_floor: u8,
        unit: &ElevatorUnit,
    ) -> Vec<(u8, Direction)> {
        let anchor = match pick_anchor(ctx, entries, requesting_floor, unit, true, false) {
            Some(anchor) => anchor,
            None => return Vec::new(),
        };
        let cap = mean_queue_cap(ctx, unit);
        collect_toward_anchor(ctx, entries, requesting_floor, anchor, unit, cap, false)
    }
}

/// Load-balanced reconciliation: aim at the nearest reachable pending
/// floor, leave conflicted floors for a better-aligned car, and never
/// monopolize the backlog.
pub struct NearestAnchorReconciler;

impl BacklogReconciler for NearestAnchorReconciler {
    fn name(&self) -> &'static str {
        "nearest-anchor"
    }

    fn select(
        &self,
        ctx: &DispatchContext<'_>,
        entries: &BTreeMap<u8, Demand>,
        requesting_floor: u8,
        unit: &ElevatorUnit,
    ) -> Vec<(u8, Direction)> {
        let anchor = match pick_anchor(ctx, entries, requesting_floor, unit, false, true) {
            Some(anchor) => anchor,
            None => return Vec::new(),
        };
        let cap = mean_queue_cap(ctx, unit);
        collect_toward_anchor(ctx, entries, requesting_floor, anchor, unit, cap, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shared_resources::config::BuildingConfig;

    fn fixture(num_units: u8, home_floors: Vec<u8>) -> (Fleet, Building) {
        let config = BuildingConfig {
            num_floors: 10,
            num_units,
            home_floors,
            unit_capacity: 4,
        };
        (Fleet::new(&config), Building::new(10))
    }

    #[test]
    fn basic_pick_prefers_the_stationed_car() {
        let (fleet, building) = fixture(2, vec![3, 7]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let selection = BasicSelection.pick(&ctx, 7, Direction::Down).unwrap();
        assert_eq!(selection.unit_id, 2);
        assert_eq!(selection.reason, SelectionReason::AlreadyAtFloor);
    }

    #[test]
    fn basic_pick_falls_back_to_the_lowest_idle_id() {
        let (fleet, building) = fixture(2, vec![1, 5]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let selection = BasicSelection.pick(&ctx, 3, Direction::Up).unwrap();
        assert_eq!(selection.unit_id, 1);
        assert_eq!(selection.reason, SelectionReason::IdleBackup);
    }

    #[test]
    fn moving_car_beats_idle_backup() {
        let (fleet, building) = fixture(2, vec![1, 5]);
        // unit 2 heads up from floor 5
        fleet.unit(2).unwrap().add_destination(9).unwrap();
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let selection = BasicSelection.pick(&ctx, 7, Direction::Up).unwrap();
        assert_eq!(selection.unit_id, 2);
        assert_eq!(selection.reason, SelectionReason::SameDirection);
    }

    #[test]
    fn no_candidate_for_an_unreachable_call() {
        let (fleet, building) = fixture(1, vec![8]);
        fleet.unit(1).unwrap().add_destination(2).unwrap(); // heading down
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        assert!(BasicSelection.pick(&ctx, 5, Direction::Up).is_none());
    }

    #[test]
    fn load_balanced_skips_a_conflicted_candidate() {
        let (fleet, building) = fixture(2, vec![2, 2]);
        for id in [1, 2] {
            fleet.unit(id).unwrap().add_destination(6).unwrap();
            fleet.unit(id).unwrap().add_destination(9).unwrap();
        }
        // floor 6 rings downward while both cars head up: conflicted
        building
            .floor(6)
            .unwrap()
            .callbox()
            .set_lamp(Direction::Down, true);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        assert!(LoadBalancedSelection.pick(&ctx, 6, Direction::Up).is_none());

        building
            .floor(6)
            .unwrap()
            .callbox()
            .set_lamp(Direction::Down, false);
        let selection = LoadBalancedSelection.pick(&ctx, 6, Direction::Up).unwrap();
        assert_eq!(selection.unit_id, 1);
        assert_eq!(selection.reason, SelectionReason::UnderMeanSameDirection);
    }

    #[test]
    fn farthest_anchor_sweeps_the_whole_stretch() {
        let (fleet, building) = fixture(1, vec![1]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let mut entries = BTreeMap::new();
        entries.insert(3, Demand::Up);
        entries.insert(6, Demand::Down);
        entries.insert(9, Demand::Up);

        let picks =
            FarthestAnchorReconciler.select(&ctx, &entries, 1, fleet.unit(1).unwrap());
        // anchor 9 first, then the up-demand entries between 1 and 9
        assert_eq!(picks, vec![(9, Direction::Up), (3, Direction::Up)]);
    }

    #[test]
    fn nearest_anchor_stays_close() {
        let (fleet, building) = fixture(1, vec![5]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let mut entries = BTreeMap::new();
        entries.insert(2, Demand::Down);
        entries.insert(6, Demand::Up);
        entries.insert(9, Demand::Up);

        let picks = NearestAnchorReconciler.select(&ctx, &entries, 5, fleet.unit(1).unwrap());
        assert_eq!(picks[0], (6, Direction::Up));
    }

    #[test]
    fn idle_requester_reaches_a_downward_anchor() {
        let (fleet, building) = fixture(1, vec![8]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let mut entries = BTreeMap::new();
        entries.insert(2, Demand::Down);
        entries.insert(5, Demand::Down);
        entries.insert(7, Demand::Up);

        let picks =
            FarthestAnchorReconciler.select(&ctx, &entries, 8, fleet.unit(1).unwrap());
        // anchor 2, then down-demand entries walked from 8 toward 2
        assert_eq!(picks, vec![(2, Direction::Down), (5, Direction::Down)]);
    }

    #[test]
    fn directional_requester_ignores_floors_behind_it() {
        let (fleet, building) = fixture(1, vec![4]);
        fleet.unit(1).unwrap().add_destination(9).unwrap(); // heading up
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let mut entries = BTreeMap::new();
        entries.insert(2, Demand::Up);
        entries.insert(6, Demand::Up);

        let picks =
            FarthestAnchorReconciler.select(&ctx, &entries, 4, fleet.unit(1).unwrap());
        assert_eq!(picks, vec![(6, Direction::Up)]);
    }

    #[test]
    fn both_demand_is_consumed_along_the_travel_direction() {
        let (fleet, building) = fixture(1, vec![2]);
        let ctx = DispatchContext {
            fleet: &fleet,
            building: &building,
        };
        let mut entries = BTreeMap::new();
        entries.insert(4, Demand::Both);

        let picks =
            FarthestAnchorReconciler.select(&ctx, &entries, 2, fleet.unit(1).unwrap());
        assert_eq!(picks, vec![(4, Direction::Up)]);
    }
}
