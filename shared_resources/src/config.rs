use std::env;
use std::fs;
use std::time::Duration;

use crate::error::{SimError, SimResult};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ConfigFile {
    pub building: BuildingSection,
    pub timing: TimingSection,
    pub traffic: TrafficSection,
    pub heuristics: Vec<String>,
    #[serde(default)]
    pub live_monitor: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct BuildingSection {
    pub num_floors: u8,
    pub num_units: u8,
    pub home_floors: Vec<u8>,
    pub unit_capacity: usize,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct TimingSection {
    pub floor_travel_ms: u64,
    pub door_open_ms: u64,
    pub idle_timeout_ms: u64,
    pub drain_poll_ms: u64,
    pub time_scale: u64,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct TrafficSection {
    pub duration_ms: u64,
    pub spawn_interval_ms: u64,
    pub passengers_per_interval: u32,
    pub start_weights: Vec<u32>,
    pub destination_weights: Vec<u32>,
    pub seed: u64,
}

/// Which selection/reconciliation heuristic pair the controller uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    Basic,
    LoadBalanced,
}

impl HeuristicKind {
    pub fn from_name(name: &str) -> SimResult<HeuristicKind> {
        match name {
            "basic" => Ok(HeuristicKind::Basic),
            "load_balanced" => Ok(HeuristicKind::LoadBalanced),
            _ => Err(SimError::Config(format!(
                "unknown heuristic variant: {name}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeuristicKind::Basic => "basic",
            HeuristicKind::LoadBalanced => "load_balanced",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildingConfig {
    pub num_floors: u8,
    pub num_units: u8,
    pub home_floors: Vec<u8>,
    pub unit_capacity: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    pub floor_travel_ms: u64,
    pub door_open_ms: u64,
    pub idle_timeout_ms: u64,
    pub drain_poll_ms: u64,
    pub time_scale: u64,
}

impl TimingConfig {
    pub fn scaled(&self, ms: u64) -> Duration {
        Duration::from_millis(ms / self.time_scale.max(1))
    }

    pub fn floor_travel(&self) -> Duration {
        self.scaled(self.floor_travel_ms)
    }

    pub fn door_open(&self) -> Duration {
        self.scaled(self.door_open_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        self.scaled(self.idle_timeout_ms)
    }

    pub fn drain_poll(&self) -> Duration {
        self.scaled(self.drain_poll_ms)
    }
}

#[derive(Debug, Clone)]
pub struct TrafficConfig {
    pub duration_ms: u64,
    pub spawn_interval_ms: u64,
    pub passengers_per_interval: u32,
    pub start_weights: Vec<u32>,
    pub destination_weights: Vec<u32>,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub building: BuildingConfig,
    pub timing: TimingConfig,
    pub traffic: TrafficConfig,
    pub heuristics: Vec<HeuristicKind>,
    pub live_monitor: bool,
}

impl SimulatorConfig {
    pub fn get() -> SimResult<SimulatorConfig> {
        let args = parse_env_args();
        let file = read_config_file(args.config_path.as_deref())?;
        let mut config = SimulatorConfig::from_file(file)?;
        if let Some(name) = args.heuristic {
            config.heuristics = vec![HeuristicKind::from_name(&name)?];
        }
        Ok(config)
    }

    pub fn from_file(file: ConfigFile) -> SimResult<SimulatorConfig> {
        let building = file.building;
        if building.num_floors < 2 {
            return Err(SimError::Config(format!(
                "a building needs at least 2 floors, got {}",
                building.num_floors
            )));
        }
        if building.num_units == 0 {
            return Err(SimError::Config(String::from(
                "a fleet needs at least one unit",
            )));
        }
        if building.home_floors.len() != building.num_units as usize {
            return Err(SimError::Config(format!(
                "expected {} home floors, got {}",
                building.num_units,
                building.home_floors.len()
            )));
        }
        for &home in &building.home_floors {
            if home < 1 || home > building.num_floors {
                return Err(SimError::InvalidFloor {
                    floor: home,
                    num_floors: building.num_floors,
                });
            }
        }
        if building.unit_capacity == 0 {
            return Err(SimError::Config(String::from(
                "unit capacity must be at least 1",
            )));
        }

        if file.timing.time_scale == 0 {
            return Err(SimError::Config(String::from(
                "time scale factor must be at least 1",
            )));
        }

        let traffic = file.traffic;
        for (name, weights) in [
            ("start_weights", &traffic.start_weights),
            ("destination_weights", &traffic.destination_weights),
        ] {
            if weights.len() != building.num_floors as usize {
                return Err(SimError::Config(format!(
                    "{} must list one weight per floor ({}), got {}",
                    name,
                    building.num_floors,
                    weights.len()
                )));
            }
            if weights.iter().all(|&w| w == 0) {
                return Err(SimError::Config(format!("{name} sum to zero")));
            }
        }
        // destination rerolls must always be able to land somewhere else
        if traffic
            .destination_weights
            .iter()
            .filter(|&&weight| weight > 0)
            .count()
            < 2
        {
            return Err(SimError::Config(String::from(
                "destination_weights must allow at least two distinct floors",
            )));
        }

        if file.heuristics.is_empty() {
            return Err(SimError::Config(String::from(
                "at least one heuristic variant must be configured",
            )));
        }
        let heuristics = file
            .heuristics
            .iter()
            .map(|name| HeuristicKind::from_name(name))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(SimulatorConfig {
            building: BuildingConfig {
                num_floors: building.num_floors,
                num_units: building.num_units,
                home_floors: building.home_floors,
                unit_capacity: building.unit_capacity,
            },
            timing: TimingConfig {
                floor_travel_ms: file.timing.floor_travel_ms,
                door_open_ms: file.timing.door_open_ms,
                idle_timeout_ms: file.timing.idle_timeout_ms,
                drain_poll_ms: file.timing.drain_poll_ms,
                time_scale: file.timing.time_scale,
            },
            traffic: TrafficConfig {
                duration_ms: traffic.duration_ms,
                spawn_interval_ms: traffic.spawn_interval_ms,
                passengers_per_interval: traffic.passengers_per_interval,
                start_weights: traffic.start_weights,
                destination_weights: traffic.destination_weights,
                seed: traffic.seed,
            },
            heuristics,
            live_monitor: file.live_monitor,
        })
    }
}

fn read_config_file(path: Option<&str>) -> SimResult<ConfigFile> {
    let file_path = path.unwrap_or("config.json");
    let fallback_file_path = "_config.json";
    let config_contents = match fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(_) if path.is_none() => {
            println!("No configuration file provided, using default settings...");
            fs::read_to_string(fallback_file_path).map_err(|err| {
                SimError::Config(format!("cannot read {fallback_file_path}: {err}"))
            })?
        }
        Err(err) => {
            return Err(SimError::Config(format!("cannot read {file_path}: {err}")));
        }
    };
    serde_json::from_str(&config_contents)
        .map_err(|err| SimError::Config(format!("malformed configuration: {err}")))
}

struct EnvArgs {
    config_path: Option<String>,
    heuristic: Option<String>,
}

fn parse_env_args() -> EnvArgs {
    let mut parsed = EnvArgs {
        config_path: None,
        heuristic: None,
    };

    let args: Vec<String> = env::args().collect();
    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--config" => {
                parsed.config_path = Some(arg_pair[1].clone());
            }
            "--heuristic" => {
                parsed.heuristic = Some(arg_pair[1].clone());
            }
            _ => (),
        }
    }
    parsed
}
