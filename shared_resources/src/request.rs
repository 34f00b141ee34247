use super::call::Direction;

/// An ephemeral call from a floor's callbox to the dispatch controller.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRequest {
    pub floor: u8,
    pub direction: Direction,
}

impl CallRequest {
    pub fn new(floor: u8, direction: Direction) -> Self {
        CallRequest { floor, direction }
    }
}
