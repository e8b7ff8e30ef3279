use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    Polling,
    Completed,
    Failed,
}
