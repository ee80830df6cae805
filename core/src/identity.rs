use serde::{Deserialize, Serialize};

use crate::flags::RuntimeOptions;
use crate::project_id::ProjectId;

/// What is currently shown: which project, and in which page mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationIdentity {
    pub project_id: ProjectId,
    pub is_player_only: bool,
    pub is_full_screen: bool,
}

impl ApplicationIdentity {
    pub fn new(project_id: ProjectId, is_player_only: bool, is_full_screen: bool) -> Self {
        Self {
            project_id,
            is_player_only,
            is_full_screen,
        }
    }
}

/// The part of the store the address synchronization reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellState {
    pub identity: ApplicationIdentity,
    pub options: RuntimeOptions,
    pub username: String,
    pub project_changed: bool,
}
