//! Functions the surrounding JS application calls into.

use wasm_bindgen::prelude::*;

use player_shell_core::{ProjectId, ProjectVisit, RuntimeOptions};

use crate::app_config;
use crate::shell_runtime;
use crate::shell_store::{shell_state, update_shell_state};

fn parse_project_id(project_id: &str) -> Result<ProjectId, JsValue> {
    ProjectId::parse(project_id).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Current shell state as JSON (`identity`, `options`, `username`,
/// `projectChanged`).
#[wasm_bindgen]
pub fn shell_state_json() -> Result<String, JsValue> {
    serde_json::to_string(&shell_state()).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Replaces the run-time options reported by the VM.
/// Missing fields take their defaults.
#[wasm_bindgen]
pub fn set_runtime_options_json(json: &str) -> Result<(), JsValue> {
    let options: RuntimeOptions =
        serde_json::from_str(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
    update_shell_state(|state| state.options = options);
    Ok(())
}

#[wasm_bindgen]
pub fn set_username(username: String) {
    update_shell_state(|state| state.username = username);
}

#[wasm_bindgen]
pub fn set_project_changed(changed: bool) {
    update_shell_state(|state| state.project_changed = changed);
}

#[wasm_bindgen]
pub fn set_project_id(project_id: &str) -> Result<(), JsValue> {
    let project_id = parse_project_id(project_id)?;
    update_shell_state(|state| state.identity.project_id = project_id);
    Ok(())
}

#[wasm_bindgen]
pub fn set_player_only(is_player_only: bool) {
    update_shell_state(|state| state.identity.is_player_only = is_player_only);
}

#[wasm_bindgen]
pub fn set_full_screen(is_full_screen: bool) {
    update_shell_state(|state| state.identity.is_full_screen = is_full_screen);
}

/// Opens another project: a full page load on wildcard deployments, a store
/// update otherwise.
#[wasm_bindgen]
pub fn visit_project(project_id: &str) -> Result<(), JsValue> {
    let project_id = parse_project_id(project_id)?;
    match player_shell_core::visit_project(&app_config::shell_config(), project_id) {
        ProjectVisit::Navigate(href) => {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            window.location().set_href(&href)
        }
        ProjectVisit::SetProjectId(project_id) => {
            update_shell_state(|state| state.identity.project_id = project_id);
            Ok(())
        }
    }
}

#[wasm_bindgen]
pub fn addons_url() -> String {
    player_shell_core::addons_url(&app_config::shell_config())
}

/// HTML shown on the player home page, if the deployment set one.
#[wasm_bindgen]
pub fn announcement() -> Option<String> {
    app_config::shell_config().announcement
}

#[wasm_bindgen]
pub fn mounted() -> bool {
    shell_runtime::is_mounted()
}

#[wasm_bindgen]
pub fn unmount() {
    shell_runtime::unmount();
}
