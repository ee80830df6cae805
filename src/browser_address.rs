use wasm_bindgen::JsValue;

use player_shell_core::{Address, AddressPort, HistoryMode};

/// `window.location` for reads, `window.history` for writes.
pub(crate) struct BrowserAddress;

impl AddressPort for BrowserAddress {
    fn current(&self) -> Address {
        let Some(window) = web_sys::window() else {
            return Address::default();
        };
        let location = window.location();
        let hash = location.hash().unwrap_or_default();
        Address::new(
            &location.pathname().unwrap_or_default(),
            &location.search().unwrap_or_default(),
            if hash == "#" { "" } else { &hash },
        )
    }

    fn protocol(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().protocol().ok())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn write(&self, href: &str, mode: HistoryMode) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            gloo::console::warn!("history unavailable, address not written");
            return;
        };
        let result = match mode {
            HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(href)),
            HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(href)),
        };
        if result.is_err() {
            gloo::console::warn!("history write rejected", href);
        }
    }
}
