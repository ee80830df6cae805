use player_shell_core::KeyValueStore;

/// `localStorage`, which may be missing or throw (private mode, quota,
/// sandboxed frames). Failures are logged and otherwise ignored.
pub(crate) struct LocalStorage;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = storage() else {
            gloo::console::log!("local storage: unavailable");
            return;
        };
        if storage.set_item(key, value).is_err() {
            gloo::console::log!("local storage: set failed", key);
        }
    }
}
