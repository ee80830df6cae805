//! Mounts the address synchronization on the page: builds the controller
//! over the browser ports, wires the shell store and the window history
//! events to it, and starts the `project_url` fetch if one was requested.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen_futures::spawn_local;

use player_shell_core::{ShellHooks, StateSync, SyncPorts};

use crate::app_config;
use crate::browser_address::BrowserAddress;
use crate::dialogs::BrowserDialogs;
use crate::local_storage::LocalStorage;
use crate::project_fetch::HttpProjectFetcher;
use crate::shell_store::{self, update_shell_state};
use crate::vm_bridge::VmBridge;

const PAGE_ATTRIBUTE: &str = "page";
const LOADING_ATTRIBUTE: &str = "projectLoading";

struct MountedShell {
    sync: Rc<StateSync>,
    listener_id: u64,
    _hashchange: EventListener,
    _popstate: EventListener,
}

thread_local! {
    static MOUNTED: RefCell<Option<MountedShell>> = RefCell::new(None);
}

/// Which page the host document was served as, from `<body data-page>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageKind {
    Player,
    Editor,
    Fullscreen,
}

impl PageKind {
    pub(crate) fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("editor") => Self::Editor,
            Some("fullscreen") => Self::Fullscreen,
            _ => Self::Player,
        }
    }

    fn is_player_only(self) -> bool {
        self != Self::Editor
    }

    fn is_full_screen(self) -> bool {
        self == Self::Fullscreen
    }
}

fn body_dataset() -> Option<web_sys::DomStringMap> {
    let body = web_sys::window()?.document()?.body()?;
    Some(body.dataset())
}

fn page_kind() -> PageKind {
    let value = body_dataset().and_then(|dataset| dataset.get(PAGE_ATTRIBUTE));
    PageKind::from_attribute(value.as_deref())
}

fn set_project_loading(loading: bool) {
    let Some(dataset) = body_dataset() else {
        return;
    };
    if loading {
        let _ = dataset.set(LOADING_ATTRIBUTE, "true");
    } else {
        dataset.delete(LOADING_ATTRIBUTE);
    }
}

fn store_hooks() -> ShellHooks {
    ShellHooks {
        on_set_username: Rc::new(|username| {
            update_shell_state(|state| state.username = username);
        }),
        on_set_project_id: Rc::new(|project_id| {
            update_shell_state(|state| state.identity.project_id = project_id);
        }),
        on_set_player_only: Rc::new(|is_player_only| {
            update_shell_state(|state| state.identity.is_player_only = is_player_only);
        }),
        on_set_full_screen: Rc::new(|is_full_screen| {
            update_shell_state(|state| state.identity.is_full_screen = is_full_screen);
        }),
        on_project_fetch_started: Rc::new(|| {
            gloo::console::log!("project fetch: loading");
            set_project_loading(true);
        }),
        on_project_fetch_finished: Rc::new(|| {
            gloo::console::log!("project fetch: finished");
            set_project_loading(false);
        }),
    }
}

pub(crate) fn mount() {
    if MOUNTED.with(|slot| slot.borrow().is_some()) {
        return;
    }
    let Some(window) = web_sys::window() else {
        gloo::console::error!("player shell: no window");
        return;
    };

    let page = page_kind();
    update_shell_state(|state| {
        state.identity.is_player_only = page.is_player_only();
        state.identity.is_full_screen = page.is_full_screen();
    });

    let sync = Rc::new(StateSync::new(
        app_config::shell_config(),
        SyncPorts {
            address: Rc::new(BrowserAddress),
            engine: Rc::new(VmBridge),
            dialogs: Rc::new(BrowserDialogs),
            storage: Rc::new(LocalStorage),
            hooks: store_hooks(),
        },
    ));

    let listener_id = {
        let sync = sync.clone();
        shell_store::add_state_listener(Rc::new(move |old, new| sync.on_state_changed(old, new)))
    };
    let hashchange = {
        let sync = sync.clone();
        EventListener::new(&window, "hashchange", move |_event| sync.handle_address_changed())
    };
    let popstate = {
        let sync = sync.clone();
        EventListener::new(&window, "popstate", move |_event| sync.handle_navigated())
    };

    MOUNTED.with(|slot| {
        *slot.borrow_mut() = Some(MountedShell {
            sync: sync.clone(),
            listener_id,
            _hashchange: hashchange,
            _popstate: popstate,
        });
    });

    match sync.start(&shell_store::shell_state()) {
        Ok(Some(project)) => {
            spawn_local(async move {
                sync.load_remote_project(project, &HttpProjectFetcher).await;
            });
        }
        Ok(None) => {}
        Err(err) => {
            gloo::console::error!("player shell: routing failed", err.to_string());
        }
    }
}

pub(crate) fn unmount() {
    let Some(mounted) = MOUNTED.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    mounted.sync.stop();
    shell_store::remove_state_listener(mounted.listener_id);
}

pub(crate) fn is_mounted() -> bool {
    MOUNTED.with(|slot| slot.borrow().is_some())
}
