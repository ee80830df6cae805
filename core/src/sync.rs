//! Keeps the page address and the store in agreement.
//!
//! The host calls [`StateSync::start`] once, forwards `hashchange` and
//! `popstate` to [`StateSync::handle_address_changed`] and
//! [`StateSync::handle_navigated`], reports every store update through
//! [`StateSync::on_state_changed`], and calls [`StateSync::stop`] on teardown.
//! All methods take `&self` so store updates triggered from inside a handler
//! can re-enter the controller. Identity changes made while a router handler
//! runs are collected and turned into at most one history entry once the
//! handler returns.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use crate::address::{AddressPort, HistoryMode};
use crate::config::ShellConfig;
use crate::error::{ParameterError, ProjectFetchError, RouterError};
use crate::flags::{encode_runtime_flags, parse_runtime_flags};
use crate::identity::ShellState;
use crate::ports::{CompilerOptionsPatch, Dialogs, Engine, KeyValueStore, ProjectFetcher, ShellHooks};
use crate::project_id::ProjectId;
use crate::router::{create_router, AddressRewrite, IdentityCallbacks, Router};
use crate::username::{random_username, store_username, stored_username};

pub const SWITCH_PROJECT_PROMPT: &str = "Are you sure you want to switch project?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    Mounted,
    Unmounted,
}

/// A project requested through `project_url`; drive it with
/// [`StateSync::load_remote_project`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteProject {
    url: String,
}

impl RemoteProject {
    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct SyncPorts {
    pub address: Rc<dyn AddressPort>,
    pub engine: Rc<dyn Engine>,
    pub dialogs: Rc<dyn Dialogs>,
    pub storage: Rc<dyn KeyValueStore>,
    pub hooks: ShellHooks,
}

pub struct StateSync {
    config: ShellConfig,
    address: Rc<dyn AddressPort>,
    engine: Rc<dyn Engine>,
    dialogs: Rc<dyn Dialogs>,
    storage: Rc<dyn KeyValueStore>,
    hooks: ShellHooks,
    phase: Cell<SyncPhase>,
    router: OnceCell<Router>,
    latest: RefCell<ShellState>,
    url_username: RefCell<Option<String>>,
    routing: Cell<bool>,
    identity_dirty: Cell<bool>,
}

impl StateSync {
    pub fn new(config: ShellConfig, ports: SyncPorts) -> Self {
        Self {
            config,
            address: ports.address,
            engine: ports.engine,
            dialogs: ports.dialogs,
            storage: ports.storage,
            hooks: ports.hooks,
            phase: Cell::new(SyncPhase::Uninitialized),
            router: OnceCell::new(),
            latest: RefCell::new(ShellState::default()),
            url_username: RefCell::new(None),
            routing: Cell::new(false),
            identity_dirty: Cell::new(false),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    pub fn router(&self) -> Option<&Router> {
        self.router.get()
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Installs the router, applies the query-string options to the engine
    /// and derives the initial identity from the address. Returns the
    /// project to fetch when `project_url` was given.
    ///
    /// The router is built and the phase set to [`SyncPhase::Mounted`]
    /// before the query flags run. Building the router has no side effects,
    /// and being mounted already means the username set from the flags is
    /// persisted like any later change. A routing error therefore surfaces
    /// before any flag reaches the engine.
    pub fn start(&self, initial: &ShellState) -> Result<Option<RemoteProject>, RouterError> {
        if self.phase.get() != SyncPhase::Uninitialized {
            return Ok(None);
        }
        *self.latest.borrow_mut() = initial.clone();

        let address = self.address.current();
        let env = self
            .config
            .routing_environment(&self.address.protocol(), &address.path);
        let router = create_router(&self.config.routing_style, &env)?;
        let _ = self.router.set(router);
        self.phase.set(SyncPhase::Mounted);

        let remote = self.apply_query_flags(&address.search);
        self.handle_address_changed();
        Ok(remote)
    }

    pub fn stop(&self) {
        self.phase.set(SyncPhase::Unmounted);
    }

    pub fn handle_address_changed(&self) {
        if self.phase.get() != SyncPhase::Mounted {
            return;
        }
        let Some(router) = self.router.get() else {
            return;
        };
        let address = self.address.current();
        self.routing.set(true);
        let rewrite = router.on_address_changed(&address, self);
        self.routing.set(false);
        if rewrite == AddressRewrite::StripFragment {
            let current = self.address.current();
            if !current.hash.is_empty() {
                self.write_address(&current.href_without_hash(), HistoryMode::Replace);
            }
        }
        self.flush_identity();
    }

    pub fn handle_navigated(&self) {
        if self.phase.get() != SyncPhase::Mounted {
            return;
        }
        let Some(router) = self.router.get() else {
            return;
        };
        let address = self.address.current();
        self.routing.set(true);
        router.on_navigated(&address, self);
        self.routing.set(false);
        self.flush_identity();
    }

    /// Reacts to a store update. Identity changes push a history entry;
    /// option changes rewrite the query of the current entry.
    pub fn on_state_changed(&self, old: &ShellState, new: &ShellState) {
        *self.latest.borrow_mut() = new.clone();
        if self.phase.get() != SyncPhase::Mounted {
            return;
        }

        if new.username != old.username
            && self.url_username.borrow().as_deref() != Some(new.username.as_str())
        {
            store_username(self.storage.as_ref(), &new.username);
        }

        if new.identity != old.identity {
            if self.routing.get() {
                self.identity_dirty.set(true);
            } else {
                self.push_identity(new);
            }
        }

        if new.options != old.options {
            let current = self.address.current();
            let search =
                encode_runtime_flags(&current.search, &new.options, new.identity.is_player_only);
            if search != current.search {
                let href = format!("{}{search}{}", current.path, current.hash);
                self.write_address(&href, HistoryMode::Replace);
            }
        }
    }

    /// Fetches and loads a `project_url` project. Fetch-finished is only
    /// signalled on success.
    pub async fn load_remote_project(&self, project: RemoteProject, fetcher: &dyn ProjectFetcher) {
        match self.fetch_and_load(project.url(), fetcher).await {
            Ok(()) => {
                (self.hooks.on_project_fetch_finished)();
                self.engine.redraw();
            }
            Err(err) => {
                log::warn!("project fetch failed: {} ({err})", project.url());
                self.dialogs.alert(&format!("cannot load project: {err}"));
            }
        }
    }

    async fn fetch_and_load(
        &self,
        url: &str,
        fetcher: &dyn ProjectFetcher,
    ) -> Result<(), ProjectFetchError> {
        let response = fetcher
            .fetch(url)
            .await
            .map_err(ProjectFetchError::Transport)?;
        if response.status != 200 {
            return Err(ProjectFetchError::Status(response.status));
        }
        self.engine
            .load_project(response.body)
            .await
            .map_err(ProjectFetchError::Load)
    }

    fn apply_query_flags(&self, search: &str) -> Option<RemoteProject> {
        let flags = parse_runtime_flags(search);

        if flags.is_invalid(ParameterError::Framerate) {
            self.alert_invalid(ParameterError::Framerate);
        } else if let Some(framerate) = flags.framerate {
            self.engine.set_framerate(framerate);
        }

        let username = match flags.username.as_ref() {
            Some(username) => {
                *self.url_username.borrow_mut() = Some(username.clone());
                username.clone()
            }
            None => stored_username(self.storage.as_ref())
                .unwrap_or_else(|| random_username(&mut rand::thread_rng())),
        };
        (self.hooks.on_set_username)(username);

        if flags.high_quality_pen {
            self.engine.set_high_quality_pen(true);
        }
        if flags.turbo {
            self.engine.set_turbo_mode(true);
        }
        if flags.warp_timer {
            self.engine.set_compiler_options(CompilerOptionsPatch {
                warp_timer: Some(true),
                ..CompilerOptionsPatch::default()
            });
        }
        if flags.compiler_disabled {
            self.engine.set_compiler_options(CompilerOptionsPatch {
                enabled: Some(false),
                ..CompilerOptionsPatch::default()
            });
        }

        if flags.is_invalid(ParameterError::MaxClones) {
            self.alert_invalid(ParameterError::MaxClones);
        } else if let Some(max_clones) = flags.max_clones {
            self.engine.set_max_clones(max_clones);
        }

        let url = flags.project_url?;
        (self.hooks.on_project_fetch_started)();
        Some(RemoteProject { url })
    }

    fn flush_identity(&self) {
        if self.identity_dirty.replace(false) {
            let latest = self.latest.borrow().clone();
            self.push_identity(&latest);
        }
    }

    fn push_identity(&self, state: &ShellState) {
        let Some(router) = self.router.get() else {
            return;
        };
        let current = self.address.current();
        if let Some(href) = router.generate_address(&state.identity, &current) {
            if href != current.href() {
                self.write_address(&href, HistoryMode::Push);
            }
        }
    }

    fn alert_invalid(&self, error: ParameterError) {
        log::warn!("ignoring invalid {} parameter", error.parameter());
        self.dialogs.alert(&error.to_string());
    }

    fn write_address(&self, href: &str, mode: HistoryMode) {
        log::debug!("address {mode:?}: {href}");
        self.address.write(href, mode);
    }
}

impl IdentityCallbacks for StateSync {
    fn set_project_id(&self, project_id: &ProjectId) -> bool {
        let (current, project_changed) = {
            let latest = self.latest.borrow();
            (latest.identity.project_id.clone(), latest.project_changed)
        };
        if *project_id == current {
            return true;
        }
        if project_changed && !self.dialogs.confirm(SWITCH_PROJECT_PROMPT) {
            return false;
        }
        (self.hooks.on_set_project_id)(project_id.clone());
        true
    }

    fn set_player_only(&self, is_player_only: bool) {
        (self.hooks.on_set_player_only)(is_player_only);
    }

    fn set_full_screen(&self, is_full_screen: bool) {
        (self.hooks.on_set_full_screen)(is_full_screen);
    }
}
