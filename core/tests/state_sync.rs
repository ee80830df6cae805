use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures_util::future::LocalBoxFuture;
use player_shell_core::{
    AddressPort, ApplicationIdentity, CompilerOptionsPatch, Dialogs, Engine, FetchedProject,
    HistoryMode, KeyValueStore, MemoryHistory, ProjectFetcher, ProjectId, RemoteProject,
    RouterStyle, ShellConfig, ShellHooks, ShellState, StateSync, SyncPhase, SyncPorts,
    SWITCH_PROJECT_PROMPT, USERNAME_KEY,
};

#[derive(Default)]
struct FakeEngine {
    calls: RefCell<Vec<String>>,
    load_error: Option<String>,
}

impl FakeEngine {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Engine for FakeEngine {
    fn set_framerate(&self, framerate: u32) {
        self.record(format!("framerate:{framerate}"));
    }

    fn set_turbo_mode(&self, enabled: bool) {
        self.record(format!("turbo:{enabled}"));
    }

    fn set_max_clones(&self, max_clones: u32) {
        self.record(format!("clones:{max_clones}"));
    }

    fn set_compiler_options(&self, patch: CompilerOptionsPatch) {
        if let Some(enabled) = patch.enabled {
            self.record(format!("compiler:{enabled}"));
        }
        if let Some(warp_timer) = patch.warp_timer {
            self.record(format!("warp_timer:{warp_timer}"));
        }
    }

    fn set_high_quality_pen(&self, enabled: bool) {
        self.record(format!("hqpen:{enabled}"));
    }

    fn load_project(&self, bytes: Vec<u8>) -> LocalBoxFuture<'_, Result<(), String>> {
        self.record(format!("load:{}", bytes.len()));
        let result = match &self.load_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }

    fn redraw(&self) {
        self.record("redraw".to_string());
    }
}

struct FakeDialogs {
    alerts: RefCell<Vec<String>>,
    confirms: Cell<usize>,
    answer: Cell<bool>,
}

impl FakeDialogs {
    fn answering(answer: bool) -> Self {
        Self {
            alerts: RefCell::new(Vec::new()),
            confirms: Cell::new(0),
            answer: Cell::new(answer),
        }
    }

    fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Dialogs for FakeDialogs {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        assert_eq!(message, SWITCH_PROJECT_PROMPT);
        self.confirms.set(self.confirms.get() + 1);
        self.answer.get()
    }
}

#[derive(Default)]
struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryStore {
    fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        if self.disabled {
            return None;
        }
        self.value(key)
    }

    fn set(&self, key: &str, value: &str) {
        if self.disabled {
            return;
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

struct FakeFetcher {
    response: Result<FetchedProject, String>,
}

impl ProjectFetcher for FakeFetcher {
    fn fetch<'a>(&'a self, _url: &'a str) -> LocalBoxFuture<'a, Result<FetchedProject, String>> {
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

type Update = Rc<dyn Fn(&dyn Fn(&mut ShellState))>;

struct Harness {
    sync: Rc<StateSync>,
    history: Rc<MemoryHistory>,
    engine: Rc<FakeEngine>,
    dialogs: Rc<FakeDialogs>,
    storage: Rc<MemoryStore>,
    state: Rc<RefCell<ShellState>>,
    events: Rc<RefCell<Vec<&'static str>>>,
    update: Update,
}

struct Setup {
    style: &'static str,
    root: Option<&'static str>,
    href: &'static str,
    initial: ShellState,
    engine: FakeEngine,
    dialogs: FakeDialogs,
    storage: MemoryStore,
}

impl Setup {
    fn new(style: &'static str, href: &'static str) -> Self {
        Self {
            style,
            root: None,
            href,
            initial: ShellState::default(),
            engine: FakeEngine::default(),
            dialogs: FakeDialogs::answering(true),
            storage: MemoryStore::default(),
        }
    }

    fn build(self) -> Harness {
        let state = Rc::new(RefCell::new(self.initial));
        let events = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Weak<StateSync>>> = Rc::new(RefCell::new(Weak::new()));

        let update: Update = {
            let state = state.clone();
            let slot = slot.clone();
            Rc::new(move |apply: &dyn Fn(&mut ShellState)| {
                let (old, new) = {
                    let mut current = state.borrow_mut();
                    let old = current.clone();
                    apply(&mut *current);
                    (old, current.clone())
                };
                if old == new {
                    return;
                }
                let sync = slot.borrow().upgrade();
                if let Some(sync) = sync {
                    sync.on_state_changed(&old, &new);
                }
            })
        };

        let hooks = ShellHooks {
            on_set_username: {
                let update = update.clone();
                Rc::new(move |name: String| update(&|s: &mut ShellState| s.username = name.clone()))
            },
            on_set_project_id: {
                let update = update.clone();
                Rc::new(move |id: ProjectId| {
                    update(&|s: &mut ShellState| s.identity.project_id = id.clone())
                })
            },
            on_set_player_only: {
                let update = update.clone();
                Rc::new(move |value: bool| {
                    update(&|s: &mut ShellState| s.identity.is_player_only = value)
                })
            },
            on_set_full_screen: {
                let update = update.clone();
                Rc::new(move |value: bool| {
                    update(&|s: &mut ShellState| s.identity.is_full_screen = value)
                })
            },
            on_project_fetch_started: {
                let events = events.clone();
                Rc::new(move || events.borrow_mut().push("fetch-started"))
            },
            on_project_fetch_finished: {
                let events = events.clone();
                Rc::new(move || events.borrow_mut().push("fetch-finished"))
            },
        };

        let history = Rc::new(MemoryHistory::new("https:", self.href));
        let engine = Rc::new(self.engine);
        let dialogs = Rc::new(self.dialogs);
        let storage = Rc::new(self.storage);
        let config = ShellConfig::new(Some(self.style), self.root, None);
        let sync = Rc::new(StateSync::new(
            config,
            SyncPorts {
                address: history.clone(),
                engine: engine.clone(),
                dialogs: dialogs.clone(),
                storage: storage.clone(),
                hooks,
            },
        ));
        *slot.borrow_mut() = Rc::downgrade(&sync);

        Harness {
            sync,
            history,
            engine,
            dialogs,
            storage,
            state,
            events,
            update,
        }
    }
}

impl Harness {
    fn start(&self) -> Option<RemoteProject> {
        let initial = self.state();
        self.sync.start(&initial).unwrap()
    }

    fn state(&self) -> ShellState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, apply: impl Fn(&mut ShellState)) {
        (self.update)(&apply);
    }

    fn href(&self) -> String {
        self.history.current().href()
    }
}

fn project(id: &str) -> ProjectId {
    ProjectId::parse(id).unwrap()
}

#[test]
fn start_applies_query_flags_in_order() {
    let harness =
        Setup::new("hash", "/?clones=20&nocompile&stuck&turbo&hqpen&fps=60&username=ada").build();
    assert!(harness.start().is_none());
    assert_eq!(harness.sync.phase(), SyncPhase::Mounted);
    assert_eq!(
        harness.engine.calls(),
        vec![
            "framerate:60",
            "hqpen:true",
            "turbo:true",
            "warp_timer:true",
            "compiler:false",
            "clones:20",
        ]
    );
    assert_eq!(harness.state().username, "ada");
    assert!(harness.dialogs.alerts().is_empty());
}

#[test]
fn invalid_fps_alerts_once_and_skips_framerate() {
    let harness = Setup::new("hash", "/?fps=-5").build();
    harness.start();
    assert_eq!(
        harness.dialogs.alerts(),
        vec!["fps URL parameter is invalid".to_string()]
    );
    assert!(harness
        .engine
        .calls()
        .iter()
        .all(|call| !call.starts_with("framerate")));
}

#[test]
fn invalid_clones_alert_names_the_parameter() {
    let harness = Setup::new("hash", "/?clones=-1&turbo").build();
    harness.start();
    assert_eq!(
        harness.dialogs.alerts(),
        vec!["clone URL parameter is invalid".to_string()]
    );
    assert_eq!(harness.engine.calls(), vec!["turbo:true"]);
}

#[test]
fn url_username_with_invalid_clones() {
    let harness = Setup::new("hash", "/?username=ada&clones=lots").build();
    harness.start();
    assert_eq!(harness.state().username, "ada");
    assert_eq!(
        harness.dialogs.alerts(),
        vec!["clone URL parameter is invalid".to_string()]
    );
}

#[test]
fn url_username_is_not_remembered() {
    let harness = Setup::new("hash", "/?username=guest").build();
    harness.start();
    assert_eq!(harness.state().username, "guest");
    assert_eq!(harness.storage.value(USERNAME_KEY), None);

    harness.dispatch(|s| s.username = "grace".to_string());
    assert_eq!(harness.storage.value(USERNAME_KEY).as_deref(), Some("grace"));
}

#[test]
fn stored_username_is_restored() {
    let mut setup = Setup::new("hash", "/");
    setup.storage = MemoryStore::with(USERNAME_KEY, "linus");
    let harness = setup.build();
    harness.start();
    assert_eq!(harness.state().username, "linus");
}

#[test]
fn random_username_when_nothing_stored() {
    let harness = Setup::new("hash", "/").build();
    harness.start();
    let username = harness.state().username;
    assert!(username.starts_with("player"), "{username}");
    assert_eq!(username.len(), 10);
    assert_eq!(harness.storage.value(USERNAME_KEY), Some(username));
}

#[test]
fn unavailable_storage_is_silent() {
    let mut setup = Setup::new("hash", "/");
    setup.storage = MemoryStore::disabled();
    let harness = setup.build();
    harness.start();
    assert!(harness.state().username.starts_with("player"));
    assert_eq!(harness.storage.value(USERNAME_KEY), None);
}

#[test]
fn initial_fragment_sets_project_without_writes() {
    let harness = Setup::new("hash", "/#42").build();
    harness.start();
    assert_eq!(harness.state().identity.project_id, project("42"));
    assert!(harness.history.writes().is_empty());
}

#[test]
fn identity_change_pushes_and_option_change_replaces() {
    let harness = Setup::new("hash", "/#42").build();
    harness.start();

    harness.dispatch(|s| s.identity.project_id = project("99"));
    assert_eq!(
        harness.history.writes(),
        vec![("/#99".to_string(), HistoryMode::Push)]
    );
    assert_eq!(harness.history.len(), 2);

    harness.dispatch(|s| s.options.turbo = true);
    assert_eq!(harness.href(), "/?turbo#99");
    assert_eq!(harness.history.len(), 2);
    assert_eq!(
        harness.history.writes().last(),
        Some(&("/?turbo#99".to_string(), HistoryMode::Replace))
    );
}

#[test]
fn identity_and_options_on_one_update() {
    let harness = Setup::new("hash", "/").build();
    harness.start();
    harness.dispatch(|s| {
        s.identity.project_id = project("5");
        s.options.framerate = 60;
    });
    assert_eq!(
        harness.history.writes(),
        vec![
            ("/#5".to_string(), HistoryMode::Push),
            ("/?fps=60#5".to_string(), HistoryMode::Replace),
        ]
    );
}

#[test]
fn unchanged_options_do_not_rewrite() {
    let harness = Setup::new("hash", "/?fps=60").build();
    harness.start();
    harness.dispatch(|s| s.options.framerate = 60);
    assert!(harness.history.writes().is_empty());
}

#[test]
fn repeated_address_change_writes_nothing() {
    let harness = Setup::new("hash", "/#8").build();
    harness.start();
    harness.sync.handle_address_changed();
    harness.sync.handle_address_changed();
    assert!(harness.history.writes().is_empty());
    assert_eq!(harness.history.len(), 1);
}

#[test]
fn declined_switch_leaves_everything_untouched() {
    let mut setup = Setup::new("hash", "/#1");
    setup.dialogs = FakeDialogs::answering(false);
    let harness = setup.build();
    harness.start();
    harness.dispatch(|s| s.project_changed = true);

    let before = harness.state();
    harness.history.set_fragment("#77");
    harness.sync.handle_address_changed();

    assert_eq!(harness.dialogs.confirms.get(), 1);
    assert_eq!(harness.state(), before);
    assert_eq!(harness.href(), "/#77");
    assert!(harness.history.writes().is_empty());
}

#[test]
fn accepted_switch_changes_project() {
    let harness = Setup::new("hash", "/#1").build();
    harness.start();
    harness.dispatch(|s| s.project_changed = true);
    harness.history.set_fragment("#77");
    harness.sync.handle_address_changed();
    assert_eq!(harness.dialogs.confirms.get(), 1);
    assert_eq!(harness.state().identity.project_id, project("77"));
    assert!(harness.history.writes().is_empty());
}

#[test]
fn unchanged_project_skips_confirmation() {
    let harness = Setup::new("hash", "/#1").build();
    harness.start();
    harness.dispatch(|s| s.project_changed = true);
    harness.sync.handle_address_changed();
    assert_eq!(harness.dialogs.confirms.get(), 0);
}

#[test]
fn wildcard_fragment_is_migrated_to_path() {
    let mut setup = Setup::new("wildcard", "/42#7");
    setup.root = Some("/");
    setup.initial.identity = ApplicationIdentity::new(ProjectId::default(), true, false);
    let harness = setup.build();
    harness.start();
    assert_eq!(harness.state().identity.project_id, project("7"));
    assert_eq!(
        harness.history.writes(),
        vec![
            ("/42".to_string(), HistoryMode::Replace),
            ("/7".to_string(), HistoryMode::Push),
        ]
    );
}

#[test]
fn wildcard_back_navigation_does_not_push() {
    let mut setup = Setup::new("wildcard", "/42/editor");
    setup.root = Some("/");
    let harness = setup.build();
    harness.start();
    assert_eq!(harness.state().identity.project_id, project("42"));
    assert!(harness.history.writes().is_empty());

    harness.dispatch(|s| {
        s.identity.project_id = project("9");
        s.identity.is_full_screen = true;
    });
    assert_eq!(harness.href(), "/9/fullscreen");

    assert!(harness.history.back());
    harness.sync.handle_navigated();
    let identity = harness.state().identity;
    assert_eq!(identity.project_id, project("42"));
    assert!(!identity.is_full_screen);
    assert!(!identity.is_player_only);
    assert_eq!(harness.history.len(), 2);
    assert_eq!(harness.href(), "/42/editor");
}

#[test]
fn wildcard_declined_navigation_keeps_page_type() {
    let mut setup = Setup::new("wildcard", "/42/editor");
    setup.root = Some("/");
    setup.dialogs = FakeDialogs::answering(false);
    let harness = setup.build();
    harness.start();

    harness.dispatch(|s| {
        s.identity.project_id = project("9");
        s.identity.is_full_screen = true;
    });
    harness.dispatch(|s| s.project_changed = true);
    let before = harness.state();

    assert!(harness.history.back());
    harness.sync.handle_navigated();

    assert_eq!(harness.dialogs.confirms.get(), 1);
    assert_eq!(harness.state(), before);
    assert_eq!(
        harness.history.writes(),
        vec![("/9/fullscreen".to_string(), HistoryMode::Push)]
    );
}

#[test]
fn stop_ignores_later_events() {
    let harness = Setup::new("hash", "/#3").build();
    harness.start();
    harness.sync.stop();
    assert_eq!(harness.sync.phase(), SyncPhase::Unmounted);

    harness.dispatch(|s| s.identity.project_id = project("4"));
    harness.dispatch(|s| s.options.turbo = true);
    harness.history.set_fragment("#12");
    harness.sync.handle_address_changed();
    assert!(harness.history.writes().is_empty());
    assert_eq!(harness.state().identity.project_id, project("4"));
}

#[test]
fn unsupported_style_falls_back_to_hash() {
    let harness = Setup::new("wildcard", "/#6").build();
    harness.start();
    assert_eq!(
        harness.sync.router().map(|router| router.style()),
        Some(RouterStyle::Hash)
    );
    assert_eq!(harness.state().identity.project_id, project("6"));
}

#[test]
fn none_router_never_writes_identity() {
    let harness = Setup::new("none", "/#6").build();
    harness.start();
    harness.dispatch(|s| s.identity.project_id = project("9"));
    assert!(harness.state().identity.project_id == project("9"));
    assert!(harness.history.writes().is_empty());
}

#[tokio::test]
async fn remote_project_loads_and_finishes() {
    let harness = Setup::new("hash", "/?project_url=example.com/p.sb3").build();
    let remote = harness.start().expect("project_url requested");
    assert_eq!(remote.url(), "https://example.com/p.sb3");
    assert_eq!(*harness.events.borrow(), vec!["fetch-started"]);

    let fetcher = FakeFetcher {
        response: Ok(FetchedProject {
            status: 200,
            body: vec![1, 2, 3],
        }),
    };
    harness.sync.load_remote_project(remote, &fetcher).await;
    assert_eq!(*harness.events.borrow(), vec!["fetch-started", "fetch-finished"]);
    assert_eq!(harness.engine.calls(), vec!["load:3", "redraw"]);
    assert!(harness.dialogs.alerts().is_empty());
}

#[tokio::test]
async fn remote_project_bad_status_keeps_loading_state() {
    let harness = Setup::new("hash", "/?project_url=https://example.com/p.sb3").build();
    let remote = harness.start().expect("project_url requested");
    let fetcher = FakeFetcher {
        response: Ok(FetchedProject {
            status: 404,
            body: Vec::new(),
        }),
    };
    harness.sync.load_remote_project(remote, &fetcher).await;
    assert_eq!(*harness.events.borrow(), vec!["fetch-started"]);
    assert_eq!(
        harness.dialogs.alerts(),
        vec!["cannot load project: Unexpected status code: 404".to_string()]
    );
    assert!(harness.engine.calls().is_empty());
}

#[tokio::test]
async fn remote_project_load_failure_alerts() {
    let mut setup = Setup::new("hash", "/?project_url=p.sb3");
    setup.engine = FakeEngine {
        load_error: Some("invalid project".to_string()),
        ..FakeEngine::default()
    };
    let harness = setup.build();
    let remote = harness.start().expect("project_url requested");
    let fetcher = FakeFetcher {
        response: Err("network down".to_string()),
    };
    harness.sync.load_remote_project(remote.clone(), &fetcher).await;
    assert_eq!(
        harness.dialogs.alerts(),
        vec!["cannot load project: network down".to_string()]
    );

    let fetcher = FakeFetcher {
        response: Ok(FetchedProject {
            status: 200,
            body: vec![0],
        }),
    };
    harness.sync.load_remote_project(remote, &fetcher).await;
    assert_eq!(
        harness.dialogs.alerts().last().map(String::as_str),
        Some("cannot load project: invalid project")
    );
    assert_eq!(*harness.events.borrow(), vec!["fetch-started"]);
}
