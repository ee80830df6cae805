use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use crate::project_id::ProjectId;

/// Partial compiler options; `None` fields are left unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompilerOptionsPatch {
    pub enabled: Option<bool>,
    pub warp_timer: Option<bool>,
}

/// The running project engine and its renderer.
pub trait Engine {
    fn set_framerate(&self, framerate: u32);
    fn set_turbo_mode(&self, enabled: bool);
    fn set_max_clones(&self, max_clones: u32);
    fn set_compiler_options(&self, patch: CompilerOptionsPatch);
    fn set_high_quality_pen(&self, enabled: bool);
    fn load_project(&self, bytes: Vec<u8>) -> LocalBoxFuture<'_, Result<(), String>>;
    fn redraw(&self);
}

/// Blocking user prompts.
pub trait Dialogs {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// String storage that may be unavailable. Implementations swallow access
/// failures: reads return `None`, writes do nothing.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedProject {
    pub status: u16,
    pub body: Vec<u8>,
}

pub trait ProjectFetcher {
    /// `Err` is a transport failure; HTTP errors come back as a status.
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<FetchedProject, String>>;
}

/// Store actions the synchronization dispatches.
#[derive(Clone)]
pub struct ShellHooks {
    pub on_set_username: Rc<dyn Fn(String)>,
    pub on_set_project_id: Rc<dyn Fn(ProjectId)>,
    pub on_set_player_only: Rc<dyn Fn(bool)>,
    pub on_set_full_screen: Rc<dyn Fn(bool)>,
    pub on_project_fetch_started: Rc<dyn Fn()>,
    pub on_project_fetch_finished: Rc<dyn Fn()>,
}

impl ShellHooks {
    pub fn empty() -> Self {
        Self {
            on_set_username: Rc::new(|_| {}),
            on_set_project_id: Rc::new(|_| {}),
            on_set_player_only: Rc::new(|_| {}),
            on_set_full_screen: Rc::new(|_| {}),
            on_project_fetch_started: Rc::new(|| {}),
            on_project_fetch_finished: Rc::new(|| {}),
        }
    }
}
