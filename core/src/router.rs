//! Routing strategies mapping [`ApplicationIdentity`] to and from the page
//! address.
//!
//! Exactly one [`Router`] is created per page by [`create_router`]. Routers
//! never write the address themselves: identity changes go through
//! [`IdentityCallbacks`], and a required rewrite is reported to the caller as
//! an [`AddressRewrite`].

use crate::address::Address;
use crate::error::RouterError;
use crate::identity::ApplicationIdentity;
use crate::project_id::{project_id_from_fragment, ProjectId};

const EDITOR_PAGE: &str = "editor";
const FULLSCREEN_PAGE: &str = "fullscreen";

/// Receives identity changes derived from the address.
pub trait IdentityCallbacks {
    /// Returns `false` when the switch was declined and nothing changed.
    fn set_project_id(&self, project_id: &ProjectId) -> bool;
    fn set_player_only(&self, is_player_only: bool);
    fn set_full_screen(&self, is_full_screen: bool);
}

/// Follow-up write requested after a fragment change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressRewrite {
    Keep,
    /// Replace the current entry with the same address minus its fragment.
    StripFragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterStyle {
    None,
    Hash,
    PathHash,
    Wildcard,
}

impl RouterStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(RouterStyle::None),
            "hash" => Some(RouterStyle::Hash),
            "filehash" | "pathhash" => Some(RouterStyle::PathHash),
            "wildcard" => Some(RouterStyle::Wildcard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RouterStyle::None => "none",
            RouterStyle::Hash => "hash",
            RouterStyle::PathHash => "filehash",
            RouterStyle::Wildcard => "wildcard",
        }
    }
}

/// Facts about the page that decide which styles can work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingEnvironment {
    pub protocol: String,
    pub root: Option<String>,
    pub initial_path: String,
}

impl RoutingEnvironment {
    pub fn supported_styles(&self) -> Vec<RouterStyle> {
        let mut styles = vec![RouterStyle::None, RouterStyle::Hash];
        let protocol = self.protocol.to_ascii_lowercase();
        if protocol == "http:" || protocol == "https:" {
            styles.push(RouterStyle::PathHash);
        }
        if self.root.as_deref().is_some_and(|root| !root.is_empty()) {
            styles.push(RouterStyle::Wildcard);
        }
        styles
    }
}

pub fn create_router(style: &str, env: &RoutingEnvironment) -> Result<Router, RouterError> {
    let supported = env.supported_styles();
    let chosen = match RouterStyle::from_name(style) {
        Some(requested) if supported.contains(&requested) => requested,
        _ if supported.contains(&RouterStyle::Hash) => {
            log::warn!("routing style is unknown or not supported: {style}, falling back to hash");
            RouterStyle::Hash
        }
        _ => return Err(RouterError::UnknownRoutingStyle(style.to_string())),
    };
    let router = match chosen {
        RouterStyle::None => Router::None,
        RouterStyle::Hash => Router::Hash(HashRouter),
        RouterStyle::PathHash => Router::PathHash(PathHashRouter::new(&env.initial_path)),
        RouterStyle::Wildcard => {
            Router::Wildcard(WildcardRouter::new(env.root.as_deref().unwrap_or_default()))
        }
    };
    log::debug!("router installed: {}", chosen.name());
    Ok(router)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Router {
    None,
    Hash(HashRouter),
    PathHash(PathHashRouter),
    Wildcard(WildcardRouter),
}

impl Router {
    pub fn style(&self) -> RouterStyle {
        match self {
            Router::None => RouterStyle::None,
            Router::Hash(_) => RouterStyle::Hash,
            Router::PathHash(_) => RouterStyle::PathHash,
            Router::Wildcard(_) => RouterStyle::Wildcard,
        }
    }

    /// Handles a fragment change.
    pub fn on_address_changed(
        &self,
        address: &Address,
        callbacks: &dyn IdentityCallbacks,
    ) -> AddressRewrite {
        match self {
            Router::None => AddressRewrite::Keep,
            Router::Hash(router) => {
                router.on_address_changed(address, callbacks);
                AddressRewrite::Keep
            }
            Router::PathHash(router) => {
                router.on_address_changed(address, callbacks);
                AddressRewrite::Keep
            }
            Router::Wildcard(router) => router.on_address_changed(address, callbacks),
        }
    }

    /// Handles back/forward navigation.
    pub fn on_navigated(&self, address: &Address, callbacks: &dyn IdentityCallbacks) {
        match self {
            Router::None | Router::Hash(_) => {}
            Router::PathHash(router) => router.on_navigated(address, callbacks),
            Router::Wildcard(router) => router.on_navigated(address, callbacks),
        }
    }

    /// `None` means this style does not encode identity and nothing should be
    /// written.
    pub fn generate_address(
        &self,
        identity: &ApplicationIdentity,
        current: &Address,
    ) -> Option<String> {
        match self {
            Router::None => None,
            Router::Hash(router) => Some(router.generate_address(identity, current)),
            Router::PathHash(router) => Some(router.generate_address(identity, current)),
            Router::Wildcard(router) => Some(router.generate_address(identity, current)),
        }
    }
}

/// Project id in the fragment; page type is left to the served page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashRouter;

impl HashRouter {
    pub fn on_address_changed(&self, address: &Address, callbacks: &dyn IdentityCallbacks) {
        let project_id = project_id_from_fragment(&address.hash).unwrap_or_default();
        callbacks.set_project_id(&project_id);
    }

    pub fn generate_address(&self, identity: &ApplicationIdentity, current: &Address) -> String {
        format!(
            "{}{}{}",
            current.path,
            current.search,
            Self::fragment(&identity.project_id)
        )
    }

    fn fragment(project_id: &ProjectId) -> String {
        if project_id.is_default() {
            String::new()
        } else {
            format!("#{project_id}")
        }
    }
}

/// Three sibling pages (player, `editor.html`, `fullscreen.html`) plus the
/// fragment handling of [`HashRouter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathHashRouter {
    hash: HashRouter,
    player_path: String,
    editor_path: String,
    fullscreen_path: String,
}

impl PathHashRouter {
    pub fn new(initial_path: &str) -> Self {
        let player_path = initial_path
            .rfind('/')
            .map(|idx| initial_path[..=idx].to_string())
            .unwrap_or_default();
        Self {
            hash: HashRouter,
            editor_path: format!("{player_path}editor.html"),
            fullscreen_path: format!("{player_path}fullscreen.html"),
            player_path,
        }
    }

    pub fn player_path(&self) -> &str {
        &self.player_path
    }

    pub fn editor_path(&self) -> &str {
        &self.editor_path
    }

    pub fn fullscreen_path(&self) -> &str {
        &self.fullscreen_path
    }

    pub fn on_address_changed(&self, address: &Address, callbacks: &dyn IdentityCallbacks) {
        self.hash.on_address_changed(address, callbacks);
    }

    pub fn on_navigated(&self, address: &Address, callbacks: &dyn IdentityCallbacks) {
        let path = address.path.as_str();
        if path == self.player_path {
            callbacks.set_player_only(true);
            callbacks.set_full_screen(false);
        } else if path == self.editor_path {
            callbacks.set_player_only(false);
            callbacks.set_full_screen(false);
        } else if path == self.fullscreen_path {
            callbacks.set_full_screen(true);
        }
    }

    pub fn generate_address(&self, identity: &ApplicationIdentity, current: &Address) -> String {
        let path = if identity.is_full_screen {
            &self.fullscreen_path
        } else if identity.is_player_only {
            &self.player_path
        } else {
            &self.editor_path
        };
        format!(
            "{path}{}{}",
            current.search,
            HashRouter::fragment(&identity.project_id)
        )
    }
}

/// `<root><id>/<page type>` paths served by a catch-all route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WildcardRouter {
    root: String,
}

impl WildcardRouter {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// A `#<id>` fragment wins over the path; once accepted the fragment is
    /// dropped from the current entry. Page type is fixed by the served page
    /// and not detected here.
    pub fn on_address_changed(
        &self,
        address: &Address,
        callbacks: &dyn IdentityCallbacks,
    ) -> AddressRewrite {
        if let Some(project_id) = project_id_from_fragment(&address.hash) {
            if callbacks.set_project_id(&project_id) {
                return AddressRewrite::StripFragment;
            }
            return AddressRewrite::Keep;
        }
        self.parse_path(address, false, callbacks);
        AddressRewrite::Keep
    }

    pub fn on_navigated(&self, address: &Address, callbacks: &dyn IdentityCallbacks) {
        self.parse_path(address, true, callbacks);
    }

    pub fn generate_address(&self, identity: &ApplicationIdentity, current: &Address) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2);
        if !identity.project_id.is_default() {
            parts.push(identity.project_id.as_str());
        }
        if identity.is_full_screen {
            parts.push(FULLSCREEN_PAGE);
        } else if !identity.is_player_only {
            parts.push(EDITOR_PAGE);
        }
        format!("{}{}{}", self.root, parts.join("/"), current.search)
    }

    fn parse_path(&self, address: &Address, detect_page_type: bool, callbacks: &dyn IdentityCallbacks) {
        let path = address
            .path
            .strip_prefix(self.root.as_str())
            .or_else(|| address.path.get(self.root.len()..))
            .unwrap_or_default();
        let mut parts = path.split('/');
        let first = parts.next().unwrap_or_default();

        let (project_id, page_type) = match numeric_project_id(first) {
            Some(project_id) => (project_id, parts.next().unwrap_or_default()),
            None => (ProjectId::default_project(), first),
        };

        // a declined switch leaves the page type alone too
        if !callbacks.set_project_id(&project_id) || !detect_page_type {
            return;
        }
        match page_type {
            FULLSCREEN_PAGE => callbacks.set_full_screen(true),
            EDITOR_PAGE => {
                callbacks.set_player_only(false);
                callbacks.set_full_screen(false);
            }
            _ => {
                callbacks.set_player_only(true);
                callbacks.set_full_screen(false);
            }
        }
    }
}

// A segment names a project when it reads as a non-zero finite number.
fn numeric_project_id(segment: &str) -> Option<ProjectId> {
    let trimmed = segment.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().contains("inf") {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    ProjectId::parse(segment).ok()
}
