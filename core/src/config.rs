use crate::router::{RouterStyle, RoutingEnvironment};

pub const DEFAULT_ROUTING_STYLE: &str = "hash";

/// Deployment settings fixed at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    pub routing_style: String,
    pub root: Option<String>,
    pub announcement: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            routing_style: DEFAULT_ROUTING_STYLE.to_string(),
            root: None,
            announcement: None,
        }
    }
}

impl ShellConfig {
    pub fn new(routing_style: Option<&str>, root: Option<&str>, announcement: Option<&str>) -> Self {
        Self {
            routing_style: non_empty(routing_style)
                .unwrap_or_else(|| DEFAULT_ROUTING_STYLE.to_string()),
            root: non_empty(root),
            announcement: non_empty(announcement),
        }
    }

    /// Whether the deployment asked for wildcard routing, regardless of
    /// whether the router later falls back.
    pub fn uses_wildcard_routing(&self) -> bool {
        RouterStyle::from_name(&self.routing_style) == Some(RouterStyle::Wildcard)
    }

    pub fn root_or_empty(&self) -> &str {
        self.root.as_deref().unwrap_or_default()
    }

    pub fn routing_environment(&self, protocol: &str, initial_path: &str) -> RoutingEnvironment {
        RoutingEnvironment {
            protocol: protocol.to_string(),
            root: self.root.clone(),
            initial_path: initial_path.to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
