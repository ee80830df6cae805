use crate::config::ShellConfig;
use crate::project_id::ProjectId;

/// How to open another project from inside the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectVisit {
    /// Full page load; wildcard deployments serve each project at its own path.
    Navigate(String),
    SetProjectId(ProjectId),
}

pub fn visit_project(config: &ShellConfig, project_id: ProjectId) -> ProjectVisit {
    if config.uses_wildcard_routing() {
        return ProjectVisit::Navigate(format!("{}{project_id}", config.root_or_empty()));
    }
    ProjectVisit::SetProjectId(project_id)
}

pub fn addons_url(config: &ShellConfig) -> String {
    let page = if config.uses_wildcard_routing() {
        "addons"
    } else {
        "addons.html"
    };
    format!("{}{page}", config.root_or_empty())
}
