#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectIdError {
    #[error("project id must not be empty")]
    Empty,
    #[error("project id must not contain '{ch}'")]
    Reserved { ch: char },
}

/// A numeric query parameter that is not a finite, non-negative number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("fps URL parameter is invalid")]
    Framerate,
    #[error("clone URL parameter is invalid")]
    MaxClones,
}

impl ParameterError {
    pub fn parameter(self) -> &'static str {
        match self {
            ParameterError::Framerate => "fps",
            ParameterError::MaxClones => "clones",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("unknown router: {0}")]
    UnknownRoutingStyle(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectFetchError {
    #[error("Unexpected status code: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Load(String),
}
