pub mod address;
pub mod config;
pub mod error;
pub mod flags;
pub mod identity;
pub mod ports;
pub mod project_id;
pub mod query;
pub mod router;
pub mod sync;
pub mod username;
pub mod visit;

pub use address::{Address, AddressPort, HistoryMode, MemoryHistory};
pub use config::ShellConfig;
pub use error::{ParameterError, ProjectFetchError, ProjectIdError, RouterError};
pub use flags::{
    encode_runtime_flags, parse_runtime_flags, RuntimeFlags, RuntimeOptions, DEFAULT_FRAMERATE,
    DEFAULT_MAX_CLONES,
};
pub use identity::{ApplicationIdentity, ShellState};
pub use ports::{
    CompilerOptionsPatch, Dialogs, Engine, FetchedProject, KeyValueStore, ProjectFetcher,
    ShellHooks,
};
pub use project_id::{project_id_from_fragment, ProjectId, DEFAULT_PROJECT_ID};
pub use router::{
    create_router, AddressRewrite, IdentityCallbacks, Router, RouterStyle, RoutingEnvironment,
};
pub use sync::{RemoteProject, StateSync, SyncPhase, SyncPorts, SWITCH_PROJECT_PROMPT};
pub use username::USERNAME_KEY;
pub use visit::{addons_url, visit_project, ProjectVisit};
