use std::cell::RefCell;

use player_shell_core::ShellConfig;

thread_local! {
    static SHELL_CONFIG: RefCell<Option<ShellConfig>> = RefCell::new(None);
}

pub(crate) fn load_shell_config() -> ShellConfig {
    ShellConfig::new(
        option_env!("ROUTING_STYLE").or(option_env!("TRUNK_PUBLIC_ROUTING_STYLE")),
        option_env!("ROOT").or(option_env!("TRUNK_PUBLIC_ROOT")),
        option_env!("ANNOUNCEMENT"),
    )
}

pub(crate) fn shell_config() -> ShellConfig {
    SHELL_CONFIG.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(load_shell_config)
            .clone()
    })
}
