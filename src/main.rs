mod app_config;
mod browser_address;
mod console_logger;
mod dialogs;
mod js_api;
mod local_storage;
mod project_fetch;
mod shell_runtime;
mod shell_store;
mod vm_bridge;

fn main() {
    console_error_panic_hook::set_once();
    console_logger::install();
    shell_runtime::mount();
}
