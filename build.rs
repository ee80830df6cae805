use std::env;
use std::path::PathBuf;

const FORWARDED: &[&str] = &["ROUTING_STYLE", "ROOT", "ANNOUNCEMENT"];

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let env_path = manifest_dir.join(".env");
    let env_local_path = manifest_dir.join(".env.local");

    // .env.local is loaded first so it wins; dotenvy never overrides a set var.
    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    for name in FORWARDED {
        println!("cargo:rerun-if-env-changed={name}");
        if let Ok(value) = env::var(name) {
            let value = value.trim();
            if !value.is_empty() {
                println!("cargo:rustc-env={name}={value}");
            }
        }
    }
}
