use std::{env, fs, path::PathBuf};

fn main() {
    // 1) Handle memory.x based on target
    let target = env::var("TARGET").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_file = if target.starts_with("thumbv8m") {
        // Pico 2 W (RP2350, ARM core)
        Some("memory-pico2.x")
    } else if target.starts_with("thumbv6m") {
        // Pico W (RP2040)
        Some("memory-pico1w.x")
    } else {
        // Host builds (tests) link no firmware.
        None
    };

    if let Some(memory_file) = memory_file {
        let memory_x = fs::read_to_string(memory_file)
            .unwrap_or_else(|err| panic!("Failed to read {memory_file}: {err}"));
        fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed={memory_file}");
    }

    // 2) Load optional env files
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");
    load_home_env(".env");

    // 3) Provide fallbacks so the crate compiles without .env
    let wifi_ssid = env_or_default("WIFI_SSID", "");
    let wifi_pass = env_or_default("WIFI_PASS", "");

    // Warn only if Wi-Fi was explicitly enabled but credentials are missing.
    if env::var_os("CARGO_FEATURE_WIFI").is_some() {
        if wifi_ssid.is_empty() {
            println!(
                "cargo:warning=WIFI feature enabled but WIFI_SSID is not set; using empty string"
            );
        }
        if wifi_pass.is_empty() {
            println!(
                "cargo:warning=WIFI feature enabled but WIFI_PASS is not set; using empty string"
            );
        }
    }

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=WIFI_SSID={wifi_ssid}");
    println!("cargo:rustc-env=WIFI_PASS={wifi_pass}");

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
    println!("cargo:rerun-if-changed=.env");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
