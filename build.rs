//! Bakes the Wi-Fi and flash settings from `.env` (or the environment) into the firmware.
//!
//! ```text
//! SKEL_WIFI_SSID=workshop
//! SKEL_WIFI_PASSWORD=correct horse
//! SKEL_FLASH_LAYOUT=32m
//! ```

const SETTINGS: [(&str, &str); 3] = [
    ("SKEL_WIFI_SSID", ""),
    ("SKEL_WIFI_PASSWORD", ""),
    ("SKEL_FLASH_LAYOUT", "32m"),
];

fn main() {
    // A missing .env is fine, the variables may come from the shell instead.
    if let Ok(path) = dotenvy::dotenv() {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    for (key, default) in SETTINGS {
        println!("cargo:rerun-if-env-changed={key}");
        let value = std::env::var(key).unwrap_or_else(|_| {
            println!("cargo:warning={key} is not set, using \"{default}\"");
            default.to_string()
        });
        println!("cargo:rustc-env={key}={value}");
    }

    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
