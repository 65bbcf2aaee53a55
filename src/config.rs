use std::path::Path;
use std::sync::{LazyLock, Mutex};

use ini::Ini;
use log::{info, warn};

use crate::core::input::{
    DEFAULT_LEFT_BUTTON, DEFAULT_RIGHT_BUTTON, DX_GAMEPAD_FIRST, DX_GAMEPAD_LAST,
};

const CONFIG_PATH: &str = "holdstrike.ini";

const DEFAULT_MIN_POWER_HOLD_MS: i64 = 440;
const DEFAULT_VIBRATION_STRENGTH: i64 = 25;
const VIBRATION_STRENGTH_MAX: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub enabled: bool,
    pub sound: bool,
    pub vibration: bool,
    /// Minimum continuous hold for a power attack, in seconds.
    pub min_power_hold_secs: f32,
    /// Haptic pulse strength, 0.0..=2.0.
    pub vibration_strength: f32,
    /// DX gamepad codes, 266..=281.
    pub left_button: u32,
    pub right_button: u32,
    pub reverse_mouse_buttons: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            vibration: true,
            min_power_hold_secs: DEFAULT_MIN_POWER_HOLD_MS as f32 / 1000.0,
            vibration_strength: DEFAULT_VIBRATION_STRENGTH as f32 / 100.0,
            left_button: DEFAULT_LEFT_BUTTON,
            right_button: DEFAULT_RIGHT_BUTTON,
            reverse_mouse_buttons: false,
        }
    }
}

// Process-wide settings instance, published by `load()`.
static SETTINGS: LazyLock<Mutex<Settings>> = LazyLock::new(|| Mutex::new(Settings::default()));

/* ------------------------ Value parsing ------------------------ */

fn parse_bool(v: &str) -> Option<bool> {
    let v = v.trim();
    if v.is_empty() {
        return None;
    }
    if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("on")
    {
        return Some(true);
    }
    if v.eq_ignore_ascii_case("false")
        || v.eq_ignore_ascii_case("no")
        || v.eq_ignore_ascii_case("off")
    {
        return Some(false);
    }
    v.parse::<u8>().ok().map(|n| n != 0)
}

fn read_bool(conf: &Ini, section: &str, key: &str) -> Option<bool> {
    conf.get_from(Some(section), key).and_then(parse_bool)
}

fn read_i64(conf: &Ini, section: &str, key: &str) -> Option<i64> {
    conf.get_from(Some(section), key)
        .and_then(|v| v.trim().parse::<i64>().ok())
}

/// Out-of-range overrides fall back to the stock binding rather than clamp:
/// an arbitrary in-range code would rebind to an unrelated button.
const fn limit_gamepad_button(value: i64, fallback: u32) -> u32 {
    if value < DX_GAMEPAD_FIRST as i64 || value > DX_GAMEPAD_LAST as i64 {
        fallback
    } else {
        value as u32
    }
}

/* ------------------------ File I/O ------------------------ */

/// Reads settings from `path`, normalizing every value, then writes the
/// normalized form back so the file on disk always reflects what the engine
/// actually runs with. A missing or unreadable file yields defaults.
pub fn load_from(path: &Path) -> Settings {
    let default = Settings::default();
    let mut s = default;

    match Ini::load_from_file(path) {
        Ok(conf) => {
            s.enabled = read_bool(&conf, "Settings", "Enabled").unwrap_or(default.enabled);
            s.sound = read_bool(&conf, "Settings", "Sound").unwrap_or(default.sound);
            s.vibration = read_bool(&conf, "Settings", "Vibration").unwrap_or(default.vibration);

            let hold_ms = read_i64(&conf, "Settings", "MinPowerAttackHoldMs")
                .filter(|ms| *ms >= 0)
                .unwrap_or(DEFAULT_MIN_POWER_HOLD_MS);
            s.min_power_hold_secs = hold_ms as f32 / 1000.0;

            let strength = read_i64(&conf, "Settings", "VibrationStrength")
                .unwrap_or(DEFAULT_VIBRATION_STRENGTH)
                .clamp(0, VIBRATION_STRENGTH_MAX);
            s.vibration_strength = strength as f32 / 100.0;

            s.left_button = limit_gamepad_button(
                read_i64(&conf, "Buttons", "OverrideLeftButton")
                    .unwrap_or(DEFAULT_LEFT_BUTTON as i64),
                DEFAULT_LEFT_BUTTON,
            );
            s.right_button = limit_gamepad_button(
                read_i64(&conf, "Buttons", "OverrideRightButton")
                    .unwrap_or(DEFAULT_RIGHT_BUTTON as i64),
                DEFAULT_RIGHT_BUTTON,
            );
            s.reverse_mouse_buttons =
                read_bool(&conf, "Buttons", "ReverseMouseButtons").unwrap_or(false);

            info!("Settings loaded from '{}'.", path.display());
        }
        Err(e) => {
            warn!(
                "Failed to load '{}': {e}. Using default values.",
                path.display()
            );
        }
    }

    if let Err(e) = save_to(path, &s) {
        warn!("Failed to save settings to '{}': {e}.", path.display());
    }

    s
}

/// Writes the normalized settings back out in the stable section layout.
pub fn save_to(path: &Path, s: &Settings) -> std::io::Result<()> {
    let bool_str = |v: bool| if v { "1" } else { "0" };
    let hold_ms = (s.min_power_hold_secs * 1000.0).round() as i64;
    let strength = (s.vibration_strength * 100.0).round() as i64;

    let mut out = Ini::new();
    out.with_section(Some("Settings"))
        .set("Enabled", bool_str(s.enabled))
        .set("Sound", bool_str(s.sound))
        .set("Vibration", bool_str(s.vibration))
        .set("MinPowerAttackHoldMs", hold_ms.to_string())
        .set("VibrationStrength", strength.to_string());
    out.with_section(Some("Buttons"))
        .set("OverrideLeftButton", s.left_button.to_string())
        .set("OverrideRightButton", s.right_button.to_string())
        .set("ReverseMouseButtons", bool_str(s.reverse_mouse_buttons));
    out.write_to_file(path)
}

/// Loads from the stock path and publishes the result process-wide.
pub fn load() {
    let s = load_from(Path::new(CONFIG_PATH));
    *SETTINGS.lock().unwrap() = s;
}

pub fn get() -> Settings {
    *SETTINGS.lock().unwrap()
}

/// Publishes settings the host assembled itself (or mutated at runtime).
pub fn set(s: Settings) {
    *SETTINGS.lock().unwrap() = s;
}
