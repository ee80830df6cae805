use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::query::QueryParams;

pub const DEFAULT_FRAMERATE: u32 = 30;
pub const HIGH_FRAMERATE: u32 = 60;
pub const DEFAULT_MAX_CLONES: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeOptions {
    pub framerate: u32,
    pub turbo: bool,
    pub high_quality_pen: bool,
    pub max_clones: u32,
    pub compiler_enabled: bool,
    pub warp_timer: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            framerate: DEFAULT_FRAMERATE,
            turbo: false,
            high_quality_pen: false,
            max_clones: DEFAULT_MAX_CLONES,
            compiler_enabled: true,
            warp_timer: false,
        }
    }
}

/// Options requested by a query string. Unset fields leave the engine as is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeFlags {
    pub framerate: Option<u32>,
    pub username: Option<String>,
    pub high_quality_pen: bool,
    pub turbo: bool,
    pub warp_timer: bool,
    pub compiler_disabled: bool,
    pub max_clones: Option<u32>,
    pub project_url: Option<String>,
    pub invalid: Vec<ParameterError>,
}

impl RuntimeFlags {
    pub fn is_invalid(&self, error: ParameterError) -> bool {
        self.invalid.contains(&error)
    }

    pub fn apply_to(&self, mut options: RuntimeOptions) -> RuntimeOptions {
        if let Some(framerate) = self.framerate {
            options.framerate = framerate;
        }
        if self.high_quality_pen {
            options.high_quality_pen = true;
        }
        if self.turbo {
            options.turbo = true;
        }
        if self.warp_timer {
            options.warp_timer = true;
        }
        if self.compiler_disabled {
            options.compiler_enabled = false;
        }
        if let Some(max_clones) = self.max_clones {
            options.max_clones = max_clones;
        }
        options
    }
}

pub fn parse_runtime_flags(search: &str) -> RuntimeFlags {
    let params = QueryParams::parse(search);
    let mut flags = RuntimeFlags::default();

    if let Some(raw) = params.get("fps") {
        match parse_count(raw) {
            Some(framerate) => flags.framerate = Some(framerate),
            None => flags.invalid.push(ParameterError::Framerate),
        }
    } else if params.has("60fps") {
        flags.framerate = Some(HIGH_FRAMERATE);
    }

    flags.username = params.get("username").map(str::to_string);
    flags.high_quality_pen = params.has("hqpen");
    flags.turbo = params.has("turbo");
    flags.warp_timer = params.has("stuck") || params.has("warp_timer");
    flags.compiler_disabled = params.has("nocompile");

    if let Some(raw) = params.get("clones") {
        match parse_count(raw) {
            Some(max_clones) => flags.max_clones = Some(max_clones),
            None => flags.invalid.push(ParameterError::MaxClones),
        }
    }

    flags.project_url = params.get("project_url").map(normalize_project_url);
    flags
}

/// Rewrites the tuning flags of `search` to describe `options`, leaving
/// unrelated parameters where they are. `stuck` is only touched in player
/// mode.
pub fn encode_runtime_flags(search: &str, options: &RuntimeOptions, is_player_only: bool) -> String {
    let mut params = QueryParams::parse(search);

    if options.framerate == DEFAULT_FRAMERATE {
        params.delete("fps");
    } else {
        params.set("fps", &options.framerate.to_string());
    }
    params.toggle("turbo", options.turbo);
    params.toggle("hqpen", options.high_quality_pen);
    params.toggle("nocompile", !options.compiler_enabled);
    if is_player_only {
        params.toggle("stuck", options.warp_timer);
    }
    if options.max_clones == DEFAULT_MAX_CLONES {
        params.delete("clones");
    } else {
        params.set("clones", &options.max_clones.to_string());
    }

    params.to_search()
}

pub fn normalize_project_url(raw: &str) -> String {
    if raw.starts_with("http:") || raw.starts_with("https:") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round().min(u32::MAX as f64) as u32)
}

// Numeric coercion for query values: whitespace is ignored, an empty value
// is zero, and 0x/0o/0b prefixes are accepted.
fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    let lower = value.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    value.parse::<f64>().ok()
}
