// ABOUTME: Terminal capability detection for image protocol support
// ABOUTME: Pure functions over an injected env lookup deciding protocol, color, and animation mode

use crate::constants::{env as env_vars, layout};
use serde::Deserialize;
use std::str::FromStr;

/// Environment lookup injected into every capability check. `std::env::var(..).ok()` in production.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineProtocol {
    #[default]
    None,
    Kitty,
    Iterm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThumbsMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ThumbsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ThumbsMode::Auto),
            "always" => Ok(ThumbsMode::Always),
            "never" => Ok(ThumbsMode::Never),
            other => Err(format!(
                "Invalid thumbs mode '{}'. Must be one of: auto, always, never",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn from_flags(no_color: bool, force_color: bool) -> Self {
        if no_color {
            ColorChoice::Never
        } else if force_color {
            ColorChoice::Always
        } else {
            ColorChoice::Auto
        }
    }

    pub fn resolve(self, env: EnvLookup<'_>, is_tty: bool) -> bool {
        match self {
            ColorChoice::Never => false,
            ColorChoice::Always => true,
            ColorChoice::Auto => {
                env("NO_COLOR").is_none()
                    && env("TERM").as_deref() != Some("dumb")
                    && is_tty
            }
        }
    }
}

/// Everything the renderers need to know about the attached terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalCapabilities {
    pub protocol: InlineProtocol,
    pub terminal_name: String,
    pub cell_aspect: f64,
    pub software_animation: bool,
}

/// Inputs that gate protocol selection before any probing happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectOptions {
    pub thumbs: ThumbsMode,
    pub is_tty: bool,
    /// Listing format is the human-readable one.
    pub plain_output: bool,
    pub cell_aspect: Option<f64>,
    pub software_animation: Option<bool>,
}

impl TerminalCapabilities {
    pub fn detect(env: EnvLookup<'_>, options: DetectOptions) -> Self {
        let protocol = select_protocol(env, options.thumbs, options.is_tty, options.plain_output);
        let caps = Self {
            protocol,
            terminal_name: terminal_name(env),
            cell_aspect: cell_aspect(env, options.cell_aspect),
            software_animation: software_animation(env, options.software_animation),
        };
        log::debug!(
            "terminal {} -> protocol {:?}, cell aspect {}, software animation {}",
            caps.terminal_name,
            caps.protocol,
            caps.cell_aspect,
            caps.software_animation
        );
        caps
    }
}

pub fn select_protocol(
    env: EnvLookup<'_>,
    thumbs: ThumbsMode,
    is_tty: bool,
    plain_output: bool,
) -> InlineProtocol {
    if thumbs == ThumbsMode::Never || !is_tty || !plain_output {
        return InlineProtocol::None;
    }
    if let Some(forced) = env(env_vars::FORCE_PROTOCOL).filter(|v| !v.trim().is_empty()) {
        match forced.trim().to_lowercase().as_str() {
            "kitty" => return InlineProtocol::Kitty,
            "iterm2" | "iterm" => return InlineProtocol::Iterm,
            "none" | "disable" | "disabled" => return InlineProtocol::None,
            other => log::warn!(
                "Unknown protocol '{}' in {}. Valid values: kitty, iterm2, none",
                other,
                env_vars::FORCE_PROTOCOL
            ),
        }
    }
    sniff_protocol_from_env(env)
}

fn sniff_protocol_from_env(env: EnvLookup<'_>) -> InlineProtocol {
    let term_program = env("TERM_PROGRAM").unwrap_or_default();
    let term = env("TERM").unwrap_or_default().to_lowercase();

    if env("KITTY_WINDOW_ID").is_some_and(|id| !id.is_empty()) {
        return InlineProtocol::Kitty;
    }
    if detect_iterm2_support(&term_program, &term, env("LC_TERMINAL").as_deref()) {
        return InlineProtocol::Iterm;
    }
    if detect_kitty_support(&term_program, &term) {
        return InlineProtocol::Kitty;
    }
    InlineProtocol::None
}

fn detect_iterm2_support(term_program: &str, term: &str, lc_terminal: Option<&str>) -> bool {
    if matches!(
        term_program,
        "iTerm.app" | "WezTerm" | "mintty" | "Hyper" | "Warp" | "Tabby" | "Terminus" | "vscode"
    ) {
        return true;
    }
    lc_terminal == Some("iTerm2") || term.contains("iterm")
}

fn detect_kitty_support(term_program: &str, term: &str) -> bool {
    let term_program = term_program.to_lowercase();
    term_program == "kitty"
        || term_program == "ghostty"
        || term.contains("kitty")
        || term.contains("ghostty")
}

fn terminal_name(env: EnvLookup<'_>) -> String {
    env("TERM_PROGRAM")
        .filter(|v| !v.is_empty())
        .or_else(|| env("TERM").filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Terminal cell width divided by height. Env wins over config; out-of-range values are ignored.
pub fn cell_aspect(env: EnvLookup<'_>, configured: Option<f64>) -> f64 {
    let valid = |v: f64| v > 0.1 && v < 2.0;
    env(env_vars::CELL_ASPECT)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| valid(*v))
        .or(configured.filter(|v| valid(*v)))
        .unwrap_or(layout::DEFAULT_CELL_ASPECT)
}

/// Whether animations must be stepped client-side on kitty-style terminals.
pub fn software_animation(env: EnvLookup<'_>, configured: Option<bool>) -> bool {
    if let Some(raw) = env(env_vars::SOFTWARE_ANIM).filter(|v| !v.trim().is_empty()) {
        return matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes");
    }
    if let Some(value) = configured {
        return value;
    }
    // ghostty accepts kitty frames but does not loop them
    let ghostty = |key: &str| {
        env(key)
            .map(|v| v.to_lowercase().contains("ghostty"))
            .unwrap_or(false)
    };
    ghostty("TERM_PROGRAM") || ghostty("TERM")
}

/// Thumbs mode requested through the environment, if any.
pub fn thumbs_from_env(env: EnvLookup<'_>) -> Option<ThumbsMode> {
    let raw = env(env_vars::THUMBS)?;
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(message) => {
            log::warn!("{}: {}", env_vars::THUMBS, message);
            None
        }
    }
}
