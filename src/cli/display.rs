// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the docket CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `DOCKET_THEME` first, then `COLORFGBG`, then macOS system appearance, then
//! defaults to dark. Colors are off under `NO_COLOR` and when stdout is not a TTY.
//!
//! Excerpts reach the terminal through [`TerminalMarkup`], the terminal flavor of
//! [`docket::excerpt::Markup`]: document text has its control characters removed
//! (a court filing must not be able to move the cursor or recolor the screen), and
//! matches are wrapped in highlight escapes emitted by us.
//!
//! # Theme detection order
//!
//! 1. `DOCKET_THEME` env var ("dark" or "light")
//! 2. `COLORFGBG` env var (terminal background hint)
//! 3. macOS appearance (via defaults read)
//! 4. Default to dark theme

use std::sync::OnceLock;

use docket::excerpt::Markup;

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Terminal color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Cached theme detection result
static THEME: OnceLock<Theme> = OnceLock::new();

/// Detect terminal theme from environment
fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("DOCKET_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and above (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.contains("Dark") && output.status.success() {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

/// Get the current theme (cached)
pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// ONEDARK / ONE LIGHT COLOR PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════
//
// OneDark: https://github.com/joshdick/onedark.vim
// One Light: https://github.com/sonph/onehalf

/// True color escape sequence helper
fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
}

pub use colors::*;

/// OneDark palette
mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);     // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);   // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);  // #e5c07b
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);     // #61afef
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221); // #c678dd
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);     // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);      // #5c6370
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (255, 215, 0);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

/// One Light palette
mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);       // #e45649
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);     // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);    // #c18401
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);     // #4078f2
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164);  // #a626a4
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);      // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);    // #a0a1a7
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (152, 104, 1);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

// ═══════════════════════════════════════════════════════════════════════════
// THEME-AWARE COLOR ACCESSORS
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_YELLOW);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Document text with control characters removed and whitespace runs flattened
/// to single spaces, so it can't break the layout or inject escapes.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_sanitized(&mut out, text);
    out
}

fn push_sanitized(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else if !c.is_control() {
            out.push(c);
        }
    }
}

/// Markup for excerpts printed to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalMarkup {
    open: String,
    close: String,
}

impl TerminalMarkup {
    /// Highlight with the theme's accent when colors are on, otherwise plain text.
    pub fn detect() -> Self {
        if use_colors() {
            Self {
                open: format!("{}{}", BOLD, BRIGHT_YELLOW()),
                close: RESET.to_string(),
            }
        } else {
            Self {
                open: String::new(),
                close: String::new(),
            }
        }
    }
}

impl Markup for TerminalMarkup {
    fn push_literal(&self, out: &mut String, text: &str) {
        push_sanitized(out, text);
    }

    fn open(&self) -> &str {
        &self.open
    }

    fn close(&self) -> &str {
        &self.close
    }
}

/// Greedy word wrap on visible width. ANSI sequences are kept attached to their
/// word and don't count toward the width.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let needed = if line.is_empty() {
            visible_len(word)
        } else {
            visible_len(&line) + 1 + visible_len(word)
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let border = GRAY();
    let len = visible_len(content);
    let pad = BOX_WIDTH.saturating_sub(len);
    println!(
        "{}│{}{}{}{}│{}",
        border,
        RESET,
        content,
        " ".repeat(pad),
        border,
        RESET
    );
}

/// Print a key/value line inside a box
pub fn row_kv(key: &str, value: &str) {
    row(&format!(
        "  {} {}",
        themed(GRAY, &[], &pad_right(key, 16)),
        value
    ));
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = GRAY();
    let colored_label = themed(CYAN, &[BOLD], label);
    let label_part = format!("─ {} ", colored_label);
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}┌{}{}{}{}┐{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// Print section divider: ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let border = GRAY();
    let colored_label = themed(CYAN, &[BOLD], label);
    let label_part = format!("─ {} ", colored_label);
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}├{}{}{}{}┤{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    let border = GRAY();
    println!("{}└{}┘{}", border, "─".repeat(BOX_WIDTH), RESET);
}

/// Print double-line header: ╔══════════════════╗
pub fn double_header() {
    let border = BLUE();
    println!("{}╔{}╗{}", border, "═".repeat(BOX_WIDTH), RESET);
}

/// Print double-line footer: ╚══════════════════╝
pub fn double_footer() {
    let border = BLUE();
    println!("{}╚{}╝{}", border, "═".repeat(BOX_WIDTH), RESET);
}

/// Print centered title with bold
pub fn title(text: &str) {
    let border = BLUE();
    let colored = themed(BRIGHT_CYAN, &[BOLD], text);
    let len = visible_len(&colored);
    let total_pad = BOX_WIDTH.saturating_sub(len);
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    println!(
        "{}║{}{}{}{}{}║{}",
        border,
        RESET,
        " ".repeat(left_pad),
        colored,
        " ".repeat(right_pad),
        border,
        RESET
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Rank number, right-aligned
pub fn rank_label(rank: usize) -> String {
    themed(MAGENTA, &[BOLD], &format!("{:>3}.", rank))
}

/// Color-coded match count (more matches = warmer)
pub fn match_badge(relevance: usize, label: &str) -> String {
    if !use_colors() {
        return format!("({})", label);
    }
    let color = if relevance >= 10 {
        GREEN()
    } else if relevance >= 3 {
        YELLOW()
    } else {
        GRAY()
    };
    format!("{}({}){}", color, label, RESET)
}

/// Color-coded timing value in ms
pub fn timing_ms(value: f64) -> String {
    if !use_colors() {
        return format!("{:.3} ms", value);
    }
    let color = if value < 5.0 {
        GREEN()
    } else if value < 20.0 {
        YELLOW()
    } else {
        RED()
    };
    format!("{}{:.3} ms{}", color, value, RESET)
}

/// Inline notice: validation messages, empty states
pub fn notice(text: &str) -> String {
    themed(YELLOW, &[], &sanitize(text))
}

/// Right-pad a styled string to a fixed visible width
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncate to `max_len` characters, adding ... suffix if needed
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
