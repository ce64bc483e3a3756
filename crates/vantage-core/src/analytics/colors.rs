//! Display colors for chart categories
//!
//! Three rulesets:
//! - `Severity`: keyword match on the lower-cased category name
//! - `Lifecycle`: fixed color per lifecycle status, name is ignored
//! - `Palette`: cycle through a fixed palette by row index

use std::fmt;

use serde::{Serialize, Serializer};

use crate::snapshot::LifecycleStatus;

/// A `#rrggbb` display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    pub fn hex(&self) -> &'static str {
        self.0
    }

    /// Red, green, blue components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.0.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

pub const SEVERITY_1: Color = Color::new("#dc2626");
pub const SEVERITY_2: Color = Color::new("#f59e0b");
pub const SEVERITY_3: Color = Color::new("#2563eb");
pub const DEFAULT_COLOR: Color = Color::new("#6b7280");

pub const END_OF_LIFE: Color = Color::new("#ef4444");
pub const UNAPPROVED: Color = Color::new("#f97316");
pub const SUPPORTED: Color = Color::new("#10b981");

/// Categorical palette for series without semantic meaning
pub const PALETTE: [Color; 10] = [
    Color::new("#3b82f6"),
    Color::new("#10b981"),
    Color::new("#f59e0b"),
    Color::new("#ef4444"),
    Color::new("#8b5cf6"),
    Color::new("#ec4899"),
    Color::new("#06b6d4"),
    Color::new("#84cc16"),
    Color::new("#f97316"),
    Color::new("#6366f1"),
];

/// Severity keywords in priority order; the first rule with a match wins
const SEVERITY_RULES: &[(&[&str], Color)] = &[
    (&["gold", "platinum", "critical"], SEVERITY_1),
    (&["silver", "high"], SEVERITY_2),
    (&["bronze", "medium"], SEVERITY_3),
];

/// Coloring ruleset for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ruleset {
    Severity,
    Lifecycle,
    Palette,
}

/// What a color is derived from
#[derive(Debug, Clone, Copy)]
pub enum ColorKey<'a> {
    Name(&'a str),
    Index(usize),
    Status(&'a LifecycleStatus),
}

/// Resolve a color for a key under a ruleset
///
/// A key that does not carry what the ruleset reads (an index under
/// `Severity`, a name under `Palette`) resolves to `DEFAULT_COLOR`. Under
/// `Lifecycle` a name is parsed as a status label.
pub fn color_for(key: ColorKey<'_>, ruleset: Ruleset) -> Color {
    match (ruleset, key) {
        (Ruleset::Severity, ColorKey::Name(name)) => severity_color(name),
        (Ruleset::Lifecycle, ColorKey::Status(status)) => lifecycle_color(status),
        (Ruleset::Lifecycle, ColorKey::Name(label)) => {
            lifecycle_color(&LifecycleStatus::parse(label))
        }
        (Ruleset::Palette, ColorKey::Index(index)) => palette_color(index),
        _ => DEFAULT_COLOR,
    }
}

/// Keyword-based color, case-insensitive substring match
pub fn severity_color(name: &str) -> Color {
    let lower = name.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

pub fn lifecycle_color(status: &LifecycleStatus) -> Color {
    match status {
        LifecycleStatus::EndOfLife => END_OF_LIFE,
        LifecycleStatus::Unapproved => UNAPPROVED,
        LifecycleStatus::Other(_) => SUPPORTED,
    }
}

pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}
