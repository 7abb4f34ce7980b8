//! Color themes.
//!
//! Cells carry an optional [`Tone`] rather than a concrete color. A
//! [`ColorTheme`] resolves tones to a 256-color index for the terminal and to
//! a hex color for HTML export, and supplies the page background and
//! foreground used by the export template.
//!
//! Terminal output goes through a standout [`Theme`] whose style names are
//! the tone names plus [`HEADER_STYLE`].

use console::Style;
use serde::{Deserialize, Serialize};
use standout_render::Theme;

use crate::error::LstableError;
use crate::Result;

/// Semantic color role of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Directory,
    Symlink,
    Executable,
    /// Hidden entries and secondary information
    Muted,
    /// Git: changed since staged
    Modified,
    /// Git: not in the index
    Untracked,
}

/// Style name for header text.
pub const HEADER_STYLE: &str = "header";

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Directory,
        Tone::Symlink,
        Tone::Executable,
        Tone::Muted,
        Tone::Modified,
        Tone::Untracked,
    ];

    /// Name of the theme style for this tone.
    pub fn style_name(&self) -> &'static str {
        match self {
            Tone::Directory => "directory",
            Tone::Symlink => "symlink",
            Tone::Executable => "executable",
            Tone::Muted => "muted",
            Tone::Modified => "modified",
            Tone::Untracked => "untracked",
        }
    }
}

/// A color in both of the forms the renderers need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColor {
    pub ansi256: u8,
    pub hex: &'static str,
}

const fn color(ansi256: u8, hex: &'static str) -> ThemeColor {
    ThemeColor { ansi256, hex }
}

/// A named set of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    pub name: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
    tones: [(Tone, ThemeColor); 6],
}

// Solarized accents are shared by the dark and light variants.
const SOLARIZED_TONES: [(Tone, ThemeColor); 6] = [
    (Tone::Directory, color(33, "#268bd2")),
    (Tone::Symlink, color(37, "#2aa198")),
    (Tone::Executable, color(64, "#859900")),
    (Tone::Muted, color(240, "#586e75")),
    (Tone::Modified, color(136, "#b58900")),
    (Tone::Untracked, color(160, "#dc322f")),
];

impl ColorTheme {
    pub fn solarized() -> Self {
        Self {
            name: "solarized",
            background: "#002b36",
            foreground: "#839496",
            tones: SOLARIZED_TONES,
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            background: "#fdf6e3",
            foreground: "#657b83",
            tones: SOLARIZED_TONES,
        }
    }

    /// Look up a built-in theme by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "solarized" | "solarized-dark" => Ok(Self::solarized()),
            "solarized-light" => Ok(Self::solarized_light()),
            _ => Err(LstableError::UnknownTheme(name.to_string())),
        }
    }

    pub fn color(&self, tone: Tone) -> ThemeColor {
        self.tones
            .iter()
            .find(|(t, _)| *t == tone)
            .map(|(_, c)| *c)
            .unwrap_or(color(7, self.foreground))
    }

    /// Terminal style for a tone.
    pub fn style(&self, tone: Tone) -> Style {
        Style::new().color256(self.color(tone).ansi256)
    }

    /// The standout theme for terminal rendering.
    ///
    /// Styles are forced on; the output mode decides whether style tags are
    /// applied or stripped.
    pub fn render_theme(&self) -> Theme {
        Tone::ALL.iter().fold(
            Theme::named(self.name).add(HEADER_STYLE, Style::new().underlined().force_styling(true)),
            |theme, &tone| theme.add(tone.style_name(), self.style(tone).force_styling(true)),
        )
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::solarized()
    }
}
