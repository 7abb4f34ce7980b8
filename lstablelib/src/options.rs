//! Input options for column layout.
//!
//! This module contains the configuration types that decide which columns a
//! listing shows. They are plain values; parsing them from user input is the
//! caller's job.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::column::ColumnKey;

/// Token that requests every detail column.
pub const WILDCARD: &str = "+";

/// Which detail columns the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Details {
    /// No detail rendering at all
    #[default]
    Off,
    /// Detail rendering with the given column tokens (may contain [`WILDCARD`])
    Selected(Vec<String>),
}

impl Details {
    /// Every detail column.
    pub fn all() -> Self {
        Details::Selected(vec![WILDCARD.to_string()])
    }

    /// The set used when details are requested without naming columns.
    pub fn standard() -> Self {
        Details::from_tokens(["perms", "user", "group", "size", "mtime", "git"])
    }

    /// Build a selection from individual tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Details::Selected(tokens.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated selection such as `"size,perms"` or `"+"`.
    pub fn parse(list: &str) -> Self {
        Details::from_tokens(
            list.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty()),
        )
    }

    /// Whether detail rendering is on. An empty selection counts as off.
    pub fn is_enabled(&self) -> bool {
        match self {
            Details::Off => false,
            Details::Selected(tokens) => !tokens.is_empty(),
        }
    }

    /// Whether the wildcard token is present.
    pub fn is_all(&self) -> bool {
        self.tokens().iter().any(|token| token == WILDCARD)
    }

    /// Whether `key` was named explicitly. Unrecognized tokens never match.
    pub fn names(&self, key: ColumnKey) -> bool {
        self.tokens().iter().any(|token| token == key.as_str())
    }

    fn tokens(&self) -> &[String] {
        match self {
            Details::Off => &[],
            Details::Selected(tokens) => tokens,
        }
    }
}

/// Icon display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconMode {
    /// No icon column
    #[default]
    None,
    /// Emoji glyphs
    Emoji,
    /// Nerd Font glyphs
    Nerd,
}

impl IconMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, IconMode::None)
    }
}

impl FromStr for IconMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(IconMode::None),
            "emoji" => Ok(IconMode::Emoji),
            "nerd" | "nerdfont" => Ok(IconMode::Nerd),
            _ => Err(format!("Unknown icon mode: {}", s)),
        }
    }
}

/// Capabilities of the host platform that affect the column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Files have a user/group owner
    pub has_ownership_model: bool,
}

impl Platform {
    /// Decide the capabilities of the platform this binary was built for.
    pub fn current() -> Self {
        Self {
            has_ownership_model: !cfg!(windows),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Everything the column selector looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub details: Details,
    pub icons: IconMode,
    /// Align names so leading dots form their own column
    pub align: bool,
    pub platform: Platform,
    /// The listed directory is inside a git work tree
    pub git_managed: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            details: Details::Off,
            icons: IconMode::None,
            align: true,
            platform: Platform::current(),
            git_managed: false,
        }
    }
}

impl LayoutOptions {
    /// Create options with defaults: no details, no icons, aligned names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the detail selection
    pub fn details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    /// Builder: set the icon mode
    pub fn icons(mut self, icons: IconMode) -> Self {
        self.icons = icons;
        self
    }

    /// Builder: set name alignment
    pub fn align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Builder: set whether the platform has user/group ownership
    pub fn ownership(mut self, has_ownership_model: bool) -> Self {
        self.platform.has_ownership_model = has_ownership_model;
        self
    }

    /// Builder: set whether the directory is git-managed
    pub fn git_managed(mut self, git_managed: bool) -> Self {
        self.git_managed = git_managed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_off_is_disabled() {
        assert!(!Details::Off.is_enabled());
        assert!(!Details::Selected(vec![]).is_enabled());
        assert!(Details::all().is_enabled());
    }

    #[test]
    fn test_details_parse() {
        let details = Details::parse("size, perms,,");
        assert_eq!(
            details,
            Details::Selected(vec!["size".to_string(), "perms".to_string()])
        );
        assert!(details.names(ColumnKey::Size));
        assert!(details.names(ColumnKey::Perms));
        assert!(!details.names(ColumnKey::Type));
        assert!(!details.is_all());
    }

    #[test]
    fn test_details_parse_empty_is_disabled() {
        assert!(!Details::parse("").is_enabled());
    }

    #[test]
    fn test_details_wildcard() {
        let details = Details::parse("+");
        assert!(details.is_all());
        assert!(!details.names(ColumnKey::Size));
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let details = Details::parse("colour,SIZE");
        assert!(details.is_enabled());
        assert!(!details.names(ColumnKey::Size));
        assert!(!details.is_all());
    }

    #[test]
    fn test_icon_mode_from_str() {
        assert_eq!(IconMode::from_str("none").unwrap(), IconMode::None);
        assert_eq!(IconMode::from_str("Emoji").unwrap(), IconMode::Emoji);
        assert_eq!(IconMode::from_str("nerd").unwrap(), IconMode::Nerd);
        assert!(IconMode::from_str("ascii").is_err());
        assert!(!IconMode::None.is_enabled());
        assert!(IconMode::Nerd.is_enabled());
    }

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .details(Details::all())
            .icons(IconMode::Emoji)
            .align(false)
            .ownership(false)
            .git_managed(true);
        assert!(options.details.is_all());
        assert_eq!(options.icons, IconMode::Emoji);
        assert!(!options.align);
        assert!(!options.platform.has_ownership_model);
        assert!(options.git_managed);
    }
}
