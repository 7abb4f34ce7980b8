//! Column keys and the registry of their display metadata.
//!
//! Every column a listing can show is named by a [`ColumnKey`]. The
//! [`ColumnRegistry`] maps a key to its [`ColumnSpec`]: the header text and
//! the structural attributes (justification, fixed width) the table applies
//! to that column.
//!
//! Two keys are pseudo-columns with an empty header: `type` carries the
//! entry-type glyph shown beside the permissions, and `icon` carries the glyph
//! shown before the name. The `spacer` key has no registry entry at all; it
//! only exists to separate column groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    /// Empty separator between column groups
    Spacer,
    Inode,
    Links,
    /// Entry type glyph, shown beside the permissions
    Type,
    Perms,
    User,
    Group,
    Size,
    Ctime,
    Mtime,
    Atime,
    Git,
    /// Icon glyph, shown before the name
    Icon,
    Name,
}

impl ColumnKey {
    /// All keys, in declaration order.
    pub const ALL: [ColumnKey; 14] = [
        ColumnKey::Spacer,
        ColumnKey::Inode,
        ColumnKey::Links,
        ColumnKey::Type,
        ColumnKey::Perms,
        ColumnKey::User,
        ColumnKey::Group,
        ColumnKey::Size,
        ColumnKey::Ctime,
        ColumnKey::Mtime,
        ColumnKey::Atime,
        ColumnKey::Git,
        ColumnKey::Icon,
        ColumnKey::Name,
    ];

    /// The lowercase key string, as used in detail selections.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::Spacer => "spacer",
            ColumnKey::Inode => "inode",
            ColumnKey::Links => "links",
            ColumnKey::Type => "type",
            ColumnKey::Perms => "perms",
            ColumnKey::User => "user",
            ColumnKey::Group => "group",
            ColumnKey::Size => "size",
            ColumnKey::Ctime => "ctime",
            ColumnKey::Mtime => "mtime",
            ColumnKey::Atime => "atime",
            ColumnKey::Git => "git",
            ColumnKey::Icon => "icon",
            ColumnKey::Name => "name",
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown column: {}", s))
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Right,
}

/// Display metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub key: ColumnKey,
    /// Header text; empty for pseudo-columns
    pub display_name: &'static str,
    pub justify: Justify,
    /// Fixed cell width, if any
    pub width: Option<usize>,
}

impl ColumnSpec {
    fn new(key: ColumnKey, display_name: &'static str) -> Self {
        Self {
            key,
            display_name,
            justify: Justify::Left,
            width: None,
        }
    }

    fn right(mut self) -> Self {
        self.justify = Justify::Right;
        self
    }

    fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// Static mapping from column key to display metadata.
///
/// Built once per process. The only variation is the header of the `name`
/// column, which gets a leading space when names are aligned so the header
/// lines up with names that are not prefixed by a dot.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    specs: Vec<ColumnSpec>,
}

impl ColumnRegistry {
    pub fn new(align: bool) -> Self {
        let specs = ColumnKey::ALL
            .iter()
            .filter_map(|&key| spec_for(key, align))
            .collect();
        Self { specs }
    }

    /// Look up the spec for a key. `None` means "no header, default attributes".
    pub fn lookup(&self, key: ColumnKey) -> Option<&ColumnSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }
}

/// The single place where column metadata is declared. The match is
/// exhaustive, so a new key cannot be added without deciding its spec.
fn spec_for(key: ColumnKey, align: bool) -> Option<ColumnSpec> {
    let spec = match key {
        ColumnKey::Spacer => return None,
        ColumnKey::Inode => ColumnSpec::new(key, "inode"),
        ColumnKey::Links => ColumnSpec::new(key, "Link#").right(),
        ColumnKey::Type => ColumnSpec::new(key, ""),
        ColumnKey::Perms => ColumnSpec::new(key, "Permissions"),
        ColumnKey::User => ColumnSpec::new(key, "User"),
        ColumnKey::Group => ColumnSpec::new(key, "Group"),
        ColumnKey::Size => ColumnSpec::new(key, "Size").right(),
        ColumnKey::Ctime => ColumnSpec::new(key, "Created at"),
        ColumnKey::Mtime => ColumnSpec::new(key, "Modified at"),
        ColumnKey::Atime => ColumnSpec::new(key, "Accessed at"),
        ColumnKey::Git => ColumnSpec::new(key, "Git"),
        ColumnKey::Icon => ColumnSpec::new(key, "").width(2),
        ColumnKey::Name => ColumnSpec::new(key, if align { " Name" } else { "Name" }),
    };
    Some(spec)
}
