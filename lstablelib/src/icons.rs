//! Icon glyphs for the `icon` pseudo-column.

use crate::options::IconMode;

/// Coarse classification of an entry, enough to pick a glyph and a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Symlink,
    Executable,
    File,
}

/// Glyph for `kind` under `mode`. `None` when icons are off.
pub fn glyph(mode: IconMode, kind: EntryKind) -> Option<&'static str> {
    let glyph = match (mode, kind) {
        (IconMode::None, _) => return None,
        (IconMode::Emoji, EntryKind::Directory) => "\u{1f4c1}",
        (IconMode::Emoji, EntryKind::Symlink) => "\u{1f517}",
        (IconMode::Emoji, EntryKind::Executable) => "\u{26a1}",
        (IconMode::Emoji, EntryKind::File) => "\u{1f4c4}",
        (IconMode::Nerd, EntryKind::Directory) => "\u{f115}",
        (IconMode::Nerd, EntryKind::Symlink) => "\u{f0c1}",
        (IconMode::Nerd, EntryKind::Executable) => "\u{f489}",
        (IconMode::Nerd, EntryKind::File) => "\u{f15b}",
    };
    Some(glyph)
}
