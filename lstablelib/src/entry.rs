//! Directory entry collection.
//!
//! Reads the immediate children of a directory and turns each one into
//! [`RowData`]: one pre-rendered cell per column key. The table decides which
//! of these cells are shown; this module fills every column it can.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::column::ColumnKey;
use crate::error::LstableError;
use crate::git::GitRepo;
use crate::icons::{glyph, EntryKind};
use crate::options::IconMode;
use crate::row::{Cell, RowData};
use crate::theme::Tone;
use crate::Result;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Options for collecting entries.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Include entries whose name starts with a dot
    pub all: bool,
    /// Prefix names without a leading dot with a space
    pub align: bool,
    pub icons: IconMode,
    /// Names matching any of these are skipped
    pub exclude: Vec<Pattern>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: include hidden entries
    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Builder: align names on their leading dot
    pub fn align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Builder: set the icon mode
    pub fn icons(mut self, icons: IconMode) -> Self {
        self.icons = icons;
        self
    }

    /// Add an exclude pattern, matched against entry names.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        let pat = Pattern::new(pattern).map_err(|e| LstableError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.exclude.push(pat);
        Ok(self)
    }

    fn is_listed(&self, name: &str) -> bool {
        if !self.all && name.starts_with('.') {
            return false;
        }
        !self.exclude.iter().any(|pattern| pattern.matches(name))
    }
}

/// One listed entry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    /// `None` when the entry's metadata could not be read
    pub row: Option<RowData>,
}

/// List the children of `dir`, sorted by name.
pub fn collect_entries(
    dir: impl AsRef<Path>,
    options: &ListOptions,
    git: Option<&GitRepo>,
) -> Result<Vec<Entry>> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Err(LstableError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LstableError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();

    for item in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                return Err(LstableError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping entry");
                if let Some(path) = e.path() {
                    let name = file_name(path);
                    if options.is_listed(&name) {
                        entries.push(Entry { name, row: None });
                    }
                }
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if !options.is_listed(&name) {
            continue;
        }

        let row = match entry.metadata() {
            Ok(metadata) => Some(build_row(&name, entry.path(), &metadata, options, git)),
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "failed to read metadata");
                None
            }
        };

        entries.push(Entry { name, row });
    }

    entries.sort_by_cached_key(|e| sort_key(&e.name));
    debug!(dir = %dir.display(), count = entries.len(), "collected entries");

    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Case-insensitive, ignoring a single leading dot.
fn sort_key(name: &str) -> String {
    name.strip_prefix('.').unwrap_or(name).to_lowercase()
}

fn build_row(
    name: &str,
    path: &Path,
    metadata: &Metadata,
    options: &ListOptions,
    git: Option<&GitRepo>,
) -> RowData {
    let kind = entry_kind(metadata);
    let mut row = RowData::new();

    add_unix_cells(&mut row, metadata);
    row.insert(ColumnKey::Type, type_char(metadata).to_string());
    row.insert(ColumnKey::Perms, format_permissions(metadata));
    if !metadata.is_dir() {
        row.insert(ColumnKey::Size, format_size(metadata.len()));
    }

    let created = metadata.created().ok().or_else(|| change_time(metadata));
    if let Some(time) = created {
        row.insert(ColumnKey::Ctime, format_time(time));
    }
    if let Ok(time) = metadata.modified() {
        row.insert(ColumnKey::Mtime, format_time(time));
    }
    if let Ok(time) = metadata.accessed() {
        row.insert(ColumnKey::Atime, format_time(time));
    }

    if let Some(repo) = git {
        row.insert(ColumnKey::Git, repo.status_of(path, metadata));
    }
    if let Some(icon) = glyph(options.icons, kind) {
        row.insert(ColumnKey::Icon, icon);
    }

    let tone = match kind {
        _ if name.starts_with('.') => Some(Tone::Muted),
        EntryKind::Directory => Some(Tone::Directory),
        EntryKind::Symlink => Some(Tone::Symlink),
        EntryKind::Executable => Some(Tone::Executable),
        EntryKind::File => None,
    };
    row.insert(
        ColumnKey::Name,
        Cell::plain(display_name(name, path, kind, options.align)).with_tone(tone),
    );

    row
}

fn display_name(name: &str, path: &Path, kind: EntryKind, align: bool) -> String {
    let mut display = String::new();
    if align && !name.starts_with('.') {
        display.push(' ');
    }
    display.push_str(name);
    match kind {
        EntryKind::Directory => display.push('/'),
        EntryKind::Symlink => {
            if let Ok(target) = std::fs::read_link(path) {
                display.push_str(&format!(" -> {}", target.display()));
            }
        }
        _ => {}
    }
    display
}

fn entry_kind(metadata: &Metadata) -> EntryKind {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if is_executable(metadata) {
        EntryKind::Executable
    } else {
        EntryKind::File
    }
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}

fn type_char(metadata: &Metadata) -> char {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        return 'l';
    }
    if file_type.is_dir() {
        return 'd';
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_fifo() {
            return 'p';
        }
        if file_type.is_socket() {
            return 's';
        }
        if file_type.is_block_device() {
            return 'b';
        }
        if file_type.is_char_device() {
            return 'c';
        }
    }
    '-'
}

#[cfg(unix)]
fn format_permissions(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    let mode = metadata.permissions().mode();
    const BITS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    BITS.iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

#[cfg(not(unix))]
fn format_permissions(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--".to_string()
    } else {
        "rw-".to_string()
    }
}

#[cfg(unix)]
fn add_unix_cells(row: &mut RowData, metadata: &Metadata) {
    use std::os::unix::fs::MetadataExt;
    row.insert(ColumnKey::Inode, metadata.ino().to_string());
    row.insert(ColumnKey::Links, metadata.nlink().to_string());
    row.insert(ColumnKey::User, metadata.uid().to_string());
    row.insert(ColumnKey::Group, metadata.gid().to_string());
}

#[cfg(not(unix))]
fn add_unix_cells(_row: &mut RowData, _metadata: &Metadata) {}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    let secs = u64::try_from(metadata.ctime()).ok()?;
    SystemTime::UNIX_EPOCH.checked_add(std::time::Duration::from_secs(secs))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIME_FORMAT).to_string()
}

/// Human-readable size with binary units: `512`, `1.5k`, `12.0M`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["k", "M", "G", "T", "P"];
    if bytes < 1024 {
        return bytes.to_string();
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}
