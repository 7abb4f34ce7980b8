//! # lstablelib
//!
//! Directory listings rendered as aligned, optionally colored tables.
//!
//! ## Overview
//!
//! The set of columns a listing shows depends on the requested detail level,
//! the host platform and whether the directory is under git. This library
//! decides that column set and renders entries into it:
//!
//! - **Columns**: [`ColumnKey`] and the [`ColumnRegistry`] of header texts and
//!   alignment
//! - **Selection**: [`select_columns`] orders the detail groups, filters them
//!   against the selection and separates them with spacer columns
//! - **Table**: [`Table`] is the header/row skeleton built from the keys
//! - **Output**: [`OutputWriter`] fills the table and prints it on a
//!   [`Console`], optionally exporting it as HTML
//!
//! Entry metadata ([`collect_entries`]), git status ([`GitRepo`]), icons and
//! color themes feed the table through [`RowData`].
//!
//! ## Example
//!
//! ```rust
//! use lstablelib::{select_columns, ColumnKey, ColumnRegistry, Details, LayoutOptions, RowData, Table};
//!
//! let options = LayoutOptions::new()
//!     .details(Details::parse("size,perms"))
//!     .align(false);
//! let keys = select_columns(&options);
//! assert_eq!(keys.len(), 6);
//!
//! let registry = ColumnRegistry::new(options.align);
//! let mut table = Table::assemble(&keys, &registry, options.details.is_enabled());
//! table.add_row(&RowData::new().with(ColumnKey::Name, "Cargo.toml").with(ColumnKey::Size, "120"));
//! assert!(table.render_plain().contains("Cargo.toml"));
//! ```

pub mod column;
pub mod entry;
pub mod error;
pub mod git;
pub mod icons;
pub mod options;
pub mod output;
pub mod row;
pub mod select;
pub mod table;
pub mod theme;

pub use column::{ColumnKey, ColumnRegistry, ColumnSpec, Justify};
pub use entry::{collect_entries, Entry, ListOptions};
pub use error::LstableError;
pub use git::GitRepo;
pub use icons::EntryKind;
pub use options::{Details, IconMode, LayoutOptions, Platform};
pub use output::{Console, Export, OutputWriter};
pub use row::{Cell, RowData};
pub use select::{select_columns, ColumnGroup};
pub use table::{Table, TableColumn};
pub use theme::{ColorTheme, Tone};

/// Re-export OutputMode for callers
pub use standout_render::OutputMode;

/// Result type for lstablelib operations
pub type Result<T> = std::result::Result<T, LstableError>;
