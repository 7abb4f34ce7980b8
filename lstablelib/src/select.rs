//! Column selection: which columns a listing shows, and in what order.
//!
//! Detail columns are toggled in groups. A group survives when at least one
//! of its columns is requested; retained groups are separated by a spacer
//! column. The name group always comes last.

use tracing::debug;

use crate::column::ColumnKey;
use crate::options::{Details, LayoutOptions};

/// Columns toggled together as one unit.
pub type ColumnGroup = Vec<ColumnKey>;

/// Compute the ordered list of column keys to display.
///
/// Pure function of `options`: the same options always give the same list.
pub fn select_columns(options: &LayoutOptions) -> Vec<ColumnKey> {
    let mut groups: Vec<ColumnGroup> = Vec::new();

    if options.details.is_enabled() {
        groups.extend(
            candidate_groups(options)
                .into_iter()
                .map(|group| filter_group(group, &options.details))
                .filter(|group| !group.is_empty()),
        );
    }

    groups.push(name_group(options));

    let columns = join_with_spacers(groups);
    debug!(?columns, "selected columns");
    columns
}

/// Detail groups in display order, before filtering.
fn candidate_groups(options: &LayoutOptions) -> Vec<ColumnGroup> {
    let mut groups = vec![
        vec![ColumnKey::Inode, ColumnKey::Links],
        vec![ColumnKey::Type, ColumnKey::Perms],
        vec![ColumnKey::Size],
        vec![ColumnKey::Ctime, ColumnKey::Mtime, ColumnKey::Atime],
    ];
    if options.platform.has_ownership_model {
        groups.insert(3, vec![ColumnKey::User, ColumnKey::Group]);
    }
    if options.git_managed {
        groups.push(vec![ColumnKey::Git]);
    }
    groups
}

fn filter_group(group: ColumnGroup, details: &Details) -> ColumnGroup {
    group
        .into_iter()
        .filter(|&key| column_requested(key, details))
        .collect()
}

/// A column is shown when named in the selection or when the wildcard is given.
pub fn column_requested(key: ColumnKey, details: &Details) -> bool {
    details.is_all() || details.names(toggle_for(key))
}

/// The key whose token toggles `key`. The type glyph has no toggle of its
/// own and follows the permissions column.
fn toggle_for(key: ColumnKey) -> ColumnKey {
    match key {
        ColumnKey::Type => ColumnKey::Perms,
        other => other,
    }
}

fn name_group(options: &LayoutOptions) -> ColumnGroup {
    if options.icons.is_enabled() {
        vec![ColumnKey::Icon, ColumnKey::Name]
    } else {
        vec![ColumnKey::Name]
    }
}

/// Flatten non-empty groups, putting a spacer after every group but the last.
fn join_with_spacers(groups: Vec<ColumnGroup>) -> Vec<ColumnKey> {
    let last = groups.len().saturating_sub(1);
    let mut columns = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        columns.extend(group);
        if index != last {
            columns.push(ColumnKey::Spacer);
        }
    }
    columns
}
