//! Table skeleton and layout.
//!
//! A [`Table`] is built from the ordered column keys and the registry, then
//! receives one row per entry. Layout is delegated to standout's tabular
//! formatter: each column becomes a [`Column`] whose width is fixed by the
//! registry or bounded by its widest cell, and columns are joined by a single
//! space. There are no borders.
//!
//! The data flow is:
//! 1. Column keys (`select_columns`)
//! 2. Table (skeleton: headers + attributes, then rows)
//! 3. Rendered lines (segments of text with a tone), ready for a console

use serde::Serialize;
use standout_render::tabular::{
    display_width, pad_left, pad_right, Column, FlatDataSpec, ResolvedWidths, TabularFormatter,
    Width,
};

use crate::column::{ColumnKey, ColumnRegistry, Justify};
use crate::row::{Cell, RowData};
use crate::theme::Tone;

const COLUMN_SEPARATOR: &str = " ";

/// One column of the skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub key: ColumnKey,
    /// Header text; empty for pseudo-columns and spacers
    pub header: String,
    pub justify: Justify,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
}

impl TableColumn {
    fn from_registry(key: ColumnKey, registry: &ColumnRegistry) -> Self {
        match registry.lookup(key) {
            Some(spec) => TableColumn {
                key,
                header: spec.display_name.to_string(),
                justify: spec.justify,
                width: spec.width,
            },
            None => TableColumn {
                key,
                header: String::new(),
                justify: Justify::Left,
                width: None,
            },
        }
    }

    /// The tabular column for this skeleton column.
    fn layout(&self, width: Width) -> Column {
        let column = Column::new(width)
            .named(self.key.as_str())
            .header(self.header.clone())
            .null_repr("");
        match self.justify {
            Justify::Left => column,
            Justify::Right => column.right(),
        }
    }

    fn width_strategy(&self) -> Width {
        match self.width {
            Some(width) => Width::Fixed(width),
            None => Width::Bounded {
                min: None,
                max: None,
            },
        }
    }
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Option<Tone>,
    pub underline: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
            underline: false,
        }
    }
}

/// One rendered line of the table.
pub type Line = Vec<Segment>;

/// Table-ready listing data.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub show_header: bool,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build the skeleton for `keys`, in order.
    ///
    /// Keys missing from the registry still get a column, with no header
    /// and default attributes.
    pub fn assemble(keys: &[ColumnKey], registry: &ColumnRegistry, show_header: bool) -> Self {
        Table {
            columns: keys
                .iter()
                .map(|&key| TableColumn::from_registry(key, registry))
                .collect(),
            show_header,
            rows: Vec::new(),
        }
    }

    /// The column keys, in display order.
    pub fn keys(&self) -> Vec<ColumnKey> {
        self.columns.iter().map(|column| column.key).collect()
    }

    /// Append a row with one cell per column.
    pub fn add_row(&mut self, data: &RowData) {
        let cells = data.cells_for(&self.keys());
        self.rows.push(cells);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Column layout as a tabular spec. Unsized columns are bounded by their
    /// content.
    pub fn layout_spec(&self) -> FlatDataSpec {
        FlatDataSpec::builder()
            .columns(self.columns.iter().map(|c| c.layout(c.width_strategy())))
            .separator(COLUMN_SEPARATOR)
            .build()
    }

    /// Resolve column widths from the cells, and the headers when shown.
    pub fn widths(&self) -> ResolvedWidths {
        let mut data: Vec<Vec<&str>> = Vec::with_capacity(self.rows.len() + 1);
        if self.show_header {
            data.push(self.headers());
        }
        data.extend(
            self.rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.text.as_str()).collect()),
        );
        // No spare width: bounded columns stay as wide as their content.
        self.layout_spec().resolve_widths_from_data(0, &data)
    }

    /// A formatter with every column fixed at its resolved width.
    pub fn formatter(&self) -> TabularFormatter {
        let widths = self.widths();
        let spec = FlatDataSpec::builder()
            .columns(
                self.columns
                    .iter()
                    .zip(&widths.widths)
                    .map(|(column, &width)| column.layout(Width::Fixed(width))),
            )
            .separator(COLUMN_SEPARATOR)
            .build();
        let total = widths.total() + spec.decorations.overhead(spec.num_columns());
        TabularFormatter::new(&spec, total)
    }

    /// Lay the table out as lines of segments.
    pub fn render(&self) -> Vec<Line> {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        if self.show_header {
            let header: Vec<Cell> = self.columns.iter().map(|c| Cell::plain(&*c.header)).collect();
            lines.push(self.render_line(&header, &widths, true));
        }
        for row in &self.rows {
            lines.push(self.render_line(row, &widths, false));
        }
        lines
    }

    /// Render without any styling.
    pub fn render_plain(&self) -> String {
        let formatter = self.formatter();
        let mut out = String::new();
        if self.show_header {
            out.push_str(formatter.format_row(&self.headers()).trim_end());
            out.push('\n');
        }
        for row in &self.rows {
            let values: Vec<&str> = row.iter().map(|cell| cell.text.as_str()).collect();
            out.push_str(formatter.format_row(&values).trim_end());
            out.push('\n');
        }
        out
    }

    fn render_line(&self, cells: &[Cell], widths: &ResolvedWidths, header: bool) -> Line {
        let mut line = Vec::new();
        for (index, (column, cell)) in self.columns.iter().zip(cells).enumerate() {
            if index > 0 {
                line.push(Segment::plain(COLUMN_SEPARATOR));
            }
            let width = widths.get(index).unwrap_or_else(|| display_width(&cell.text));
            let text = Segment {
                text: cell.text.clone(),
                tone: cell.tone,
                underline: header && !cell.is_empty(),
            };
            match column.justify {
                Justify::Left => {
                    let padded = pad_right(&cell.text, width);
                    line.push(text);
                    line.push(Segment::plain(&padded[cell.text.len()..]));
                }
                Justify::Right => {
                    let padded = pad_left(&cell.text, width);
                    line.push(Segment::plain(&padded[..padded.len() - cell.text.len()]));
                    line.push(text);
                }
            }
        }
        trim_trailing_space(&mut line);
        line
    }
}

/// Drop whitespace-only padding at the end of a line.
fn trim_trailing_space(line: &mut Line) {
    while let Some(last) = line.last_mut() {
        if last.underline || last.tone.is_some() {
            break;
        }
        let trimmed = last.text.trim_end_matches(' ').len();
        last.text.truncate(trimmed);
        if !last.text.is_empty() {
            break;
        }
        line.pop();
    }
}
