//! Output: fill the table, print it, and optionally export it as HTML.
//!
//! The [`Console`] is the display surface. It is created once per process
//! and passed in explicitly. Printing goes through standout: laid-out lines
//! carry style tags that the console's [`OutputMode`] applies or strips, and
//! structured modes serialize the table instead. When export is requested
//! the console records everything it prints, so the same content can later
//! be serialized to a document.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use standout_render::{render_auto, render_with_output, OutputMode, Theme};
use tracing::{debug, info};

use crate::error::LstableError;
use crate::row::RowData;
use crate::table::{Line, Segment, Table};
use crate::theme::{ColorTheme, HEADER_STYLE};
use crate::Result;

/// Prints pre-laid-out lines. Style tags in a line are resolved by the theme.
const LINES_TEMPLATE: &str = "{% for line in lines %}{{ line }}\n{% endfor %}";

/// Body of the export document. `{background}`, `{foreground}` and `{code}`
/// are substituted.
const HTML_BODY: &str = r#"<div
    style="background-color: {background}; color: {foreground};"
    class="language-">
  <pre style="color: inherit;"><code style="color: inherit;">{code}</code></pre>
</div>
"#;

const HTML_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
</head>
<body>
{body}</body>
</html>
"#;

#[derive(Serialize)]
struct LinesContext<'a> {
    lines: &'a [String],
}

/// The display surface.
pub struct Console {
    out: Box<dyn Write>,
    mode: OutputMode,
    record: bool,
    recorded: Vec<Line>,
    styles: Theme,
}

impl Console {
    /// A console writing to `out` in `mode`. `record` keeps a copy of every
    /// printed line for export.
    pub fn new(out: Box<dyn Write>, mode: OutputMode, record: bool) -> Self {
        Self {
            out,
            mode,
            record,
            recorded: Vec::new(),
            styles: ColorTheme::default().render_theme(),
        }
    }

    /// Builder: set the theme used for terminal colors
    pub fn theme(mut self, theme: &ColorTheme) -> Self {
        self.styles = theme.render_theme();
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    /// Print rendered lines.
    pub fn print_lines(&mut self, lines: Vec<Line>) -> Result<()> {
        let markup: Vec<String> = lines
            .iter()
            .map(|line| line.iter().map(segment_markup).collect())
            .collect();
        let rendered = render_with_output(
            LINES_TEMPLATE,
            &LinesContext { lines: &markup },
            &self.styles,
            self.text_mode(),
        )?;
        self.out.write_all(rendered.as_bytes())?;
        if self.record {
            self.recorded.extend(lines);
        }
        Ok(())
    }

    /// Print a single unstyled line.
    pub fn println(&mut self, text: &str) -> Result<()> {
        self.print_lines(vec![vec![Segment::plain(text)]])
    }

    /// Serialize `data` in the console's structured mode.
    pub fn print_data<T: Serialize>(&mut self, data: &T) -> Result<()> {
        let rendered = render_auto(LINES_TEMPLATE, data, &self.styles, self.mode)?;
        writeln!(self.out, "{}", rendered.trim_end())?;
        if self.record {
            self.recorded
                .extend(rendered.lines().map(|line| vec![Segment::plain(line)]));
        }
        Ok(())
    }

    /// Print a status message. Status messages are never recorded.
    pub fn status(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    /// Structured modes print their surrounding text unstyled.
    fn text_mode(&self) -> OutputMode {
        if is_structured(self.mode) {
            OutputMode::Text
        } else {
            self.mode
        }
    }

    /// Serialize the recorded output as an HTML document with inline styles.
    pub fn export_html(&self, theme: &ColorTheme) -> String {
        let code: String = self
            .recorded
            .iter()
            .map(|line| {
                let mut html: String = line.iter().map(|s| segment_html(s, theme)).collect();
                html.push('\n');
                html
            })
            .collect();
        let body = HTML_BODY
            .replace("{background}", theme.background)
            .replace("{foreground}", theme.foreground)
            .replace("{code}", &code);
        HTML_PAGE.replace("{body}", &body)
    }

    /// Write the recorded output to `path` as HTML, then clear the record.
    pub fn save_html(&mut self, path: &Path, theme: &ColorTheme) -> Result<()> {
        let export_err = |source: io::Error| LstableError::Export {
            path: path.to_path_buf(),
            source,
        };
        {
            let file = File::create(path).map_err(export_err)?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(self.export_html(theme).as_bytes())
                .map_err(export_err)?;
            writer.flush().map_err(export_err)?;
        }
        self.recorded.clear();
        Ok(())
    }
}

fn is_structured(mode: OutputMode) -> bool {
    matches!(
        mode,
        OutputMode::Json | OutputMode::Yaml | OutputMode::Xml | OutputMode::Csv
    )
}

fn tagged(style: &str, text: &str) -> String {
    format!("[{style}]{text}[/{style}]")
}

fn segment_markup(segment: &Segment) -> String {
    if segment.text.is_empty() {
        return String::new();
    }
    let mut markup = match segment.tone {
        Some(tone) => tagged(tone.style_name(), &segment.text),
        None => segment.text.clone(),
    };
    if segment.underline {
        markup = tagged(HEADER_STYLE, &markup);
    }
    markup
}

fn segment_html(segment: &Segment, theme: &ColorTheme) -> String {
    let text = escape_html(&segment.text);
    let mut styles = Vec::new();
    if let Some(tone) = segment.tone {
        styles.push(format!("color: {}", theme.color(tone).hex));
    }
    if segment.underline {
        styles.push("text-decoration: underline".to_string());
    }
    if styles.is_empty() || text.is_empty() {
        text
    } else {
        format!("<span style=\"{}\">{}</span>", styles.join("; "), text)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Where and how to export a listing.
#[derive(Debug, Clone)]
pub struct Export {
    pub path: PathBuf,
    pub theme: ColorTheme,
}

/// Fills a table skeleton and dispatches it to the console.
pub struct OutputWriter<'a> {
    console: &'a mut Console,
    table: Table,
    export: Option<Export>,
}

impl<'a> OutputWriter<'a> {
    pub fn new(console: &'a mut Console, table: Table) -> Self {
        Self {
            console,
            table,
            export: None,
        }
    }

    /// Builder: export the printed output after printing it
    pub fn export(mut self, export: Option<Export>) -> Self {
        self.export = export;
        self
    }

    /// Append one row per entry, in order, then print and export.
    ///
    /// `None` entries have no row data (their metadata could not be read)
    /// and are skipped. Exporting requires a recording console.
    pub fn write_output<'r, I>(mut self, rows: I) -> Result<Table>
    where
        I: IntoIterator<Item = Option<&'r RowData>>,
    {
        if self.export.is_some() && !self.console.is_recording() {
            return Err(LstableError::NotRecording);
        }

        for data in rows.into_iter().flatten() {
            self.table.add_row(data);
        }
        debug!(rows = self.table.rows().len(), "table filled");

        if is_structured(self.console.mode()) {
            self.console.print_data(&self.table)?;
        } else {
            self.console.print_lines(self.table.render())?;
        }

        if let Some(export) = &self.export {
            self.console.save_html(&export.path, &export.theme)?;
            info!(path = %export.path.display(), theme = export.theme.name, "exported listing");
            self.console.status("Output written to file.")?;
        }

        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnKey, ColumnRegistry};
    use crate::row::Cell;
    use crate::theme::Tone;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// A writer whose contents stay readable after the console takes it.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn name_table() -> Table {
        Table::assemble(
            &[ColumnKey::Size, ColumnKey::Spacer, ColumnKey::Name],
            &ColumnRegistry::new(false),
            true,
        )
    }

    fn rows() -> Vec<Option<RowData>> {
        vec![
            Some(
                RowData::new()
                    .with(ColumnKey::Size, "3")
                    .with(ColumnKey::Name, Cell::toned("<dir>", Tone::Directory)),
            ),
            None,
            Some(RowData::new().with(ColumnKey::Name, "b&c's")),
        ]
    }

    fn named(name: &str) -> Vec<Option<RowData>> {
        vec![Some(RowData::new().with(ColumnKey::Name, name))]
    }

    fn export_to(path: &Path) -> Option<Export> {
        Some(Export {
            path: path.to_path_buf(),
            theme: ColorTheme::solarized(),
        })
    }

    #[test]
    fn test_write_output_skips_missing_rows() {
        let buf = SharedBuf::default();
        let mut console = Console::new(Box::new(buf.clone()), OutputMode::Text, false);
        let rows = rows();
        let table = OutputWriter::new(&mut console, name_table())
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();

        assert_eq!(table.rows().len(), 2);
        assert_eq!(buf.contents(), "Size  Name\n   3  <dir>\n      b&c's\n");
    }

    #[test]
    fn test_colors_follow_output_mode() {
        let rows = rows();

        let term = SharedBuf::default();
        let mut console = Console::new(Box::new(term.clone()), OutputMode::Term, false);
        OutputWriter::new(&mut console, name_table())
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();
        assert!(term.contents().contains("\u{1b}["));
        assert!(!term.contents().contains("[directory]"));

        let text = SharedBuf::default();
        let mut console = Console::new(Box::new(text.clone()), OutputMode::Text, false);
        OutputWriter::new(&mut console, name_table())
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();
        assert!(!text.contents().contains("\u{1b}["));
        assert!(text.contents().contains("<dir>"));
    }

    #[test]
    fn test_json_mode_serializes_the_table() {
        let buf = SharedBuf::default();
        let mut console = Console::new(Box::new(buf.clone()), OutputMode::Json, false);
        let rows = rows();
        OutputWriter::new(&mut console, name_table())
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();

        let contents = buf.contents();
        assert!(contents.trim_start().starts_with('{'));
        assert!(contents.contains("\"show_header\""));
        assert!(contents.contains("b&c's"));
        assert!(!contents.contains("Size  Name"));
    }

    #[test]
    fn test_export_writes_html_and_confirms() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("listing.html");
        let buf = SharedBuf::default();
        let mut console = Console::new(Box::new(buf.clone()), OutputMode::Text, true);
        let rows = rows();
        OutputWriter::new(&mut console, name_table())
            .export(export_to(&path))
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("background-color: #002b36; color: #839496;"));
        assert!(html.contains("<span style=\"color: #268bd2\">&lt;dir&gt;</span>"));
        assert!(html.contains("b&amp;c&#x27;s"));
        assert!(html.contains("<span style=\"text-decoration: underline\">Size</span>"));
        assert!(!html.contains("Output written to file."));
        assert!(buf.contents().ends_with("Output written to file.\n"));
    }

    #[test]
    fn test_each_export_holds_only_its_own_output() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("one.html");
        let second = dir.path().join("two.html");
        let mut console = Console::new(Box::new(SharedBuf::default()), OutputMode::Text, true);

        let rows = named("first_run_entry");
        OutputWriter::new(&mut console, name_table())
            .export(export_to(&first))
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();
        let rows = named("second_run_entry");
        OutputWriter::new(&mut console, name_table())
            .export(export_to(&second))
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();

        let html = fs::read_to_string(&second).unwrap();
        assert!(html.contains("second_run_entry"));
        assert!(!html.contains("first_run_entry"));
        assert!(!html.contains("Output written to file."));
        assert!(fs::read_to_string(&first)
            .unwrap()
            .contains("first_run_entry"));
    }

    #[test]
    fn test_export_requires_a_recording_console() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("listing.html");
        let buf = SharedBuf::default();
        let mut console = Console::new(Box::new(buf.clone()), OutputMode::Text, false);
        let rows = named("visible_entry");
        let result = OutputWriter::new(&mut console, name_table())
            .export(export_to(&path))
            .write_output(rows.iter().map(Option::as_ref));

        assert!(matches!(result, Err(LstableError::NotRecording)));
        assert!(!path.exists());
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn test_json_output_can_be_exported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("listing.html");
        let mut console = Console::new(Box::new(SharedBuf::default()), OutputMode::Json, true);
        let rows = named("data.csv");
        OutputWriter::new(&mut console, name_table())
            .export(export_to(&path))
            .write_output(rows.iter().map(Option::as_ref))
            .unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("&quot;columns&quot;"));
        assert!(html.contains("data.csv"));
    }

    #[test]
    fn test_export_failure_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("listing.html");
        let mut console = Console::new(Box::new(SharedBuf::default()), OutputMode::Text, true);
        let result = OutputWriter::new(&mut console, name_table())
            .export(export_to(&path))
            .write_output(std::iter::empty());

        match result {
            Err(LstableError::Export { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected Export error, got {:?}", other.map(|t| t.rows().len())),
        }
    }

    #[test]
    fn test_console_does_not_record_unless_asked() {
        let mut console = Console::new(Box::new(SharedBuf::default()), OutputMode::Text, false);
        console.println("hello").unwrap();
        assert!(!console.is_recording());
        assert!(!console.export_html(&ColorTheme::solarized()).contains("hello"));
    }

    #[test]
    fn test_status_is_not_recorded() {
        let buf = SharedBuf::default();
        let mut console = Console::new(Box::new(buf.clone()), OutputMode::Text, true);
        console.status("done").unwrap();
        assert_eq!(buf.contents(), "done\n");
        assert!(!console.export_html(&ColorTheme::solarized()).contains("done"));
    }

    #[test]
    fn test_segment_markup() {
        let toned = Segment {
            text: "src/".to_string(),
            tone: Some(Tone::Directory),
            underline: false,
        };
        assert_eq!(segment_markup(&toned), "[directory]src/[/directory]");
        let header = Segment {
            text: "Size".to_string(),
            tone: None,
            underline: true,
        };
        assert_eq!(segment_markup(&header), "[header]Size[/header]");
        assert_eq!(segment_markup(&Segment::plain("")), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">it's & more</a>"#),
            "&lt;a href=&quot;x&quot;&gt;it&#x27;s &amp; more&lt;/a&gt;");
    }
}
