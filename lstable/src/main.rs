//! # lstable
//!
//! A CLI tool that lists a directory as an aligned table.
//!
//! ## Overview
//!
//! lstable is built on top of lstablelib. Without options it prints entry
//! names only; detail columns (permissions, size, owners, timestamps, git
//! status, ...) are added with `--details`. Columns are grouped and the
//! groups are separated by a blank column.
//!
//! ## Usage
//!
//! ```bash
//! # Names only
//! lstable .
//!
//! # The standard detail set
//! lstable -d
//!
//! # Pick detail columns, or all of them with +
//! lstable --details=size,perms
//! lstable --details=+
//!
//! # Icons, hidden files, and an HTML copy of the output
//! lstable -a --icon emoji --details=+ --export listing.html
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use lstablelib::{
    collect_entries, select_columns, ColorTheme, ColumnRegistry, Console, Details, Export,
    GitRepo, IconMode, LayoutOptions, ListOptions, OutputMode, OutputWriter, Platform, Table,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Value of `--details` given without a list.
const STANDARD_DETAILS: &str = "standard";

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("lstable")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("List a directory as an aligned table of names and details")
        .arg(
            Arg::new("path")
                .help("Directory to list (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("details")
                .short('d')
                .long("details")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value(STANDARD_DETAILS)
                .help("Show detail columns (comma-separated: inode,links,perms,user,group,size,ctime,mtime,atime,git; + for all)"),
        )
        .arg(
            Arg::new("icon")
                .short('i')
                .long("icon")
                .value_parser(["none", "emoji", "nerd"])
                .default_value("none")
                .help("Show an icon before each name"),
        )
        .arg(
            Arg::new("no-align")
                .long("no-align")
                .action(ArgAction::SetTrue)
                .help("Do not align names on their leading dot"),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Include hidden entries"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude entries whose name matches glob pattern"),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .help("Also write the listing to this file as HTML"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_parser(["solarized", "solarized-light"])
                .default_value("solarized")
                .help("Color theme for terminal colors and the HTML export"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colors"),
        )
}

/// Extract the detail selection from matches
fn extract_details(matches: &ArgMatches) -> Details {
    match matches.get_one::<String>("details").map(|s| s.as_str()) {
        None => Details::Off,
        Some(STANDARD_DETAILS) => Details::standard(),
        Some(list) => Details::parse(list),
    }
}

/// Extract the output mode from matches
fn extract_output_mode(matches: &ArgMatches) -> OutputMode {
    match matches.get_one::<String>("output").map(|s| s.as_str()) {
        Some("json") => OutputMode::Json,
        _ if matches.get_flag("no-color") => OutputMode::Text,
        _ => OutputMode::Auto,
    }
}

/// Build list options from matches
fn build_list_options(
    matches: &ArgMatches,
    icons: IconMode,
    align: bool,
) -> Result<ListOptions, anyhow::Error> {
    let mut options = ListOptions::new()
        .all(matches.get_flag("all"))
        .align(align)
        .icons(icons);

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            options = options.exclude(pattern)?;
        }
    }

    Ok(options)
}

fn run(matches: &ArgMatches, console: &mut Console) -> Result<(), anyhow::Error> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let details = extract_details(matches);
    let icons: IconMode = matches
        .get_one::<String>("icon")
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();
    let align = !matches.get_flag("no-align");

    // Git status is only ever shown as a detail column.
    let git = if details.is_enabled() {
        GitRepo::discover(Path::new(path))
    } else {
        None
    };

    let layout = LayoutOptions::new()
        .details(details)
        .icons(icons)
        .align(align)
        .ownership(Platform::current().has_ownership_model)
        .git_managed(git.is_some());

    let keys = select_columns(&layout);
    let registry = ColumnRegistry::new(layout.align);
    let table = Table::assemble(&keys, &registry, layout.details.is_enabled());

    let list_options = build_list_options(matches, icons, align)?;
    let entries = collect_entries(path, &list_options, git.as_ref())?;

    let export = match matches.get_one::<String>("export") {
        Some(dest) => {
            let theme_name = matches
                .get_one::<String>("theme")
                .map(|s| s.as_str())
                .unwrap_or("solarized");
            Some(Export {
                path: PathBuf::from(dest),
                theme: ColorTheme::by_name(theme_name)?,
            })
        }
        None => None,
    };

    OutputWriter::new(console, table)
        .export(export)
        .write_output(entries.iter().map(|e| e.row.as_ref()))
        .with_context(|| format!("failed to list {}", path))?;

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lstable=warn,lstablelib=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let matches = build_command().get_matches();

    let record = matches.contains_id("export");
    let theme = matches
        .get_one::<String>("theme")
        .and_then(|name| ColorTheme::by_name(name).ok())
        .unwrap_or_default();
    let mut console =
        Console::new(Box::new(io::stdout()), extract_output_mode(&matches), record).theme(&theme);

    match run(&matches, &mut console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_for(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["lstable"];
        argv.extend(args);
        build_command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_details_absent() {
        assert_eq!(extract_details(&matches_for(&["."])), Details::Off);
    }

    #[test]
    fn test_details_flag_without_list() {
        assert_eq!(extract_details(&matches_for(&["-d"])), Details::standard());
        // The path is not taken as a detail list.
        let matches = matches_for(&["--details", "src"]);
        assert_eq!(extract_details(&matches), Details::standard());
        assert_eq!(matches.get_one::<String>("path").unwrap(), "src");
    }

    #[test]
    fn test_details_list() {
        let details = extract_details(&matches_for(&["--details=size,perms"]));
        assert_eq!(details, Details::parse("size,perms"));
        assert!(extract_details(&matches_for(&["--details=+"])).is_all());
    }

    #[test]
    fn test_output_mode() {
        assert_eq!(extract_output_mode(&matches_for(&[])), OutputMode::Auto);
        assert_eq!(extract_output_mode(&matches_for(&["--no-color"])), OutputMode::Text);
        assert_eq!(extract_output_mode(&matches_for(&["-o", "json"])), OutputMode::Json);
        assert_eq!(
            extract_output_mode(&matches_for(&["-o", "json", "--no-color"])),
            OutputMode::Json
        );
    }

    #[test]
    fn test_list_options_from_matches() {
        let matches = matches_for(&["-a", "-x", "*.log", "-x", "target"]);
        let options = build_list_options(&matches, IconMode::None, true).unwrap();
        assert!(options.all);
        assert_eq!(options.exclude.len(), 2);
    }
}
