mod app;
mod loader;
mod status_bar;
mod theme;

use anyhow::{Result, anyhow, bail};
use app::AppDesc;
use crossterm::event;
use logmate_engine::{Category, format_local};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        execute,
        style::ResetColor,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::{
    env,
    fs::{self, File},
    io,
    panic,
    path::{Path, PathBuf},
    time::Duration,
};

const LOG_DIR_NAME: &str = "logmate";
const LOG_FILE_NAME: &str = "logmate.log";

fn print_usage() {
    eprintln!("Usage: logmate [OPTIONS] <FILE>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --query, -q <TEXT>       Start with a search query");
    eprintln!("  --category, -c <LABEL>   Jump to the first INFO/NOTE/WARNING/DEBUG/ERROR line");
    eprintln!("  --stats, -s              Print the statistics report and exit");
    eprintln!("  --debug, -d              Write debug records to the log file");
    eprintln!("  --help, -h               Print this help message");
}

#[derive(Debug, Default, PartialEq)]
struct UsageOptions {
    path: Option<PathBuf>,
    query: Option<String>,
    category: Option<Category>,
    stats_only: bool,
    debug: bool,
    help: bool,
}

impl UsageOptions {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--query" | "-q" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("Option {} requires a value", arg))?;
                    options.query = Some(value.clone());
                }
                "--category" | "-c" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("Option {} requires a value", arg))?;
                    options.category = Some(value.parse()?);
                }
                "--stats" | "-s" => options.stats_only = true,
                "--debug" | "-d" => options.debug = true,
                "--help" | "-h" => options.help = true,
                other if other.starts_with('-') && other.len() > 1 => {
                    bail!("Unknown option: {}", other)
                }
                other => {
                    if options.path.is_some() {
                        bail!("Only one log file can be opened at a time");
                    }
                    options.path = Some(PathBuf::from(other));
                }
            }
        }

        Ok(options)
    }
}

fn main() -> Result<()> {
    // collect args excluding the binary name
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match UsageOptions::from_args(&args) {
        Ok(options) => options,
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    if options.help {
        print_usage();
        return Ok(());
    }

    let Some(path) = options.path.clone() else {
        print_usage();
        bail!("No log file given");
    };

    setup_logger(options.debug);
    log::info!("Starting logmate v{}", env!("CARGO_PKG_VERSION"));

    if options.stats_only {
        return print_stats(&path);
    }

    let mut desc = AppDesc::new(path);
    desc.initial_query = options.query;
    desc.initial_category = options.category;

    let mut terminal = setup_terminal()?;

    // restore the terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let app_result = app::start_with_desc(&mut terminal, desc);

    // always restore terminal before printing or exiting
    restore_terminal()?;

    if let Err(err) = app_result {
        log::error!("Application error: {:?}", err);
        eprintln!("Application Error: {:?}", err);
    }

    Ok(())
}

/// log to `<cache dir>/logmate/logmate.log`; the terminal belongs to the UI
fn setup_logger(debug: bool) {
    let Some(dir) = dirs::cache_dir().map(|d| d.join(LOG_DIR_NAME)) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(file) = File::create(dir.join(LOG_FILE_NAME)) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}

fn print_stats(path: &Path) -> Result<()> {
    let loaded = loader::load_file(path)?;

    println!("{}", path.display());
    for row in loaded.summary.stats_lines(&chrono::Local) {
        println!("  {}", row);
    }

    for cat in loaded.category_index.categories() {
        let Some(&first) = loaded.category_index.occurrences(cat).first() else {
            continue;
        };
        let first_ts = loaded
            .lines
            .get(first)
            .and_then(|line| logmate_engine::extract_timestamp(&line.text))
            .map(|ts| format!(" at {}", format_local(&ts)))
            .unwrap_or_default();
        println!(
            "  first {} on line {}{}",
            cat,
            first + 1,
            first_ts
        );
    }

    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    // enter the alternate screen to not mess with the user's shell history
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();

    let _ = execute!(stdout, ResetColor);
    let _ = execute!(stdout, LeaveAlternateScreen);

    // drain pending events so they don't leak to the shell
    while event::poll(Duration::from_millis(0)).unwrap_or(false) {
        let _ = event::read();
    }

    let _ = disable_raw_mode();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_path_only() {
        let options = UsageOptions::from_args(&args(&["sys.log"])).unwrap();
        assert_eq!(options.path, Some(PathBuf::from("sys.log")));
        assert!(!options.stats_only);
        assert_eq!(options.query, None);
    }

    #[test]
    fn test_parse_all_options() {
        let options = UsageOptions::from_args(&args(&[
            "-q", "disk fault", "--category", "warning", "-s", "--debug", "sys.log",
        ]))
        .unwrap();
        assert_eq!(options.query.as_deref(), Some("disk fault"));
        assert_eq!(options.category, Some(Category::Warning));
        assert!(options.stats_only);
        assert!(options.debug);
        assert_eq!(options.path, Some(PathBuf::from("sys.log")));
    }

    #[test]
    fn test_parse_help() {
        let options = UsageOptions::from_args(&args(&["-h"])).unwrap();
        assert!(options.help);
        assert_eq!(options.path, None);
    }

    #[test]
    fn test_parse_missing_value() {
        assert!(UsageOptions::from_args(&args(&["sys.log", "--query"])).is_err());
    }

    #[test]
    fn test_parse_unknown_option() {
        assert!(UsageOptions::from_args(&args(&["--follow", "sys.log"])).is_err());
    }

    #[test]
    fn test_parse_unknown_category() {
        assert!(UsageOptions::from_args(&args(&["-c", "fatal", "sys.log"])).is_err());
    }

    #[test]
    fn test_parse_two_paths() {
        assert!(UsageOptions::from_args(&args(&["a.log", "b.log"])).is_err());
    }
}
