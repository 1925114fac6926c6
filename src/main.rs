use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use kvsift::config::{DEFAULT_HISTORY_FILE, DEFAULT_MARKER};
use kvsift::{
    ContextFilter, FieldCatalog, FilterOptions, LineFormatter, SelectionProfile, Session, SiftConfig,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "kvsift")]
#[command(about = "Reduce key=value log files to the fields and lines you care about")]
#[command(version)]
struct Args {
    /// Log file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Fields to keep (comma-separated). Defaults to the newest stored selection
    #[arg(short = 'k', long = "keys", value_delimiter = ',')]
    keys: Option<Vec<String>>,

    /// Use the N-th most recent stored selection instead of --keys
    #[arg(long, value_name = "N", conflicts_with = "keys")]
    from_history: Option<usize>,

    /// Only keep lines containing this text (case-insensitive)
    #[arg(short = 'f', long = "filter", default_value = "")]
    filter: String,

    /// Keep lines NOT containing the filter text
    #[arg(short = 'x', long)]
    exclude: bool,

    /// Lines of context before and after each kept line
    #[arg(short = 'C', long, default_value = "0", allow_negative_numbers = true)]
    context: i64,

    /// Emit each line once when context windows overlap
    #[arg(long)]
    dedup: bool,

    /// Key that starts the key=value part of a line
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Where the last selections are remembered
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,

    /// Program used to open the result file
    #[arg(long, value_name = "PROGRAM")]
    viewer: Option<String>,

    /// Print results instead of writing a file (history is left untouched)
    #[arg(long)]
    stdout: bool,

    /// List the fields found in the file and exit
    #[arg(long)]
    list_fields: bool,

    /// Colorize --stdout output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = SiftConfig {
        marker: args.marker.clone(),
        history_path: args.history_file.clone(),
        viewer: args.viewer.clone(),
        ..SiftConfig::default()
    };
    let session = Session::new(config);

    let mut loaded = session.load_file(&args.file)?;

    if args.list_fields {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for name in loaded.catalog.iter() {
            let mark = if loaded.suggested.is_selected(name) { "*" } else { " " };
            writeln!(out, "{} {}", mark, name)?;
        }
        return Ok(());
    }

    let profile = selection_for(&args, &session, &loaded.catalog, &loaded.suggested)?;
    let options = FilterOptions::new(args.filter.clone())
        .exclude(args.exclude)
        .context(args.context)
        .dedup(args.dedup);

    if args.stdout {
        let use_colors = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };
        let filter = ContextFilter::new(&options)?;
        let lines = filter.filter_and_project(
            &loaded.records,
            &profile,
            &LineFormatter::new(use_colors),
        );
        let mut out = BufWriter::new(io::stdout().lock());
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        return Ok(());
    }

    let report = session
        .save_results(&mut loaded, &profile, &options)
        .with_context(|| format!("Failed to save results for '{}'", args.file.display()))?;

    println!("{}", report.path.display());
    if !report.history_changed && report.warnings.is_empty() {
        eprintln!("No changes detected. Selection history left as is.");
    }
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Err(e) = session.open_in_viewer(&report.path) {
        eprintln!("Warning: {}", e);
    }

    Ok(())
}

/// Resolve the selection from --keys, --from-history or the suggested default
fn selection_for(
    args: &Args,
    session: &Session,
    catalog: &FieldCatalog,
    suggested: &SelectionProfile,
) -> Result<SelectionProfile> {
    if let Some(keys) = &args.keys {
        let wanted: Vec<&str> = keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()).collect();
        for key in &wanted {
            if !catalog.contains(key) {
                tracing::warn!(field = %key, "selected field does not occur in this file");
            }
        }
        let mut profile: SelectionProfile = catalog
            .iter()
            .map(|name| (name.to_string(), wanted.contains(&name)))
            .collect();
        for key in wanted {
            if !profile.contains(key) {
                profile.set(key, true);
            }
        }
        return Ok(profile);
    }

    if let Some(n) = args.from_history {
        return match session.history().select(n) {
            Some(stored) => Ok(catalog.suggest_profile(Some(&stored))),
            None => bail!(
                "No stored selection #{} in '{}'",
                n,
                session.history().path().display()
            ),
        };
    }

    Ok(suggested.clone())
}
