use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use fxr::{Document, DocumentSummary, Game, ReadOptions, WriteOptions};

#[derive(Parser, Debug)]
#[command(name = "fxr", version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print element counts of one or more files.
    Info(InfoArgs),
    /// Re-encode a file for another game.
    Convert(ConvertArgs),
    /// Read, write and re-read files, reporting any that do not survive.
    Check(CheckArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameChoice {
    /// Dark Souls III (version 4).
    Ds3,
    /// Sekiro.
    Sdt,
    /// Elden Ring.
    Er,
    /// Armored Core VI.
    Ac6,
}

impl From<GameChoice> for Game {
    fn from(choice: GameChoice) -> Self {
        match choice {
            GameChoice::Ds3 => Game::DarkSouls3,
            GameChoice::Sdt => Game::Sekiro,
            GameChoice::Er => Game::EldenRing,
            GameChoice::Ac6 => Game::ArmoredCore6,
        }
    }
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input FXR files.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Game the files were written for.
    #[arg(long, value_enum, default_value_t = GameChoice::Er)]
    game: GameChoice,

    /// Print one JSON object per file instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input FXR file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output FXR file.
    #[arg(long)]
    out: PathBuf,

    /// Game the input was written for.
    #[arg(long, value_enum)]
    from: GameChoice,

    /// Game to write for.
    #[arg(long, value_enum)]
    to: GameChoice,

    /// Keep every action as raw lists instead of remapping known layouts.
    #[arg(long, default_value_t = false)]
    raw: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input FXR files.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Game the files were written for.
    #[arg(long, value_enum, default_value_t = GameChoice::Er)]
    game: GameChoice,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(serde::Serialize)]
struct FileInfo<'a> {
    path: &'a Path,
    game: Game,
    summary: DocumentSummary,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path, opts: &ReadOptions) -> anyhow::Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Document::read(&bytes, opts).with_context(|| format!("parse '{}'", path.display()))
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let game = Game::from(args.game);
    let opts = ReadOptions::for_game(game);
    for path in &args.files {
        let summary = load(path, &opts)?.summary();
        if args.json {
            let info = FileInfo {
                path,
                game,
                summary,
            };
            println!("{}", serde_json::to_string(&info)?);
            continue;
        }
        println!("{} (id {}, {game})", path.display(), summary.id);
        println!(
            "  nodes {} (depth {}), effects {}, actions {} ({} named)",
            summary.nodes,
            summary.max_depth,
            summary.effects,
            summary.actions,
            summary.schema_actions
        );
        println!(
            "  properties {} ({} animated), modifiers {}",
            summary.properties, summary.animated_properties, summary.modifiers
        );
        println!(
            "  states {} ({} conditions)",
            summary.states, summary.conditions
        );
        let refs = &summary.references;
        println!(
            "  references {:?}, external values {:?} / {:?}",
            refs.references, refs.external_values, refs.unk_external_values
        );
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let from = Game::from(args.from);
    let to = Game::from(args.to);
    let read_opts = ReadOptions {
        game: from,
        parse_schema_actions: !args.raw,
    };
    let doc = load(&args.in_path, &read_opts)?;
    doc.check_compatibility(to)
        .with_context(|| format!("'{}' cannot be written for {to}", args.in_path.display()))?;
    let bytes = doc.write(&WriteOptions::for_game(to))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {} ({from} -> {to})", args.out.display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let game = Game::from(args.game);
    let pool = build_thread_pool(args.threads)?;
    let results: Vec<(&PathBuf, anyhow::Result<()>)> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| (path, check_one(path, game)))
            .collect()
    });

    let mut failed = 0usize;
    for (path, result) in &results {
        match result {
            Ok(()) => println!("ok    {}", path.display()),
            Err(err) => {
                failed += 1;
                println!("FAIL  {}: {err:#}", path.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed the round trip", results.len());
    }
    Ok(())
}

fn check_one(path: &Path, game: Game) -> anyhow::Result<()> {
    let read_opts = ReadOptions::for_game(game);
    let write_opts = WriteOptions {
        game,
        recompute_references: false,
    };
    let doc = load(path, &read_opts)?;
    let bytes = doc.write(&write_opts).context("write")?;
    let again = Document::read(&bytes, &read_opts).context("re-read")?;
    anyhow::ensure!(again == doc, "tree changed after a round trip");
    let bytes_again = again.write(&write_opts).context("second write")?;
    anyhow::ensure!(bytes_again == bytes, "second write produced different bytes");
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> anyhow::Result<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        anyhow::bail!("'threads' must be >= 1 when set");
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().context("build rayon thread pool")
}
