use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use csplit_sharder::{split, SplitOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csplit")]
#[command(about = "Shard analysis processing files for parallel runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split processing files into balanced shards
    Split(SplitArgs),

    /// Emit a shell script that merges shard result databases into one
    #[command(name = "merge-plan")]
    MergePlan(MergePlanArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Number of shards to create
    #[arg(short = 's', long)]
    shards: usize,

    /// Processing files, one per project, in project order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory to write shard files into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output JSON summary
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MergePlanArgs {
    /// Number of result databases to merge
    #[arg(short = 'n', long)]
    count: usize,

    /// Result file name prefix
    #[arg(long, default_value = "file")]
    prefix: String,

    /// Result file name suffix
    #[arg(long, default_value = ".db")]
    suffix: String,

    /// Number of the first result file
    #[arg(long, default_value_t = 1)]
    start: usize,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON/script output; logs go to stderr.
    if matches!(&cli.command, Commands::Split(args) if args.json) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Split(args) => run_split(args),
        Commands::MergePlan(args) => run_merge_plan(args),
    }
}

fn run_split(args: SplitArgs) -> Result<()> {
    if args.shards == 0 {
        anyhow::bail!("--shards must be at least 1");
    }

    let options = SplitOptions {
        shards: args.shards,
        out_dir: args.out_dir,
    };
    let summary = split(&args.files, &options).context("Failed to split processing files")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!(
            "Split {} projects ({} units, {} occurrences) into {} shards",
            summary.projects, summary.distinct_cus, summary.occurrences, summary.shards
        );
        for file in &summary.files {
            eprintln!("  {}", file.display());
        }
    }
    Ok(())
}

fn run_merge_plan(args: MergePlanArgs) -> Result<()> {
    if args.count == 0 {
        anyhow::bail!("--count must be at least 1");
    }

    let files = csplit_merge_plan::numbered_files(&args.prefix, &args.suffix, args.start, args.count);
    print!("{}", csplit_merge_plan::render_plan(&files));
    Ok(())
}
