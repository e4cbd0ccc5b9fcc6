mod logger;

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::PathBuf,
    process,
};

use anyhow::Context;
use avl_family::driver::Driver;
use clap::{ArgAction, Parser};

/// Replays a family log against an AVL tree keyed by weight and writes the analysis results.
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// Path to the command log. The first line names the founding member.
    input: PathBuf,
    /// Path the results are written to.
    output: PathBuf,
    /// Also write the final tree as a Graphviz digraph to this path.
    #[clap(long, value_name = "PATH")]
    dot: Option<PathBuf>,
    /// Enables verbose logging
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(err) = run() {
        log::error!("{:?}", err);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut driver = Driver::new(BufWriter::new(output));
    let summary = driver
        .run(BufReader::new(input))
        .with_context(|| format!("failed to replay {}", args.input.display()))?;

    log::info!(
        "{} commands executed, {} lines skipped, {} lines written to {}",
        summary.commands,
        summary.skipped,
        summary.lines_written,
        args.output.display()
    );

    if let Some(path) = &args.dot {
        let mut graph = String::new();
        driver
            .tree()
            .dotgraph("family", &mut graph)
            .context("failed to render the tree")?;
        fs::write(path, graph).with_context(|| format!("failed to write {}", path.display()))?;

        log::debug!("wrote tree with {} members to {}", driver.tree().len(), path.display());
    }

    Ok(())
}
