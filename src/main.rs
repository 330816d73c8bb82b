use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use gn_community::config::DetectorOptions;
use gn_community::girvan_newman::CommunityDetector;
use gn_community::loader;
use gn_community::logger;
use gn_community::report::CommunityReport;

/// Detect communities in an edge-list graph with the Girvan-Newman
/// algorithm.
#[derive(Parser)]
#[command(name = "gn_community", version)]
struct Args {
    /// Edge-list file, one `u v` pair per line.
    input: PathBuf,

    /// Where to write the JSON report. Defaults to `<input>.communities.json`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional YAML options file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fan the per-root betweenness passes out with rayon.
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    logger::init_logger()?;
    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => DetectorOptions::from_yaml_file(path)?,
        None => DetectorOptions::default(),
    };
    options.parallel |= args.parallel;

    let loaded = loader::load_edge_list(&args.input)?;
    info!(
        "loaded {}: {} vertices, {} edges",
        args.input.display(),
        loaded.graph.get_vertex_count(),
        loaded.graph.get_edge_count()
    );

    let detection = CommunityDetector::with_options(loaded.graph, &options).detect()?;

    let output = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("communities.json");
        path
    });
    let report = CommunityReport::build(&detection, &loaded.labels);
    report.write_json(&output)?;

    println!(
        "Found {} communities in {} round(s), report written to {}",
        detection.communities.len(),
        detection.rounds,
        output.display()
    );
    Ok(())
}
