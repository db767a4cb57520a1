use std::path::PathBuf;
use std::process;

use bird_tool_utils::clap_utils::{add_clap_verbosity_flags, set_log_level};
use clap::*;

use crate::inferred_clusters::ClusteringTool;
use crate::quality::{run_quality, QualityConfig};
use crate::{Result, DEFAULT_THRESHOLD};

pub fn add_quality_subcommand(app: Command) -> Command {
    let quality_subcommand = add_clap_verbosity_flags(
        Command::new("quality")
            .about("Evaluate clustering results against the simulated ground truth")
            .arg(
                Arg::new("tool")
                    .long("tool")
                    .required(true)
                    .help("Clustering tool which produced the results: isONclust, qCluster or random_cluster"),
            )
            .arg(
                Arg::new("data")
                    .long("data")
                    .required(true)
                    .help("Location of the data folder"),
            )
            .arg(
                Arg::new("simulated")
                    .long("simulated")
                    .required(true)
                    .help("Name of the simulated dataset"),
            )
            .arg(
                Arg::new("result")
                    .long("result")
                    .required(true)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .help("Name(s) of the clustering result(s) to evaluate"),
            )
            .arg(
                Arg::new("threshold")
                    .long("threshold")
                    .default_value(DEFAULT_THRESHOLD)
                    .value_parser(value_parser!(usize))
                    .help("Clusters which contain at most this many reads are considered trivial"),
            )
            .arg(
                Arg::new("threads")
                    .short('t')
                    .long("threads")
                    .default_value("1")
                    .value_parser(value_parser!(usize))
                    .help("Number of results to evaluate in parallel"),
            ),
    );

    app.subcommand(quality_subcommand)
}

/// Expects matches of the subcommand defined by `add_quality_subcommand`,
/// which makes every argument read here required or defaulted.
/// The tool is checked here, before any file is touched.
pub fn parse_quality_config(m: &ArgMatches) -> Result<QualityConfig> {
    let tool = m.get_one::<String>("tool").unwrap().parse::<ClusteringTool>()?;
    Ok(QualityConfig {
        data_root: PathBuf::from(m.get_one::<String>("data").unwrap()),
        tool,
        dataset: m.get_one::<String>("simulated").unwrap().clone(),
        threshold: *m.get_one::<usize>("threshold").unwrap(),
    })
}

pub fn run_quality_subcommand(matches: &ArgMatches, program_name: &str, version: &str) {
    let m = matches.subcommand_matches("quality").unwrap();
    set_log_level(m, true, program_name, version);

    let config = match parse_quality_config(m) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    debug!("Using configuration {:?}", config);

    let num_threads: usize = *m.get_one::<usize>("threads").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .expect("Programming error: rayon initialised multiple times");

    let results: Vec<String> = m.get_many::<String>("result").unwrap().cloned().collect();
    match run_quality(&config, &results) {
        Ok(locations) => info!(
            "Finished evaluating {} result(s) of {} on {}",
            locations.len(),
            config.tool,
            config.dataset
        ),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
