extern crate clustqual;

extern crate clap;
use clap::*;

extern crate log;

extern crate bird_tool_utils;
use bird_tool_utils::clap_utils::*;

static PROGRAM_NAME: &str = "clustqual";

fn main() {
    let app = build_cli();
    let matches = app.clone().get_matches();
    set_log_level(&matches, false, PROGRAM_NAME, crate_version!());

    match matches.subcommand_name() {
        Some("quality") => {
            clustqual::quality_argument_parsing::run_quality_subcommand(
                &matches,
                PROGRAM_NAME,
                crate_version!(),
            );
        }
        _ => panic!("Programming error"),
    }
}

fn build_cli() -> Command {
    let app = add_clap_verbosity_flags(Command::new(PROGRAM_NAME))
        .version(crate_version!())
        .author(clustqual::AUTHOR)
        .about("Quality evaluation of read clustering tools on simulated reads")
        .arg_required_else_help(true);

    clustqual::quality_argument_parsing::add_quality_subcommand(app)
}
