use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Advance a crowd of rigid multi-disk pedestrians by one coarse time
/// step, resolving all agent-agent and agent-wall contacts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration files in order: parameters, materials, geometry,
    /// agents, agent dynamics, and optionally agent interactions.
    #[arg(num_args = 5..=6, required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    ExitCode::from(crowdmech::crowd_mechanics(&args.files) as u8)
}
