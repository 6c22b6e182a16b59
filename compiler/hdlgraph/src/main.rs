//! The executable of the SystemVerilog module hierarchy analyzer.

use std::process::ExitCode;

use clap::Parser;
use hdlgraph_driver::Arguments;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("HDLGRAPH_LOG", "error"),
    )
    .init();

    hdlgraph_driver::run(Arguments::parse())
}
