//! Pixel Factory - command-line generator for pixel creature asset packs

use std::process::ExitCode;

use pixel_factory::cli;

fn main() -> ExitCode {
    cli::run()
}
