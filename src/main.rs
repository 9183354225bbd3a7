//! Provides the main entry point to the program.
use ::log::error;
use gridsize::cli::run_cli;
use gridsize::log::is_logger_initialised;
use human_panic::{metadata, setup_panic};

fn main() {
    setup_panic!(metadata!().support("- Open an issue on the project's issue tracker"));

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        std::process::exit(1);
    }
}
