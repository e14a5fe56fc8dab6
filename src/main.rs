//! Book Inventory - command-line client for a remote book catalog

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = book_inventory::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
