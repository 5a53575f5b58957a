// bulkfs CLI Entry Point

use bulkfs_cli::{output, router::CommandRouter};

fn main() {
    if let Err(e) = CommandRouter::route() {
        tracing::debug!(details = %e.technical_details(), "command failed");
        output::print_error(&e.user_message());
        std::process::exit(e.exit_code());
    }
}
