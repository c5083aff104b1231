use clap::Parser;

use rx_reconcile::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    rx_reconcile::init_tracing();
    cli::run(Cli::parse())
}
