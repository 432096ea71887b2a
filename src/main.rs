use clap::Parser;
use gitdoc_text::{
    cli::{run, Cli},
    console, logging,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level());

    if !cli.no_banner {
        console::print_banner();
    }

    match run(cli).await {
        Ok(report) => console::print_success(&report),
        Err(e) => {
            console::print_failure(&e);
            std::process::exit(1);
        }
    }
}
