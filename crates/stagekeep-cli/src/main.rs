//! stagekeep CLI entry point

#[tokio::main]
async fn main() {
    if let Err(e) = stagekeep_cli::run().await {
        stagekeep_cli::output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
