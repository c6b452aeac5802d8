// iamctl - Command-line wrappers for AWS IAM
use iamctl::cli::args::parse_from;
use iamctl::cli::commands::execute_command;
use iamctl::Catalog;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let catalog = Catalog::builtin();
    let cli = match parse_from(&catalog, std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    // Errors were already reported by the command layer
    if execute_command(cli, catalog, cancel).await.is_err() {
        std::process::exit(1);
    }
}
