use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    quill_cli::run().await
}
