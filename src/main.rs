use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match dosewise_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Dosewise failed to start: {e}");
            eprintln!("dosewise: {e}");
            ExitCode::FAILURE
        }
    }
}
