use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = slotbook::run().await {
        error!("Server exited with error: {}", error);
        std::process::exit(1);
    }
}
