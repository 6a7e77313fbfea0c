#[tokio::main]
async fn main() {
    if let Err(e) = archeckin_lib::run().await {
        eprintln!("archeckin: {e}");
        std::process::exit(1);
    }
}
