//! Greeter entry point

#[tokio::main]
async fn main() {
    if let Err(e) = lib_greeter::init().await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
