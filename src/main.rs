#[tokio::main]
async fn main() {
    pantry::start_server().await;
}
