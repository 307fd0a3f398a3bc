#[tokio::main]
async fn main() {
    micboard_backend::run().await;
}
