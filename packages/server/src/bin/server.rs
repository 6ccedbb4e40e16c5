//! XOR collaboration relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin xor-relay-server
//! cargo run --bin xor-relay-server -- --host 127.0.0.1 --port 5000 --frontend-url http://localhost:3000
//! PORT=8080 FRONTEND_URL=https://xor.example.com cargo run --bin xor-relay-server
//! ```

use clap::Parser;

use xor_relay_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::RoomManager,
};
use xor_relay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "xor-relay-server")]
#[command(about = "Realtime room-based code collaboration relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Origin allowed by CORS
    #[arg(short = 'f', long, env = "FRONTEND_URL", default_value = "http://localhost:3000")]
    frontend_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME"), "tower_http"], "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. RoomManager
    // 4. Server
    let repository = Box::new(InMemoryRoomRepository::new());
    let message_pusher = Box::new(WebSocketMessagePusher::new());
    let room_manager = RoomManager::new(repository, message_pusher);
    let server = Server::new(room_manager, args.frontend_url);

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
