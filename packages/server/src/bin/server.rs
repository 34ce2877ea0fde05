//! Room-based WebSocket chat relay server.
//!
//! Clients connect to `/ws/<room>`, receive the room's recent history and every
//! message posted to the room afterwards.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    domain::{AllowAll, RequireUser, RoomCreationPolicy, RoomName},
    infrastructure::repository::InMemoryRoomRepository,
    ui::{Server, state::AppState},
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Room that exists at start and is recreated empty whenever it is deleted
    #[arg(long, env = "HIROBA_DEFAULT_ROOM", default_value = "general")]
    default_room: String,

    /// Upper bound for a single WebSocket write, in milliseconds
    #[arg(long, env = "HIROBA_SEND_TIMEOUT_MS", default_value = "5000")]
    send_timeout_ms: u64,

    /// Only allow room creation for requests carrying the x-hiroba-user header
    #[arg(long, env = "HIROBA_REQUIRE_USER", default_value_t = false)]
    require_user: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. Room creation policy
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create Repository (in-memory database)
    let default_room = match RoomName::new(&args.default_room) {
        Ok(name) => name,
        Err(e) => {
            tracing::error!("Invalid default room '{}': {}", args.default_room, e);
            std::process::exit(1);
        }
    };
    let repository = Arc::new(InMemoryRoomRepository::with_default_room(default_room));

    // 2. Create room creation policy
    let policy: Arc<dyn RoomCreationPolicy> = if args.require_user {
        Arc::new(RequireUser)
    } else {
        Arc::new(AllowAll)
    };

    // 3. Create UseCases
    let app_state = AppState::new(
        repository,
        policy,
        Duration::from_millis(args.send_timeout_ms),
    );

    // 4. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
