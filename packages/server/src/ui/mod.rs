//! WebSocket chat relay server implementation.

mod handler;
pub mod relay;
mod server;
mod signal;
pub mod state;

pub use handler::http::USER_HEADER;
pub use server::Server;
