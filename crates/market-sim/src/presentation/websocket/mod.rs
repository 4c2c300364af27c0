mod handler;

pub use handler::{WsState, ws_handler};
