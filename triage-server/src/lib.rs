pub mod http;
pub mod router;
pub mod state;
