pub mod http;
mod page;

pub use http::WebServer;
