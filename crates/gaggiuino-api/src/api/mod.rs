// Controller REST API
//
// `client` holds the session and request executor; the other modules add
// endpoint methods to `GaggiuinoApi`.

pub mod client;
mod profiles;
mod settings;
mod shots;
mod system;

pub use client::{DEFAULT_BASE_URL, GaggiuinoApi, Session};
