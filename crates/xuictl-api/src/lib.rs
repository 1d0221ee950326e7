// xuictl-api: Async Rust client for the 3x-ui panel API

pub mod api;
pub mod auth;
pub mod blocking;
pub mod client;
pub mod clients;
pub mod config;
pub mod database;
pub mod error;
pub mod inbounds;
pub mod model;
pub mod session;
pub mod transport;
pub mod wire;

pub use reqwest;

pub use api::Api;
pub use client::{Check, Method, PanelClient, PanelResponse};
pub use clients::ClientApi;
pub use config::PanelConfig;
pub use database::DatabaseApi;
pub use error::Error;
pub use inbounds::InboundApi;
pub use model::{Client, FlexibleId, Inbound, Settings, Sniffing, StreamSettings};
pub use session::{DEFAULT_MAX_RETRIES, Session};
pub use transport::{TlsMode, TransportConfig};
