// Panel domain models
//
// Typed views of the panel's JSON. Wire names are mapped with explicit
// `#[serde(rename)]` tables; the programmatic snake_case names are accepted
// as aliases. Blocks the panel stores as JSON-in-a-string go through the
// `json_string` adapter before normal validation.

pub mod client;
pub mod inbound;
pub mod json_string;
pub mod settings;
pub mod sniffing;
pub mod stream_settings;

pub use client::{Client, FlexibleId};
pub use inbound::Inbound;
pub use json_string::{WireModel, decode_json_string};
pub use settings::Settings;
pub use sniffing::Sniffing;
pub use stream_settings::StreamSettings;
