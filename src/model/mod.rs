//! Domain records and the normalization boundary that produces them.
//!
//! Raw backend JSON enters through [`wire`]; everything downstream works with
//! the typed records in [`types`].

pub mod headers;
pub mod time;
pub mod types;
pub mod wire;

pub use headers::Headers;
pub use time::{decode_timestamp, local_now, parse_timestamp_str};
pub use types::*;
pub use wire::{DataQuality, Normalized};
