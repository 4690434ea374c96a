//! Fragment reassembly, message decoding and builder dispatch for the
//! Photon decoder.
//!
//! This is the main decoding crate. It ties together `wire` (framing) and
//! `protocol16` (tagged values) and turns each UDP payload into an ordered
//! list of [`DecodedMessage`]s.
//!
//! # Features
//!
//! - Reliable, unreliable and fragmented command handling
//! - Order-independent fragment reassembly with bounded memory
//! - Event and request dispatch through a [`BuilderRegistry`]
//! - Unhandled messages keep their full parameter table
//!
//! # Design Principles
//!
//! - **Containment** - A bad command degrades to [`DecodedMessage::Other`];
//!   a bad builder degrades to [`DecodedMessage::Unhandled`]. Nothing
//!   escapes `decode_datagram` as an error.
//! - **Caller-owned state** - The fragment cache is passed in explicitly or
//!   owned by a [`DatagramDecoder`]; there is no global state.
//! - **Bounded work** - Limits and an eviction policy cap every allocation.

mod assembly;
mod cache;
mod config;
mod decoder;
mod error;
mod limits;
mod message;
mod registry;

pub use assembly::FragmentAssembly;
pub use cache::{FragmentCache, FragmentOutcome};
pub use config::DecoderConfig;
pub use decoder::{decode_command, decode_datagram, decode_message_body, DatagramDecoder};
pub use error::{CodecError, CodecResult, FragmentError, LimitKind};
pub use limits::{CodecLimits, EvictionPolicy};
pub use message::{DecodedMessage, MessageCategory, ResponseHeader, UnhandledMessage};
pub use registry::{
    BuildFn, BuilderKind, BuilderRegistry, RegistryBuilder, RegistryError, MOVE_EVENT_HEADER_CODE,
};
pub use wire::FramerConfig;
