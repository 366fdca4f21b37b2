//! Wire protocol for croquis.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Stroke`]): the
//!   message structures that travel on the wire.
//! - **Codec** ([`encode`] / [`decode`]): JSON text framing for those
//!   messages.
//! - **Validation** ([`validate_image`]): the base64 check applied to
//!   canvas snapshots before they are re-broadcast.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing any of the
//!   above.
//!
//! The protocol layer sits between the transport (text frames) and the
//! room core (game state). It knows nothing about connections or rooms;
//! it only converts messages to and from JSON.

mod codec;
mod error;
mod image;
mod types;

pub use codec::{decode, encode};
pub use error::ProtocolError;
pub use image::validate_image;
pub use types::{ClientMessage, ServerMessage, Stroke};
