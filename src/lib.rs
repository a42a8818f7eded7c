//! cardlet - a toy contactless card.
//!
//! The real thing lives in a secure element; this one lives in an ordinary
//! process, the way Android's Host Card Emulation routes reader traffic to an
//! app. It speaks the bare minimum of ISO 7816-4: a reader that sends the one
//! SELECT-by-AID frame we expect gets the stored account number back, status
//! 9000. Every other frame gets a bare 0000.

pub mod codec;
pub mod emulator;
pub mod store;
pub mod util;

use thiserror::Error;

/// SELECT-by-name command header: CLA=00, INS=A4 (SELECT), P1=04, P2=00.
pub const SELECT_APDU_HEADER: [u8; 4] = [0x00, 0xA4, 0x04, 0x00];

/// Status word closing a successful SELECT response. (0x9000)
pub const SW_OK: [u8; 2] = [0x90, 0x00];

/// Status word sent, alone, in reply to any command we don't recognize. (0x0000)
pub const SW_UNKNOWN: [u8; 2] = [0x00, 0x00];

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed hex input, eg. an odd-length string or a stray non-hex character.
    #[error("invalid hex string: {0}")]
    InvalidFormat(#[from] hex::FromHexError),

    /// The account store couldn't be read or written.
    #[error("account store unavailable: {0}")]
    StoreUnavailable(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
