//! The card side of a SELECT exchange.
//!
//! A host routes each command APDU it receives from the contactless field to
//! `CardEmulator::process_command` and sends whatever comes back as the reply.
//! The emulator recognizes exactly one frame, the SELECT for its own AID, and
//! answers it with the stored account number. There is no session and no
//! chaining; every command is classified on its own.

use tracing::{debug, info, trace_span};

use crate::store::AccountStore;
use crate::{codec, util, Result, SELECT_APDU_HEADER, SW_OK, SW_UNKNOWN};

/// AID the demo answers for.
pub const DEMO_AID: &str = "F222222222";

/// Why the host tore down the link to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationReason {
    /// The reader left the field.
    LinkLoss,
    /// The reader selected some other AID.
    Deselected,
}

/// A virtual contactless card, bound to one application ID.
///
/// The expected SELECT frame is precomputed at construction and never changes;
/// matching is byte-exact, no prefix or partial matches.
#[derive(Debug)]
pub struct CardEmulator<S> {
    select_apdu: Vec<u8>,
    store: S,
}

impl<S: AccountStore> CardEmulator<S> {
    /// Builds an emulator for the given AID (hex), reading its payload from
    /// `store`.
    ///
    /// Fails only on a malformed AID string; since AIDs are compile-time
    /// constants rather than user input, that's a bug in the caller.
    pub fn new(aid: &str, store: S) -> Result<Self> {
        Ok(Self {
            select_apdu: build_select_apdu(aid)?,
            store,
        })
    }

    /// Answers a single command APDU.
    ///
    /// A frame byte-identical to our SELECT gets the account number (UTF-8)
    /// followed by 9000; anything else gets a bare 0000. The store is only
    /// consulted on a match, and a dead store surfaces as `StoreUnavailable`
    /// rather than an empty payload.
    pub fn process_command(&self, command: &[u8]) -> Result<Vec<u8>> {
        let span = trace_span!("process_command");
        let _enter = span.enter();
        debug!(apdu = codec::to_hex(command), "<< RX");

        if command == &self.select_apdu[..] {
            let account = self.store.account()?;
            info!(account, "SELECT matched, replying with account number");
            Ok(util::concat(account.as_bytes(), &[&SW_OK]))
        } else {
            debug!("Not our SELECT, replying UNKNOWN");
            Ok(SW_UNKNOWN.to_vec())
        }
    }

    /// Host notification that the reader link is gone. Purely informational;
    /// the next `process_command` behaves as if nothing happened.
    pub fn on_deactivated(&self, reason: DeactivationReason) {
        info!(?reason, "Deactivated");
    }
}

/// Builds the SELECT frame for an AID given in hex:
/// `[CLASS | INSTRUCTION | P1 | P2 | LENGTH | AID...]`.
pub fn build_select_apdu(aid: &str) -> Result<Vec<u8>> {
    let aid = codec::from_hex(aid)?;
    Ok(util::concat(
        &SELECT_APDU_HEADER,
        &[&[aid.len() as u8], &aid],
    ))
}
