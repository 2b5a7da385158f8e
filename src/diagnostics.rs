//! Structured codec diagnostics
//!
//! The codec never prints. It reports what happened to a [`Diagnostics`]
//! sink supplied by the caller; [`TracingDiagnostics`] forwards events to
//! `tracing`, [`NullDiagnostics`] drops them and [`CollectingDiagnostics`]
//! keeps them for inspection.

use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::Error;
use crate::schema::Family;

/// Why compression was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Caller turned compression off
    Disabled,
    /// No compressor is available in this build
    Unavailable,
}

/// Something worth knowing about an encode or decode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecEvent {
    /// Records were packed into a payload
    Encoded {
        /// Format family
        family: Family,
        /// Header version written
        version: u8,
        /// Records packed
        records: usize,
        /// Payload size in bits, header included
        bits: usize,
    },
    /// Compression was not attempted
    CompressionSkipped {
        /// Reason
        reason: SkipReason,
    },
    /// Compression ran and the shorter text was chosen
    CompressionEvaluated {
        /// Characters of the raw text
        raw_len: usize,
        /// Characters of the compressed text, tag excluded
        compressed_len: usize,
        /// Whether the compressed form was kept
        used: bool,
    },
    /// Compression failed; the raw text was kept
    CompressionFailed {
        /// Failure
        error: Error,
    },
    /// Characters outside the alphabet were ignored while decoding
    CharactersSkipped {
        /// Characters ignored
        count: usize,
    },
    /// Decoding gave up and produced nothing
    DecodeFailed {
        /// Format family
        family: Family,
        /// Failure
        error: Error,
    },
    /// Records were unpacked from a payload
    Decoded {
        /// Format family
        family: Family,
        /// Header version read
        version: u8,
        /// Records unpacked
        records: usize,
        /// Bits left over and discarded as padding
        trailing_bits: usize,
    },
}

/// Receiver for codec events
pub trait Diagnostics {
    /// Handle one event
    fn record(&self, event: &CodecEvent);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    #[inline]
    fn record(&self, event: &CodecEvent) {
        (**self).record(event)
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: &CodecEvent) {
        match event {
            CodecEvent::Encoded {
                family,
                version,
                records,
                bits,
            } => {
                tracing::debug!(?family, version, records, bits, "Payload encoded");
            }
            CodecEvent::CompressionSkipped { reason } => {
                tracing::debug!(?reason, "Compression skipped");
            }
            CodecEvent::CompressionEvaluated {
                raw_len,
                compressed_len,
                used,
            } => {
                tracing::debug!(raw_len, compressed_len, used, "Compression evaluated");
            }
            CodecEvent::CompressionFailed { error } => {
                tracing::warn!(error = %error, "Compression failed, keeping raw payload");
            }
            CodecEvent::CharactersSkipped { count } => {
                tracing::warn!(count, "Ignored characters outside the payload alphabet");
            }
            CodecEvent::DecodeFailed { family, error } => {
                tracing::warn!(?family, error = %error, "Payload could not be decoded");
            }
            CodecEvent::Decoded {
                family,
                version,
                records,
                trailing_bits,
            } => {
                tracing::debug!(?family, version, records, trailing_bits, "Payload decoded");
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    #[inline]
    fn record(&self, _event: &CodecEvent) {}
}

/// Keeps every event in order
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    events: RefCell<Vec<CodecEvent>>,
}

impl CollectingDiagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events recorded so far
    pub fn events(&self) -> Vec<CodecEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return the events recorded so far
    pub fn take(&self) -> Vec<CodecEvent> {
        self.events.take()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn record(&self, event: &CodecEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
