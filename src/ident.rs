//! Process-wide unique identifier generation.
//!
//! Identifiers are hex segments around a four-letter kind tag, for example
//! `1f0a9c3-APPL-0007-9b2e44d1c0aa`. A monotonic sequence is folded into the
//! third segment so two ids minted in the same process can never collide.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Entity kinds that receive generated identifiers. Users carry their own
/// NRIC-format ids and are not minted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Application,
    Enquiry,
    Project,
}

impl IdKind {
    const fn tag(self) -> &'static str {
        match self {
            IdKind::Application => "APPL",
            IdKind::Enquiry => "ENQU",
            IdKind::Project => "PROJ",
        }
    }
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Mints a fresh identifier for the given kind.
pub fn new_id(kind: IdKind) -> String {
    let mut rng = rand::thread_rng();
    let head: u32 = rng.gen_range(0..0x1000_0000);
    let tail: u64 = rng.gen::<u64>() & 0xffff_ffff_ffff;
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{head:07x}-{}-{:04x}-{tail:012x}", kind.tag(), seq & 0xffff)
}
