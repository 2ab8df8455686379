//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed given to the engine.
//!
//! Each concern (roster placement, incident intake, incident type draw,
//! terrain weights) owns its own stream, seeded from
//! (master_seed XOR slot_index * golden-ratio constant). This means:
//!   - Drawing more incidents never changes the terrain or the roster.
//!   - Each stream is fully reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi], both inclusive.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        // Two's complement: the span of any ordered i64 pair fits in u64.
        let offset = match (hi.wrapping_sub(lo) as u64).checked_add(1) {
            Some(span) => self.next_u64_below(span),
            None => self.inner.next_u64(),
        };
        lo.wrapping_add(offset as i64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Long-lived streams for a single engine, one per slot.
pub struct RngBank {
    master_seed: u64,
    streams:     Vec<StreamRng>,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        let streams = StreamSlot::ALL
            .iter()
            .map(|slot| StreamRng::new(master_seed, *slot as u64).with_name(slot.name()))
            .collect();
        Self { master_seed, streams }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Borrow the stream for `slot`. Draws advance that stream only.
    pub fn stream(&mut self, slot: StreamSlot) -> &mut StreamRng {
        &mut self.streams[slot as usize]
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Append only.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Roster = 0,
    Intake = 1,
    IncidentType = 2,
    Terrain = 3,
    // Add new streams here, append only.
}

impl StreamSlot {
    pub const ALL: [StreamSlot; 4] = [
        StreamSlot::Roster,
        StreamSlot::Intake,
        StreamSlot::IncidentType,
        StreamSlot::Terrain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Intake => "intake",
            Self::IncidentType => "incident_type",
            Self::Terrain => "terrain",
        }
    }
}
