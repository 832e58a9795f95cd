///! # Membership Filter
///!
///! A fixed-size bit array with `k` independent hash positions, used by every
///! SSTable to answer "might this key be in here?" without touching disk.
///!
///! A filter can tell you with certainty that a key is **not** in the set
///! (no false negatives), but may occasionally report that a key **is** in
///! the set when it isn't. The false-positive rate grows with how full the
///! filter is relative to its fixed bit count `m`.
///!
///! Unlike a filter sized from a target false-positive rate, this one has a
///! fixed `m`/`k` chosen up front (defaults: `m` = 8192 bits, `k` = 4 hashes)
///! and is shared by every SSTable regardless of how many keys it holds.
///!
///! ## Example
///!
///! ```rust
///! use bloom::BloomFilter;
///!
///! let mut bf = BloomFilter::new(8192, 4);
///! bf.add(b"hello");
///! assert!(bf.might_contain(b"hello"));
///! ```
use std::io::{self, Read, Write};

/// Default number of bits in a freshly constructed filter.
pub const DEFAULT_NUM_BITS: u32 = 8192;
/// Default number of hash positions.
pub const DEFAULT_NUM_HASHES: u32 = 4;

/// A bit array of `m` bits tested with `k` independent hash positions.
///
/// Uses double hashing: `h(i) = h1 + i * h2` where `h1` and `h2` are derived
/// from FNV-1a with two different seeds. Any deterministic, reasonably
/// uniform hash family works as long as `add` and `might_contain` agree on
/// it, which is the case here since both route through [`positions`].
pub struct BloomFilter {
    bits: Vec<u8>,
    num_bits: u32,
    num_hashes: u32,
}

impl BloomFilter {
    /// Creates an empty filter with `num_bits` bits and `num_hashes` hash
    /// positions.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn new(num_bits: u32, num_hashes: u32) -> Self {
        assert!(num_bits > 0, "num_bits must be > 0");
        let byte_len = ((num_bits as usize) + 7) / 8;
        Self {
            bits: vec![0u8; byte_len],
            num_bits,
            num_hashes: num_hashes.max(1),
        }
    }

    /// Creates a filter with the spec's stated defaults (`m` = 8192, `k` = 4).
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_NUM_BITS, DEFAULT_NUM_HASHES)
    }

    fn from_raw(bits: Vec<u8>, num_bits: u32, num_hashes: u32) -> Self {
        Self {
            bits,
            num_bits,
            num_hashes,
        }
    }

    /// Sets the `k` bits derived from `key`.
    pub fn add(&mut self, key: &[u8]) {
        for idx in self.positions(key).collect::<Vec<_>>() {
            let byte = (idx / 8) as usize;
            let bit = (idx % 8) as u8;
            self.bits[byte] |= 1 << bit;
        }
    }

    /// Returns `false` if `key` is **definitely not** in the set, `true` if
    /// it **might** be.
    #[must_use]
    pub fn might_contain(&self, key: &[u8]) -> bool {
        self.positions(key).all(|idx| {
            let byte = (idx / 8) as usize;
            let bit = (idx % 8) as u8;
            (self.bits[byte] >> bit) & 1 == 1
        })
    }

    /// Number of bits in the filter (`m`).
    #[must_use]
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of hash positions (`k`).
    #[must_use]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Serialized size in bytes: `4 (m) + 4 (k) + ceil(m/8)`.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        4 + 4 + self.bits.len()
    }

    /// Writes `m`, `k`, and the raw bits, all little-endian, with no length
    /// prefix on the bit array (its length is always `ceil(m/8)`).
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.num_bits.to_le_bytes())?;
        w.write_all(&self.num_hashes.to_le_bytes())?;
        w.write_all(&self.bits)?;
        Ok(())
    }

    /// Reads back a filter written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf4 = [0u8; 4];

        r.read_exact(&mut buf4)?;
        let num_bits = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let num_hashes = u32::from_le_bytes(buf4);

        let byte_len = ((num_bits as usize) + 7) / 8;
        let mut bits = vec![0u8; byte_len];
        r.read_exact(&mut bits)?;

        Ok(Self::from_raw(bits, num_bits, num_hashes))
    }

    /// The `k` bit positions a key hashes to, in `[0, num_bits)`.
    fn positions(&self, key: &[u8]) -> impl Iterator<Item = u32> + '_ {
        let h1 = fnv1a_64(key, 0xcbf29ce484222325);
        let h2 = fnv1a_64(key, 0x517cc1b727220a95);
        let m = self.num_bits as u64;
        (0..self.num_hashes).map(move |i| (h1.wrapping_add((i as u64).wrapping_mul(h2)) % m) as u32)
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .field("bytes", &self.bits.len())
            .finish()
    }
}

/// FNV-1a 64-bit hash with a configurable starting basis, used to derive two
/// independent hashes for double hashing.
fn fnv1a_64(data: &[u8], basis: u64) -> u64 {
    const FNV_PRIME: u64 = 0x00000100000001b3;
    let mut hash = basis;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests;
