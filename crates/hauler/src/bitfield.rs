//! Wrapper types around Bitvec.
use bitvec::prelude::*;

/// Bitfield where index = piece.
pub type Bitfield = BitVec<u8, Msb0>;

/// Reserved bytes exchanged during handshake.
type ReservedAlias = BitArray<[u8; 8], Msb0>;

#[derive(Debug, Clone, Default, Copy, PartialEq, Eq)]
pub struct Reserved(pub ReservedAlias);

impl From<[u8; 8]> for Reserved {
    fn from(value: [u8; 8]) -> Self {
        Self(ReservedAlias::from(value))
    }
}

impl From<Reserved> for [u8; 8] {
    fn from(value: Reserved) -> Self {
        value.0.into_inner()
    }
}

impl Reserved {
    /// BEP 10, 20th bit from the right.
    const EXTENDED: usize = 43;
    /// BEP 6, third least significant bit of the last byte.
    const FAST: usize = 61;
    /// BEP 5, last bit.
    const DHT: usize = 63;

    pub fn new(extended: bool, fast: bool, dht: bool) -> Self {
        let mut bits = ReservedAlias::from([0u8; 8]);
        bits.set(Self::EXTENDED, extended);
        bits.set(Self::FAST, fast);
        bits.set(Self::DHT, dht);
        Self(bits)
    }

    pub fn supports_extended(&self) -> bool {
        self.0[Self::EXTENDED]
    }

    pub fn supports_fast(&self) -> bool {
        self.0[Self::FAST]
    }

    pub fn supports_dht(&self) -> bool {
        self.0[Self::DHT]
    }
}

/// Pieces owned by one side of a connection, sized from the piece length
/// and the total length of the content.
///
/// The raw representation is the wire format of the `bitfield` message:
/// the high bit of the first byte is piece 0 and trailing bits are always
/// zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceBitfield {
    bits: Bitfield,
    piece_length: usize,
    total_length: u64,
}

impl PieceBitfield {
    pub fn new(piece_length: usize, total_length: u64) -> Self {
        let pieces = if piece_length == 0 {
            0
        } else {
            total_length.div_ceil(piece_length as u64) as usize
        };
        Self {
            bits: bitvec![u8, Msb0; 0; pieces],
            piece_length,
            total_length,
        }
    }

    /// Number of pieces, the count of usable bits.
    pub fn pieces(&self) -> usize {
        self.bits.len()
    }

    pub fn piece_length(&self) -> usize {
        self.piece_length
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Returns false if `index` is out of range.
    pub fn set(&mut self, index: usize) -> bool {
        self.put(index, true)
    }

    /// Returns false if `index` is out of range.
    pub fn unset(&mut self, index: usize) -> bool {
        self.put(index, false)
    }

    fn put(&mut self, index: usize, value: bool) -> bool {
        match self.bits.get_mut(index) {
            Some(mut bit) => {
                *bit = value;
                true
            }
            None => false,
        }
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).map(|b| *b).unwrap_or(false)
    }

    pub fn set_all(&mut self) {
        self.bits.fill(true);
    }

    pub fn all_set(&self) -> bool {
        self.bits.all()
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Replace the bits with a wire-format bitfield. Bytes of the wrong
    /// length are ignored and false is returned, spare bits in the last byte
    /// are cleared.
    pub fn set_raw(&mut self, raw: &[u8]) -> bool {
        if raw.len() != self.raw_len() {
            return false;
        }
        let pieces = self.pieces();
        let mut bits = Bitfield::from_vec(raw.to_vec());
        bits[pieces..].fill(false);
        bits.truncate(pieces);
        self.bits = bits;
        true
    }

    pub fn as_raw(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn raw_len(&self) -> usize {
        self.pieces().div_ceil(8)
    }

    fn last_piece_length(&self) -> u64 {
        let pieces = self.pieces() as u64;
        if pieces == 0 {
            return 0;
        }
        self.total_length - (pieces - 1) * self.piece_length as u64
    }

    /// Bytes covered by the pieces that are set, the last piece may be
    /// shorter than the others.
    pub fn completed_length(&self) -> u64 {
        let count = self.count() as u64;
        if count == 0 {
            return 0;
        }
        let last = self.pieces() - 1;
        if self.is_set(last) {
            (count - 1) * self.piece_length as u64 + self.last_piece_length()
        } else {
            count * self.piece_length as u64
        }
    }
}
