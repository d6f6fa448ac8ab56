//! Fast Extension (BEP 6) allowed-fast sets.
use std::net::Ipv4Addr;

use sha1_smol::Sha1;

/// Piece indices kept sorted in ascending order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet(Vec<usize>);

impl IndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `index` was already present.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.0.binary_search(&index) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, index);
                true
            }
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut v: Vec<usize> = iter.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }
}

/// Number of pieces usually offered as allowed fast.
pub const ALLOWED_FAST_SET_SIZE: usize = 10;

/// Canonical allowed-fast set that we offer to the peer at `ip`, in the
/// order of generation.
///
/// The same peer always gets the same pieces for the same torrent, so it
/// cannot collect more by reconnecting. At most `pieces` indices are
/// returned.
pub fn allowed_fast_set(ip: Ipv4Addr, info_hash: &[u8; 20], pieces: usize, k: usize) -> Vec<usize> {
    let k = k.min(pieces);
    let mut set = Vec::with_capacity(k);

    if k == 0 {
        return set;
    }

    // only the /24 of the peer counts
    let mut x = Vec::with_capacity(24);
    x.extend_from_slice(&(u32::from(ip) & 0xFFFF_FF00).to_be_bytes());
    x.extend_from_slice(info_hash);

    while set.len() < k {
        let digest = Sha1::from(&x).digest().bytes();

        for chunk in digest.chunks_exact(4) {
            if set.len() >= k {
                break;
            }
            let y = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let index = (y as u64 % pieces as u64) as usize;
            if !set.contains(&index) {
                set.push(index);
            }
        }

        x = digest.to_vec();
    }

    set
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;

    #[test]
    fn sorted_and_unique() {
        let mut set = IndexSet::new();
        assert!(set.insert(5));
        assert!(set.insert(3));
        assert!(!set.insert(5));

        assert_eq!(set.as_slice(), &[3, 5]);
        assert!(set.contains(3));
        assert!(!set.contains(4));
    }

    #[test]
    fn random_insertion_order() {
        let mut rng = rand::thread_rng();
        let mut values: Vec<usize> = (0..200).map(|i| i % 50).collect();
        values.shuffle(&mut rng);

        let mut set = IndexSet::new();
        for v in &values {
            set.insert(*v);
        }

        assert_eq!(set.len(), 50);
        assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(set, values.into_iter().collect::<IndexSet>());
    }

    // Example from BEP 6.
    #[test]
    fn canonical_set() {
        let ip = Ipv4Addr::new(80, 4, 4, 200);
        let info_hash = [0xaa; 20];

        assert_eq!(
            allowed_fast_set(ip, &info_hash, 1313, 7),
            [1059, 431, 808, 1217, 287, 376, 1188]
        );
        assert_eq!(
            allowed_fast_set(ip, &info_hash, 1313, 9),
            [1059, 431, 808, 1217, 287, 376, 1188, 353, 508]
        );
    }

    #[test]
    fn same_subnet_same_set() {
        let info_hash = [7; 20];
        let a = allowed_fast_set(Ipv4Addr::new(10, 0, 0, 1), &info_hash, 500, 10);
        let b = allowed_fast_set(Ipv4Addr::new(10, 0, 0, 254), &info_hash, 500, 10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn never_more_than_pieces() {
        let set = allowed_fast_set(Ipv4Addr::LOCALHOST, &[1; 20], 3, 10);
        let mut sorted = set.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2]);

        assert!(allowed_fast_set(Ipv4Addr::LOCALHOST, &[1; 20], 0, 10).is_empty());
    }
}
