use std::marker::PhantomData;

use crate::TagIndex;

/// A vector that stores its entries using the minimal number of bytes needed
/// for the largest entry pushed so far. All entries share the same width,
/// which is widened (rewriting every stored entry) when a larger entry is
/// stored.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct ByteCompressedVec<T> {
    data: Vec<u8>,
    bytes_per_entry: usize,
    _marker: PhantomData<T>,
}

impl<T: CompressedEntry> ByteCompressedVec<T> {
    pub fn new() -> ByteCompressedVec<T> {
        ByteCompressedVec {
            data: Vec::new(),
            bytes_per_entry: 0,
            _marker: PhantomData,
        }
    }

    /// Appends an entry at the end.
    pub fn push(&mut self, entry: T) {
        self.widen(entry.bytes_required());

        let old_len = self.data.len();
        self.data.resize(old_len + self.bytes_per_entry, 0);
        entry.to_bytes(&mut self.data[old_len..]);
    }

    /// Returns the entry at the given position.
    pub fn index(&self, index: usize) -> T {
        let start = index * self.bytes_per_entry;
        T::from_bytes(&self.data[start..start + self.bytes_per_entry])
    }

    /// Overwrites the entry at the given position.
    pub fn set(&mut self, index: usize, entry: T) {
        self.widen(entry.bytes_required());

        let start = index * self.bytes_per_entry;
        entry.to_bytes(&mut self.data[start..start + self.bytes_per_entry]);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        if self.bytes_per_entry == 0 {
            0
        } else {
            debug_assert!(self.data.len() % self.bytes_per_entry == 0);
            self.data.len() / self.bytes_per_entry
        }
    }

    /// Returns true iff there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes used per entry.
    pub fn bytes_per_entry(&self) -> usize {
        self.bytes_per_entry
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |index| self.index(index))
    }

    /// Re-encodes all entries when an entry needs more bytes than the current width.
    fn widen(&mut self, bytes_required: usize) {
        if bytes_required <= self.bytes_per_entry {
            return;
        }

        let mut data = vec![0; self.len() * bytes_required];
        if self.bytes_per_entry > 0 {
            for (index, entry) in self.iter().enumerate() {
                let start = index * bytes_required;
                entry.to_bytes(&mut data[start..start + bytes_required]);
            }
        }

        self.bytes_per_entry = bytes_required;
        self.data = data;
    }
}

impl<T: CompressedEntry + Clone> ByteCompressedVec<T> {
    /// Creates a vector containing `n` copies of the given entry.
    pub fn from_elem(entry: T, n: usize) -> ByteCompressedVec<T> {
        let mut vec = ByteCompressedVec::new();
        vec.widen(entry.bytes_required());
        vec.data.reserve(n * vec.bytes_per_entry);
        for _ in 0..n {
            vec.push(entry.clone());
        }
        vec
    }
}

/// An entry that can be stored in a [ByteCompressedVec].
pub trait CompressedEntry {
    /// Writes the entry into the given bytes, which are at least `bytes_required()` long.
    fn to_bytes(&self, bytes: &mut [u8]);

    /// Reads the entry back from its bytes.
    fn from_bytes(bytes: &[u8]) -> Self;

    /// The number of bytes needed to store this entry.
    fn bytes_required(&self) -> usize;
}

impl CompressedEntry for usize {
    fn to_bytes(&self, bytes: &mut [u8]) {
        let array = self.to_le_bytes();
        for (byte, value) in bytes.iter_mut().zip(array.iter()) {
            *byte = *value;
        }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut array = [0; std::mem::size_of::<usize>()];
        for (value, byte) in array.iter_mut().zip(bytes.iter()) {
            *value = *byte;
        }
        usize::from_le_bytes(array)
    }

    fn bytes_required(&self) -> usize {
        let bits = usize::BITS - self.leading_zeros();
        (bits.div_ceil(u8::BITS) as usize).max(1)
    }
}

/// Undefined entries are stored as zero, so that a freshly widened vector is
/// filled with undefined entries.
impl CompressedEntry for Option<usize> {
    fn to_bytes(&self, bytes: &mut [u8]) {
        self.map_or(0, |value| value + 1).to_bytes(bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        usize::from_bytes(bytes).checked_sub(1)
    }

    fn bytes_required(&self) -> usize {
        self.map_or(0, |value| value + 1).bytes_required()
    }
}

impl<Tag> CompressedEntry for TagIndex<usize, Tag> {
    fn to_bytes(&self, bytes: &mut [u8]) {
        self.value().to_bytes(bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        TagIndex::new(usize::from_bytes(bytes))
    }

    fn bytes_required(&self) -> usize {
        self.value().bytes_required()
    }
}

impl<Tag> CompressedEntry for Option<TagIndex<usize, Tag>> {
    fn to_bytes(&self, bytes: &mut [u8]) {
        self.map(|index| index.value()).to_bytes(bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Option::<usize>::from_bytes(bytes).map(TagIndex::new)
    }

    fn bytes_required(&self) -> usize {
        self.map(|index| index.value()).bytes_required()
    }
}
