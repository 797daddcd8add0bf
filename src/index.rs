//! Open-addressing hash index from qualified key to value text.
//!
//! Keys are hashed with 32-bit FNV-1a and placed by linear probing. All key and
//! value bytes live in one owned arena; slots refer to them by offset and length,
//! so growing the table or the arena never invalidates an entry. The table
//! doubles before its load factor passes 3/4, which keeps at least one empty slot
//! around and bounds every probe sequence.
//!
//! There is no removal: probing stops at the first empty slot, and without
//! tombstones a hole would hide entries placed past it.

use std::fmt;

/// Table size used when none is requested
pub const DEFAULT_CAPACITY: usize = 128;

const MIN_CAPACITY: usize = 8;

// Largest table allocated up front; bigger tables are reached by growth
const MAX_INITIAL_CAPACITY: usize = 1 << 16;

// Arenas smaller than this are never compacted
const COMPACT_THRESHOLD: usize = 4096;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    len: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    hash: u32,
    key: Span,
    value: Span,
}

/// Hash index owning the text of every key and value
#[derive(Clone)]
pub struct KeyIndex {
    slots: Vec<Option<Slot>>,
    arena: String,
    count: usize,
    /// Arena bytes still referenced by a slot
    live_bytes: usize,
}

impl KeyIndex {
    /// Create an empty index with room for at least `capacity` slots.
    ///
    /// The slot count is rounded up to a power of two and clamped to
    /// 2^16 slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity
            .clamp(MIN_CAPACITY, MAX_INITIAL_CAPACITY)
            .next_power_of_two();
        Self {
            slots: vec![None; capacity],
            arena: String::new(),
            count: 0,
            live_bytes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert or overwrite. Returns `true` when a new entry was created.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        if (self.count + 1) * 4 > self.slots.len() * 3 {
            self.grow();
        }

        let hash = fnv1a(key.as_bytes());
        let mask = self.slots.len() - 1;
        let mut idx = hash as usize & mask;

        // The load factor guarantees an empty slot, so this terminates
        loop {
            match self.slots[idx] {
                None => {
                    let key = self.push_text(key);
                    let value = self.push_text(value);
                    self.slots[idx] = Some(Slot { hash, key, value });
                    self.count += 1;
                    self.live_bytes += key.len + value.len;
                    return true;
                }
                Some(slot) if slot.hash == hash && self.text(slot.key) == key => {
                    if self.text(slot.value) != value {
                        let new_value = self.push_text(value);
                        self.live_bytes = self.live_bytes - slot.value.len + new_value.len;
                        self.slots[idx] = Some(Slot { value: new_value, ..slot });
                        self.maybe_compact();
                    }
                    return false;
                }
                Some(_) => idx = (idx + 1) & mask,
            }
        }
    }

    /// Look up the value text for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        let hash = fnv1a(key.as_bytes());
        let mask = self.slots.len() - 1;
        let mut idx = hash as usize & mask;

        for _ in 0..self.slots.len() {
            match self.slots[idx] {
                None => return None,
                Some(slot) if slot.hash == hash && self.text(slot.key) == key => {
                    return Some(self.text(slot.value));
                }
                Some(_) => idx = (idx + 1) & mask,
            }
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in table order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            pos: 0,
        }
    }

    /// Keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Drop every entry, keeping the current table size
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.arena.clear();
        self.count = 0;
        self.live_bytes = 0;
    }

    fn text(&self, span: Span) -> &str {
        &self.arena[span.start..span.start + span.len]
    }

    fn push_text(&mut self, text: &str) -> Span {
        let start = self.arena.len();
        self.arena.push_str(text);
        Span {
            start,
            len: text.len(),
        }
    }

    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, vec![None; capacity]);
        let mask = capacity - 1;

        for slot in old.into_iter().flatten() {
            let mut idx = slot.hash as usize & mask;
            while self.slots[idx].is_some() {
                idx = (idx + 1) & mask;
            }
            self.slots[idx] = Some(slot);
        }
    }

    /// Rewrite the arena once overwritten values outweigh the live text
    fn maybe_compact(&mut self) {
        let dead = self.arena.len() - self.live_bytes;
        if self.arena.len() < COMPACT_THRESHOLD || dead <= self.live_bytes {
            return;
        }

        let old = std::mem::replace(&mut self.arena, String::with_capacity(self.live_bytes));
        let copy = |arena: &mut String, span: Span| {
            let start = arena.len();
            arena.push_str(&old[span.start..span.start + span.len]);
            Span {
                start,
                len: span.len,
            }
        };

        for slot in self.slots.iter_mut().flatten() {
            slot.key = copy(&mut self.arena, slot.key);
            slot.value = copy(&mut self.arena, slot.value);
        }
    }
}

impl Default for KeyIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, value)` pairs of a [`KeyIndex`], in table order.
///
/// A clone resumes from the same position; [`KeyIndex::iter`] starts a fresh pass.
#[derive(Clone)]
pub struct Iter<'a> {
    index: &'a KeyIndex,
    pos: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.index.slots.len() {
            let slot = self.index.slots[self.pos];
            self.pos += 1;
            if let Some(slot) = slot {
                return Some((self.index.text(slot.key), self.index.text(slot.value)));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.index.slots.len() - self.pos))
    }
}

impl<'a> IntoIterator for &'a KeyIndex {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
