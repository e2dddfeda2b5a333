//! HPACK table model (RFC 7541 Section 2.3).
//!
//! The index space is shared: `1..=61` addresses the static table and
//! everything above addresses the dynamic table, newest entry first.

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use bytes::Bytes;

use super::HeaderField;
use crate::error::HpackError;

/// HPACK static table entries: (name, value). 61 entries indexed 1..61.
const STATIC_ENTRIES: &[(&[u8], &[u8])] = &[
    (b":authority", b""),                   // 1
    (b":method", b"GET"),                   // 2
    (b":method", b"POST"),                  // 3
    (b":path", b"/"),                       // 4
    (b":path", b"/index.html"),             // 5
    (b":scheme", b"http"),                  // 6
    (b":scheme", b"https"),                 // 7
    (b":status", b"200"),                   // 8
    (b":status", b"204"),                   // 9
    (b":status", b"206"),                   // 10
    (b":status", b"304"),                   // 11
    (b":status", b"400"),                   // 12
    (b":status", b"404"),                   // 13
    (b":status", b"500"),                   // 14
    (b"accept-charset", b""),               // 15
    (b"accept-encoding", b"gzip, deflate"), // 16
    (b"accept-language", b""),              // 17
    (b"accept-ranges", b""),                // 18
    (b"accept", b""),                       // 19
    (b"access-control-allow-origin", b""),  // 20
    (b"age", b""),                          // 21
    (b"allow", b""),                        // 22
    (b"authorization", b""),                // 23
    (b"cache-control", b""),                // 24
    (b"content-disposition", b""),          // 25
    (b"content-encoding", b""),             // 26
    (b"content-language", b""),             // 27
    (b"content-length", b""),               // 28
    (b"content-location", b""),             // 29
    (b"content-range", b""),                // 30
    (b"content-type", b""),                 // 31
    (b"cookie", b""),                       // 32
    (b"date", b""),                         // 33
    (b"etag", b""),                         // 34
    (b"expect", b""),                       // 35
    (b"expires", b""),                      // 36
    (b"from", b""),                         // 37
    (b"host", b""),                         // 38
    (b"if-match", b""),                     // 39
    (b"if-modified-since", b""),            // 40
    (b"if-none-match", b""),                // 41
    (b"if-range", b""),                     // 42
    (b"if-unmodified-since", b""),          // 43
    (b"last-modified", b""),                // 44
    (b"link", b""),                         // 45
    (b"location", b""),                     // 46
    (b"max-forwards", b""),                 // 47
    (b"proxy-authenticate", b""),           // 48
    (b"proxy-authorization", b""),          // 49
    (b"range", b""),                        // 50
    (b"referer", b""),                      // 51
    (b"refresh", b""),                      // 52
    (b"retry-after", b""),                  // 53
    (b"server", b""),                       // 54
    (b"set-cookie", b""),                   // 55
    (b"strict-transport-security", b""),    // 56
    (b"transfer-encoding", b""),            // 57
    (b"user-agent", b""),                   // 58
    (b"vary", b""),                         // 59
    (b"via", b""),                          // 60
    (b"www-authenticate", b""),             // 61
];

/// Number of static table entries.
pub const STATIC_TABLE_LEN: usize = 61;

/// Map an HPACK index above the static range to a 0-based dynamic table
/// position (0 = newest). Returns `None` for indices in the static range.
pub fn dynamic_position(index: usize) -> Option<usize> {
    index.checked_sub(STATIC_TABLE_LEN + 1)
}

/// Inverse of [`dynamic_position`].
pub fn dynamic_index(position: usize) -> usize {
    STATIC_TABLE_LEN + 1 + position
}

/// The RFC 7541 Appendix A table plus its two lookup maps.
///
/// Build it once (see [`StaticTable::get`]) and share it by reference.
#[derive(Debug)]
pub struct StaticTable {
    entries: Vec<HeaderField>,
    /// name -> value -> index; first index wins.
    exact: HashMap<&'static [u8], HashMap<&'static [u8], usize>>,
    /// name -> lowest index.
    names: HashMap<&'static [u8], usize>,
}

impl StaticTable {
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(STATIC_ENTRIES.len());
        let mut exact: HashMap<&'static [u8], HashMap<&'static [u8], usize>> = HashMap::new();
        let mut names = HashMap::new();

        for (i, &(name, value)) in STATIC_ENTRIES.iter().enumerate() {
            let index = i + 1;
            entries.push(HeaderField::new(Bytes::from_static(name), Bytes::from_static(value)));
            exact.entry(name).or_default().entry(value).or_insert(index);
            names.entry(name).or_insert(index);
        }

        Self { entries, exact, names }
    }

    /// The process-wide instance, built on first use.
    pub fn get() -> &'static StaticTable {
        static TABLE: OnceLock<StaticTable> = OnceLock::new();
        TABLE.get_or_init(StaticTable::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a 1-based static index.
    pub fn resolve(&self, index: usize) -> Result<&HeaderField, HpackError> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(HpackError::InvalidIndex(index))
    }

    /// Index of the entry matching both name and value.
    pub fn find(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.exact.get(name)?.get(value).copied()
    }

    /// Lowest index whose name matches.
    pub fn find_name(&self, name: &[u8]) -> Option<usize> {
        self.names.get(name).copied()
    }
}

impl Default for StaticTable {
    fn default() -> Self {
        Self::new()
    }
}

/// HPACK dynamic table (RFC 7541 Section 2.3.2).
///
/// Entries are stored newest-first. `size` always equals the sum of
/// [`HeaderField::size`] over the entries and never exceeds `max_size`.
#[derive(Debug, Clone)]
pub struct DynamicTable {
    entries: VecDeque<HeaderField>,
    size: usize,
    max_size: usize,
}

impl DynamicTable {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    /// Insert `field` as the newest entry, evicting from the oldest end first
    /// (RFC 7541 Section 4.4). An entry larger than `max_size` empties the
    /// table and is not inserted.
    pub fn insert(&mut self, field: HeaderField) {
        let entry_size = field.size();
        while self.size + entry_size > self.max_size && !self.entries.is_empty() {
            self.evict_oldest();
        }
        if entry_size > self.max_size {
            tracing::debug!(
                entry_size,
                max_size = self.max_size,
                "header field larger than dynamic table, not indexed"
            );
            return;
        }
        self.entries.push_front(field);
        self.size += entry_size;
    }

    /// Update the maximum size, evicting oldest entries until the table fits.
    pub fn set_max_size(&mut self, max_size: usize) {
        tracing::debug!(old = self.max_size, new = max_size, "dynamic table size update");
        self.max_size = max_size;
        while self.size > self.max_size && !self.entries.is_empty() {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.entries.pop_back() {
            self.size -= evicted.size();
            tracing::debug!(
                name = ?evicted.name,
                entry_size = evicted.size(),
                table_size = self.size,
                "evicted dynamic table entry"
            );
        }
    }

    /// Entry at a 0-based position; 0 is the newest.
    pub fn at(&self, position: usize) -> Result<&HeaderField, HpackError> {
        self.entries
            .get(position)
            .ok_or(HpackError::InvalidIndex(dynamic_index(position)))
    }

    /// Position of the newest entry matching name and value.
    pub fn find(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|h| h.name == name && h.value == value)
    }

    /// Position of the newest entry matching the name.
    pub fn find_name(&self, name: &[u8]) -> Option<usize> {
        self.entries.iter().position(|h| h.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current size in octets, including the 32-octet per-entry overhead.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

/// The combined static + dynamic index space seen by one side of a connection.
#[derive(Debug, Clone)]
pub struct HeaderTable<'t> {
    static_table: &'t StaticTable,
    dynamic: DynamicTable,
}

impl HeaderTable<'static> {
    pub fn new(max_size: usize) -> Self {
        Self::with_static_table(StaticTable::get(), max_size)
    }
}

impl<'t> HeaderTable<'t> {
    pub fn with_static_table(static_table: &'t StaticTable, max_size: usize) -> Self {
        Self {
            static_table,
            dynamic: DynamicTable::new(max_size),
        }
    }

    /// Resolve an HPACK index against the static table, then the dynamic table.
    pub fn resolve(&self, index: usize) -> Result<&HeaderField, HpackError> {
        if index == 0 {
            return Err(HpackError::InvalidIndex(0));
        }
        match dynamic_position(index) {
            None => self.static_table.resolve(index),
            Some(position) => self
                .dynamic
                .at(position)
                .map_err(|_| HpackError::InvalidIndex(index)),
        }
    }

    pub fn static_table(&self) -> &'t StaticTable {
        self.static_table
    }

    pub fn dynamic(&self) -> &DynamicTable {
        &self.dynamic
    }

    pub fn dynamic_mut(&mut self) -> &mut DynamicTable {
        &mut self.dynamic
    }
}
