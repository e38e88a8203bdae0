use crate::errors::{RegisterKind, RegisterOutOfRange};
use crate::state::cache::LruCache;

/// Data and status register banks with an LRU write-through cache in front of
/// the data bank.
///
/// All data register reads made by instructions go through [`Self::fetch`] and
/// all writes through [`Self::write`], so cached copies never diverge from the
/// authoritative register values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    data: Vec<i64>,
    status: Vec<bool>,
    cache: LruCache,
}

impl RegisterFile {
    /// Creates zeroed banks of the given sizes and an empty cache.
    #[must_use]
    pub fn new(data_registers: usize, status_registers: usize, cache_capacity: usize) -> Self {
        Self {
            data: vec![0; data_registers],
            status: vec![false; status_registers],
            cache: LruCache::new(cache_capacity),
        }
    }

    /// Reads a data register through the cache.
    ///
    /// A hit marks the entry most recently used. A miss copies the register
    /// value into the cache, evicting the least recently used entry when the
    /// cache overflows.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterOutOfRange`] for an index past the data bank.
    pub fn fetch(&mut self, index: usize) -> Result<i64, RegisterOutOfRange> {
        let value = self.peek(index)?;
        if let Some(cached) = self.cache.touch(index) {
            tracing::trace!(index, value = cached, "cache hit");
            return Ok(cached);
        }

        if let Some((evicted, _)) = self.cache.insert(index, value) {
            tracing::trace!(index, evicted, "cache miss, evicted least recently used");
        } else {
            tracing::trace!(index, "cache miss");
        }
        Ok(value)
    }

    /// Writes a data register, updating any cached copy in place.
    ///
    /// Writes never promote an uncached register into the cache.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterOutOfRange`] for an index past the data bank.
    pub fn write(&mut self, index: usize, value: i64) -> Result<(), RegisterOutOfRange> {
        let count = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(RegisterOutOfRange {
                kind: RegisterKind::Data,
                index,
                count,
            })?;
        *slot = value;
        let _ = self.cache.update(index, value);
        Ok(())
    }

    /// Reads the authoritative data register value without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterOutOfRange`] for an index past the data bank.
    pub fn peek(&self, index: usize) -> Result<i64, RegisterOutOfRange> {
        self.data.get(index).copied().ok_or(RegisterOutOfRange {
            kind: RegisterKind::Data,
            index,
            count: self.data.len(),
        })
    }

    /// Reads a status register.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterOutOfRange`] for an index past the status bank.
    pub fn status(&self, index: usize) -> Result<bool, RegisterOutOfRange> {
        self.status.get(index).copied().ok_or(RegisterOutOfRange {
            kind: RegisterKind::Status,
            index,
            count: self.status.len(),
        })
    }

    /// Writes a status register.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterOutOfRange`] for an index past the status bank.
    pub fn set_status(&mut self, index: usize, value: bool) -> Result<(), RegisterOutOfRange> {
        let count = self.status.len();
        let slot = self
            .status
            .get_mut(index)
            .ok_or(RegisterOutOfRange {
                kind: RegisterKind::Status,
                index,
                count,
            })?;
        *slot = value;
        Ok(())
    }

    /// Authoritative data register values.
    #[must_use]
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    /// Status register values.
    #[must_use]
    pub fn status_registers(&self) -> &[bool] {
        &self.status
    }

    /// The data register cache.
    #[must_use]
    pub const fn cache(&self) -> &LruCache {
        &self.cache
    }
}
