//! Primitive types shared by every store.

use std::collections::BTreeSet;
use std::fmt;

/// A `/`-delimited, case-sensitive key without a leading `/`.
pub type Key = String;

/// An opaque stored byte sequence.
pub type Value = Vec<u8>;

/// A half-open byte interval `[start, end)` into a value.
///
/// Ranges outside the value are not rejected; they are clamped the same way
/// bounded slicing would be, so `(2, 100)` on a 5 byte value yields bytes `2..5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// First byte included.
    pub start: usize,
    /// First byte excluded.
    pub end: usize,
}

impl ByteRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the range clamped to a value of length `len`.
    #[must_use]
    pub fn clamp(self, len: usize) -> std::ops::Range<usize> {
        let end = self.end.min(len);
        let start = self.start.min(end);
        start..end
    }

    /// Returns the bytes of `value` covered by this range.
    #[must_use]
    pub fn slice(self, value: &[u8]) -> Value {
        value[self.clamp(value.len())].to_vec()
    }
}

impl From<(usize, usize)> for ByteRange {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// The immediate children of a prefix.
///
/// Both sets hold names relative to the queried prefix, without a trailing
/// `/`. They are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDirResult {
    /// Children that are keys.
    pub keys: BTreeSet<Key>,
    /// Children that have further descendants.
    pub prefixes: BTreeSet<Key>,
}

impl ListDirResult {
    /// Returns `true` if the prefix has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.prefixes.is_empty()
    }
}

/// One independently implementable facet of store behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Values can be fetched by key.
    Readable,
    /// The key set can be enumerated.
    Listable,
    /// Values can be stored and erased.
    Writeable,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Readable => "readable",
            Self::Listable => "listable",
            Self::Writeable => "writeable",
        })
    }
}

/// The set of capabilities a store supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Supports [`crate::ReadableStore`].
    pub readable: bool,
    /// Supports [`crate::ListableStore`].
    pub listable: bool,
    /// Supports [`crate::WriteableStore`].
    pub writeable: bool,
}

impl Capabilities {
    /// Readable, listable and writeable.
    pub const ALL: Self = Self {
        readable: true,
        listable: true,
        writeable: true,
    };

    /// Readable and listable, but not writeable.
    pub const READ_ONLY: Self = Self {
        readable: true,
        listable: true,
        writeable: false,
    };

    /// Returns `true` if `capability` is supported.
    #[must_use]
    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Readable => self.readable,
            Capability::Listable => self.listable,
            Capability::Writeable => self.writeable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_slice_in_bounds() {
        assert_eq!(ByteRange::new(2, 5).slice(b"0123456789"), b"234");
        assert_eq!(ByteRange::new(0, 0).slice(b"0123"), b"");
    }

    #[test]
    fn range_slice_clamps() {
        assert_eq!(ByteRange::new(2, 100).slice(b"01234"), b"234");
        assert_eq!(ByteRange::new(7, 9).slice(b"01234"), b"");
        assert_eq!(ByteRange::new(4, 2).slice(b"01234"), b"");
    }

    #[test]
    fn capabilities_supports() {
        assert!(Capabilities::ALL.supports(Capability::Writeable));
        assert!(!Capabilities::READ_ONLY.supports(Capability::Writeable));
        assert!(Capabilities::READ_ONLY.supports(Capability::Listable));
        assert!(!Capabilities::default().supports(Capability::Readable));
    }
}
