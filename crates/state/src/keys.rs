//! Composite key encoding.
//!
//! A composite key joins an entity-type prefix with an ordered list of
//! attribute values so that a flat key space can answer both point lookups
//! and "all X for Y" prefix scans.
//!
//! Key format: `\0{prefix}\0{attr_1}\0{attr_2}\0...`
//!
//! Every segment is terminated by `U+0000`, so the partial key for
//! `[alice]` (`\0contract\0alice\0`) never matches keys for `alice2`.
//! Segments must not contain `U+0000` (the separator) or `U+10FFFF`
//! (reserved as the upper bound of a scan range).

use claimledger_store::{LedgerRead, PrefixIter};
use snafu::{ResultExt, Snafu};

/// Separator and namespace marker for composite keys.
pub const SEPARATOR: char = '\u{0}';

/// Reserved as the exclusive upper bound of a composite key range.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Errors returned by composite key construction, parsing, and scanning.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum KeyError {
    /// The entity-type prefix was empty.
    #[snafu(display("Composite key prefix must not be empty"))]
    EmptyPrefix,

    /// A prefix or attribute contains a reserved character.
    #[snafu(display("Invalid composite key segment {segment:?}: contains reserved U+{codepoint:04X}"))]
    InvalidSegment {
        /// The offending segment.
        segment: String,
        /// Code point of the reserved character.
        codepoint: u32,
    },

    /// The key was not produced by [`build_key`].
    #[snafu(display("Malformed composite key {key:?}: {reason}"))]
    Malformed {
        /// The key that failed to parse.
        key: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// An entity key was built with the wrong number of attributes.
    #[snafu(display("{kind} key takes {expected} attributes, got {actual}"))]
    Arity {
        /// Entity family.
        kind: EntityKind,
        /// Required attribute count.
        expected: usize,
        /// Supplied attribute count.
        actual: usize,
    },

    /// The ledger failed to open a range scan.
    #[snafu(display("Range scan failed: {source}"))]
    Scan {
        /// The underlying store error.
        source: claimledger_store::Error,
    },
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Decoded composite key components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    /// Entity-type prefix.
    pub prefix: String,
    /// Ordered attribute values.
    pub attributes: Vec<String>,
}

impl CompositeKey {
    /// The per-record identifier: the trailing attribute, or the prefix for
    /// keys without attributes.
    pub fn id(&self) -> &str {
        self.attributes.last().map_or(self.prefix.as_str(), String::as_str)
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    match segment.chars().find(|c| *c == SEPARATOR || *c == MAX_UNICODE_RUNE) {
        Some(reserved) => {
            InvalidSegmentSnafu { segment, codepoint: u32::from(reserved) }.fail()
        },
        None => Ok(()),
    }
}

/// Builds a composite key from a prefix and its attribute values.
///
/// With fewer attributes than an entity's full key this yields a partial key
/// usable as a scan prefix.
///
/// # Errors
///
/// Returns [`KeyError::EmptyPrefix`] for an empty prefix and
/// [`KeyError::InvalidSegment`] if any segment contains a reserved character.
pub fn build_key<S: AsRef<str>>(prefix: &str, attributes: &[S]) -> Result<String> {
    if prefix.is_empty() {
        return EmptyPrefixSnafu.fail();
    }
    validate_segment(prefix)?;

    let capacity = 2
        + prefix.len()
        + attributes.iter().map(|attr| attr.as_ref().len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(SEPARATOR);
    key.push_str(prefix);
    key.push(SEPARATOR);
    for attr in attributes {
        let attr = attr.as_ref();
        validate_segment(attr)?;
        key.push_str(attr);
        key.push(SEPARATOR);
    }
    Ok(key)
}

/// Splits a composite key into its prefix and attribute values.
///
/// # Errors
///
/// Returns [`KeyError::Malformed`] if the key lacks the namespace marker, is
/// not terminated, or has an empty prefix.
pub fn parse_key(key: &str) -> Result<CompositeKey> {
    let Some(body) = key.strip_prefix(SEPARATOR) else {
        return MalformedSnafu { key, reason: "missing namespace marker" }.fail();
    };
    let Some(body) = body.strip_suffix(SEPARATOR) else {
        return MalformedSnafu { key, reason: "missing terminator" }.fail();
    };

    let mut segments = body.split(SEPARATOR);
    let prefix = match segments.next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => return MalformedSnafu { key, reason: "empty prefix" }.fail(),
    };

    Ok(CompositeKey { prefix, attributes: segments.map(str::to_string).collect() })
}

/// Scans all entries whose key starts with `prefix` and the given leading
/// attribute values.
///
/// Results follow the ledger's lexicographic key order; every call starts a
/// fresh iteration.
///
/// # Errors
///
/// Returns a key error if the partial key is invalid, or [`KeyError::Scan`]
/// if the ledger cannot open the range.
pub fn scan<'a, L, S>(ledger: &'a L, prefix: &str, attr_prefix: &[S]) -> Result<PrefixIter<'a>>
where
    L: LedgerRead + ?Sized,
    S: AsRef<str>,
{
    let partial = build_key(prefix, attr_prefix)?;
    ledger.scan_prefix(&partial).context(ScanSnafu)
}

/// Entity families stored on the ledger.
///
/// Prefixes are unique per family, so a prefix scan yields one family only.
/// Theft claims share the [`EntityKind::Claim`] family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Insurer catalog entries, keyed by `[uuid]`.
    ContractType,
    /// Policyholder accounts, keyed by `[username]`.
    User,
    /// Contracts, keyed by `[username, uuid]`.
    Contract,
    /// Claims, keyed by `[contract_uuid, uuid]`.
    Claim,
    /// Repair orders, keyed by `[uuid]`.
    RepairOrder,
}

impl EntityKind {
    /// Every entity family.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::ContractType,
        EntityKind::User,
        EntityKind::Contract,
        EntityKind::Claim,
        EntityKind::RepairOrder,
    ];

    /// Key prefix for this family.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ContractType => "contract_type",
            Self::User => "user",
            Self::Contract => "contract",
            Self::Claim => "claim",
            Self::RepairOrder => "repair_order",
        }
    }

    /// Number of attributes in a full key.
    pub const fn arity(self) -> usize {
        match self {
            Self::Contract | Self::Claim => 2,
            Self::ContractType | Self::User | Self::RepairOrder => 1,
        }
    }

    /// Builds the full key of one record.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Arity`] if `attributes` is not a full key, or the
    /// errors of [`build_key`].
    pub fn key<S: AsRef<str>>(self, attributes: &[S]) -> Result<String> {
        if attributes.len() != self.arity() {
            return AritySnafu { kind: self, expected: self.arity(), actual: attributes.len() }
                .fail();
        }
        build_key(self.prefix(), attributes)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}
