//! Typed entity storage on top of composite keys.
//!
//! Handlers never touch raw keys or bytes: they name a record type and its key
//! attributes, and [`EntityStore`] builds the key, performs the ledger call,
//! and runs the JSON codec.

use std::marker::PhantomData;

use claimledger_store::{Ledger, LedgerRead, PrefixIter};
use claimledger_types::{
    Claim, CodecError, Contract, ContractType, RepairOrder, User, decode, encode,
};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};

use crate::keys::{self, EntityKind, KeyError};

/// A record type stored under one entity family.
pub trait Record: Serialize + DeserializeOwned {
    /// The family whose prefix this record is stored under.
    const KIND: EntityKind;
}

impl Record for ContractType {
    const KIND: EntityKind = EntityKind::ContractType;
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;
}

impl Record for Contract {
    const KIND: EntityKind = EntityKind::Contract;
}

impl Record for Claim {
    const KIND: EntityKind = EntityKind::Claim;
}

impl Record for RepairOrder {
    const KIND: EntityKind = EntityKind::RepairOrder;
}

/// Errors returned by [`EntityStore`] operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EntityError {
    /// The key could not be built or parsed.
    #[snafu(display("Key error: {source}"))]
    Key {
        source: KeyError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// The ledger failed to read a key or range.
    #[snafu(display("Failed to read {key:?}: {source}"))]
    Read {
        key: String,
        source: claimledger_store::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// The ledger failed to write a key.
    #[snafu(display("Failed to write {key:?}: {source}"))]
    Write {
        key: String,
        source: claimledger_store::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// A stored value did not decode, or a record did not encode.
    #[snafu(display("Codec error at {key:?}: {source}"))]
    Codec {
        key: String,
        source: CodecError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// A required record is absent.
    #[snafu(display("{message}"))]
    NotFound { message: String },
}

/// Result type for entity operations.
pub type Result<T> = std::result::Result<T, EntityError>;

/// A record yielded by a scan, with the key attributes it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Listed<T> {
    /// Trailing key attribute, or the family prefix when the key has none.
    pub id: String,
    /// All key attributes in order.
    pub attributes: Vec<String>,
    /// The decoded record.
    pub record: T,
}

/// Lazy iterator over the records of one family.
pub struct EntityIter<'a, T> {
    inner: PrefixIter<'a>,
    scan_key: String,
    _record: PhantomData<T>,
}

impl<T: Record> Iterator for EntityIter<'_, T> {
    type Item = Result<Listed<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        Some(self.decode_entry(next))
    }
}

impl<T: Record> EntityIter<'_, T> {
    fn decode_entry(
        &self,
        entry: claimledger_store::Result<claimledger_store::KvPair>,
    ) -> Result<Listed<T>> {
        let (key, value) = entry.context(ReadSnafu { key: self.scan_key.as_str() })?;
        let parsed = keys::parse_key(&key).context(KeySnafu)?;
        let record = decode(&value).context(CodecSnafu { key: key.as_str() })?;
        Ok(Listed { id: parsed.id().to_string(), attributes: parsed.attributes, record })
    }
}

/// Typed CRUD over composite-keyed records.
pub struct EntityStore;

impl EntityStore {
    /// Loads the record stored under `attrs`.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Key` for an invalid key, `EntityError::Read` if the
    /// ledger read fails, and `EntityError::Codec` if the stored value is not a
    /// valid record.
    pub fn get<T, L>(ledger: &L, attrs: &[&str]) -> Result<Option<T>>
    where
        T: Record,
        L: LedgerRead + ?Sized,
    {
        let key = T::KIND.key(attrs).context(KeySnafu)?;
        match ledger.get_state(&key).context(ReadSnafu { key: key.as_str() })? {
            Some(data) => {
                let record = decode(&data).context(CodecSnafu { key: key.as_str() })?;
                Ok(Some(record))
            },
            None => Ok(None),
        }
    }

    /// Loads the record stored under `attrs`, failing with `message` if absent.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` carrying `message` when no record
    /// exists, plus the errors of [`EntityStore::get`].
    pub fn require<T, L>(ledger: &L, attrs: &[&str], message: &str) -> Result<T>
    where
        T: Record,
        L: LedgerRead + ?Sized,
    {
        Self::get(ledger, attrs)?.ok_or_else(|| EntityError::NotFound { message: message.into() })
    }

    /// Checks whether a record exists under `attrs` without decoding it.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Key` or `EntityError::Read`.
    pub fn exists<T, L>(ledger: &L, attrs: &[&str]) -> Result<bool>
    where
        T: Record,
        L: LedgerRead + ?Sized,
    {
        let key = T::KIND.key(attrs).context(KeySnafu)?;
        Ok(ledger.get_state(&key).context(ReadSnafu { key: key.as_str() })?.is_some())
    }

    /// Encodes `record` and stores it under `attrs`, overwriting.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Key`, `EntityError::Codec` if encoding fails, or
    /// `EntityError::Write` if the ledger rejects the write.
    pub fn put<T, L>(ledger: &mut L, attrs: &[&str], record: &T) -> Result<()>
    where
        T: Record,
        L: Ledger + ?Sized,
    {
        let key = T::KIND.key(attrs).context(KeySnafu)?;
        let encoded = encode(record).context(CodecSnafu { key: key.as_str() })?;
        ledger.put_state(&key, encoded).context(WriteSnafu { key: key.as_str() })?;
        let kind = T::KIND;
        tracing::trace!(%kind, ?key, "Stored record");
        Ok(())
    }

    /// Lists the records of `T`'s family whose key begins with `attr_prefix`.
    ///
    /// An empty `attr_prefix` lists the whole family. Iteration is lazy and
    /// follows key order; decode failures surface per item.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Key` for an invalid partial key, or
    /// `EntityError::Read` if the range cannot be opened.
    pub fn list<'a, T, L>(ledger: &'a L, attr_prefix: &[&str]) -> Result<EntityIter<'a, T>>
    where
        T: Record,
        L: LedgerRead + ?Sized,
    {
        let scan_key = keys::build_key(T::KIND.prefix(), attr_prefix).context(KeySnafu)?;
        let inner = match keys::scan(ledger, T::KIND.prefix(), attr_prefix) {
            Ok(inner) => inner,
            Err(KeyError::Scan { source }) => {
                return Err(source).context(ReadSnafu { key: scan_key });
            },
            Err(other) => return Err(other).context(KeySnafu),
        };
        Ok(EntityIter { inner, scan_key, _record: PhantomData })
    }

    /// Finds the first record of `T`'s family whose trailing key attribute is
    /// `id`, scanning the whole family.
    ///
    /// Used when only the last key attribute is known (a contract uuid without
    /// its owner's username).
    ///
    /// # Errors
    ///
    /// Returns the errors of [`EntityStore::list`], including decode failures
    /// of records scanned before the match.
    pub fn find_by_id<T, L>(ledger: &L, id: &str) -> Result<Option<Listed<T>>>
    where
        T: Record,
        L: LedgerRead + ?Sized,
    {
        for entry in Self::list::<T, L>(ledger, &[])? {
            let entry = entry?;
            if entry.id == id {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}
