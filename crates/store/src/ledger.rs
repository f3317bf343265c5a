//! The ledger access seam consumed by the workflow layer.
//!
//! Handlers only ever need point reads, point writes, and prefix-bounded
//! iteration. Composite key construction lives one layer up, in
//! `claimledger-state`.

use crate::error::Result;

/// A key and its raw stored value.
pub type KvPair = (String, Vec<u8>);

/// Lazy iterator over the entries under a key prefix, in lexicographic key order.
pub type PrefixIter<'a> = Box<dyn Iterator<Item = Result<KvPair>> + 'a>;

/// Read access to ledger state.
pub trait LedgerRead {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns the substrate's read error verbatim.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Returns every entry whose key starts with `prefix`.
    ///
    /// Each call starts a fresh iteration from the beginning of the range.
    ///
    /// # Errors
    ///
    /// Returns the substrate's read error verbatim.
    fn scan_prefix(&self, prefix: &str) -> Result<PrefixIter<'_>>;
}

/// Read-write access to ledger state within one invocation.
pub trait Ledger: LedgerRead {
    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns the substrate's write error verbatim.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;
}
