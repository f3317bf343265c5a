//! Invocation entry point.
//!
//! One invocation is one write transaction: the handler runs against the
//! transaction, and its writes are committed together when it succeeds or
//! dropped together when it fails.

use std::sync::Arc;

use claimledger_store::{Database, StorageBackend};
use claimledger_types::config::WorkflowConfig;
use snafu::ResultExt;

use crate::{
    dispatch::{INIT, Invocation, Router},
    error::{CommitSnafu, Result},
};

/// The insurance workflow over one ledger database.
pub struct Chaincode<B: StorageBackend> {
    db: Arc<Database<B>>,
    config: WorkflowConfig,
    router: Router,
}

impl<B: StorageBackend + 'static> Chaincode<B> {
    /// Creates the workflow over `db`.
    pub fn new(db: Arc<Database<B>>, config: WorkflowConfig) -> Self {
        Self { db, config, router: Router::new() }
    }

    /// Seeds the contract type catalog from an optional JSON array argument.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChaincodeError::Bootstrap`] if the seed is not a JSON
    /// array of contract types, or a write error.
    pub fn init(&self, args: &[String]) -> Result<Vec<u8>> {
        self.invoke(INIT, args)
    }

    /// Runs one operation atomically and returns its payload.
    ///
    /// The payload is empty for operations without a response.
    ///
    /// # Errors
    ///
    /// Returns the handler's error, in which case none of its writes are
    /// visible, or a commit error.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let span = tracing::info_span!("invoke", function);
        let _guard = span.enter();

        let result = self.execute(function, args);
        match &result {
            Ok(payload) => tracing::debug!(payload_bytes = payload.len(), "Invocation committed"),
            Err(e) => tracing::warn!(code = e.code().as_u16(), error = %e, "Invocation failed"),
        }
        result
    }

    fn execute(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let handler = self.router.resolve(function)?;

        let mut txn = self.db.write();
        let payload = {
            let mut invocation = Invocation::new(&mut txn, &self.config);
            handler(&mut invocation, args)?
        };
        txn.commit().context(CommitSnafu)?;
        Ok(payload)
    }

    /// The underlying database.
    pub fn database(&self) -> &Arc<Database<B>> {
        &self.db
    }

    /// The workflow configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Names of every operation [`Chaincode::invoke`] accepts.
    pub fn operations(&self) -> Vec<&'static str> {
        self.router.operations()
    }
}
