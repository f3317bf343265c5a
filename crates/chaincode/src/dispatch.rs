//! Operation dispatch.
//!
//! The [`Router`] maps operation names to handler functions. It is built once
//! when the [`crate::Chaincode`] is constructed and never changes afterwards.

use std::collections::HashMap;

use claimledger_store::Ledger;
use claimledger_types::config::WorkflowConfig;

use crate::{
    error::{ChaincodeError, Result},
    handlers::{claim, contract, contract_type, repair_order, theft, user},
};

/// Name of the catalog bootstrap pseudo-operation.
pub const INIT: &str = "init";

/// What a handler sees of one invocation: the ledger transaction and the
/// workflow configuration.
pub struct Invocation<'a> {
    ledger: &'a mut dyn Ledger,
    config: &'a WorkflowConfig,
}

impl<'a> Invocation<'a> {
    /// Wraps a ledger transaction for one handler call.
    pub fn new(ledger: &'a mut dyn Ledger, config: &'a WorkflowConfig) -> Self {
        Self { ledger, config }
    }

    /// Read access to the ledger.
    pub fn ledger(&self) -> &dyn Ledger {
        &*self.ledger
    }

    /// Write access to the ledger.
    pub fn ledger_mut(&mut self) -> &mut dyn Ledger {
        &mut *self.ledger
    }

    /// Workflow configuration.
    pub fn config(&self) -> &WorkflowConfig {
        self.config
    }
}

/// A workflow operation. Returns the response payload, empty for none.
pub type Handler = fn(&mut Invocation<'_>, &[String]) -> Result<Vec<u8>>;

/// Operation name to handler table.
pub struct Router {
    routes: HashMap<&'static str, Handler>,
}

impl Router {
    /// Builds the table of every workflow operation plus [`INIT`].
    pub fn new() -> Self {
        let mut router = Self { routes: HashMap::new() };
        router.register(INIT, contract_type::bootstrap);
        // Insurer
        router.register("contract_type_ls", contract_type::list);
        router.register("contract_type_create", contract_type::create);
        router.register("contract_type_set_active", contract_type::set_active);
        router.register("claim_ls", claim::list);
        router.register("claim_file", claim::file);
        router.register("claim_process", claim::process);
        router.register("user_authenticate", user::authenticate);
        router.register("user_get_info", user::get_info);
        // Shop
        router.register("contract_create", contract::create);
        router.register("contract_ls", contract::list);
        router.register("user_create", user::create);
        // Repair shop
        router.register("repair_order_ls", repair_order::list);
        router.register("repair_order_complete", repair_order::complete);
        // Police
        router.register("theft_claim_ls", theft::list);
        router.register("theft_claim_process", theft::process);
        router
    }

    /// Registers `handler` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, handler: Handler) {
        self.routes.insert(name, handler);
    }

    /// Looks up the handler for `function`.
    ///
    /// # Errors
    ///
    /// Returns [`ChaincodeError::UnknownFunction`] if no handler is registered.
    pub fn resolve(&self, function: &str) -> Result<Handler> {
        self.routes
            .get(function)
            .copied()
            .ok_or_else(|| ChaincodeError::UnknownFunction { function: function.to_string() })
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.routes.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
