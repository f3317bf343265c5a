//! The claimledger insurance workflow.
//!
//! Four actors share one ledger: the insurer maintains the contract type
//! catalog and decides on claims, shops issue contracts and onboard users,
//! repair shops complete repair orders, and the police investigate thefts.
//! Each operation is a handler that reads and writes entities through the
//! [`claimledger_state::EntityStore`] inside a single write transaction.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use claimledger_chaincode::Chaincode;
//! use claimledger_store::Database;
//! use claimledger_types::config::WorkflowConfig;
//!
//! let db = Arc::new(Database::open_in_memory()?);
//! let chaincode = Chaincode::new(db, WorkflowConfig::default());
//!
//! chaincode.init(&[r#"[{"uuid":"ct1","shop_type":"B","active":true}]"#.to_string()])?;
//! let catalog = chaincode.invoke("contract_type_ls", &[])?;
//! assert!(String::from_utf8_lossy(&catalog).contains(r#""uuid":"ct1""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]

mod args;
mod chaincode;
mod dispatch;
mod error;
mod handlers;

pub use args::INVALID_ARGUMENT_COUNT;
pub use chaincode::Chaincode;
pub use dispatch::{Handler, INIT, Invocation, Router};
pub use error::{ChaincodeError, Result};
