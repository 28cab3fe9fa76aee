//! Debtbook - A chat message debt ledger
//! ---
//!
//! People in a group chat write things like `@alice должен @bob 100` or
//! `@alice owes @bob 100`. debtbook picks those out of free text, books them,
//! and on request reduces the whole pile to who still owes whom, with
//! reciprocal debts between the same two people cancelled against each other.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

mod amount;

/// Debt events and the net obligations derived from them.
pub mod debt;

/// Ledger and netting engine.
///
/// The main structure is [`Ledger`][ledger::Ledger], which books
/// [`DebtEvent`][debt::DebtEvent]s into a [`DebtStore`][store::DebtStore] and nets
/// them into a [`Summary`][ledger::Summary] on demand.
pub mod ledger;

/// Our main parser entrypoints.
pub mod parser;

/// Where debt events are kept between summaries.
pub mod store;

/// Reply wording, per language.
pub mod vocab;

pub use debt::{DebtEvent, NetObligation};
pub use ledger::{Ledger, Summary};
pub use parser::{mentions_debt, parse};
pub use vocab::{Language, Vocabulary};

/// Errors surfaced by the ledger and its stores.
///
/// An unrecognised message is not an error, [`parse`] just returns `None` for it.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store could not be reached, or refused the statement.
    #[error("storage unavailable during {operation}: {reason}")]
    StorageUnavailable {
        operation: &'static str,
        reason: String,
    },

    /// No store backend handles this URL scheme.
    #[error("unsupported store `{0}'")]
    UnsupportedStore(String),

    #[error("unknown language `{0}'")]
    UnknownLanguage(String),
}

impl LedgerError {
    pub fn unavailable<E: std::fmt::Display>(operation: &'static str, err: E) -> LedgerError {
        LedgerError::StorageUnavailable {
            operation,
            reason: err.to_string(),
        }
    }
}
