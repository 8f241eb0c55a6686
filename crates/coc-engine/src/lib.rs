//! # coc-engine — Custody Integrity Engine
//!
//! The facade the (out-of-scope) transport layer calls into. Composes the
//! three integrity components over one shared in-process store:
//!
//! - every binary payload passes through the cipher store
//!   ([`coc_crypto::CipherStore`]) before any metadata row exists;
//! - every successful mutation appends exactly one audit entry
//!   ([`coc_ledger`]) chained to the item's previous entry;
//! - custody and transfer transitions go through the state machine
//!   ([`coc_custody`]) and commit together with their audit entry.
//!
//! ## Atomicity
//!
//! Each evidence item has a dedicated mutex (the `store` module). An
//! operation takes the item's lock, performs every fallible step
//! (validation, authorization, decryption, audit-entry construction), and
//! only then commits its in-memory writes — which cannot fail. Either the
//! mutation and its ledger append both land, or neither does. The
//! per-item lock also totally orders appends, so two concurrent
//! operations can never read the same tail hash and fork the chain.
//!
//! ## Visibility
//!
//! Role checks are centralized in [`policy`]; the engine consumes a
//! pre-authenticated [`coc_core::Actor`] and trusts the caller to have
//! established it.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod policy;
mod store;

pub use catalog::{
    Analysis, AnalysisFile, AnalysisRecord, EvidenceFile, EvidenceItem, EvidenceRecord,
    FileContents, FileUpload, NewAnalysis, NewEvidence,
};
pub use engine::CustodyEngine;
pub use error::{EngineError, ErrorKind};
pub use policy::{can_perform, EvidenceAction, ResourceView};
