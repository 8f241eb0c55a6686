//! # coc-custody — Custody State Machine
//!
//! Runtime-checked state machines for evidence possession:
//!
//! - **Custody** ([`custody`]): exactly one record per evidence item,
//!   created with the item and never deleted. The holder changes only
//!   through an accepted transfer.
//!
//! - **Transfer** ([`transfer`]): `PENDING → {ACCEPTED, CANCELLED}`, both
//!   terminal. Only the recipient may accept or reject; only the
//!   initiator may cancel. [`transfer::TransferLog`] owns an item's
//!   transfer history and enforces at most one PENDING transfer at a
//!   time.
//!
//! Invalid transitions return structured [`CustodyError`]s with full
//! context — who attempted what against which state. This crate holds no
//! locks and performs no I/O; the engine serializes access per evidence
//! item and commits transitions together with their audit entries.

pub mod custody;
pub mod error;
pub mod transfer;

pub use custody::Custody;
pub use error::CustodyError;
pub use transfer::{Transfer, TransferLog, TransferStatus};
