//! # Offline Chain Verification
//!
//! Verifies an exported audit log (a JSON array of entries, as produced
//! by the engine's audit-log read or `coc demo --json`) without any
//! engine or store: the chain walk is pure.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use coc_ledger::{verify_chain, AuditEntry};

/// Arguments for `coc verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the exported audit log (JSON array of entries).
    pub path: PathBuf,

    /// Print the full per-entry report as pretty JSON.
    #[arg(long)]
    pub json: bool,
}

/// Verify an exported chain. Exit code 0 when valid, 1 when broken.
pub fn run_verify(args: &VerifyArgs) -> anyhow::Result<u8> {
    let raw = fs::read_to_string(&args.path)
        .with_context(|| format!("read {}", args.path.display()))?;
    let entries: Vec<AuditEntry> =
        serde_json::from_str(&raw).context("parse audit log JSON")?;

    let report = verify_chain(&entries);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.entries {
            let marker = if check.valid { "ok " } else { "BAD" };
            println!(
                "{marker} #{} {} prev_hash_valid={} entry_hash_valid={}",
                check.entry_id, check.action, check.prev_hash_valid, check.entry_hash_valid
            );
        }
        println!(
            "chain valid={} entries={}",
            report.valid, report.total_entries
        );
    }

    if !report.valid {
        tracing::error!(path = %args.path.display(), "audit chain verification failed");
    }
    Ok(if report.valid { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coc_core::time::utc_now_second;
    use coc_core::{EvidenceId, UserId};
    use coc_ledger::{build_entry, AuditAction, GENESIS_PREV_HASH};
    use serde_json::json;

    fn sample_chain() -> Vec<AuditEntry> {
        let evidence_id = EvidenceId::new();
        let actor_id = UserId::new();
        let genesis = build_entry(
            1,
            evidence_id,
            actor_id,
            AuditAction::EvidenceCreated,
            json!({"files": []}),
            utc_now_second(),
            GENESIS_PREV_HASH,
        )
        .unwrap();
        let second = build_entry(
            2,
            evidence_id,
            actor_id,
            AuditAction::FileDownloaded,
            json!({"file_id": "demo"}),
            utc_now_second(),
            &genesis.entry_hash_hex,
        )
        .unwrap();
        vec![genesis, second]
    }

    fn write_chain(entries: &[AuditEntry]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");
        fs::write(&path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
        (dir, path)
    }

    #[test]
    fn valid_export_returns_zero() {
        let (_dir, path) = write_chain(&sample_chain());
        let code = run_verify(&VerifyArgs { path, json: false }).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn tampered_export_returns_one() {
        let mut entries = sample_chain();
        entries[1].details = json!({"file_id": "swapped"});
        let (_dir, path) = write_chain(&entries);
        let code = run_verify(&VerifyArgs { path, json: true }).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn empty_export_is_vacuously_valid() {
        let (_dir, path) = write_chain(&[]);
        assert_eq!(run_verify(&VerifyArgs { path, json: false }).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = run_verify(&VerifyArgs {
            path: PathBuf::from("/nonexistent/audit.json"),
            json: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert!(run_verify(&VerifyArgs { path, json: false }).is_err());
    }
}
