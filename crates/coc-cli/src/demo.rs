//! # Demo Scenario
//!
//! Runs the canonical chain-of-custody walkthrough against a throwaway
//! engine: a collector registers evidence with one file, requests a
//! transfer to an analyst, the analyst accepts and downloads the file,
//! and the original holder's download attempt is denied. Finishes by
//! printing the audit chain and its verification report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use coc_core::time::utc_now_second;
use coc_core::{Actor, CipherKey, EngineConfig, Role, UserId};
use coc_engine::{CustodyEngine, EngineError, FileUpload, NewEvidence};

/// Arguments for `coc demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Blob directory for the demo engine. Defaults to a fresh directory
    /// under the system temp dir.
    #[arg(long)]
    pub blob_dir: Option<PathBuf>,

    /// Print the audit chain as pretty JSON instead of a summary table.
    #[arg(long)]
    pub json: bool,
}

/// Run the demo scenario. Returns the process exit code.
pub fn run_demo(args: &DemoArgs) -> anyhow::Result<u8> {
    let blob_dir = args.blob_dir.clone().unwrap_or_else(|| {
        std::env::temp_dir().join(format!("coc-demo-{}", uuid::Uuid::new_v4()))
    });
    tracing::info!(blob_dir = %blob_dir.display(), "starting demo engine");

    let engine = CustodyEngine::new(EngineConfig::new(CipherKey::random()), &blob_dir);

    let collector = Actor::new(UserId::new(), Role::Collector);
    let analyst = Actor::new(UserId::new(), Role::Analyst);

    let record = engine
        .create_evidence(
            &collector,
            NewEvidence {
                agency: "AGENCY".to_string(),
                case_no: "CASE1".to_string(),
                offense: "theft".to_string(),
                item_no: "001".to_string(),
                badge_no: "B-7".to_string(),
                location: "locker 12".to_string(),
                collected_at_utc: utc_now_second(),
                description: "demo evidence item".to_string(),
            },
            vec![FileUpload {
                filename: "report.pdf".to_string(),
                mime: "application/pdf".to_string(),
                bytes: b"demo report contents".to_vec(),
            }],
        )
        .context("create evidence")?;
    println!("created evidence {} ({})", record.item.tag, record.item.id);

    let transfer = engine
        .request_transfer(&collector, record.item.id, analyst.id, "lab analysis")
        .context("request transfer")?;
    println!("requested transfer {} -> analyst {}", transfer.id, analyst.id);

    let accepted = engine
        .accept_transfer(&analyst, transfer.id)
        .context("accept transfer")?;
    println!("transfer accepted at {:?}", accepted.accepted_at_utc);

    let contents = engine
        .download_evidence_file(&analyst, record.item.id, record.files[0].id)
        .context("download as new custodian")?;
    println!(
        "analyst downloaded {} ({} bytes, digest verified)",
        contents.orig_filename,
        contents.bytes.len()
    );

    // The original holder lost download rights with custody.
    match engine.download_evidence_file(&collector, record.item.id, record.files[0].id) {
        Err(err @ EngineError::Custody(_)) => {
            println!("collector download denied as expected: {err}");
        }
        Err(err) => anyhow::bail!("expected a custody denial, got: {err}"),
        Ok(_) => anyhow::bail!("collector download unexpectedly succeeded"),
    }

    let audit = engine.get_audit_log(record.item.id).context("read audit log")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&audit)?);
    } else {
        println!("\naudit chain ({} entries):", audit.len());
        for entry in &audit {
            println!(
                "  #{} {} by {} prev={} hash={}",
                entry.id,
                entry.action,
                entry.actor_id,
                short_hash(&entry.prev_hash_hex),
                short_hash(&entry.entry_hash_hex),
            );
        }
    }

    let report = engine
        .verify_audit_chain(record.item.id)
        .context("verify audit chain")?;
    println!(
        "\nchain verification: valid={} entries={}",
        report.valid, report.total_entries
    );

    Ok(if report.valid { 0 } else { 1 })
}

fn short_hash(hash: &str) -> &str {
    if hash.is_empty() {
        "(genesis)"
    } else {
        &hash[..12.min(hash.len())]
    }
}
