//! `avatar check <url>` – dry-run classification, no network or disk access.

use anyhow::Result;
use avatar_core::allowlist::HostAllowlist;
use avatar_core::config::AvatarConfig;
use avatar_core::pipeline::{classify_url, UrlReport};
use avatar_core::signal::ProbeDetector;

pub fn report(cfg: &AvatarConfig, url: &str) -> Result<UrlReport> {
    let allowlist = HostAllowlist::new(&cfg.allowed_hosts);
    let probes = ProbeDetector::new(&cfg.probe_pattern)?;
    Ok(classify_url(&allowlist, &probes, url))
}

pub fn run_check(cfg: &AvatarConfig, url: &str, json: bool) -> Result<()> {
    let r = report(cfg, url)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&r)?);
        return Ok(());
    }
    if r.allowed {
        let ext = r.extension.map(|e| e.as_str()).unwrap_or("jpg");
        println!("allowed    yes (stored as .{ext})");
    } else {
        println!("allowed    no ({})", r.denial.as_deref().unwrap_or("denied"));
    }
    println!("fallback   {}", r.fallback.as_deref().unwrap_or("(clears image)"));
    if r.probe {
        println!("probe      matches probe pattern");
    }
    Ok(())
}
