use std::fmt::Write as _;

use colored::*;

use crate::repair::dates::format_timestamp;
use crate::resume::bencode::Dictionary;
use crate::resume::record::{dict_bool, dict_int};
use crate::resume::{keys, ResumeRecord};

/// Read-only dump of the interesting fields. Absent fields are skipped.
pub fn render(record: &ResumeRecord) -> String {
    let mut out = String::new();
    let rule = "==============================";
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "{}", "   Resume file information   ".bold());
    let _ = writeln!(out, "{}\n", rule);

    for key in [keys::DESTINATION, keys::INCOMPLETE_DIR] {
        if let Some(value) = record.get_raw(key).filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "{} {}", key, String::from_utf8_lossy(value));
        }
    }
    if let Some(name) = record.get_raw(keys::NAME) {
        let _ = writeln!(out, "{} {}", keys::NAME, String::from_utf8_lossy(name));
    }

    for key in [keys::DOWNLOADED, keys::UPLOADED] {
        if let Some(value) = record.get_int(key) {
            let _ = writeln!(out, "{} {}", key, value);
        }
    }
    if let Some(paused) = record.get_bool(keys::PAUSED) {
        let _ = writeln!(out, "{} {}", keys::PAUSED, paused);
    }
    for key in [keys::SEEDING_TIME, keys::DOWNLOADING_TIME] {
        if let Some(value) = record.get_int(key) {
            let _ = writeln!(out, "{} {}", key, value);
        }
    }

    for key in [keys::ADDED_DATE, keys::DONE_DATE, keys::ACTIVITY_DATE] {
        if let Some(value) = record.get_int(key) {
            let _ = writeln!(out, "{} {}: {}", key, value, format_timestamp(value));
        }
    }

    for key in [keys::BANDWIDTH_PRIORITY, keys::MAX_PEERS] {
        if let Some(value) = record.get_int(key) {
            let _ = writeln!(out, "{} {}", key, value);
        }
    }

    if let Some(limit) = record.get_dict(keys::SPEED_LIMIT_UP) {
        render_speed_limit(&mut out, "Speed limit up", limit);
    }
    if let Some(limit) = record.get_dict(keys::SPEED_LIMIT_DOWN) {
        render_speed_limit(&mut out, "Speed limit down", limit);
    }

    for key in [keys::PEERS_V4, keys::PEERS_V6] {
        if let Some(peers) = record.get_raw(key) {
            let _ = writeln!(out, "{} {} bytes", key, peers.len());
        }
    }

    out
}

/// Older files store `speed` in KiB/s instead of `speed-Bps`.
fn render_speed_limit(out: &mut String, title: &str, limit: &Dictionary) {
    let _ = writeln!(out, "{}:", title);
    if let Some(bps) = dict_int(limit, keys::SPEED_BPS) {
        let _ = writeln!(out, "\t{} {}", keys::SPEED_BPS, bps);
    } else if let Some(kbps) = dict_int(limit, keys::SPEED) {
        let _ = writeln!(out, "\t{} {}", keys::SPEED, kbps.saturating_mul(1024));
    }
    for key in [keys::USE_SPEED_LIMIT, keys::USE_GLOBAL_SPEED_LIMIT] {
        if let Some(flag) = dict_bool(limit, key) {
            let _ = writeln!(out, "\t{} {}", key, flag);
        }
    }
}
