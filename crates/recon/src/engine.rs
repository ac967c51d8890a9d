use std::collections::BTreeMap;

use crate::config::{MalformedPolicy, WatchConfig};
use crate::error::WatchError;
use crate::model::{
    ExposureRecord, ExposureTables, MatchedRecord, RecordFailure, RiskTier, WatchMeta,
    WatchResult, WatchSummary,
};
use crate::window::{match_period, MatchPolicy, TargetDateSet, WindowMatch};

/// Run a watch per config over already-loaded tables.
pub fn run(config: &WatchConfig, tables: &ExposureTables) -> Result<WatchResult, WatchError> {
    let targets = config.target_set()?;
    let policy = config.match_policy()?;
    run_with(&config.name, &targets, &policy, config.on_malformed, tables)
}

/// Run with explicit targets and policy. Output keeps tier order
/// (high, medium, low) and in-table row order.
pub fn run_with(
    name: &str,
    targets: &TargetDateSet,
    policy: &MatchPolicy,
    on_malformed: MalformedPolicy,
    tables: &ExposureTables,
) -> Result<WatchResult, WatchError> {
    let records = tag_records(tables);

    let mut summary = WatchSummary {
        total_records: records.len(),
        matched_by_tier: RiskTier::ALL.iter().map(|t| (*t, 0)).collect::<BTreeMap<_, _>>(),
        ..WatchSummary::default()
    };
    let mut matches = Vec::new();
    let mut failures = Vec::new();

    for record in records {
        match match_period(&record.exposure_period, targets, policy) {
            Ok(WindowMatch::Hit(matched_date)) => {
                tracing::debug!(
                    risk = %record.risk,
                    row = record.row,
                    %matched_date,
                    "record in window"
                );
                summary.matched += 1;
                *summary.matched_by_tier.entry(record.risk).or_insert(0) += 1;
                matches.push(MatchedRecord {
                    record,
                    matched_date,
                });
            }
            Ok(WindowMatch::Miss) => summary.missed += 1,
            Ok(WindowMatch::NoDate) => {
                tracing::debug!(
                    risk = %record.risk,
                    row = record.row,
                    period = %record.exposure_period,
                    "no date found"
                );
                summary.no_date += 1;
            }
            Err(err) => {
                if on_malformed == MalformedPolicy::Abort {
                    return Err(err);
                }
                let (token, reason) = match err {
                    WatchError::MalformedToken { token, reason } => (token, reason),
                    other => return Err(other),
                };
                tracing::warn!(
                    risk = %record.risk,
                    row = record.row,
                    %token,
                    "skipping record: {reason}"
                );
                summary.malformed += 1;
                failures.push(RecordFailure {
                    risk: record.risk,
                    row: record.row,
                    exposure_period: record.exposure_period,
                    token,
                    reason,
                });
            }
        }
    }

    let (window_start, window_end) = targets.bounds();
    tracing::info!(
        total = summary.total_records,
        matched = summary.matched,
        malformed = summary.malformed,
        "watch '{name}' complete"
    );

    Ok(WatchResult {
        meta: WatchMeta {
            config_name: name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            window_start,
            window_end,
            target_dates: targets.iter().copied().collect(),
            match_mode: policy.mode,
        },
        summary,
        matches,
        failures,
    })
}

/// Tag each row with its tier and concatenate high, medium, low.
pub fn tag_records(tables: &ExposureTables) -> Vec<ExposureRecord> {
    let mut records = Vec::with_capacity(tables.len());
    for tier in RiskTier::ALL {
        records.extend(
            tables
                .tier(tier)
                .iter()
                .enumerate()
                .map(|(row, source)| ExposureRecord::tagged(tier, row, source)),
        );
    }
    records
}

/// Records in window, in tagged order. Malformed records are dropped.
pub fn records_in_window(
    tables: &ExposureTables,
    targets: &TargetDateSet,
    policy: &MatchPolicy,
) -> Vec<ExposureRecord> {
    tag_records(tables)
        .into_iter()
        .filter(|r| {
            match_period(&r.exposure_period, targets, policy)
                .map(|m| m.is_match())
                .unwrap_or(false)
        })
        .collect()
}
