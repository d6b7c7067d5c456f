use std::sync::Arc;

use aerovia_store::{BusinessRules, MemoryStore};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::reservations::ReservationLedger;

/// How a sweep should run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Report what would be expired without mutating anything
    pub dry_run: bool,
    /// Ignore the grace window and sweep everything past its deadline
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub code: String,
    pub error: String,
}

/// Per-run summary. `expired` counts reservations flipped to EXPIRED,
/// `released` the seats returned to AVAILABLE (equal unless a seat was
/// found in an unexpected state).
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub dry_run: bool,
    pub scanned: usize,
    pub expired: usize,
    pub released: usize,
    pub would_expire: Vec<String>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The periodic batch job that turns stale holds back into available
/// seats. Runs independently of live request traffic; every per-item
/// update goes through the same reservation lock the confirm path uses,
/// so whichever side wins the race, the loser fails cleanly.
#[derive(Clone)]
pub struct ExpirySweeper {
    store: Arc<MemoryStore>,
    ledger: ReservationLedger,
    rules: BusinessRules,
}

impl ExpirySweeper {
    pub fn new(store: Arc<MemoryStore>, ledger: ReservationLedger, rules: BusinessRules) -> Self {
        Self {
            store,
            ledger,
            rules,
        }
    }

    /// Run one sweep. By default only holds expired for longer than the
    /// grace window are touched, so a user mid-confirmation is not raced
    /// the second their deadline passes; `force` drops the grace window.
    pub async fn run(&self, options: SweepOptions) -> SweepReport {
        let grace = if options.force {
            Duration::zero()
        } else {
            Duration::hours(self.rules.sweep_grace_hours)
        };
        let cutoff = Utc::now() - grace;

        let mut report = SweepReport {
            dry_run: options.dry_run,
            scanned: 0,
            expired: 0,
            released: 0,
            would_expire: Vec::new(),
            failures: Vec::new(),
        };

        if options.dry_run {
            let candidates = self
                .store
                .read(|state| state.pending_expired_before(cutoff))
                .await;
            report.scanned = candidates.len();
            for reservation in &candidates {
                info!(
                    code = %reservation.code,
                    expired_at = %reservation.expires_at,
                    "sweep dry-run: would expire"
                );
                report.would_expire.push(reservation.code.clone());
            }
            if candidates.is_empty() {
                info!("sweep: nothing to do");
            }
            return report;
        }

        let results = self.ledger.expire_reservations(cutoff).await;
        report.scanned = results.len();
        if results.is_empty() {
            info!("sweep: nothing to do");
            return report;
        }

        for (candidate, outcome) in results {
            match outcome {
                Ok(_) => {
                    report.expired += 1;
                    report.released += 1;
                }
                Err(e) => {
                    // A reservation confirmed or cancelled between the scan
                    // and its own lock lands here; report it and keep going.
                    error!(code = %candidate.code, error = %e, "sweep: failed to expire");
                    report.failures.push(SweepFailure {
                        code: candidate.code,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            scanned = report.scanned,
            expired = report.expired,
            released = report.released,
            failures = report.failures.len(),
            "sweep finished"
        );
        report
    }
}
