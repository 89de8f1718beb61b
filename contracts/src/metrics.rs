//! # Ledger Metrics
//!
//! Prometheus counters for committed and rejected actions. Everything is
//! registered in a dedicated [`prometheus::Registry`] with the `lot` prefix
//! so an embedding process can serve it next to its own metrics.
//!
//! Counters are bumped only after an action commits (or is rejected), never
//! from inside a rolled-back execution.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::quota::QuotaPartition;

/// Metric handles for one contract instance.
#[derive(Clone)]
pub struct LedgerMetrics {
    registry: Registry,
    /// Committed actions, labelled by action name.
    pub actions_total: IntCounterVec,
    /// Rejected actions, labelled by error code.
    pub rejections_total: IntCounterVec,
    /// Accepted wagers, labelled by record table.
    pub wagers_accepted_total: IntCounterVec,
    /// Executed refunds.
    pub refunds_total: IntCounter,
    /// Secondary units issued through the exchange.
    pub exchange_issued_units_total: IntCounter,
}

impl LedgerMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("lot".into()), None)?;

        let actions_total = IntCounterVec::new(
            Opts::new("actions_total", "Committed contract actions"),
            &["action"],
        )?;
        registry.register(Box::new(actions_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new("rejections_total", "Rejected contract actions"),
            &["code"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let wagers_accepted_total = IntCounterVec::new(
            Opts::new("wagers_accepted_total", "Accepted wager deposits"),
            &["table"],
        )?;
        registry.register(Box::new(wagers_accepted_total.clone()))?;

        let refunds_total = IntCounter::new("refunds_total", "Executed refunds")?;
        registry.register(Box::new(refunds_total.clone()))?;

        let exchange_issued_units_total = IntCounter::new(
            "exchange_issued_units_total",
            "Secondary smallest units issued for primary-currency deposits",
        )?;
        registry.register(Box::new(exchange_issued_units_total.clone()))?;

        Ok(Self {
            registry,
            actions_total,
            rejections_total,
            wagers_accepted_total,
            refunds_total,
            exchange_issued_units_total,
        })
    }

    pub(crate) fn record_committed(&self, action: &str) {
        self.actions_total.with_label_values(&[action]).inc();
    }

    pub(crate) fn record_rejected(&self, code: &str) {
        self.rejections_total.with_label_values(&[code]).inc();
    }

    pub(crate) fn record_wager(&self, partition: QuotaPartition) {
        self.wagers_accepted_total
            .with_label_values(&[partition.as_str()])
            .inc();
    }

    pub(crate) fn record_refund(&self) {
        self.refunds_total.inc();
    }

    pub(crate) fn record_exchange(&self, issued: i64) {
        self.exchange_issued_units_total
            .inc_by(u64::try_from(issued).unwrap_or(0));
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl std::fmt::Debug for LedgerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = LedgerMetrics::new().unwrap();
        metrics.record_committed("transfer");
        metrics.record_rejected("quota_exceeded");
        metrics.record_wager(QuotaPartition::ThreeD);
        metrics.record_refund();
        metrics.record_exchange(100_000);

        let text = metrics.encode().unwrap();
        assert!(text.contains("lot_actions_total{action=\"transfer\"} 1"));
        assert!(text.contains("lot_rejections_total{code=\"quota_exceeded\"} 1"));
        assert!(text.contains("lot_wagers_accepted_total{table=\"hit3d\"} 1"));
        assert!(text.contains("lot_refunds_total 1"));
        assert!(text.contains("lot_exchange_issued_units_total 100000"));
    }

    #[test]
    fn instances_do_not_share_counters() {
        let a = LedgerMetrics::new().unwrap();
        let b = LedgerMetrics::new().unwrap();
        a.record_refund();
        assert_eq!(a.refunds_total.get(), 1);
        assert_eq!(b.refunds_total.get(), 0);
    }
}
