use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    static ref ITEMS_SKIPPED: IntCounterVec = register_int_counter_vec!(
        "scraper_items_skipped_total",
        "Items dropped during extraction, by entity and reason",
        &["entity", "reason"]
    )
    .unwrap();

    static ref FETCH_FAILURES: IntCounterVec = register_int_counter_vec!(
        "scraper_fetch_failures_total",
        "Upstream page fetches that did not yield a document",
        &["kind"]
    )
    .unwrap();
}

pub fn record_skipped(entity: &str, reason: &str, count: u64) {
    ITEMS_SKIPPED.with_label_values(&[entity, reason]).inc_by(count);
}

pub fn record_fetch_failure(kind: &str) {
    FETCH_FAILURES.with_label_values(&[kind]).inc();
}
