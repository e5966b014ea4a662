use chrono::{DateTime, Local, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use supplier_scoring::scoring::{
    FixedClock, InMemoryScoringService, InMemorySnapshotStore, InMemorySupplierData,
    ScoringConfig, SortKey, SupplierScoringService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the in-memory fact set to a fresh snapshot store.
pub(crate) fn in_memory_service(
    data: InMemorySupplierData,
    config: ScoringConfig,
) -> InMemoryScoringService {
    let data = Arc::new(data);
    SupplierScoringService::new(
        data.clone(),
        data,
        Arc::new(InMemorySnapshotStore::default()),
        config,
    )
}

/// Same as [`in_memory_service`] but evaluated at the start of `as_of`.
pub(crate) fn service_as_of(
    data: InMemorySupplierData,
    config: ScoringConfig,
    as_of: Option<NaiveDate>,
) -> InMemoryScoringService {
    let service = in_memory_service(data, config);
    match as_of {
        Some(date) => service.with_clock(Arc::new(FixedClock(start_of_day(date)))),
        None => service,
    }
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    raw.parse::<SortKey>().map_err(|err| err.to_string())
}

pub(crate) fn score_cell(value: Option<f64>) -> String {
    value
        .map(|score| format!("{score:.1}"))
        .unwrap_or_else(|| "n/a".to_string())
}
