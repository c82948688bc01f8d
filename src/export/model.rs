use crate::core::pay::entry_gross_pay;
use crate::models::entry::{Entry, TIMESTAMP_FORMAT};
use serde::Serialize;

/// Flat row used by every export format.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntryExport {
    pub id: String,
    pub date: String,
    pub start: String,
    pub finish: String,
    pub work_time_in_seconds: i64,
    pub overtime_in_seconds: i64,
    pub standard_worktime_in_seconds: i64,
    pub gross_pay_per_month: i64,
    pub gross_pay: f64,
    pub net_pay: Option<f64>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl From<&Entry> for EntryExport {
    fn from(e: &Entry) -> Self {
        Self {
            id: e.id.to_string(),
            date: e.date().format("%Y-%m-%d").to_string(),
            start: e.start.format(TIMESTAMP_FORMAT).to_string(),
            finish: e.finish.format(TIMESTAMP_FORMAT).to_string(),
            work_time_in_seconds: e.work_time_in_seconds,
            overtime_in_seconds: e.overtime_in_seconds,
            standard_worktime_in_seconds: e.standard_worktime_in_seconds,
            gross_pay_per_month: e.gross_pay_per_month,
            gross_pay: round2(entry_gross_pay(e)),
            net_pay: e.calculated_net_pay.map(round2),
        }
    }
}
