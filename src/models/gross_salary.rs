use super::period::Period;
use serde::Serialize;

/// Salary projection for one display period.
///
/// `pay_predicted` is `None` when the period lies in the future or when
/// every working day of the period already has a real entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrossSalary {
    pub period: Period,
    pub pay_per_hour: f64,
    pub pay_up_to_date: f64,
    pub pay_predicted: Option<f64>,
    pub number_of_working_days: usize,
}
