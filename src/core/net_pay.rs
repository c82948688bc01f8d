//! Net pay for a Polish employment contract (umowa o pracę), monthly figures.

use crate::core::pay::entry_gross_pay;
use crate::models::entry::Entry;

// employee social security contributions
const PENSION_RATE: f64 = 0.0976;
const DISABILITY_RATE: f64 = 0.015;
const SICKNESS_RATE: f64 = 0.0245;

const HEALTH_RATE: f64 = 0.09;

const COST_OF_EARNING: f64 = 250.0;
const TAX_FREE_REDUCTION: f64 = 300.0;

// 120 000 per year
const FIRST_BRACKET_LIMIT: f64 = 10_000.0;
const FIRST_BRACKET_RATE: f64 = 0.12;
const SECOND_BRACKET_RATE: f64 = 0.32;

/// Breakdown of the deductions applied to one monthly gross amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetPay {
    pub gross: f64,
    pub social_security: f64,
    pub health_insurance: f64,
    pub income_tax: f64,
    pub net: f64,
}

pub fn calculate_net_pay(gross: f64) -> NetPay {
    let gross = gross.max(0.0);

    let social_security = gross * (PENSION_RATE + DISABILITY_RATE + SICKNESS_RATE);
    let health_insurance = (gross - social_security) * HEALTH_RATE;

    let tax_base = (gross - social_security - COST_OF_EARNING).max(0.0).round();
    let bracket_tax = if tax_base <= FIRST_BRACKET_LIMIT {
        tax_base * FIRST_BRACKET_RATE
    } else {
        FIRST_BRACKET_LIMIT * FIRST_BRACKET_RATE
            + (tax_base - FIRST_BRACKET_LIMIT) * SECOND_BRACKET_RATE
    };
    let income_tax = (bracket_tax - TAX_FREE_REDUCTION).max(0.0);

    let net = (gross - social_security - health_insurance - income_tax).max(0.0);

    NetPay {
        gross,
        social_security,
        health_insurance,
        income_tax,
        net,
    }
}

/// Net share of what a single entry earned, using the entry's own monthly
/// gross pay to find the net/gross ratio.
pub fn entry_net_pay(entry: &Entry) -> Option<f64> {
    if entry.gross_pay_per_month <= 0 {
        return None;
    }
    let monthly = entry.gross_pay_per_month as f64;
    let ratio = calculate_net_pay(monthly).net / monthly;
    Some(entry_gross_pay(entry) * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Settings;
    use chrono::NaiveDate;

    #[test]
    fn zero_gross_gives_zero_net() {
        let n = calculate_net_pay(0.0);
        assert_eq!(n.net, 0.0);
        assert_eq!(n.income_tax, 0.0);
    }

    #[test]
    fn first_bracket() {
        let n = calculate_net_pay(10_000.0);
        assert!((n.social_security - 1371.0).abs() < 0.01);
        assert!((n.health_insurance - 776.61).abs() < 0.01);
        assert!((n.income_tax - 705.48).abs() < 0.01);
        assert!((n.net - 7146.91).abs() < 0.01);
    }

    #[test]
    fn second_bracket_taxes_more() {
        let n = calculate_net_pay(20_000.0);
        // tax base 17 008 → 1 200 + 7 008 × 0.32 − 300
        assert!((n.income_tax - 3142.56).abs() < 0.01);
        assert!(n.net < 20_000.0 * 0.7);
    }

    #[test]
    fn low_gross_pays_no_tax() {
        let n = calculate_net_pay(2_000.0);
        assert_eq!(n.income_tax, 0.0);
        assert!(n.net > 0.0);
    }

    #[test]
    fn entry_net_pay_scales_earnings() {
        let settings = Settings {
            gross_pay_per_month: 10_000,
            ..Settings::default()
        };
        let day = NaiveDate::from_ymd_opt(2023, 11, 6).unwrap();
        let start = day.and_hms_opt(9, 0, 0).unwrap();
        let finish = day.and_hms_opt(17, 0, 0).unwrap();
        let entry = Entry::from_interval(start, finish, &settings).unwrap();

        let gross = entry_gross_pay(&entry);
        let net = entry_net_pay(&entry).unwrap();
        assert!((gross - 10_000.0 / 22.0).abs() < 1e-6);
        assert!((net - gross * 0.714691).abs() < 0.01);

        let unpaid = Entry {
            gross_pay_per_month: 0,
            ..entry
        };
        assert_eq!(entry_net_pay(&unpaid), None);
    }
}
