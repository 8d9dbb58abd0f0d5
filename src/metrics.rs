use crate::state::StatRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    pub accuracy: f64,
    pub win_rate: f64,
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Raw field value for arithmetic. Absent, negative (the `-1` sentinel)
/// and non-finite values are unknown and become NaN.
pub fn known(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => f64::NAN,
    }
}

pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    finite_or_zero(known(numerator) / known(denominator) * 100.0)
}

// Tournament scope: accuracy from hits on players, no win rate.
pub fn compute_metrics(record: &StatRecord, tournament_scope: bool) -> DerivedMetrics {
    let hits = if tournament_scope {
        record.hits_to_players
    } else {
        record.hits
    };
    let accuracy = percentage(hits, record.shots);
    let win_rate = if tournament_scope {
        0.0
    } else {
        percentage(record.top1, record.matches_played)
    };
    DerivedMetrics { accuracy, win_rate }
}
