use crate::metrics::DerivedMetrics;
use crate::state::StatRecord;

pub const NO_STATS_TEXT: &str = "No stats available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub lines: Vec<String>,
    pub subtext: Option<String>,
}

impl StatCard {
    fn new(title: &str, lines: Vec<String>, subtext: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            lines,
            subtext,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatsView {
    #[default]
    Cleared,
    /// Player selected, no record resolved.
    NoStats,
    Cards(Box<[StatCard; 4]>),
}

impl StatsView {
    pub fn cards(&self) -> Option<&[StatCard; 4]> {
        match self {
            Self::Cards(cards) => Some(&**cards),
            _ => None,
        }
    }
}

/// Locale-grouped number. Missing values, the `-1` sentinel and any other
/// negative or non-finite input render as `"0"`. Up to three fraction
/// digits are kept.
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite() && *v > 0.0) else {
        return "0".to_string();
    };
    let mut whole = value.trunc();
    let mut millis = ((value - whole) * 1000.0).round();
    if millis >= 1000.0 {
        whole += 1.0;
        millis = 0.0;
    }
    let mut out = group_thousands(&format!("{whole:.0}"));
    if millis > 0.0 {
        // millis is a whole number in 1..=999 here.
        let digits = format!("{:03}", millis as u32);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render(record: &StatRecord, metrics: &DerivedMetrics, tournament_scope: bool) -> [StatCard; 4] {
    let elims = if tournament_scope {
        record.eliminations
    } else {
        record.human_elims
    };

    let performance = if tournament_scope {
        vec!["Tournament Stats".to_string()]
    } else {
        vec![
            "Global Stats".to_string(),
            format!("Win Rate: {}", format_percent(metrics.win_rate)),
            format!("Deaths: {}", format_number(record.deaths)),
        ]
    };

    [
        StatCard::new(
            "Matches & Eliminations",
            vec![format!("Elims: {}", format_number(elims))],
            Some(format!("Matches: {}", format_number(record.matches_played))),
        ),
        StatCard::new(
            "Health & Shield",
            vec![format!("Health taken: {}", format_number(record.health_taken))],
            Some(format!("Shield taken: {}", format_number(record.shield_taken))),
        ),
        StatCard::new(
            "Damage & Accuracy",
            vec![format!("Damage: {}", format_number(record.damage_to_players))],
            Some(format!("Accuracy: {}", format_percent(metrics.accuracy))),
        ),
        StatCard::new("Performance", performance, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn keeps_up_to_three_fraction_digits() {
        assert_eq!(format_number(Some(1234.5)), "1,234.5");
        assert_eq!(format_number(Some(0.12345)), "0.123");
        assert_eq!(format_number(Some(7.0)), "7");
        assert_eq!(format_number(Some(1.9996)), "2");
        assert_eq!(format_number(Some(999.9999)), "1,000");
    }
}
