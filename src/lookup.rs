use std::collections::HashMap;

use crate::state::StatRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Global { player: &'a str },
    Window {
        player: &'a str,
        tournament: &'a str,
        window: &'a str,
    },
}

impl<'a> LookupKey<'a> {
    /// Tournament and window are used together or not at all.
    pub fn from_selection(
        player: Option<&'a str>,
        tournament: Option<&'a str>,
        window: Option<&'a str>,
    ) -> Option<Self> {
        let player = player?;
        match (tournament, window) {
            (None, None) => Some(Self::Global { player }),
            (Some(tournament), Some(window)) => Some(Self::Window {
                player,
                tournament,
                window,
            }),
            _ => None,
        }
    }

    pub fn is_tournament_scope(&self) -> bool {
        matches!(self, Self::Window { .. })
    }

    fn matches(&self, record: &StatRecord) -> bool {
        match *self {
            Self::Global { player } => record.player_id == player && record.tournament_id.is_empty(),
            Self::Window {
                player,
                tournament,
                window,
            } => {
                record.player_id == player
                    && record.tournament_id == tournament
                    && record.window_id == window
            }
        }
    }
}

/// First match in store order. No fallback between scopes.
pub fn resolve<'s>(store: &'s [StatRecord], key: LookupKey<'_>) -> Option<&'s StatRecord> {
    store.iter().find(|record| key.matches(record))
}

pub fn duplicate_keys(store: &[StatRecord]) -> Vec<((String, String, String), usize)> {
    let mut counts: HashMap<(&str, &str, &str), usize> = HashMap::with_capacity(store.len());
    let mut order: Vec<(&str, &str, &str)> = Vec::new();
    for record in store {
        let key = (
            record.player_id.as_str(),
            record.tournament_id.as_str(),
            record.window_id.as_str(),
        );
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(key);
        }
    }
    order
        .into_iter()
        .map(|(p, t, w)| {
            let count = counts.get(&(p, t, w)).copied().unwrap_or_default();
            ((p.to_string(), t.to_string(), w.to_string()), count)
        })
        .collect()
}
