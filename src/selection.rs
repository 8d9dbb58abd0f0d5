use std::collections::HashSet;

use crate::state::StatRecord;

pub const PLAYER_PLACEHOLDER: &str = "Select a player";
pub const TOURNAMENT_PLACEHOLDER: &str = "Select a tournament";
pub const WINDOW_PLACEHOLDER: &str = "Select a window";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub options: Vec<String>,
    pub enabled: bool,
}

impl SelectOptions {
    pub fn disabled() -> Self {
        Self {
            options: Vec::new(),
            enabled: false,
        }
    }

    pub fn enabled(options: Vec<String>) -> Self {
        Self {
            options,
            enabled: true,
        }
    }
}

/// Distinct non-empty tournaments of `player`, in first-seen store order.
/// Enabled whenever a player is set, even with no tournaments.
pub fn rebuild_tournament_options(store: &[StatRecord], player: Option<&str>) -> SelectOptions {
    let Some(player) = player else {
        return SelectOptions::disabled();
    };
    let mut seen: HashSet<&str> = HashSet::new();
    let options = store
        .iter()
        .filter(|record| record.player_id == player && !record.tournament_id.is_empty())
        .filter(|record| seen.insert(record.tournament_id.as_str()))
        .map(|record| record.tournament_id.clone())
        .collect();
    SelectOptions::enabled(options)
}

// No dedup; the tournament aggregate (empty window id) is skipped.
pub fn rebuild_window_options(
    store: &[StatRecord],
    player: Option<&str>,
    tournament: Option<&str>,
) -> SelectOptions {
    let (Some(player), Some(tournament)) = (player, tournament) else {
        return SelectOptions::disabled();
    };
    let options = store
        .iter()
        .filter(|record| record.player_id == player && record.tournament_id == tournament)
        .filter(|record| !record.window_id.is_empty())
        .map(|record| record.window_id.clone())
        .collect();
    SelectOptions::enabled(options)
}

pub fn player_roster(store: &[StatRecord], configured: &[String]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    let mut seen: HashSet<&str> = HashSet::new();
    store
        .iter()
        .filter(|record| !record.player_id.is_empty())
        .filter(|record| seen.insert(record.player_id.as_str()))
        .map(|record| record.player_id.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorLevel {
    Player,
    Tournament,
    Window,
}

impl SelectorLevel {
    pub fn next(self) -> Self {
        match self {
            Self::Player => Self::Tournament,
            Self::Tournament => Self::Window,
            Self::Window => Self::Player,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Player => Self::Window,
            Self::Tournament => Self::Player,
            Self::Window => Self::Tournament,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Tournament => "Tournament",
            Self::Window => "Window",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Player => PLAYER_PLACEHOLDER,
            Self::Tournament => TOURNAMENT_PLACEHOLDER,
            Self::Window => WINDOW_PLACEHOLDER,
        }
    }
}

/// Cursor 0 is the placeholder; cursor `i + 1` is `options[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub options: SelectOptions,
    pub cursor: usize,
}

impl Selector {
    pub fn with_options(options: SelectOptions) -> Self {
        Self { options, cursor: 0 }
    }

    pub fn value(&self) -> Option<&str> {
        let idx = self.cursor.checked_sub(1)?;
        self.options
            .options
            .get(idx)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn reset(&mut self, options: SelectOptions) {
        self.options = options;
        self.cursor = 0;
    }

    /// Wraps through the placeholder. Returns whether the cursor moved.
    pub fn step(&mut self, delta: isize) -> bool {
        if !self.options.enabled {
            return false;
        }
        let total = self.options.options.len() + 1;
        if total == 1 {
            return false;
        }
        let next = (self.cursor as isize + delta).rem_euclid(total as isize) as usize;
        let moved = next != self.cursor;
        self.cursor = next;
        moved
    }

    pub fn select(&mut self, value: Option<&str>) -> bool {
        if !self.options.enabled {
            return false;
        }
        match value {
            None => {
                self.cursor = 0;
                true
            }
            Some(value) => match self.options.options.iter().position(|opt| opt == value) {
                Some(pos) => {
                    self.cursor = pos + 1;
                    true
                }
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub player: Selector,
    pub tournament: Selector,
    pub window: Selector,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            player: Selector::with_options(SelectOptions::enabled(Vec::new())),
            tournament: Selector::with_options(SelectOptions::disabled()),
            window: Selector::with_options(SelectOptions::disabled()),
        }
    }

    pub fn selected_player(&self) -> Option<&str> {
        self.player.value()
    }

    pub fn selected_tournament(&self) -> Option<&str> {
        self.tournament.value()
    }

    pub fn selected_window(&self) -> Option<&str> {
        self.window.value()
    }

    pub fn selector(&self, level: SelectorLevel) -> &Selector {
        match level {
            SelectorLevel::Player => &self.player,
            SelectorLevel::Tournament => &self.tournament,
            SelectorLevel::Window => &self.window,
        }
    }

    pub fn selector_mut(&mut self, level: SelectorLevel) -> &mut Selector {
        match level {
            SelectorLevel::Player => &mut self.player,
            SelectorLevel::Tournament => &mut self.tournament,
            SelectorLevel::Window => &mut self.window,
        }
    }

    // A selected player missing from `roster` stays, as the last option.
    pub fn set_roster(&mut self, mut roster: Vec<String>) {
        let current = self.player.value().map(str::to_string);
        if let Some(current) = &current
            && !roster.contains(current)
        {
            roster.push(current.clone());
        }
        self.player.reset(SelectOptions::enabled(roster));
        self.player.select(current.as_deref());
    }

    pub fn cascade_from_player(&mut self, store: &[StatRecord]) {
        let player = self.player.value();
        let tournaments = rebuild_tournament_options(store, player);
        self.tournament.reset(tournaments);
        self.cascade_from_tournament(store);
    }

    pub fn cascade_from_tournament(&mut self, store: &[StatRecord]) {
        let windows = rebuild_window_options(
            store,
            self.player.value(),
            self.tournament.value(),
        );
        self.window.reset(windows);
    }
}
