use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cards::{self, StatsView};
use crate::error::DashboardError;
use crate::lookup::{self, LookupKey};
use crate::metrics;
use crate::refresh::{self, Notification, RefreshOutcome, RefreshState};
use crate::selection::{self, SelectionState, SelectorLevel};

/// One flat stats row: a player's global summary (empty tournament id), a
/// tournament aggregate (empty window id) or a single tournament window.
///
/// Numeric fields are `None` when absent; `-1` is kept as received and
/// treated as unknown downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawStatRecord")]
pub struct StatRecord {
    #[serde(rename = "epic_username")]
    pub player_id: String,
    #[serde(rename = "epic_id", skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<String>,
    #[serde(rename = "event_id")]
    pub tournament_id: String,
    #[serde(rename = "window_id")]
    pub window_id: String,
    pub shots: Option<f64>,
    pub hits: Option<f64>,
    pub hits_to_players: Option<f64>,
    pub matches_played: Option<f64>,
    pub top1: Option<f64>,
    pub eliminations: Option<f64>,
    pub human_elims: Option<f64>,
    pub health_taken: Option<f64>,
    pub shield_taken: Option<f64>,
    pub damage_to_players: Option<f64>,
    pub deaths: Option<f64>,
}

// Ids arrive under the server's snake_case keys, the camelCase keys, or both.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawStatRecord {
    #[serde(rename = "epic_username")]
    epic_username: Option<String>,
    player_id: Option<String>,
    #[serde(rename = "epic_id")]
    epic_id: Option<String>,
    #[serde(rename = "event_id")]
    event_id: Option<String>,
    tournament_id: Option<String>,
    #[serde(rename = "window_id")]
    window_key: Option<String>,
    #[serde(rename = "windowId")]
    window_alias: Option<String>,
    shots: Option<f64>,
    hits: Option<f64>,
    hits_to_players: Option<f64>,
    matches_played: Option<f64>,
    top1: Option<f64>,
    eliminations: Option<f64>,
    human_elims: Option<f64>,
    health_taken: Option<f64>,
    shield_taken: Option<f64>,
    damage_to_players: Option<f64>,
    deaths: Option<f64>,
}

fn first_non_empty(primary: Option<String>, alias: Option<String>) -> String {
    primary
        .filter(|val| !val.is_empty())
        .or(alias)
        .unwrap_or_default()
}

impl From<RawStatRecord> for StatRecord {
    fn from(raw: RawStatRecord) -> Self {
        Self {
            player_id: first_non_empty(raw.epic_username, raw.player_id),
            epic_id: raw.epic_id,
            tournament_id: first_non_empty(raw.event_id, raw.tournament_id),
            window_id: first_non_empty(raw.window_key, raw.window_alias),
            shots: raw.shots,
            hits: raw.hits,
            hits_to_players: raw.hits_to_players,
            matches_played: raw.matches_played,
            top1: raw.top1,
            eliminations: raw.eliminations,
            human_elims: raw.human_elims,
            health_taken: raw.health_taken,
            shield_taken: raw.shield_taken,
            damage_to_players: raw.damage_to_players,
            deaths: raw.deaths,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Vec<StatRecord>,
    pub roster: Vec<String>,
    pub selection: SelectionState,
    pub focus: SelectorLevel,
    pub view: StatsView,
    pub refresh: RefreshState,
    pub last_update: Option<String>,
    pub notification: Option<Notification>,
    pub logs: VecDeque<String>,
    pub theme: Theme,
    pub help_overlay: bool,
    pub loaded: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_roster(Vec::new())
    }

    /// An empty `roster` means every player in the store.
    pub fn with_roster(roster: Vec<String>) -> Self {
        let mut selection = SelectionState::new();
        selection.set_roster(roster.clone());
        Self {
            store: Vec::new(),
            roster,
            selection,
            focus: SelectorLevel::Player,
            view: StatsView::Cleared,
            refresh: RefreshState::Idle,
            last_update: None,
            notification: None,
            logs: VecDeque::with_capacity(200),
            theme: Theme::Light,
            help_overlay: false,
            loaded: false,
        }
    }

    pub fn replace_store(&mut self, records: Vec<StatRecord>) {
        for ((player, tournament, window), count) in lookup::duplicate_keys(&records) {
            tracing::warn!(%player, %tournament, %window, count, "duplicate stats records");
            self.push_log(format!(
                "[WARN] {count} records for {player}/{tournament}/{window}; using the first"
            ));
        }
        self.store = records;
        self.loaded = true;
        let roster = selection::player_roster(&self.store, &self.roster);
        self.selection.set_roster(roster);
        self.on_player_changed();
    }

    pub fn on_player_changed(&mut self) {
        tracing::debug!(player = ?self.selection.selected_player(), "player changed");
        self.selection.cascade_from_player(&self.store);
        self.refresh_view();
    }

    pub fn on_tournament_changed(&mut self) {
        tracing::debug!(tournament = ?self.selection.selected_tournament(), "tournament changed");
        self.selection.cascade_from_tournament(&self.store);
        self.refresh_view();
    }

    pub fn on_window_changed(&mut self) {
        tracing::debug!(window = ?self.selection.selected_window(), "window changed");
        self.refresh_view();
    }

    fn on_level_changed(&mut self, level: SelectorLevel) {
        match level {
            SelectorLevel::Player => self.on_player_changed(),
            SelectorLevel::Tournament => self.on_tournament_changed(),
            SelectorLevel::Window => self.on_window_changed(),
        }
    }

    /// Returns false, changing nothing, when the level is disabled or
    /// `value` is not offered.
    pub fn select(&mut self, level: SelectorLevel, value: Option<&str>) -> bool {
        if !self.selection.selector_mut(level).select(value) {
            return false;
        }
        self.on_level_changed(level);
        true
    }

    pub fn select_player(&mut self, value: Option<&str>) -> bool {
        self.select(SelectorLevel::Player, value)
    }

    pub fn select_tournament(&mut self, value: Option<&str>) -> bool {
        self.select(SelectorLevel::Tournament, value)
    }

    pub fn select_window(&mut self, value: Option<&str>) -> bool {
        self.select(SelectorLevel::Window, value)
    }

    pub fn step_focused(&mut self, delta: isize) {
        let level = self.focus;
        if self.selection.selector_mut(level).step(delta) {
            self.on_level_changed(level);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn refresh_view(&mut self) {
        self.view = build_view(&self.store, &self.selection);
    }

    pub fn begin_refresh(&mut self) -> bool {
        if self.refresh == RefreshState::Refreshing {
            return false;
        }
        self.refresh = RefreshState::Refreshing;
        tracing::info!("refresh started");
        true
    }

    pub fn finish_refresh(&mut self, outcome: RefreshOutcome, now: Instant) {
        self.refresh = RefreshState::Idle;
        match outcome {
            RefreshOutcome::Unchanged { timestamp } => {
                self.last_update = Some(refresh::format_update_time(timestamp.as_deref()));
                self.push_log("[INFO] Refresh complete, no new data");
            }
            RefreshOutcome::Replaced { timestamp, records } => {
                self.last_update = Some(refresh::format_update_time(timestamp.as_deref()));
                self.push_log(format!(
                    "[INFO] Refresh complete, {} records loaded",
                    records.len()
                ));
                self.replace_store(records);
            }
            RefreshOutcome::Failed { error, timestamp } => {
                if let Some(ts) = timestamp {
                    self.last_update = Some(refresh::format_update_time(Some(&ts)));
                }
                self.surface_error(&error, now);
            }
        }
        tracing::info!("refresh finished");
    }

    pub fn surface_error(&mut self, error: &DashboardError, now: Instant) {
        tracing::warn!(%error, network = error.is_network(), "surfacing error");
        self.push_log(format!("[WARN] {error}"));
        self.notify(error.to_string(), now);
    }

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification::new(message, now));
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|notice| notice.is_expired(now))
        {
            self.notification = None;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = ?self.theme, "theme toggled");
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn build_view(store: &[StatRecord], selection: &SelectionState) -> StatsView {
    if selection.selected_player().is_none() {
        return StatsView::Cleared;
    }
    let key = LookupKey::from_selection(
        selection.selected_player(),
        selection.selected_tournament(),
        selection.selected_window(),
    );
    let Some(key) = key else {
        return StatsView::NoStats;
    };
    let Some(record) = lookup::resolve(store, key) else {
        return StatsView::NoStats;
    };
    let tournament_scope = key.is_tournament_scope();
    let derived = metrics::compute_metrics(record, tournament_scope);
    StatsView::Cards(Box::new(cards::render(record, &derived, tournament_scope)))
}

#[derive(Debug, Clone)]
pub enum Delta {
    StoreLoaded(Vec<StatRecord>),
    LoadFailed(DashboardError),
    RefreshFinished(RefreshOutcome),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    Reload,
}

pub fn apply_delta(state: &mut AppState, delta: Delta, now: Instant) {
    match delta {
        Delta::StoreLoaded(records) => {
            state.push_log(format!("[INFO] Loaded {} stats records", records.len()));
            state.replace_store(records);
        }
        Delta::LoadFailed(error) => state.surface_error(&error, now),
        Delta::RefreshFinished(outcome) => state.finish_refresh(outcome, now),
        Delta::Log(msg) => state.push_log(msg),
    }
}
