use chrono::Local;

use crate::error::DashboardError;
use crate::state::StatRecord;
use crate::stats_api::{RefreshResponse, StatsApi};

/// In-process stats source with a fixed set of records. Refresh always
/// succeeds and never has new data.
#[derive(Debug, Clone)]
pub struct DemoStatsApi {
    records: Vec<StatRecord>,
}

impl Default for DemoStatsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoStatsApi {
    pub fn new() -> Self {
        Self {
            records: seed_records(),
        }
    }
}

impl StatsApi for DemoStatsApi {
    fn fetch_stats(&self) -> Result<Vec<StatRecord>, DashboardError> {
        Ok(self.records.clone())
    }

    fn trigger_refresh(&self) -> Result<RefreshResponse, DashboardError> {
        Ok(RefreshResponse {
            success: true,
            timestamp: Some(Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
            new_data: false,
            error: None,
            message: Some("Refresh complete (demo data)".to_string()),
        })
    }
}

pub fn seed_records() -> Vec<StatRecord> {
    vec![
        StatRecord {
            player_id: "M8 Vanyak3k".to_string(),
            epic_id: Some("79f1994f55eb4931a148935efa188b2f".to_string()),
            matches_played: Some(100.0),
            human_elims: Some(250.0),
            top1: Some(10.0),
            deaths: Some(90.0),
            shield_taken: Some(5000.0),
            hits: Some(2000.0),
            shots: Some(4000.0),
            damage_to_players: Some(20000.0),
            health_taken: Some(15000.0),
            ..StatRecord::default()
        },
        StatRecord {
            player_id: "M8 PodaSai".to_string(),
            epic_id: Some("781c9df9b5f1483a9d06de87be5467aa".to_string()),
            matches_played: Some(80.0),
            human_elims: Some(200.0),
            top1: Some(8.0),
            deaths: Some(72.0),
            shield_taken: Some(4000.0),
            hits: Some(1800.0),
            shots: Some(3500.0),
            damage_to_players: Some(18000.0),
            health_taken: Some(12000.0),
            ..StatRecord::default()
        },
        StatRecord {
            player_id: "M8 Vanyak3k".to_string(),
            epic_id: Some("79f1994f55eb4931a148935efa188b2f".to_string()),
            tournament_id: "epicgames_S32_TriosCashCup_NAC".to_string(),
            window_id: "S32_TriosCashCup_Event6Round1_NAC".to_string(),
            eliminations: Some(15.0),
            shots: Some(300.0),
            hits_to_players: Some(150.0),
            damage_to_players: Some(3000.0),
            health_taken: Some(1500.0),
            matches_played: Some(5.0),
            ..StatRecord::default()
        },
    ]
}
