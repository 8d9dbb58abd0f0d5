use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fncs_terminal::lookup::{LookupKey, duplicate_keys, resolve};
use fncs_terminal::selection::{rebuild_tournament_options, rebuild_window_options};
use fncs_terminal::state::{AppState, StatRecord};
use fncs_terminal::stats_api::parse_stats_json;

const PLAYERS: usize = 200;
const TOURNAMENTS: usize = 12;
const WINDOWS: usize = 4;

fn synthetic_store() -> Vec<StatRecord> {
    let mut store = Vec::with_capacity(PLAYERS * (1 + TOURNAMENTS * (WINDOWS + 1)));
    for p in 0..PLAYERS {
        let player = format!("player_{p}");
        let base = StatRecord {
            player_id: player.clone(),
            shots: Some(1000.0 + p as f64),
            hits: Some(400.0),
            hits_to_players: Some(250.0),
            matches_played: Some(120.0),
            top1: Some(9.0),
            human_elims: Some(640.0),
            eliminations: Some(30.0),
            damage_to_players: Some(85_000.0),
            deaths: Some(111.0),
            ..StatRecord::default()
        };
        store.push(base.clone());
        for t in 0..TOURNAMENTS {
            let tournament = format!("epicgames_S32_Cup{t}");
            store.push(StatRecord {
                tournament_id: tournament.clone(),
                ..base.clone()
            });
            for w in 0..WINDOWS {
                store.push(StatRecord {
                    tournament_id: tournament.clone(),
                    window_id: format!("S32_Cup{t}_Round{w}"),
                    ..base.clone()
                });
            }
        }
    }
    store
}

fn bench_cascade_rebuild(c: &mut Criterion) {
    let store = synthetic_store();
    c.bench_function("cascade_rebuild", |b| {
        b.iter(|| {
            let tournaments = rebuild_tournament_options(&store, black_box(Some("player_150")));
            let windows = rebuild_window_options(
                &store,
                black_box(Some("player_150")),
                black_box(Some("epicgames_S32_Cup7")),
            );
            black_box((tournaments.options.len(), windows.options.len()));
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let store = synthetic_store();
    c.bench_function("resolve_window", |b| {
        b.iter(|| {
            let key = LookupKey::Window {
                player: black_box("player_199"),
                tournament: "epicgames_S32_Cup11",
                window: "S32_Cup11_Round3",
            };
            black_box(resolve(&store, key).is_some());
        })
    });
}

fn bench_store_replace(c: &mut Criterion) {
    let store = synthetic_store();
    c.bench_function("store_replace", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            state.replace_store(store.clone());
            state.select_player(Some("player_42"));
            black_box(state.view.cards().is_some());
        })
    });
}

fn bench_duplicate_scan(c: &mut Criterion) {
    let store = synthetic_store();
    c.bench_function("duplicate_scan", |b| {
        b.iter(|| black_box(duplicate_keys(black_box(&store)).len()))
    });
}

fn bench_stats_parse(c: &mut Criterion) {
    c.bench_function("stats_parse", |b| {
        b.iter(|| {
            let rows = parse_stats_json(black_box(STATS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_cascade_rebuild,
    bench_resolve,
    bench_store_replace,
    bench_duplicate_scan,
    bench_stats_parse
);
criterion_main!(perf);

static STATS_JSON: &str = include_str!("../tests/fixtures/stats.json");
