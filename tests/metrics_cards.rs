use fncs_terminal::cards::{format_number, format_percent, render};
use fncs_terminal::metrics::{compute_metrics, percentage};
use fncs_terminal::state::StatRecord;

fn global_record() -> StatRecord {
    StatRecord {
        player_id: "M8 Vanyak3k".to_string(),
        shots: Some(100.0),
        hits: Some(50.0),
        hits_to_players: Some(10.0),
        matches_played: Some(10.0),
        top1: Some(2.0),
        human_elims: Some(1234.0),
        eliminations: Some(7.0),
        health_taken: Some(5000.0),
        shield_taken: Some(2500.5),
        damage_to_players: Some(15000.0),
        deaths: Some(8.0),
        ..StatRecord::default()
    }
}

#[test]
fn global_metrics_from_hits_and_wins() {
    let metrics = compute_metrics(&global_record(), false);
    assert_eq!(metrics.accuracy, 50.0);
    assert_eq!(metrics.win_rate, 20.0);
    assert_eq!(format_percent(metrics.accuracy), "50.0%");
    assert_eq!(format_percent(metrics.win_rate), "20.0%");
}

#[test]
fn tournament_accuracy_uses_hits_to_players() {
    let metrics = compute_metrics(&global_record(), true);
    assert_eq!(metrics.accuracy, 10.0);
    assert_eq!(metrics.win_rate, 0.0);
}

#[test]
fn zero_and_unknown_inputs_never_leak_nan() {
    let empty = StatRecord::default();
    for scope in [false, true] {
        let metrics = compute_metrics(&empty, scope);
        assert!(metrics.accuracy.is_finite());
        assert!(metrics.win_rate.is_finite());
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.win_rate, 0.0);
    }

    let sentinels = StatRecord {
        shots: Some(0.0),
        hits: Some(-1.0),
        matches_played: Some(-1.0),
        top1: Some(3.0),
        ..StatRecord::default()
    };
    let metrics = compute_metrics(&sentinels, false);
    assert_eq!(metrics.accuracy, 0.0);
    assert_eq!(metrics.win_rate, 0.0);

    assert_eq!(percentage(Some(f64::NAN), Some(10.0)), 0.0);
    assert_eq!(percentage(Some(1.0), Some(f64::INFINITY)), 0.0);
}

#[test]
fn number_formatting() {
    assert_eq!(format_number(Some(-1.0)), "0");
    assert_eq!(format_number(None), "0");
    assert_eq!(format_number(Some(0.0)), "0");
    assert_eq!(format_number(Some(f64::NAN)), "0");
    assert_eq!(format_number(Some(1234.0)), "1,234");
    assert_eq!(format_number(Some(1_000_000.25)), "1,000,000.25");
    assert_eq!(format_number(Some(1e20)), "100,000,000,000,000,000,000");
}

#[test]
fn global_cards() {
    let record = global_record();
    let cards = render(&record, &compute_metrics(&record, false), false);
    assert_eq!(cards.len(), 4);

    assert_eq!(cards[0].title, "Matches & Eliminations");
    assert_eq!(cards[0].lines, vec!["Elims: 1,234"]);
    assert_eq!(cards[0].subtext.as_deref(), Some("Matches: 10"));

    assert_eq!(cards[1].lines, vec!["Health taken: 5,000"]);
    assert_eq!(cards[1].subtext.as_deref(), Some("Shield taken: 2,500.5"));

    assert_eq!(cards[2].lines, vec!["Damage: 15,000"]);
    assert_eq!(cards[2].subtext.as_deref(), Some("Accuracy: 50.0%"));

    assert_eq!(cards[3].title, "Performance");
    assert_eq!(
        cards[3].lines,
        vec!["Global Stats", "Win Rate: 20.0%", "Deaths: 8"]
    );
    assert_eq!(cards[3].subtext, None);
}

#[test]
fn tournament_cards_use_tournament_fields() {
    let record = global_record();
    let cards = render(&record, &compute_metrics(&record, true), true);
    assert_eq!(cards[0].lines, vec!["Elims: 7"]);
    assert_eq!(cards[2].subtext.as_deref(), Some("Accuracy: 10.0%"));
    assert_eq!(cards[3].lines, vec!["Tournament Stats"]);
}

#[test]
fn sentinel_fields_render_as_zero() {
    let record = StatRecord {
        player_id: "M8 PodaSai".to_string(),
        deaths: Some(-1.0),
        health_taken: None,
        ..StatRecord::default()
    };
    let cards = render(&record, &compute_metrics(&record, false), false);
    assert_eq!(cards[1].lines, vec!["Health taken: 0"]);
    assert_eq!(cards[3].lines[2], "Deaths: 0");
    assert_eq!(cards[2].subtext.as_deref(), Some("Accuracy: 0.0%"));
}

#[test]
fn render_is_idempotent() {
    let record = global_record();
    let metrics = compute_metrics(&record, false);
    let first = render(&record, &metrics, false);
    let second = render(&record, &metrics, false);
    assert_eq!(first, second);
}
