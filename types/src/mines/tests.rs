use super::*;

#[test]
fn test_presets_validate() {
    for name in Variant::PRESETS {
        let variant = Variant::preset(name).unwrap();
        assert_eq!(variant.name, name);
        variant.validate().unwrap();
        assert_eq!(variant.box_counts.row_count(), ROW_COUNT);
    }
}

#[test]
fn test_unknown_preset() {
    assert_eq!(
        Variant::preset("turbo"),
        Err(ConfigError::UnknownPreset("turbo".to_string()))
    );
}

#[test]
fn test_box_count_below_two_rejected() {
    let counts = BoxCounts::SmallLarge {
        small: BoxRange::new(1, 4),
        small_rows: 15,
        large: BoxRange::new(5, 7),
        large_rows: 10,
    };
    assert_eq!(counts.validate(), Err(ConfigError::BoxCountTooSmall(1)));

    let counts = BoxCounts::Multiset {
        counts: vec![0, 3, 4, 5, 6],
        repeat: 5,
    };
    assert_eq!(counts.validate(), Err(ConfigError::BoxCountTooSmall(0)));
}

#[test]
fn test_empty_range_rejected() {
    let counts = BoxCounts::SmallLarge {
        small: BoxRange::new(4, 2),
        small_rows: 15,
        large: BoxRange::new(5, 7),
        large_rows: 10,
    };
    assert_eq!(
        counts.validate(),
        Err(ConfigError::EmptyRange { min: 4, max: 2 })
    );
}

#[test]
fn test_row_total_must_match_board() {
    let counts = BoxCounts::Multiset {
        counts: vec![3, 4, 5, 6],
        repeat: 5,
    };
    assert_eq!(
        counts.validate(),
        Err(ConfigError::RowCount {
            expected: ROW_COUNT,
            got: 20
        })
    );
}

#[test]
fn test_edge_out_of_range_rejected() {
    let mut variant = Variant::classic();
    variant.edges = EdgeTable::Tiered {
        tiers: EdgeTiers::new(0.0, 0.05, 1.0),
    };
    assert!(matches!(
        variant.validate(),
        Err(ConfigError::EdgeOutOfRange { field: "large", .. })
    ));

    variant.edges = EdgeTable::Tiered {
        tiers: EdgeTiers::new(-0.1, 0.05, 0.1),
    };
    assert!(matches!(
        variant.validate(),
        Err(ConfigError::EdgeOutOfRange { field: "pair", .. })
    ));
}

#[test]
fn test_variant_yaml() {
    let yaml = r#"
name: custom
box_counts:
  kind: multiset
  counts: [2, 3, 4, 5, 6]
  repeat: 5
edges:
  kind: cushioned
  head: 2
  tail: 1
  tiers:
    pair: 0.0
    small: 0.04
    large: 0.15
"#;
    let variant: Variant = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(variant.accumulation, Accumulation::Rounded);
    assert_eq!(
        variant.edges,
        EdgeTable::Cushioned {
            head: 2,
            tail: 1,
            tiers: EdgeTiers::new(0.0, 0.04, 0.15),
        }
    );
    variant.validate().unwrap();
}

#[test]
fn test_status_serializes_kebab_case() {
    let json = serde_json::to_string(&RoundStatus::NotStarted).unwrap();
    assert_eq!(json, "\"not-started\"");
    assert!(RoundStatus::Won.is_terminal());
    assert!(RoundStatus::Lost.is_terminal());
    assert!(!RoundStatus::Playing.is_terminal());
    assert!(!RoundStatus::NotStarted.is_terminal());
}

#[test]
fn test_new_round_starts_playing() {
    let rows = vec![Row::new(2, 1, 2.0, 2.0), Row::new(3, 0, 1.425, 2.85)];
    let round = Round::new(7, rows);
    assert_eq!(round.id, 7);
    assert_eq!(round.status, RoundStatus::Playing);
    assert_eq!(round.current_step, 0);
    assert_eq!(round.current_multiplier, BASE_MULTIPLIER);
    assert_eq!(round.cleared(), 0);
    assert!(round.rows.iter().all(Row::is_untouched));
    assert_eq!(round.current_row().map(|row| row.box_count), Some(2));
}

#[test]
fn test_invalid_bet_message() {
    assert_eq!(GameError::InvalidBetAmount.to_string(), INVALID_BET_MESSAGE);
    let err: GameError = InvalidAction::NothingToCashOut.into();
    assert_eq!(err.to_string(), "invalid game action: no rows cleared yet");
}

#[test]
fn test_tally_net() {
    let tally = Tally {
        total_won: 12.5,
        total_lost: 20.0,
        rounds_won: 2,
        rounds_lost: 2,
    };
    assert_eq!(tally.net(), -7.5);
    assert_eq!(tally.rounds_settled(), 4);
}

#[test]
fn test_row_validate() {
    assert_eq!(Row::new(3, 2, 1.43, 1.43).validate(0), Ok(()));
    assert_eq!(
        Row::new(1, 0, 1.0, 1.0).validate(0),
        Err(ConfigError::BoxCountTooSmall(1))
    );
    assert_eq!(
        Row::new(17, 0, 1.0, 1.0).validate(0),
        Err(ConfigError::BoxCountTooLarge(17))
    );
    assert_eq!(
        Row::new(4, 4, 1.27, 1.27).validate(6),
        Err(ConfigError::ExplodingIndexOutOfRange {
            row: 6,
            index: 4,
            box_count: 4
        })
    );
}
