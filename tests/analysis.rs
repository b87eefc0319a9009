mod fixtures;

use candlescope::{Analysis, AnalysisConfig, Error, MIN_BARS, PriceSeries, Signal};
use fixtures::{load_price_bars, load_reference_ohlcvs};

fn analysis() -> Analysis {
    let series = PriceSeries::new(load_price_bars()).unwrap();
    Analysis::try_compute(&series, &AnalysisConfig::default()).unwrap()
}

#[test]
fn price_series_accepts_fixture() {
    let series = PriceSeries::new(load_price_bars()).unwrap();
    assert_eq!(series.len(), 320);
    assert!(series.len() >= MIN_BARS);
}

#[test]
fn unordered_bars_are_rejected() {
    let mut bars = load_price_bars();
    bars.swap(10, 11);

    let err = PriceSeries::new(bars).unwrap_err();
    assert!(matches!(err, Error::UnorderedTimestamps { index: 11, .. }));
}

#[test]
fn short_prefix_is_rejected() {
    let bars = load_reference_ohlcvs();
    let result = Analysis::try_compute(&bars[..MIN_BARS - 1], &AnalysisConfig::default());

    assert!(matches!(
        result,
        Err(Error::InsufficientData { required: 50, actual: 49 })
    ));
}

#[test]
fn every_column_is_aligned() {
    let analysis = analysis();
    let names: Vec<&str> = analysis
        .indicators()
        .columns()
        .map(|(name, _)| name)
        .chain(analysis.patterns().columns().map(|(name, _)| name))
        .collect();

    assert_eq!(
        names,
        vec![
            "RSI",
            "MACD",
            "MACD_signal",
            "MACD_hist",
            "BB_upper",
            "BB_middle",
            "BB_lower",
            "Doji",
            "Hammer",
            "ShootingStar",
            "Engulfing"
        ]
    );
    for (name, series) in analysis.indicators().columns() {
        assert_eq!(series.timestamps(), analysis.timestamps(), "{name}");
    }
    for (name, series) in analysis.patterns().columns() {
        assert_eq!(series.timestamps(), analysis.timestamps(), "{name}");
    }
}

#[test]
fn recent_patterns_table() {
    let analysis = analysis();
    let rows = analysis.recent_patterns(15);

    assert_eq!(rows.len(), 15);
    assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert!(rows.iter().all(|r| r.signals.any()));

    // the newest engulfing in the fixture is at bar 311
    let engulfing = rows.iter().rfind(|r| r.signals.engulfing == Signal::Bullish);
    assert_eq!(engulfing.map(|r| r.index), Some(311));
}

#[test]
fn identical_input_gives_identical_output() {
    let a = serde_json::to_string(&analysis()).unwrap();
    let b = serde_json::to_string(&analysis()).unwrap();

    assert_eq!(a, b);
}

#[test]
fn serialises_warm_up_as_null_and_signals_as_integers() {
    let json = serde_json::to_value(analysis()).unwrap();

    assert!(json["indicators"]["rsi"]["values"][0].is_null());
    assert!(json["indicators"]["rsi"]["values"][14].is_f64());
    let doji = &json["patterns"]["doji"]["values"];
    assert!(doji.as_array().unwrap().iter().all(|v| matches!(v.as_i64(), Some(0 | 100))));
    assert_eq!(doji[150], 100);
}

#[test]
fn custom_config_from_toml() {
    let config = AnalysisConfig::from_toml_str(
        r"
        min_bars = 300

        [patterns]
        doji_body_ratio = 0.0
        ",
    )
    .unwrap();
    let bars = load_price_bars();
    let analysis = Analysis::try_compute(&bars, &config).unwrap();

    // only bars with a zero body remain dojis
    for i in analysis.patterns().doji.hits() {
        assert!((bars[i].close - bars[i].open).abs() <= 0.0, "bar {i}");
    }
    assert!(Analysis::try_compute(&bars[..299], &config).is_err());
}
