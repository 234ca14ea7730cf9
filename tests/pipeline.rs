//! Load, discretize and grow a small dataset end to end.

use u_simpler::bins::{discretize, discretize_labelled};
use u_simpler::config::Config;
use u_simpler::data::Data;
use u_simpler::synth::Synthesizer;
use u_simpler::value::Value;

const AUTO: &str = "\
Clndrs, Volume, HpX, origin, Lbs-, Mpg+
8, 304, 193, 1, 4732, 10
8, 360, 215, 1, 4615, 10
8, 307, 200, 1, 4376, 10
6, 250, 100, 1, 3282, 20
6, 225, 95, 1, 3264, 20
6, 199, 90, 1, 2648, 20
4, 97, 88, 3, 2130, 30
4, 98, ?, 2, 2164, 30
4, 121, 113, 2, 2234, 30
4, 85, 65, 3, 2110, 40
4, 91, 67, 3, 1965, 40
4, 79, 58, 2, 1755, 40
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config() -> Config {
    Config::from_toml_str("seed = 42\nbudget = 30\ncf = 0.5\nbins = 4").unwrap()
}

#[test]
fn every_value_lands_in_exactly_one_bin() {
    init_tracing();
    let config = config();
    let data = Data::from_reader(AUTO.as_bytes(), config.summary()).unwrap();
    let binning = config.binning().unwrap();
    for at in 0..data.schema().x_arity() {
        let column = data.x_column(at);
        let bins = discretize(at, &column, &binning).unwrap();
        assert!(!bins.is_empty());
        for v in column.iter().filter(|v| !v.is_missing()) {
            let hits = bins.iter().filter(|b| b.selects(v)).count();
            assert_eq!(hits, 1, "column {at} value {v}");
        }
        let total: u64 = bins.iter().map(|b| b.n()).sum();
        assert_eq!(total as usize, column.iter().filter(|v| !v.is_missing()).count());
    }
}

#[test]
fn labelled_bins_follow_the_goal() {
    init_tracing();
    let config = config();
    let data = Data::from_reader(AUTO.as_bytes(), config.summary()).unwrap();
    let mpg = data.y_column(1);
    // cylinders separate mpg classes cleanly
    let bins = discretize_labelled(0, &data.x_column(0), &mpg, &config.binning().unwrap()).unwrap();
    assert!(bins.len() >= 2);
    assert_eq!(bins.iter().map(|b| b.n()).sum::<u64>(), 12);
    for bin in &bins {
        assert!(bin.div().unwrap() >= 0.0);
    }
    assert_eq!(bins.first().and_then(|b| b.lo()), Some(f64::NEG_INFINITY));
    assert_eq!(bins.last().and_then(|b| b.hi()), Some(f64::INFINITY));
}

#[test]
fn synthesis_grows_the_dataset() {
    init_tracing();
    let config = config();
    let mut data = Data::from_reader(AUTO.as_bytes(), config.summary()).unwrap();
    let evaluate = |x: &[Value]| {
        let clndrs = x[0].as_num().unwrap_or(4.0);
        let volume = x[1].as_num().unwrap_or(150.0);
        vec![Value::Num(volume * 14.0), Value::Num(60.0 - 6.0 * clndrs)]
    };

    let children = Synthesizer::new(config.synthesis().unwrap())
        .with_evaluator(evaluate)
        .synthesize(data.examples())
        .unwrap();
    assert_eq!(children.len(), 30);
    assert!(children.iter().all(|c| c.is_evaluated()));

    let scored = {
        let synth = Synthesizer::new(config.synthesis().unwrap())
            .with_evaluator(evaluate)
            .closer_to_heaven(&data);
        synth.synthesize(data.examples()).unwrap()
    };
    assert!(scored.len() <= 30);
    for child in &scored {
        assert!(data.d2h(child).is_some());
    }

    let before = data.len();
    for child in children {
        data.add(child).unwrap();
    }
    assert_eq!(data.len(), before + 30);
    assert_eq!(data.y_summaries()[0].n(), (before + 30) as u64);
}

#[test]
fn same_config_replays_the_same_children() {
    let config = config();
    let data = Data::from_reader(AUTO.as_bytes(), config.summary()).unwrap();
    let run = || {
        Synthesizer::new(config.synthesis().unwrap())
            .synthesize(data.examples())
            .unwrap()
    };
    assert_eq!(run(), run());
}
