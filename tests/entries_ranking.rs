use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use hashbrown::HashMap;

use bandmap::{
    core::{
        entries::{Entries, calculate_weighted_value},
        entry::{Entry, Quality},
        notifier::{
            EntryAddedListener, EntryOnFrequencyListener, EntryRemovedListener,
            EntrySelectedListener, EntryUpdatedListener, Listener,
        },
        order,
    },
    engine::{
        traits::{CallInfo, Callinfo},
        weights::Weights,
    },
    spot::{Source, Spot},
    types::{Band, Mode},
};

fn spot(call: &str, freq_hz: u64, ts_ms: u64) -> Spot {
    Spot::new(call, freq_hz, Some(Mode::CW), ts_ms, Source::Skimmer)
}

fn entries() -> Entries {
    Entries::new(
        Band::CONTEST_BANDS.to_vec(),
        order::by_frequency(),
        order::not_worked(),
    )
}

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Added(String, usize),
    Updated(String, usize),
    Removed(String, usize),
    Selected(String),
    OnFrequency(String, bool),
}

#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Recorder {
    fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.seen.lock().expect("lock"))
    }

    fn push(&self, seen: Seen) {
        self.seen.lock().expect("lock").push(seen);
    }
}

impl EntryAddedListener for Recorder {
    fn entry_added(&mut self, entry: &Entry) {
        self.push(Seen::Added(entry.call.clone(), entry.index));
    }
}

impl EntryUpdatedListener for Recorder {
    fn entry_updated(&mut self, entry: &Entry) {
        self.push(Seen::Updated(entry.call.clone(), entry.index));
    }
}

impl EntryRemovedListener for Recorder {
    fn entry_removed(&mut self, entry: &Entry) {
        self.push(Seen::Removed(entry.call.clone(), entry.index));
    }
}

impl EntrySelectedListener for Recorder {
    fn entry_selected(&mut self, entry: &Entry) {
        self.push(Seen::Selected(entry.call.clone()));
    }
}

impl EntryOnFrequencyListener for Recorder {
    fn entry_on_frequency(&mut self, entry: &Entry, available: bool) {
        self.push(Seen::OnFrequency(entry.call.clone(), available));
    }
}

impl Listener for Recorder {
    fn as_added(&mut self) -> Option<&mut dyn EntryAddedListener> {
        Some(self)
    }

    fn as_updated(&mut self) -> Option<&mut dyn EntryUpdatedListener> {
        Some(self)
    }

    fn as_removed(&mut self) -> Option<&mut dyn EntryRemovedListener> {
        Some(self)
    }

    fn as_selected(&mut self) -> Option<&mut dyn EntrySelectedListener> {
        Some(self)
    }

    fn as_on_frequency(&mut self) -> Option<&mut dyn EntryOnFrequencyListener> {
        Some(self)
    }
}

struct TableScorer {
    table: HashMap<&'static str, (i32, i32, i32)>,
}

impl Callinfo for TableScorer {
    fn get_info(&self, call: &str, _band: Band, _mode: Option<Mode>, _exchange: &[String]) -> CallInfo {
        let (points, multis, value) = self.table.get(call).copied().unwrap_or_default();
        CallInfo {
            call: call.to_string(),
            points,
            multis,
            value,
            ..CallInfo::default()
        }
    }
}

fn scorer(rows: &[(&'static str, (i32, i32, i32))]) -> Box<dyn Callinfo> {
    Box::new(TableScorer {
        table: rows.iter().copied().collect(),
    })
}

fn assert_sorted_and_indexed(entries: &Entries) {
    let all = entries.all();
    for (i, entry) in all.iter().enumerate() {
        assert_eq!(entry.index, i);
    }
    for pair in all.windows(2) {
        assert!(pair[0].frequency <= pair[1].frequency);
    }
}

fn assert_no_duplicate_entries(entries: &Entries) {
    let all = entries.all();
    for a in &all {
        for b in all.iter().filter(|b| b.id != a.id) {
            let same_station = a.call == b.call && a.band == b.band && a.mode == b.mode;
            assert!(
                !(same_station && a.on_frequency(b.frequency)),
                "{}@{} and {}@{} share a frequency",
                a.call,
                a.frequency,
                b.call,
                b.frequency
            );
        }
    }
}

struct PredictingScorer {
    exchanges: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Callinfo for PredictingScorer {
    fn get_info(&self, call: &str, _band: Band, _mode: Option<Mode>, exchange: &[String]) -> CallInfo {
        self.exchanges.lock().expect("lock").push(exchange.to_vec());
        CallInfo {
            call: call.to_string(),
            predicted_exchange: vec!["599".to_string(), "05".to_string()],
            ..CallInfo::default()
        }
    }
}

#[test]
fn repeated_spots_converge_to_one_entry() {
    let mut entries = entries();
    let weights = Weights::default();

    for (i, offset) in [0i64, 10, -5, 8, -10].into_iter().enumerate() {
        let freq_hz = (7_035_000 + offset) as u64;
        entries.add(spot("DL1ABC", freq_hz, i as u64 * 1_000), 5_000, &weights);
    }

    assert_eq!(entries.len(), 1);
    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.spot_count, 5);
    assert_eq!(entry.quality, Quality::Valid);
    assert_eq!(entry.id, 1);
}

#[test]
fn spot_at_the_window_edge_merges_despite_quantization() {
    let mut entries = entries();
    let weights = Weights::default();

    // first spot quantizes up to 7_030_010, 29 Hz from the second
    entries.add(spot("DL1ABC", 7_030_005, 0), 0, &weights);
    entries.add(spot("DL1ABC", 7_029_981, 1), 1, &weights);

    assert_eq!(entries.len(), 1);
    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.spot_count, 2);
    assert_eq!(entry.frequency, 7_029_990);
    assert_no_duplicate_entries(&entries);
}

#[test]
fn merge_folds_same_call_entry_pulled_into_its_window() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    let weights = Weights::default();

    entries.add(spot("DL1ABC", 7_030_000, 0), 0, &weights);
    entries.add(spot("DL1ABC", 7_030_030, 1), 1, &weights);
    assert_eq!(entries.len(), 2);

    entries.add(spot("DL1ABC", 7_030_015, 2), 2, &weights);

    assert_eq!(
        recorder.take(),
        vec![
            Seen::Added("DL1ABC".to_string(), 0),
            Seen::Added("DL1ABC".to_string(), 1),
            Seen::Removed("DL1ABC".to_string(), 1),
            Seen::Updated("DL1ABC".to_string(), 0),
        ]
    );
    assert_eq!(entries.len(), 1);
    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.id, 1);
    assert_eq!(entry.spot_count, 3);
    assert_eq!(entry.frequency, 7_030_020);
    assert_eq!(entry.quality, Quality::Valid);
    assert_sorted_and_indexed(&entries);
    assert_no_duplicate_entries(&entries);
}

#[test]
fn clean_out_drops_the_weaker_of_two_converging_entries() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    let weights = Weights::default();

    entries.add(spot("DL1ABC", 7_030_000, 0), 50_000, &weights);
    entries.add(spot("DL1ABC", 7_030_020, 50_000), 50_000, &weights);
    entries.add(spot("DL1ABC", 7_030_040, 50_000), 50_000, &weights);
    entries.add(spot("DL1ABC", 7_030_045, 50_000), 50_000, &weights);
    assert_eq!(entries.len(), 2);
    assert_no_duplicate_entries(&entries);
    recorder.take();

    // the first spot expires and moves the older entry onto the newer one
    entries.clean_out(Duration::from_secs(30), 60_000, &weights);

    assert_eq!(
        recorder.take(),
        vec![
            Seen::Removed("DL1ABC".to_string(), 0),
            Seen::Updated("DL1ABC".to_string(), 0),
        ]
    );
    assert_eq!(entries.len(), 1);
    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.id, 2);
    assert_eq!(entry.spot_count, 2);
    assert_sorted_and_indexed(&entries);
    assert_no_duplicate_entries(&entries);
}

#[test]
fn scorer_never_sees_its_own_prediction() {
    let exchanges = Arc::new(Mutex::new(Vec::new()));
    let mut entries = entries();
    entries.set_callinfo(Box::new(PredictingScorer {
        exchanges: Arc::clone(&exchanges),
    }));
    let weights = Weights::default();

    entries.add(spot("K1AAA", 7_010_000, 0), 0, &weights);
    entries.add(spot("K1AAA", 7_010_000, 1), 1, &weights);
    entries.clean_out(Duration::from_secs(600), 2, &weights);

    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.info.predicted_exchange, vec!["599".to_string(), "05".to_string()]);
    let seen = exchanges.lock().expect("lock");
    assert!(seen.len() >= 3);
    assert!(seen.iter().all(|exchange| exchange.is_empty()));
}

#[test]
fn new_entries_carry_the_disagreement_signal() {
    let mut entries = entries();
    let weights = Weights::default();
    for ts in 0..3 {
        entries.add(spot("DL1ABC", 7_035_000, ts), 10, &weights);
    }

    entries.add(spot("DL1ABC", 7_040_000, 4), 10, &weights);
    entries.add(spot("DL1ABD", 7_035_000, 5), 10, &weights);

    let calls: Vec<(String, Quality)> = entries
        .all()
        .into_iter()
        .map(|e| (format!("{}@{}", e.call, e.frequency), e.quality))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("DL1ABC@7035000".to_string(), Quality::Valid),
            ("DL1ABD@7035000".to_string(), Quality::Busted),
            ("DL1ABC@7040000".to_string(), Quality::QSY),
        ]
    );
    assert_sorted_and_indexed(&entries);
}

#[test]
fn merged_entry_moves_to_its_new_position() {
    let mut entries = entries();
    let weights = Weights::default();
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &weights);
    entries.add(spot("K2BBB", 7_010_014, 0), 0, &weights);
    assert_eq!(entries.get(0).map(|e| e.call.as_str()), Some("K1AAA"));

    // pulls K1AAA's mean above K2BBB
    entries.add(spot("K1AAA", 7_010_020, 1), 1, &weights);
    entries.add(spot("K1AAA", 7_010_030, 2), 2, &weights);
    assert_eq!(entries.len(), 2);

    let calls: Vec<String> = entries.all().into_iter().map(|e| e.call).collect();
    assert_eq!(calls, vec!["K2BBB".to_string(), "K1AAA".to_string()]);
    assert_sorted_and_indexed(&entries);
}

#[test]
fn equal_entries_are_inserted_first() {
    let mut entries = Entries::new(
        Band::CONTEST_BANDS.to_vec(),
        order::by_descending_value(),
        order::all(),
    );
    let weights = Weights::default();
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &weights);
    entries.add(spot("K2BBB", 7_020_000, 0), 0, &weights);
    entries.add(spot("K3CCC", 7_030_000, 0), 0, &weights);

    let calls: Vec<String> = entries.all().into_iter().map(|e| e.call).collect();
    assert_eq!(calls, vec!["K3CCC", "K2BBB", "K1AAA"]);
    let probe = Entry::new(spot("K4DDD", 7_040_000, 0));
    assert_eq!(entries.find_index_for_insert(&probe), 0);
}

#[test]
fn query_filters_by_band_and_sorts() {
    let mut entries = entries();
    let weights = Weights::default();
    entries.add(spot("K1AAA", 14_030_000, 0), 0, &weights);
    entries.add(spot("K2BBB", 7_010_000, 0), 0, &weights);
    entries.add(spot("K3CCC", 14_010_000, 0), 0, &weights);
    entries.add(spot("K4DDD", 7_020_000, 0), 0, &weights);

    let on_20m = entries.query(&order::by_frequency(), &[order::on_band(Band::B20m)]);
    let calls: Vec<&str> = on_20m.iter().map(|e| e.call.as_str()).collect();
    assert_eq!(calls, vec!["K3CCC", "K1AAA"]);

    let descending = entries.all_by(&order::descending(order::by_frequency()));
    assert_eq!(descending.first().map(|e| e.call.as_str()), Some("K1AAA"));

    let mut count = 0;
    entries.for_each(|_| count += 1);
    assert_eq!(count, 4);
}

#[test]
fn scorer_info_drives_weighted_value() {
    let mut entries = entries();
    entries.set_callinfo(scorer(&[("K1AAA", (3, 1, 10))]));

    entries.add(spot("K1AAA", 7_010_000, 0), 0, &Weights::neutral());
    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.info.points, 3);
    assert_eq!(entry.info.multis, 1);
    assert_eq!(entry.info.weighted_value, 10.0);
}

#[test]
fn weighted_value_combines_age_spots_source_and_quality() {
    let weights = Weights {
        age_seconds: -0.01,
        spots: 0.1,
        source: 0.1,
        quality: 0.1,
    };
    let mut entry = Entry::new(spot("K1AAA", 7_010_000, 0));
    entry.add(spot("K1AAA", 7_010_000, 0));
    entry.add(spot("K1AAA", 7_010_000, 0));
    entry.info.value = 10;

    let valid = calculate_weighted_value(&entry, 10_000, &weights);
    assert!((valid - 18.0).abs() < 1e-9, "got {valid}");

    entry.quality = Quality::Busted;
    let busted = calculate_weighted_value(&entry, 10_000, &weights);
    assert!((busted - 15.0).abs() < 1e-9, "got {busted}");

    entry.source = Source::Worked;
    assert_eq!(calculate_weighted_value(&entry, 10_000, &weights), 0.0);
}

#[test]
fn clean_out_removes_oldest_first_with_live_indices() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    let weights = Weights::default();

    entries.add(spot("K2BBB", 7_010_000, 1_000), 1_000, &weights);
    entries.add(spot("K1AAA", 7_020_000, 0), 1_000, &weights);
    entries.add(spot("K3CCC", 7_030_000, 50_000), 50_000, &weights);
    recorder.take();

    entries.clean_out(Duration::from_secs(30), 60_000, &weights);

    assert_eq!(
        recorder.take(),
        vec![
            Seen::Removed("K1AAA".to_string(), 1),
            Seen::Removed("K2BBB".to_string(), 0),
            Seen::Updated("K3CCC".to_string(), 0),
        ]
    );
    assert_eq!(entries.len(), 1);
    assert_sorted_and_indexed(&entries);
}

#[test]
fn clean_out_partial_age_out_downgrades_and_updates() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    let weights = Weights::default();

    for ts in [0, 10_000, 40_000] {
        entries.add(spot("DL1ABC", 7_035_000, ts), ts, &weights);
    }
    assert_eq!(entries.get(0).map(|e| e.quality), Some(Quality::Valid));
    recorder.take();

    entries.clean_out(Duration::from_secs(30), 60_000, &weights);

    let entry = entries.get(0).expect("entry");
    assert_eq!(entry.spot_count, 1);
    assert_eq!(entry.quality, Quality::Unknown);
    assert_eq!(recorder.take(), vec![Seen::Updated("DL1ABC".to_string(), 0)]);

    entries.clean_out(Duration::from_secs(30), 60_000, &weights);
    assert!(recorder.take().is_empty());
}

#[test]
fn band_summaries_flag_the_best_bands() {
    let mut entries = entries();
    entries.set_callinfo(scorer(&[
        ("K1AAA", (3, 1, 4)),
        ("K2BBB", (1, 2, 3)),
        ("K3CCC", (10, 10, 20)),
    ]));
    let weights = Weights::default();
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &weights);
    entries.add(spot("K2BBB", 14_010_000, 0), 0, &weights);
    entries.add(
        Spot::new("K3CCC", 21_010_000, Some(Mode::CW), 0, Source::Worked),
        0,
        &weights,
    );

    entries.clean_out(Duration::from_secs(600), 1_000, &weights);
    let bands = entries.bands(Band::B20m, Band::B40m);

    assert_eq!(bands.len(), 6);
    let b40 = bands.iter().find(|b| b.band == Band::B40m).expect("40m");
    let b20 = bands.iter().find(|b| b.band == Band::B20m).expect("20m");
    let b15 = bands.iter().find(|b| b.band == Band::B15m).expect("15m");

    assert_eq!((b40.points, b40.multis), (3, 1));
    assert!(b40.max_points && !b40.max_multis && b40.visible && !b40.active);
    assert_eq!((b20.points, b20.multis), (1, 2));
    assert!(!b20.max_points && b20.max_multis && b20.active);
    assert_eq!((b15.points, b15.multis), (0, 0));
    assert_eq!(bands.iter().filter(|b| b.max_points).count(), 1);
}

#[test]
fn empty_summaries_flag_nothing() {
    let mut entries = entries();
    entries.clean_out(Duration::from_secs(600), 0, &Weights::default());
    assert!(
        entries
            .bands(Band::B20m, Band::B20m)
            .iter()
            .all(|b| !b.max_points && !b.max_multis)
    );
}

#[test]
fn out_of_range_access_is_harmless() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &Weights::default());
    recorder.take();

    let mut seen_call = None;
    entries.do_on_entry(99, |e| seen_call = Some(e.call.clone()));
    assert_eq!(seen_call.as_deref(), Some(""));

    entries.select(99);
    assert!(recorder.take().is_empty());

    entries.select(0);
    assert_eq!(recorder.take(), vec![Seen::Selected("K1AAA".to_string())]);
}

#[test]
fn on_frequency_reports_the_entry_under_the_radio() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &Weights::default());
    recorder.take();

    entries.emit_on_frequency(Band::B40m, 7_010_010);
    entries.emit_on_frequency(Band::B40m, 7_012_000);
    assert_eq!(
        recorder.take(),
        vec![
            Seen::OnFrequency("K1AAA".to_string(), true),
            Seen::OnFrequency(String::new(), false),
        ]
    );
    assert_eq!(entries.at_frequency(7_010_010).map(|e| e.id), Some(1));
}

#[test]
fn clear_removes_everything() {
    let mut entries = entries();
    let recorder = Recorder::default();
    entries.notify(Box::new(recorder.clone()));
    entries.add(spot("K1AAA", 7_010_000, 0), 0, &Weights::default());
    entries.add(spot("K2BBB", 7_020_000, 0), 0, &Weights::default());
    recorder.take();

    entries.clear();
    assert!(entries.is_empty());
    assert_eq!(recorder.take().len(), 2);
}
