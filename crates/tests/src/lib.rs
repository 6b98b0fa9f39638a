//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 匹配性质校验（对照暴力算法）
//! - 基于磁盘帧文件的端到端测试
//! - 损坏与重复输入的诊断路径

#[cfg(test)]
mod support {
    use std::io::Write;
    use std::path::Path;

    use contracts::{PayloadGeometry, StreamLabel};
    use ingestion::{synthetic_frame, write_record_u16};

    /// Small geometry keeps test files tiny
    pub fn geometry() -> PayloadGeometry {
        PayloadGeometry {
            side: 4,
            bytes_per_pixel: 2,
        }
    }

    /// Write a frame file with the given timestamps (ns)
    pub fn write_frame_file(path: &Path, stream: StreamLabel, timestamps_ns: &[i64]) {
        let mut file = std::fs::File::create(path).unwrap();
        for (i, &ts) in timestamps_ns.iter().enumerate() {
            let frame = synthetic_frame(stream, i as u64, ts, geometry());
            let pixels: Vec<u16> = (0..geometry().pixel_count() as u16).collect();
            write_record_u16(&mut file, &frame.meta, &pixels).unwrap();
        }
        file.flush().unwrap();
    }

    /// Brute-force O(n*m) reference: all index pairs within tolerance
    pub fn brute_force_pairs(
        a: &[i64],
        b: &[i64],
        tolerance_ns: u64,
    ) -> std::collections::BTreeSet<(u64, u64)> {
        let mut pairs = std::collections::BTreeSet::new();
        for (i, &ta) in a.iter().enumerate() {
            for (j, &tb) in b.iter().enumerate() {
                if ta.abs_diff(tb) <= tolerance_ns {
                    pairs.insert((i as u64, j as u64));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
        let _ = contracts::TimestampBasis::Receive;
    }
}

#[cfg(test)]
mod property_tests {
    use std::collections::BTreeSet;

    use contracts::{MatcherConfig, StreamLabel, TimestampBasis};
    use ingestion::MemoryFrameSource;
    use match_engine::{CoincidenceMatcher, MatchOutcome};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::support::brute_force_pairs;

    fn streaming_pairs(a: &[i64], b: &[i64], tolerance_ns: u64) -> MatchOutcome {
        let matcher = CoincidenceMatcher::new(
            MatcherConfig {
                max_time_diff_ns: tolerance_ns,
                basis: TimestampBasis::Receive,
            },
            MemoryFrameSource::from_timestamps(StreamLabel::A, a),
            MemoryFrameSource::from_timestamps(StreamLabel::B, b),
        );
        matcher.run().unwrap()
    }

    fn pair_set(outcome: &MatchOutcome) -> BTreeSet<(u64, u64)> {
        outcome.pairs.iter().map(|p| p.key()).collect()
    }

    /// Sorted random stream with occasional timestamp plateaus and clusters
    fn random_sorted_stream(rng: &mut StdRng, len: usize, max_step: i64) -> Vec<i64> {
        let mut ts = rng.random_range(0..1_000);
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(ts);
            // plateaus (step 0) are legal under the ordering invariant
            ts += rng.random_range(0..=max_step);
        }
        out
    }

    /// Streaming output equals brute force, across shapes and tolerances
    #[test]
    fn completeness_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for round in 0..50 {
            let len_a = rng.random_range(0..60);
            let len_b = rng.random_range(0..60);
            let max_step = [1, 3, 10, 100][round % 4];
            let tolerance = rng.random_range(0..30);

            let a = random_sorted_stream(&mut rng, len_a, max_step);
            let b = random_sorted_stream(&mut rng, len_b, max_step);

            let outcome = streaming_pairs(&a, &b, tolerance);
            let expected = brute_force_pairs(&a, &b, tolerance);

            assert_eq!(
                pair_set(&outcome),
                expected,
                "mismatch at round {round}: a={a:?} b={b:?} T={tolerance}"
            );
        }
    }

    /// All-distinct timestamps never produce a repeated pair
    #[test]
    fn no_spurious_duplicates_for_distinct_timestamps() {
        let a: Vec<i64> = (0..200).map(|i| i * 7).collect();
        let b: Vec<i64> = (0..200).map(|i| i * 5 + 1).collect();

        let outcome = streaming_pairs(&a, &b, 25);

        let as_set = pair_set(&outcome);
        assert_eq!(as_set.len(), outcome.pairs.len(), "a pair was emitted twice");
        assert_eq!(outcome.report.duplicate_pairs, 0);
    }

    /// The result *set* does not depend on emission order
    #[test]
    fn result_set_is_order_independent() {
        // dense clusters force repeated right-edge refills mid-scan
        let a = vec![100, 100, 101, 250, 251];
        let b = vec![99, 100, 100, 102, 249, 249, 252];

        let outcome = streaming_pairs(&a, &b, 3);
        let emission: BTreeSet<(u64, u64)> =
            outcome.records().iter().map(|r| (r.a_index, r.b_index)).collect();
        let canonical: BTreeSet<(u64, u64)> = outcome
            .sorted_records()
            .iter()
            .map(|r| (r.a_index, r.b_index))
            .collect();

        assert_eq!(emission, canonical);
        assert_eq!(emission, brute_force_pairs(&a, &b, 3));
    }

    /// An empty stream on either side yields an empty result
    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(streaming_pairs(&[], &[1, 2, 3], 1_000).pairs.is_empty());
        assert!(streaming_pairs(&[1, 2, 3], &[], 1_000).pairs.is_empty());
        assert!(streaming_pairs(&[], &[], 1_000).pairs.is_empty());
    }

    /// Zero tolerance admits only exact timestamp equality
    #[test]
    fn zero_tolerance_is_exact_equality() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = random_sorted_stream(&mut rng, 80, 2);
        let b = random_sorted_stream(&mut rng, 80, 2);

        let outcome = streaming_pairs(&a, &b, 0);
        for pair in &outcome.pairs {
            assert_eq!(pair.a_timestamp_ns, pair.b_timestamp_ns);
        }
        assert_eq!(pair_set(&outcome), brute_force_pairs(&a, &b, 0));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;

    use contracts::{
        FrameSource, MatcherConfig, SinkConfig, SinkType, StreamLabel, TimestampBasis,
    };
    use dispatcher::PairDispatcher;
    use ingestion::FrameCursor;
    use match_engine::CoincidenceMatcher;

    use crate::support::{geometry, write_frame_file};

    fn file_matcher(
        dir: &std::path::Path,
        a: &[i64],
        b: &[i64],
        tolerance_ns: u64,
    ) -> CoincidenceMatcher<
        FrameCursor<std::io::BufReader<std::fs::File>>,
        FrameCursor<std::io::BufReader<std::fs::File>>,
    > {
        let path_a = dir.join("start_t.dp_ph16.bpp_2.dome_0.module_1.seqno_0.pff");
        let path_b = dir.join("start_t.dp_ph16.bpp_2.dome_0.module_254.seqno_0.pff");
        write_frame_file(&path_a, StreamLabel::A, a);
        write_frame_file(&path_b, StreamLabel::B, b);

        let basis = TimestampBasis::Receive;
        CoincidenceMatcher::new(
            MatcherConfig {
                max_time_diff_ns: tolerance_ns,
                basis,
            },
            FrameCursor::open(&path_a, StreamLabel::A, geometry(), basis).unwrap(),
            FrameCursor::open(&path_b, StreamLabel::B, geometry(), basis).unwrap(),
        )
    }

    /// Concrete scenario: A=[100,200,300], B=[105,250,301], T=10
    #[test]
    fn three_frame_scenario_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = file_matcher(dir.path(), &[100, 200, 300], &[105, 250, 301], 10)
            .run()
            .unwrap();

        let keys: Vec<(u64, u64)> = outcome.pairs.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec![(0, 0), (2, 2)]);
    }

    /// Concrete scenario: A=[1000], B=[900,950,1010,1100], T=60
    #[test]
    fn cluster_scenario_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = file_matcher(dir.path(), &[1000], &[900, 950, 1010, 1100], 60)
            .run()
            .unwrap();

        let keys: Vec<(u64, u64)> = outcome.pairs.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec![(0, 1), (0, 2)]);
    }

    /// Concrete scenario: duplicated stream-B content flags each re-observation once
    #[test]
    fn duplicated_b_content_is_flagged_not_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.pff");
        let path_b = dir.path().join("b.pff");

        write_frame_file(&path_a, StreamLabel::A, &[100, 150]);

        // the same two-frame file concatenated twice: indices advance but
        // packet identities repeat
        let once = dir.path().join("b_once.pff");
        write_frame_file(&once, StreamLabel::B, &[100, 150]);
        let single = std::fs::read(&once).unwrap();
        let mut doubled = single.clone();
        doubled.extend_from_slice(&single);
        std::fs::write(&path_b, doubled).unwrap();

        let basis = TimestampBasis::Receive;
        let matcher = CoincidenceMatcher::new(
            MatcherConfig {
                max_time_diff_ns: 60,
                basis,
            },
            FrameCursor::open(&path_a, StreamLabel::A, geometry(), basis).unwrap(),
            FrameCursor::open(&path_b, StreamLabel::B, geometry(), basis).unwrap(),
        );
        let outcome = matcher.run().unwrap();

        // every (A, B) combination is within 60ns: 2 x 4 pairs total,
        // half of them re-observations of the first half
        assert_eq!(outcome.report.pairs, 8);
        assert_eq!(outcome.report.duplicate_pairs, 4);
        // the concatenation itself violates the ordering invariant once
        assert_eq!(outcome.report.ordering_violations_b, 1);
    }

    /// Full path: files -> matcher -> CSV and JSON sinks
    #[test]
    fn records_reach_configured_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = file_matcher(dir.path(), &[100, 200, 300], &[105, 250, 301], 10)
            .run()
            .unwrap();

        let csv_path = dir.path().join("pairs.csv");
        let json_path = dir.path().join("pairs.json");
        let configs = vec![
            SinkConfig {
                name: "csv".into(),
                sink_type: SinkType::Csv,
                params: HashMap::from([("path".to_string(), csv_path.display().to_string())]),
            },
            SinkConfig {
                name: "json".into(),
                sink_type: SinkType::Json,
                params: HashMap::from([("path".to_string(), json_path.display().to_string())]),
            },
        ];

        let mut pair_dispatcher = PairDispatcher::from_configs(&configs).unwrap();
        for record in outcome.sorted_records() {
            pair_dispatcher.dispatch(&record).unwrap();
        }
        pair_dispatcher.close().unwrap();

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(csv.lines().count(), 3, "header + two pairs");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["pair_count"], 2);
        assert_eq!(json["pairs"][0]["a_index"], 0);
        assert_eq!(json["pairs"][1]["diff_ns"], -1);
    }

    /// The cursor round-trips payload pixel data intact
    #[test]
    fn payload_survives_the_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pff");
        write_frame_file(&path, StreamLabel::A, &[42]);

        let basis = TimestampBasis::Receive;
        let mut cursor = FrameCursor::open(&path, StreamLabel::A, geometry(), basis).unwrap();
        let frame = cursor.pull().unwrap().unwrap();

        let expected: Vec<u16> = (0..geometry().pixel_count() as u16).collect();
        assert_eq!(frame.payload.pixels(), expected);
    }
}

#[cfg(test)]
mod corruption_tests {
    use contracts::{CoreError, FrameSource, MatcherConfig, StreamLabel, TimestampBasis};
    use ingestion::FrameCursor;
    use match_engine::CoincidenceMatcher;

    use crate::support::{geometry, write_frame_file};

    /// A truncated record mid-file aborts the run as corruption, not EOF
    #[test]
    fn truncated_stream_b_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.pff");
        let path_b = dir.path().join("b.pff");

        write_frame_file(&path_a, StreamLabel::A, &[100, 200, 300]);
        write_frame_file(&path_b, StreamLabel::B, &[100, 200, 300]);

        // chop the last record's payload short
        let bytes = std::fs::read(&path_b).unwrap();
        std::fs::write(&path_b, &bytes[..bytes.len() - 5]).unwrap();

        let basis = TimestampBasis::Receive;
        let matcher = CoincidenceMatcher::new(
            MatcherConfig {
                max_time_diff_ns: 10,
                basis,
            },
            FrameCursor::open(&path_a, StreamLabel::A, geometry(), basis).unwrap(),
            FrameCursor::open(&path_b, StreamLabel::B, geometry(), basis).unwrap(),
        );

        let err = matcher.run().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Decode {
                stream: StreamLabel::B,
                ..
            }
        ));
    }

    /// Clean EOF is never reported as corruption
    #[test]
    fn clean_files_never_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pff");
        write_frame_file(&path, StreamLabel::A, &[1, 2, 3]);

        let basis = TimestampBasis::Receive;
        let mut cursor = FrameCursor::open(&path, StreamLabel::A, geometry(), basis).unwrap();
        let mut count = 0;
        while cursor.pull().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    /// Garbage at offset 0 is a decode error on the very first pull
    #[test]
    fn garbage_file_fails_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.pff");
        std::fs::write(&path, b"not a frame file at all").unwrap();

        let basis = TimestampBasis::Receive;
        let mut cursor = FrameCursor::open(&path, StreamLabel::A, geometry(), basis).unwrap();
        assert!(matches!(
            cursor.pull().unwrap_err(),
            CoreError::Decode { frame_index: 0, .. }
        ));
    }
}

#[cfg(test)]
mod observability_tests {
    use contracts::{MatcherConfig, StreamLabel, TimestampBasis};
    use ingestion::MemoryFrameSource;
    use match_engine::CoincidenceMatcher;
    use observability::MatchMetricsAggregator;

    /// The aggregator's summary reflects a real run end to end
    #[test]
    fn aggregator_summarizes_a_run() {
        let matcher = CoincidenceMatcher::new(
            MatcherConfig {
                max_time_diff_ns: 10,
                basis: TimestampBasis::Receive,
            },
            MemoryFrameSource::from_timestamps(StreamLabel::A, &[100, 200, 300]),
            MemoryFrameSource::from_timestamps(StreamLabel::B, &[105, 250, 301]),
        );
        let outcome = matcher.run().unwrap();

        let mut aggregator = MatchMetricsAggregator::new();
        for record in outcome.records() {
            aggregator.update(&record);
        }
        aggregator.finalize(outcome.report);

        let summary = aggregator.summary();
        assert_eq!(summary.total_pairs, 2);
        assert_eq!(summary.frames_read_a, 3);
        // |diffs| are 5 and 1
        assert!((summary.abs_diff_ns.max - 5.0).abs() < 1e-10);
        assert!((summary.abs_diff_ns.mean - 3.0).abs() < 1e-10);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};

    /// A realistic full configuration loads and validates
    #[test]
    fn full_config_round_trip() {
        let content = r#"
[streams.a]
path = "start_2022-07-21T06_03_03Z.dp_ph16.bpp_2.dome_0.module_254.seqno_0.pff"

[streams.b]
path = "start_2022-07-21T06_03_03Z.dp_ph16.bpp_2.dome_0.module_1.seqno_0.pff"

[match]
max_time_diff_ns = 100
timestamp_basis = "receive"

[payload]
side = 16
bytes_per_pixel = 2

[[sinks]]
name = "console"
sink_type = "log"

[[sinks]]
name = "table"
sink_type = "csv"
[sinks.params]
path = "pairs.csv"
"#;
        let blueprint = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.sinks.len(), 2);

        let matcher_config = blueprint.to_matcher_config();
        assert_eq!(matcher_config.max_time_diff_ns, 100);
    }
}
