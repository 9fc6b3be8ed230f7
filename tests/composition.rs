// Composition tests: the analysis and classification pipelines end to end.
//
// These chain the loader, topic classification, chart rendering and the
// writers through the public pipeline entry points. Everything happens in
// scratch directories under the system temp dir.

use std::path::{Path, PathBuf};

use disaster_lens::charts::hashtags::top_hashtags;
use disaster_lens::charts::ChartKind;
use disaster_lens::classify::bundle::ModelBundle;
use disaster_lens::classify::model::LinearClassifier;
use disaster_lens::error::{AnalysisError, DecodeError};
use disaster_lens::pipeline::{analysis, classify};
use disaster_lens::posts::loader::load_posts;
use disaster_lens::topics::kmeans::KMeans;
use disaster_lens::topics::tfidf::TfIdfVectorizer;
use disaster_lens::topics::ClusterId;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "disaster-lens-composition-{}-{name}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_input(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("posts.json");
    std::fs::write(&path, json).unwrap();
    path
}

const CORPUS: &str = r#"[
  {"content": "Flood waters rising in Chennai, families stranded on rooftops",
   "date": "Mon Jan 01 08:00:00 +0530 2024", "like_count": 120, "retweet_count": 40,
   "hashtags": ["ChennaiFloods", "flood"], "media_url": null},
  {"content": "Rescue boats deployed to flooded Chennai neighborhoods",
   "date": "Mon Jan 01 11:30:00 +0530 2024", "like_count": 80, "retweet_count": 95,
   "hashtags": ["ChennaiFloods"], "media_url": "https://example.org/boats.jpg"},
  {"content": "Earthquake of magnitude 6.1 shakes Nepal, buildings collapsed",
   "date": "Tue Jan 02 04:10:00 +0545 2024", "like_count": 300, "retweet_count": 210,
   "hashtags": ["NepalEarthquake"], "media_url": null},
  {"content": "Aftershocks continue in Nepal after the earthquake",
   "date": "Tue Jan 02 09:00:00 +0545 2024", "like_count": 45, "retweet_count": 12,
   "hashtags": ["NepalEarthquake", null], "media_url": null},
  {"content": "Wildfire spreading near California hills, evacuations ordered",
   "date": "Wed Jan 03 15:00:00 -0800 2024", "like_count": 60, "retweet_count": 30,
   "hashtags": ["wildfire"], "media_url": null},
  {"content": "California wildfire smoke blankets the valley",
   "date": "Wed Jan 03 18:45:00 -0800 2024", "like_count": 22, "retweet_count": 5,
   "hashtags": ["wildfire", "smoke"], "media_url": null},
  {"content": "Cyclone makes landfall in Odisha with heavy rain",
   "date": "Thu Jan 04 06:00:00 +0530 2024", "like_count": 90, "retweet_count": 70,
   "hashtags": ["cyclone"], "media_url": null},
  {"content": "Odisha cyclone shelters open for coastal villagers",
   "date": "Thu Jan 04 12:00:00 +0530 2024", "like_count": 15, "retweet_count": 9,
   "hashtags": [], "media_url": null},
  {"content": "Volcano erupts in Indonesia, ash cloud grounds flights",
   "date": "Fri Jan 05 07:00:00 +0700 2024", "like_count": 70, "retweet_count": 44,
   "hashtags": ["volcano"], "media_url": null},
  {"content": "Indonesia volcano ash forces airport closure",
   "date": "Fri Jan 05 10:00:00 +0700 2024", "like_count": 33, "retweet_count": 21,
   "hashtags": ["volcano", "ash"], "media_url": null}
]"#;

// ============================================================
// Analysis: load -> topics -> charts -> files
// ============================================================

#[test]
fn full_corpus_produces_four_pages() {
    let dir = scratch_dir("full");
    let input = write_input(&dir, CORPUS);
    let plots = dir.join("plots");

    let report = analysis::run(&input, &plots, &KMeans::default()).unwrap();

    assert_eq!(report.post_count, 10);
    assert_eq!(report.model.assignments.len(), 10);
    assert_eq!(report.model.topics.len(), 5);
    assert_eq!(report.written.len(), 4);
    for kind in ChartKind::ALL {
        assert!(plots.join(kind.file_name()).is_file(), "{:?} missing", kind);
    }

    let engagement = std::fs::read_to_string(plots.join("engagement_metrics.html")).unwrap();
    assert!(engagement.contains("Top Liked<br>300"));
    assert!(engagement.contains("Top Retweeted<br>210"));

    let hashtags = std::fs::read_to_string(plots.join("hashtag_analysis.html")).unwrap();
    assert!(hashtags.contains("ChennaiFloods"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rerun_with_same_seed_is_identical() {
    let dir = scratch_dir("rerun");
    let input = write_input(&dir, CORPUS);

    let first = analysis::run(&input, &dir.join("a"), &KMeans::new(5, 7)).unwrap();
    let second = analysis::run(&input, &dir.join("b"), &KMeans::new(5, 7)).unwrap();

    assert_eq!(first.model.assignments, second.model.assignments);
    assert_eq!(first.model.topics, second.model.topics);
    for kind in ChartKind::ALL {
        let a = std::fs::read_to_string(dir.join("a").join(kind.file_name())).unwrap();
        let b = std::fs::read_to_string(dir.join("b").join(kind.file_name())).unwrap();
        assert_eq!(a, b, "{:?} differs between runs", kind);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn single_post_single_topic() {
    let dir = scratch_dir("single");
    let input = write_input(
        &dir,
        r#"[{"content": "flood help now", "date": "Mon Jan 01 00:00:00 +0000 2024",
             "like_count": 5, "retweet_count": 1, "hashtags": ["flood"], "media_url": null}]"#,
    );
    let plots = dir.join("plots");

    let report = analysis::run(&input, &plots, &KMeans::new(1, 0)).unwrap();
    assert_eq!(report.model.assignments, vec![ClusterId(0)]);

    let posts = load_posts(&input).unwrap();
    assert_eq!(top_hashtags(&posts, 10), vec![("flood".to_string(), 1)]);

    let engagement = std::fs::read_to_string(plots.join("engagement_metrics.html")).unwrap();
    assert!(engagement.contains("Top Liked<br>5"));
    assert!(engagement.contains("Top Retweeted<br>1"));

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================
// Failures leave no files behind
// ============================================================

#[test]
fn missing_content_writes_nothing() {
    let dir = scratch_dir("missing-content");
    let input = write_input(
        &dir,
        r#"[{"content": "flood"}, {"date": "Mon Jan 01 00:00:00 +0000 2024", "like_count": 1}]"#,
    );
    let plots = dir.join("plots");

    let err = analysis::run(&input, &plots, &KMeans::new(1, 0)).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingField { index: 1, .. }));
    assert!(!plots.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_corpus_is_insufficient_and_writes_nothing() {
    let dir = scratch_dir("empty");
    let input = write_input(&dir, "[]");
    let plots = dir.join("plots");

    let err = analysis::run(&input, &plots, &KMeans::new(5, 0)).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    assert!(!plots.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn fewer_posts_than_topics_is_insufficient() {
    let dir = scratch_dir("too-few");
    let input = write_input(
        &dir,
        r#"[{"content": "flood in Chennai"}, {"content": "earthquake in Nepal"}]"#,
    );
    let plots = dir.join("plots");

    let err = analysis::run(&input, &plots, &KMeans::new(5, 0)).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    assert!(!plots.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bad_date_is_decode_error_and_writes_nothing() {
    let dir = scratch_dir("bad-date");
    let input = write_input(
        &dir,
        r#"[{"content": "flood warning", "date": "yesterday"}]"#,
    );
    let plots = dir.join("plots");

    let err = analysis::run(&input, &plots, &KMeans::new(1, 0)).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Decode(DecodeError::InvalidDate { index: 0, .. })
    ));
    assert!(!plots.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn non_utf8_input_fails_before_any_output() {
    let dir = scratch_dir("non-utf8");
    let input = dir.join("posts.json");
    std::fs::write(&input, [b'[', 0xC3, b']']).unwrap();
    let plots = dir.join("plots");

    let err = analysis::run(&input, &plots, &KMeans::new(1, 0)).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Decode(DecodeError::InvalidUtf8 { .. })
    ));
    assert!(!plots.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================
// Classification: load -> predict -> write
// ============================================================

#[test]
fn classify_corpus_and_write_results() {
    let dir = scratch_dir("classify");
    let input = write_input(&dir, CORPUS);

    let vectorizer = TfIdfVectorizer::from_parts(
        vec!["earthquake".to_string(), "flood".to_string(), "volcano".to_string()],
        vec![1.0, 1.0, 1.0],
        false,
    )
    .unwrap();
    let event_type: LinearClassifier = serde_json::from_value(serde_json::json!({
        "classes": ["earthquake", "flood", "volcano"],
        "coef": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        "intercept": [0.0, 0.0, 0.0]
    }))
    .unwrap();
    let binary: LinearClassifier = serde_json::from_value(serde_json::json!({
        "classes": ["0", "1"],
        "coef": [[1.0, 1.0, 1.0]],
        "intercept": [-0.5]
    }))
    .unwrap();
    let bundle =
        ModelBundle::from_parts(vectorizer, binary.clone(), event_type, binary).unwrap();

    let posts = load_posts(&input).unwrap();
    let results = classify::classify_posts(&bundle, &posts).unwrap();
    assert_eq!(results.len(), posts.len());
    assert_eq!(results[0].event_type.as_str(), "flood");
    assert_eq!(results[2].event_type.as_str(), "earthquake");
    assert_eq!(results[8].event_type.as_str(), "volcano");
    assert_eq!(results[4].target.as_str(), "0");

    let out = dir.join("classified_posts.json");
    classify::write_classified(&out, &results).unwrap();
    let parsed: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed.len(), 10);
    assert_eq!(parsed[1]["media_url"], "https://example.org/boats.jpg");
    assert_eq!(parsed[3]["hashtags"][1], serde_json::Value::Null);

    let _ = std::fs::remove_dir_all(&dir);
}
