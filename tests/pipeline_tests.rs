//! End-to-end tests: tool exports on disk → normalized tables → scores → CSV.

use std::collections::HashMap;
use std::path::Path;

use essay_scorer::{
    import_gamet, import_readerbench, merge_on_id, pipeline, Config, IdRule, Mode, ScoreError,
    Table, Value,
};

const READERBENCH: &str = "SEP=,\n\
File name,Words,Sentences,AvgWordsList_joy\n\
essay_03,300,15,0.1\n\
essay_01,100,5,0.2\n\
essay_02,200,10,NaN\n";

const GAMET: &str = "filename,error_count,word_count,grammar,misspelling\n\
C:\\essays\\essay_02.txt,4,200,2,2\n\
C:\\essays\\essay_03.txt,6,300,3,3\n\
C:\\essays\\essay_04.txt,1,50,1,0\n";

const COHMETRIX: &str = "TextID,DESWC,LDTTRc\n\
C:\\essays\\essay_02.txt,200,0.5\n\
C:\\essays\\essay_01.txt,100,0.7\n";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn linear(dir: &Path, name: &str, intercept: f64, coefs: &[(&str, f64)]) {
    let coefficients: serde_json::Map<String, serde_json::Value> = coefs
        .iter()
        .map(|(f, c)| (f.to_string(), serde_json::json!(c)))
        .collect();
    let json = serde_json::json!({
        "kind": "linear",
        "intercept": intercept,
        "coefficients": coefficients,
    });
    std::fs::write(dir.join(format!("{name}.json")), json.to_string()).unwrap();
}

fn ids(table: &Table) -> Vec<&str> {
    table.rows.iter().filter_map(Table::id_of).collect()
}

#[test]
fn merged_tables_keep_only_essays_in_both_exports() {
    let dir = tempfile::tempdir().unwrap();
    let rb = import_readerbench(&write(dir.path(), "rb.csv", READERBENCH)).unwrap();
    let gm = import_gamet(&write(dir.path(), "gamet.csv", GAMET), IdRule::Backslash).unwrap();

    assert_eq!(ids(&rb), vec!["essay_01", "essay_02", "essay_03"]);
    assert_eq!(ids(&gm), vec!["essay_02", "essay_03", "essay_04"]);

    let merged = merge_on_id(&rb, &gm).unwrap();
    assert_eq!(ids(&merged), vec!["essay_02", "essay_03"]);
    for col in ["Words", "Sentences", "word_count", "per_gram", "per_misspell"] {
        assert!(merged.has_column(col), "missing {col}");
    }
    assert!(!merged.has_column("AvgWordsList_joy"));
    assert_eq!(merged.rows[0]["per_gram"], Value::Number(0.01));
}

#[test]
fn cws_ciws_pipeline_scores_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let models = dir.path().join("models");
    std::fs::create_dir(&models).unwrap();
    linear(&models, "cws_model_a", 0.0, &[("Words", 0.1)]);
    linear(&models, "cws_model_b", 10.0, &[("Words", 0.1)]);
    linear(&models, "ciws_model_a", 0.0, &[("word_count", 0.01)]);
    linear(&models, "ciws_model_b", 0.0, &[("per_gram", 100.0)]);

    let rb = write(dir.path(), "rb.csv", READERBENCH);
    let gm = write(dir.path(), "gamet.csv", GAMET);
    let out = dir.path().join("scores.csv");
    let config = Config::default().with_model_dir(&models);

    let scores = pipeline::cws_ciws_from_files(&rb, &gm, &config, Some(out.as_path())).unwrap();
    assert_eq!(scores.columns, vec!["ID", "predicted_cws", "predicted_ciws"]);
    assert_eq!(ids(&scores), vec!["essay_02", "essay_03"]);
    // essay_02: cws = (20 + 30) / 2, ciws = (2 + 1) / 2
    assert_eq!(scores.rows[0]["predicted_cws"], Value::Number(25.0));
    assert_eq!(scores.rows[0]["predicted_ciws"], Value::Number(1.5));

    // A generic CSV reader recovers the same ID → score mapping.
    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "ID");
    assert_eq!(&headers[1], "predicted_cws");
    assert_eq!(&headers[2], "predicted_ciws");
    assert!(headers.iter().any(|h| h == "per_misspell"));

    let exported: HashMap<String, (f64, f64)> = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), (r[1].parse().unwrap(), r[2].parse().unwrap()))
        })
        .collect();
    assert_eq!(exported.len(), scores.len());
    for row in &scores.rows {
        let id = Table::id_of(row).unwrap();
        let (cws, ciws) = exported[id];
        assert_eq!(Value::Number(cws), row["predicted_cws"]);
        assert_eq!(Value::Number(ciws), row["predicted_ciws"]);
    }
}

#[test]
fn cohmetrix_quality_with_a_custom_registry() {
    let dir = tempfile::tempdir().unwrap();
    linear(dir.path(), "cm_small", 1.0, &[("LDTTRc", 2.0)]);
    linear(dir.path(), "cm_large", 0.0, &[("DESWC", 0.01)]);

    let config = Config::from_json(&format!(
        r#"{{
            "model_dir": {dir:?},
            "registry": {{"holistic-quality-from-cohmetrix": [
                {{"column": "predicted_quality", "models": ["cm_small", "cm_large"]}}
            ]}}
        }}"#,
        dir = dir.path().display().to_string()
    ))
    .unwrap();

    let cm = write(dir.path(), "cm.csv", COHMETRIX);
    let scores = pipeline::quality_from_cohmetrix(&cm, &config, None).unwrap();
    assert_eq!(ids(&scores), vec!["essay_01", "essay_02"]);
    // essay_01: (1 + 1.4 + 1.0) / 2
    assert_eq!(scores.rows[0]["predicted_quality"], Value::Number(1.7));
}

#[test]
fn schema_mismatch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    for slot in ["a", "b", "c", "d", "e", "f"] {
        linear(dir.path(), &format!("rb_model_{slot}"), 0.0, &[("WordEntropy", 1.0)]);
    }
    let rb = write(dir.path(), "rb.csv", READERBENCH);
    let out = dir.path().join("never.csv");
    let config = Config::default().with_model_dir(dir.path());

    let err = pipeline::quality_from_readerbench(&rb, &config, Some(out.as_path())).unwrap_err();
    assert!(matches!(err, ScoreError::SchemaMismatch { ref missing, .. }
        if missing == &vec!["WordEntropy".to_string()]));
    assert!(!out.exists());
}

#[test]
fn unknown_mode_strings_are_rejected() {
    assert!(matches!(
        "quality-from-gamet".parse::<Mode>(),
        Err(ScoreError::UnknownMode(_))
    ));
}
