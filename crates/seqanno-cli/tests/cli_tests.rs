//! End-to-end CLI tests driving the seqanno binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_taxonomy(dir: &std::path::Path) {
    std::fs::write(
        dir.join("nodes.dmp"),
        "1\t|\t1\t|\tno rank\t|\n9605\t|\t1\t|\tgenus\t|\n9606\t|\t9605\t|\tspecies\t|\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("names.dmp"),
        "1\t|\troot\t|\t\t|\tscientific name\t|\n\
         9605\t|\tHomo\t|\t\t|\tscientific name\t|\n\
         9606\t|\tHomo sapiens\t|\t\t|\tscientific name\t|\n\
         9606\t|\thuman\t|\t\t|\tgenbank common name\t|\n",
    )
    .unwrap();
    std::fs::write(dir.join("merged.dmp"), "63221\t|\t9606\t|\n").unwrap();
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("seqanno")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("annotate"))
        .stdout(predicate::str::contains("taxon"));
}

#[test]
fn annotate_writes_report_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let taxonomy_dir = dir.path().join("taxonomy");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&taxonomy_dir).unwrap();
    write_taxonomy(&taxonomy_dir);

    let record_path = dir.path().join("1abc.json");
    std::fs::write(
        &record_path,
        r#"{
            "entry_id": "1ABC",
            "entities": [ { "id": "1", "entity_type": "polymer" } ],
            "reference_alignments": [
                { "entity_id": "1", "database_name": "UNP",
                  "database_accession": "P01901",
                  "entity_beg": 1, "entity_end": 120, "database_beg": 22 }
            ],
            "natural_sources": [
                { "entity_id": "1", "taxonomy_id": "9606" }
            ]
        }"#,
    )
    .unwrap();

    Command::cargo_bin("seqanno")
        .unwrap()
        .arg("annotate")
        .arg(&record_path)
        .arg("--taxonomy")
        .arg(&taxonomy_dir)
        .arg("--output")
        .arg(&output_dir)
        .assert()
        .success();

    let report = std::fs::read_to_string(output_dir.join("1ABC.json")).unwrap();
    assert!(report.contains("P01901"));
    assert!(report.contains("\"taxonomy_id\":9606"));

    let summary = std::fs::read_to_string(output_dir.join("run-summary.json")).unwrap();
    assert!(summary.contains("\"records_processed\": 1"));
    assert!(summary.contains("\"records_failed\": 0"));
}

#[test]
fn annotate_skips_unreadable_record_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let taxonomy_dir = dir.path().join("taxonomy");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&taxonomy_dir).unwrap();
    write_taxonomy(&taxonomy_dir);

    let bad_path = dir.path().join("broken.json");
    std::fs::write(&bad_path, "not json at all").unwrap();

    Command::cargo_bin("seqanno")
        .unwrap()
        .arg("annotate")
        .arg(&bad_path)
        .arg("--taxonomy")
        .arg(&taxonomy_dir)
        .arg("--output")
        .arg(&output_dir)
        .assert()
        .success();

    let summary = std::fs::read_to_string(output_dir.join("run-summary.json")).unwrap();
    assert!(summary.contains("\"records_failed\": 1"));
}

#[test]
fn taxon_resolves_merged_identifier() {
    let dir = tempfile::tempdir().unwrap();
    write_taxonomy(dir.path());

    Command::cargo_bin("seqanno")
        .unwrap()
        .arg("taxon")
        .arg("63221")
        .arg("--taxonomy")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("merged into 9606"))
        .stdout(predicate::str::contains("Homo sapiens"));
}

#[test]
fn taxon_unknown_identifier_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_taxonomy(dir.path());

    Command::cargo_bin("seqanno")
        .unwrap()
        .arg("taxon")
        .arg("424242")
        .arg("--taxonomy")
        .arg(dir.path())
        .assert()
        .failure();
}
