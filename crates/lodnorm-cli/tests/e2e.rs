//! End-to-end tests for the lodnorm CLI.
//!
//! Tests invoke the `lodnorm` binary as a subprocess against authority
//! configs and response graphs written into a temp directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const FAST_YAML: &str = r#"
name: OCLC_FAST
prefixes:
  skos: "http://www.w3.org/2004/02/skos/core#"
search:
  url:
    template: "http://experimental.worldcat.org/fast/search?query={?query}&maximumRecords={?maxRecords}"
    mapping:
      - variable: query
        required: true
      - variable: maxRecords
        default: "20"
  subauthorities:
    personal_name: "oclc.personalName"
  results:
    required:
      label: "skos:prefLabel"
    optional:
      id: "http://purl.org/dc/terms/identifier"
      sort: "http://example.org/usage"
term:
  url:
    template: "http://id.worldcat.org/fast/{?term_id}"
    mapping:
      - variable: term_id
        required: true
  subject_prefix: "http://id.worldcat.org/fast/"
  results:
    required:
      label: "skos:prefLabel"
    optional:
      id: "http://purl.org/dc/terms/identifier"
"#;

const MILK_YAML: &str = r#"
name: LOD_MILK
prefixes:
  skos: "http://www.w3.org/2004/02/skos/core#"
search:
  url:
    template: "http://example.org/milk?q={?query}&lang={?lang}"
    mapping:
      - variable: query
        required: true
      - variable: lang
  results:
    required:
      label: "skos:prefLabel"
    optional:
      altlabel: "skos:altLabel"
"#;

const FAST_GRAPH: &str = r#"
<http://id.worldcat.org/fast/5140> <http://www.w3.org/2004/02/skos/core#prefLabel> "Cornell, Joseph" .
<http://id.worldcat.org/fast/5140> <http://purl.org/dc/terms/identifier> "5140" .
<http://id.worldcat.org/fast/5140> <http://example.org/usage> "2" .
<http://id.worldcat.org/fast/557490> <http://www.w3.org/2004/02/skos/core#prefLabel> "New York State School of Industrial and Labor Relations" .
<http://id.worldcat.org/fast/557490> <http://purl.org/dc/terms/identifier> "557490" .
<http://id.worldcat.org/fast/557490> <http://example.org/usage> "3" .
<http://id.worldcat.org/fast/530369> <http://www.w3.org/2004/02/skos/core#prefLabel> "Cornell University" .
<http://id.worldcat.org/fast/530369> <http://purl.org/dc/terms/identifier> "530369" .
<http://id.worldcat.org/fast/530369> <http://example.org/usage> "1" .
_:b0 <http://www.w3.org/2004/02/skos/core#prefLabel> "anonymous" .
"#;

const MILK_GRAPH: &str = r#"
<http://aims.fao.org/aos/agrovoc/c_9513> <http://www.w3.org/2004/02/skos/core#prefLabel> "buttermilk"@en .
<http://aims.fao.org/aos/agrovoc/c_9513> <http://www.w3.org/2004/02/skos/core#prefLabel> "Babeurre"@fr .
<http://aims.fao.org/aos/agrovoc/c_9513> <http://www.w3.org/2004/02/skos/core#altLabel> "yummy"@en .
<http://aims.fao.org/aos/agrovoc/c_9513> <http://www.w3.org/2004/02/skos/core#altLabel> "délicieux"@fr .
"#;

fn lodnorm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lodnorm"))
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let authorities = dir.path().join("authorities");
    std::fs::create_dir(&authorities).unwrap();
    std::fs::write(authorities.join("oclc_fast.yml"), FAST_YAML).unwrap();
    std::fs::write(authorities.join("lod_milk.yaml"), MILK_YAML).unwrap();
    std::fs::write(dir.path().join("fast.nt"), FAST_GRAPH).unwrap();
    std::fs::write(dir.path().join("milk.nt"), MILK_GRAPH).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    lodnorm()
        .current_dir(dir)
        .args(["--authorities", "authorities"])
        .args(args)
        .output()
        .unwrap()
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "lodnorm {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn labels(results: &serde_json::Value) -> Vec<&str> {
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect()
}

#[test]
fn e2e_search_ranks_by_usage() {
    let dir = workspace();
    let results = run_json(dir.path(), &["search", "OCLC_FAST", "cornell", "--graph", "fast.nt"]);
    assert_eq!(
        labels(&results),
        vec![
            "Cornell University",
            "Cornell, Joseph",
            "New York State School of Industrial and Labor Relations"
        ]
    );
    assert_eq!(
        results[0],
        serde_json::json!({
            "uri": "http://id.worldcat.org/fast/530369",
            "id": "530369",
            "label": "Cornell University"
        })
    );
}

#[test]
fn e2e_authority_names_are_case_insensitive() {
    let dir = workspace();
    let results = run_json(dir.path(), &["search", "oclc_fast", "cornell", "--graph", "fast.nt"]);
    assert_eq!(results.as_array().unwrap().len(), 3);
}

#[test]
fn e2e_search_language_precedence() {
    let dir = workspace();
    let unfiltered = run_json(dir.path(), &["search", "LOD_MILK", "milk", "--graph", "milk.nt"]);
    assert_eq!(labels(&unfiltered), vec!["[buttermilk, Babeurre] (yummy, délicieux)"]);

    let default_en = run_json(
        dir.path(),
        &["search", "LOD_MILK", "milk", "--graph", "milk.nt", "--default-language", "en"],
    );
    assert_eq!(labels(&default_en), vec!["buttermilk (yummy)"]);

    let explicit_fr = run_json(
        dir.path(),
        &[
            "search", "LOD_MILK", "milk", "--graph", "milk.nt", "--default-language", "en", "--lang", "fr",
        ],
    );
    assert_eq!(labels(&explicit_fr), vec!["Babeurre (délicieux)"]);
}

#[test]
fn e2e_settings_file_supplies_default_language() {
    let dir = workspace();
    std::fs::write(dir.path().join("lodnorm.toml"), "default_language = [\"fr\"]\n").unwrap();
    let results = run_json(
        dir.path(),
        &["--settings", "lodnorm.toml", "search", "LOD_MILK", "milk", "--graph", "milk.nt"],
    );
    assert_eq!(labels(&results), vec!["Babeurre (délicieux)"]);
}

#[test]
fn e2e_search_reads_graph_from_stdin() {
    let dir = workspace();
    let mut child = lodnorm()
        .current_dir(dir.path())
        .args(["--authorities", "authorities", "search", "LOD_MILK", "milk", "--graph", "-", "--lang", "en"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(MILK_GRAPH.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(labels(&results), vec!["buttermilk (yummy)"]);
}

#[test]
fn e2e_search_with_no_matches_is_empty() {
    let dir = workspace();
    std::fs::write(dir.path().join("empty.nt"), "# nothing found\n").unwrap();
    let results = run_json(dir.path(), &["search", "OCLC_FAST", "zzz", "--graph", "empty.nt"]);
    assert_eq!(results, serde_json::json!([]));
}

#[test]
fn e2e_search_logs_request_url_to_stderr() {
    let dir = workspace();
    let output = run(
        dir.path(),
        &["search", "OCLC_FAST", "cornell univ", "--graph", "fast.nt", "--replace", "maxRecords=5"],
    );
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("http://experimental.worldcat.org/fast/search?query=cornell%20univ&maximumRecords=5"),
        "stderr: {stderr}"
    );
    serde_json::from_slice::<serde_json::Value>(&output.stdout).unwrap();
}

#[test]
fn e2e_search_context_override() {
    let dir = workspace();
    let graph = format!(
        "{FAST_GRAPH}<http://id.worldcat.org/fast/5140> <http://schema.org/birthPlace> <http://x.org/nyack> .\n\
         <http://x.org/nyack> <http://www.w3.org/2004/02/skos/core#prefLabel> \"Nyack\" .\n"
    );
    std::fs::write(dir.path().join("context.nt"), graph).unwrap();
    let results = run_json(
        dir.path(),
        &[
            "search",
            "OCLC_FAST",
            "cornell",
            "--graph",
            "context.nt",
            "--context",
            "birth_place=http://schema.org/birthPlace",
        ],
    );
    let joseph = &results[1];
    assert_eq!(joseph["label"], "Cornell, Joseph");
    assert_eq!(
        joseph["context"]["birth_place"],
        serde_json::json!([{ "uri": "http://x.org/nyack", "id": "http://x.org/nyack", "label": "Nyack" }])
    );
    assert_eq!(results[0]["context"]["birth_place"], serde_json::json!([]));
}

#[test]
fn e2e_search_table_format() {
    let dir = workspace();
    let output = run(
        dir.path(),
        &["--format", "table", "search", "OCLC_FAST", "cornell", "--graph", "fast.nt"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("uri"));
    assert!(lines[2].contains("Cornell University"));
}

#[test]
fn e2e_find_returns_term_record() {
    let dir = workspace();
    let term = run_json(dir.path(), &["find", "OCLC_FAST", "530369", "--graph", "fast.nt"]);
    assert_eq!(term["uri"], "http://id.worldcat.org/fast/530369");
    assert_eq!(term["id"], "530369");
    assert_eq!(term["label"], serde_json::json!(["Cornell University"]));
    assert_eq!(term["altlabel"], serde_json::json!([]));
    assert_eq!(
        term["predicates"]["http://example.org/usage"],
        serde_json::json!(["1"])
    );
    assert!(term.get("sameas").is_none());
}

#[test]
fn e2e_find_missing_term_reports_request_url() {
    let dir = workspace();
    let output = run(dir.path(), &["find", "OCLC_FAST", "999", "--graph", "fast.nt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("http://id.worldcat.org/fast/999 Not Found - Term may not exist at LOD Authority."),
        "stderr: {stderr}"
    );
}

#[test]
fn e2e_find_without_term_section_fails() {
    let dir = workspace();
    let output = run(dir.path(), &["find", "LOD_MILK", "c_9513", "--graph", "milk.nt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no term configuration"));
}

#[test]
fn e2e_unknown_authority_and_subauthority_fail() {
    let dir = workspace();
    let output = run(dir.path(), &["search", "NOPE", "x", "--graph", "fast.nt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NOPE"));

    let output = run(
        dir.path(),
        &["search", "OCLC_FAST", "x", "--graph", "fast.nt", "--subauth", "topical"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("topical"));

    let results = run_json(
        dir.path(),
        &["search", "OCLC_FAST", "x", "--graph", "fast.nt", "--subauth", "personal_name"],
    );
    assert_eq!(results.as_array().unwrap().len(), 3);
}

#[test]
fn e2e_malformed_graph_fails() {
    let dir = workspace();
    std::fs::write(dir.path().join("bad.nt"), "<http://x.org/a> <http://x.org/p> \"open .\n").unwrap();
    let output = run(dir.path(), &["search", "OCLC_FAST", "x", "--graph", "bad.nt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.nt"));
}

#[test]
fn e2e_authorities_lists_configs() {
    let dir = workspace();
    let list = run_json(dir.path(), &["authorities"]);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["LOD_MILK", "OCLC_FAST"]);
    assert_eq!(list[1]["term"], true);
    assert_eq!(list[0]["term"], false);
    assert_eq!(list[1]["subauthorities"], serde_json::json!(["personal_name"]));
}

#[test]
fn e2e_missing_authority_directory_fails() {
    let dir = TempDir::new().unwrap();
    let output = lodnorm()
        .current_dir(dir.path())
        .args(["--authorities", "nowhere", "authorities"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn e2e_completions_generate_script() {
    let output = lodnorm().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("lodnorm"));
}
