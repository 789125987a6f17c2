use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn markball() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("markball"))
}

fn codes(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|v| v["errors"][0]["code"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn render_reads_stdin() {
    let assert = markball()
        .arg("render")
        .arg("-")
        .write_stdin("#{head} Hi\ntext\n#{begin} a\nx\n#{end} a\n")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(
        stdout,
        "<h1>Hi</h1>text\n<pre class='fence' title='a'>x\n</pre><!-- fence a -->"
    );
}

#[test]
fn render_page_includes_fence_list() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "#{begin} one\n1\n#{end} one\n");

    markball()
        .arg("render")
        .arg(&source)
        .arg("--page")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<html><meta charset=\"utf-8\">"))
        .stdout(predicate::str::contains("1 embedded files"))
        .stdout(predicate::str::contains("href='fence-0.html'"));
}

#[test]
fn render_page_uses_custom_css() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    let css = temp.path().join("site.css");
    write_file(&source, "plain\n");
    write_file(&css, "body { margin: 0; }\n");

    markball()
        .arg("render")
        .arg(&source)
        .arg("--page")
        .arg("--css")
        .arg(&css)
        .assert()
        .success()
        .stdout(predicate::str::contains("body { margin: 0; }"))
        .stdout(predicate::str::contains("#FFE0B2").not());
}

#[test]
fn fences_lists_in_closing_order() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("nested.mb");
    write_file(
        &source,
        "#{begin} outer\n#{begin} inner\nx\n#{end} inner\n#{end} outer\n",
    );

    let assert = markball().arg("fences").arg(&source).assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let identifiers: Vec<_> = items
        .iter()
        .map(|v| v["identifier"].as_str().unwrap())
        .collect();
    assert_eq!(identifiers, vec!["inner", "outer"]);
    assert_eq!(items[0]["kind"], "fence");
    assert_eq!(items[0]["id"], 0);
    assert_eq!(items[0]["range"]["start"], 1);
    assert_eq!(items[0]["range"]["end"], 3);
    assert_eq!(items[0]["meta"]["size"], 2);
}

#[test]
fn fences_with_content_in_markdown() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "#{begin} a.txt\nhello\n#{end} a.txt\n");

    markball()
        .arg("--format")
        .arg("md")
        .arg("fences")
        .arg(&source)
        .arg("--with-content")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Fences"))
        .stdout(predicate::str::contains("`a.txt`"))
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn fence_raw_is_byte_exact() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "#{begin} crlf\r\nline 1\r\n\r\n#{end} crlf\r\n");

    let assert = markball()
        .arg("fence")
        .arg(&source)
        .arg("--name")
        .arg("crlf")
        .arg("--mode")
        .arg("raw")
        .assert()
        .success();

    assert_eq!(assert.get_output().stdout, b"line 1\r\n\r\n");
}

#[test]
fn fence_view_shows_size() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "#{begin} a\nabc\n#{end} a\n");

    markball()
        .arg("fence")
        .arg(&source)
        .arg("--id")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>File display: a.txt</h2>"))
        .stdout(predicate::str::contains("Size: 4 bytes, 1 lines."));
}

#[test]
fn fence_download_writes_file() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    let out = temp.path().join("out");
    write_file(&source, "#{begin} src/lib.rs\npub fn f() {}\n#{end} src/lib.rs\n");

    let assert = markball()
        .arg("fence")
        .arg(&source)
        .arg("--name")
        .arg("src/lib.rs")
        .arg("--mode")
        .arg("download")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("src_lib.rs.txt")).unwrap(),
        "pub fn f() {}\n"
    );

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "download");
    assert_eq!(items[0]["identifier"], "src/lib.rs");
    assert_eq!(items[0]["data"]["file_name"], "src_lib.rs.txt");
    assert_eq!(items[0]["meta"]["size"], 14);
}

#[test]
fn fence_not_found_fails() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "#{begin} a\nx\n#{end} a\n");

    markball()
        .arg("fence")
        .arg(&source)
        .arg("--name")
        .arg("missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fence not found"));

    markball()
        .arg("fence")
        .arg(&source)
        .arg("--id")
        .arg("4")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn lint_reports_pairing_errors() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("bad.mb");
    write_file(&source, "#{begin} A\nx\n#{end} B\n#{begin} open\n");

    let assert = markball()
        .arg("--no-color")
        .arg("lint")
        .arg(&source)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 errors, 0 warnings"));

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(codes(&items), vec!["FENCE_MISMATCH", "UNCLOSED_FENCE"]);
    assert!(items.iter().all(|v| v["severity"] == "error"));
}

#[test]
fn lint_strict_fails_on_errors() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("bad.mb");
    write_file(&source, "#{end} stray\n");

    markball()
        .arg("-q")
        .arg("lint")
        .arg(&source)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lint found 1 error(s)"));
}

#[test]
fn lint_walks_directories() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("docs/a.mb"), "#{begin} e\n#{end} e\n");
    write_file(&temp.path().join("docs/b.markball"), "#{begin} ok\nx\n#{end} ok\n");
    write_file(&temp.path().join("docs/skip.rs"), "#{end} ignored\n");

    let assert = markball()
        .arg("-q")
        .arg("lint")
        .arg(temp.path().join("docs"))
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(codes(&items), vec!["EMPTY_FENCE"]);
    assert!(items[0]["path"].as_str().unwrap().ends_with("docs/a.mb"));
    assert_eq!(items[0]["severity"], "warning");
}

#[test]
fn lint_reports_unreadable_source() {
    let temp = tempdir().unwrap();

    let assert = markball()
        .arg("-q")
        .arg("lint")
        .arg(temp.path().join("nope.mb"))
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(codes(&items), vec!["LOAD_FAILED"]);
}

#[test]
fn export_writes_static_site() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    let out = temp.path().join("site");
    write_file(&source, "#{begin} a\n1\n#{end} a\n#{begin} b\n2\n#{end} b\n");

    let assert = markball()
        .arg("export")
        .arg(&source)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    let paths: Vec<_> = items.iter().map(|v| v["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["fence-0.txt", "fence-1.txt"]);

    assert!(out.join("index.html").exists());
    assert!(out.join("fence-0.html").exists());
    assert_eq!(fs::read_to_string(out.join("fence-1.txt")).unwrap(), "2\n");
}

#[test]
fn remote_sources_are_rejected() {
    markball()
        .arg("render")
        .arg("https://example.org/doc.mb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load Markball source"));
}

#[test]
fn source_limits_are_enforced() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("doc.mb");
    write_file(&source, "0123456789\n");

    markball()
        .arg("--max-size")
        .arg("4")
        .arg("render")
        .arg(&source)
        .assert()
        .failure();

    let latin1 = temp.path().join("latin1.mb");
    fs::write(&latin1, b"caf\xe9\n").unwrap();

    markball()
        .arg("--strict-utf8")
        .arg("render")
        .arg(&latin1)
        .assert()
        .failure();

    markball()
        .arg("render")
        .arg(&latin1)
        .assert()
        .success()
        .stdout("caf\u{FFFD}\n");
}
