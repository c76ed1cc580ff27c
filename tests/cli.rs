// Integration tests for the xptest binary: file and URL sources, flags, and abort paths.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn xptest_cmd() -> Command {
    Command::cargo_bin("xptest").unwrap()
}

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Test Page</title></head>
<body>
<a href="/first">First</a>
<a href="/second">Second</a>
</body>
</html>"#;

#[test]
fn query_html_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("page.html");
    fs::write(&path, PAGE).unwrap();

    xptest_cmd()
        .arg(&path)
        .arg("//a")
        .assert()
        .success()
        .stdout(
            "<a href=\"/first\">First</a>\n<a href=\"/second\">Second</a>\n\nShowing 2 results for \"//a\".\n",
        );
}

#[test]
fn zero_matches_prints_only_summary() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("page.html");
    fs::write(&path, PAGE).unwrap();

    xptest_cmd()
        .arg("--file")
        .arg(&path)
        .arg("//table")
        .assert()
        .success()
        .stdout("\nShowing 0 results for \"//table\".\n");
}

#[test]
fn query_xml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0"?><catalog><book id="b1"/><book id="b2"/></catalog>"#,
    )
    .unwrap();

    xptest_cmd()
        .arg("-x")
        .arg(&path)
        .arg("//book/@id")
        .assert()
        .success()
        .stdout("id=\"b1\"\nid=\"b2\"\n\nShowing 2 results for \"//book/@id\".\n");
}

#[test]
fn namespace_flag_binds_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("feed.xml");
    fs::write(
        &path,
        r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>T</title></feed>"#,
    )
    .unwrap();

    xptest_cmd()
        .args(["--xml", "-n", "atom=http://www.w3.org/2005/Atom"])
        .arg(&path)
        .arg("/atom:feed/atom:title/text()")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("T\n"))
        .stdout(predicate::str::contains("Showing 1 results"));
}

#[test]
fn xhtml_file_with_doctype() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("page.xhtml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>X</title></head></html>"#,
    )
    .unwrap();

    xptest_cmd()
        .args(["-x", "-n", "h=http://www.w3.org/1999/xhtml"])
        .arg(&path)
        .arg("//h:title/text()")
        .assert()
        .success()
        .stdout("X\n\nShowing 1 results for \"//h:title/text()\".\n");
}

#[test]
fn xml_file_with_byte_order_mark() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bom.xml");
    fs::write(&path, b"\xEF\xBB\xBF<?xml version=\"1.0\"?><list><i>1</i></list>").unwrap();

    xptest_cmd()
        .arg("-x")
        .arg(&path)
        .arg("/list/i")
        .assert()
        .success()
        .stdout("<i>1</i>\n\nShowing 1 results for \"/list/i\".\n");
}

#[test]
fn latin1_xml_file_is_decoded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("latin1.xml");
    fs::write(
        &path,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><menu><item>caf\xE9</item></menu>",
    )
    .unwrap();

    xptest_cmd()
        .arg("-x")
        .arg(&path)
        .arg("//item/text()")
        .assert()
        .success()
        .stdout("caf\u{e9}\n\nShowing 1 results for \"//item/text()\".\n");
}

#[test]
fn deeply_nested_html_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("deep.html");
    let depth = 20_000;
    fs::write(
        &path,
        format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth)),
    )
    .unwrap();

    xptest_cmd()
        .arg(&path)
        .arg("/html/body/div")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("\n\nShowing 1 results for \"/html/body/div\".\n"));
}

#[test]
fn url_charset_header_is_honoured() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/latin1");
        then.status(200)
            .header("content-type", "text/html; charset=iso-8859-1")
            .body(b"<p>caf\xE9</p>".to_vec());
    });

    xptest_cmd()
        .arg(server.url("/latin1"))
        .arg("//p/text()")
        .assert()
        .success()
        .stdout("caf\u{e9}\n\nShowing 1 results for \"//p/text()\".\n");
}

#[test]
fn url_source_is_fetched_with_user_agent_shortcut() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/page")
            .header("user-agent", xptest::resolve_user_agent("googlebot"));
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    xptest_cmd()
        .args(["-a", "GOOGLEBOT"])
        .arg(server.url("/page"))
        .arg("//title")
        .assert()
        .success()
        .stdout("<title>Test Page</title>\n\nShowing 1 results for \"//title\".\n");

    mock.assert();
}

#[test]
fn verbose_diagnostics_go_to_stderr() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v");
        then.status(200)
            .header("content-type", "text/html")
            .body("<p>x</p>");
    });

    xptest_cmd()
        .arg("-v")
        .arg(server.url("/v"))
        .arg("//p")
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1 results"))
        .stderr(predicate::str::contains("Opening"))
        .stderr(predicate::str::contains("text/html"));
}

#[test]
fn extra_verbose_dumps_raw_content() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/raw");
        then.status(200).body("<p>raw-marker</p>");
    });

    xptest_cmd()
        .arg("-w")
        .arg(server.url("/raw"))
        .arg("//p")
        .assert()
        .success()
        .stderr(predicate::str::contains("<p>raw-marker</p>"));
}

#[test]
fn missing_source_aborts() {
    xptest_cmd()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Please specify an input file"));
}

#[test]
fn missing_query_aborts() {
    xptest_cmd()
        .arg("https://example.invalid/")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Please specify a query"));
}

#[test]
fn empty_file_aborts_citing_mode() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.html");
    fs::write(&path, "").unwrap();

    xptest_cmd()
        .arg(&path)
        .arg("//a")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Specified file had no content"));
}

#[test]
fn http_error_status_aborts() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    xptest_cmd()
        .arg("--url")
        .arg(server.url("/gone"))
        .arg("//a")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("HTTP 404"));
}

#[test]
fn malformed_query_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("page.html");
    fs::write(&path, PAGE).unwrap();

    xptest_cmd()
        .arg(&path)
        .arg("//a[")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::is_empty());
}

#[test]
fn help_exits_successfully() {
    xptest_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--extra-verbose"))
        .stdout(predicate::str::contains("--user-agent"))
        .stdout(predicate::str::contains("iphone"));
}

#[test]
fn help_bypasses_missing_arguments() {
    xptest_cmd()
        .args(["-h", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}
