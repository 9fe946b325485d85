// Integration tests for `bufalo check` and `bufalo upload`.
// Run with: cargo test -p bufalo-cli --test upload_cli

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use base64::Engine;
use httpmock::prelude::*;

struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn out_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    fn workbook(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, b"PK\x03\x04 workbook").unwrap();
        path
    }

    /// `bufalo` with settings isolated in the sandbox and stdin closed.
    fn bufalo(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bufalo"));
        cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
        cmd.env("BUFALO_CONFIG", self.path().join("settings.json"));
        cmd.env_remove("BUFALO_ENDPOINT");
        cmd.env_remove("RUST_LOG");
        cmd.stdin(Stdio::null());
        cmd
    }
}

fn run(mut cmd: Command) -> Output {
    cmd.output().expect("failed to run bufalo")
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit {}, got {:?}\nstdout: {}\nstderr: {}",
        code,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ── check ───────────────────────────────────────────────────────────

#[test]
fn check_valid_workbook_exits_0() {
    let sb = Sandbox::new();
    let mut cmd = sb.bufalo();
    cmd.args(["check", "reportes/Datos Semana 10.xlsx"]);
    let output = run(cmd);

    assert_exit(&output, 0);
    assert!(stdout(&output).contains("Datos Semana 10.xlsx: valid Excel file"));
}

#[test]
fn check_other_extension_exits_3() {
    let sb = Sandbox::new();
    for name in ["ventas.csv", "ventas.XLSX", "ventas.xlsm"] {
        let mut cmd = sb.bufalo();
        cmd.args(["check", name, "--quiet"]);
        let output = run(cmd);

        assert_exit(&output, 3);
        assert!(stderr(&output).contains("not an Excel file"), "stderr: {}", stderr(&output));
    }
}

// ── upload: validation ──────────────────────────────────────────────

#[test]
fn upload_without_dates_exits_4() {
    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    // Nothing listens here; validation must stop before any request
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04"])
        .args(["--endpoint", "http://127.0.0.1:1"]);
    let output = run(cmd);

    assert_exit(&output, 4);
    assert!(
        stderr(&output).contains("Please select a file and a date range."),
        "stderr: {}",
        stderr(&output),
    );
}

#[test]
fn upload_bad_date_format_exits_2() {
    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "04/03/2024", "--to", "2024-03-10"]);
    let output = run(cmd);

    assert_exit(&output, 2);
}

#[test]
fn upload_non_spreadsheet_exits_3() {
    let sb = Sandbox::new();
    let file = sb.workbook("notas.txt");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"])
        .args(["--endpoint", "http://127.0.0.1:1"]);
    let output = run(cmd);

    assert_exit(&output, 3);
    assert!(stderr(&output).contains("notas.txt is not an Excel file"));
}

#[test]
fn upload_missing_file_exits_5() {
    let sb = Sandbox::new();
    let missing = sb.path().join("no-such.xlsx");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", missing.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"]);
    let output = run(cmd);

    assert_exit(&output, 5);
    assert!(stderr(&output).contains("cannot read"));
}

// ── upload: server replies ──────────────────────────────────────────

#[test]
fn upload_saves_decoded_workbook() {
    let payload = b"processed \x00\x01\x02 workbook".to_vec();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&payload);

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload/")
            .body_includes("name=\"start_date\"")
            .body_includes("2024-03-04")
            .body_includes("2024-03-10");
        then.status(200).json_body(serde_json::json!({
            "message": "Archivo procesado con éxito",
            "excel_file": encoded,
        }));
    });

    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"])
        .args(["--endpoint", &server.base_url()])
        .arg("--out-dir")
        .arg(sb.out_dir());
    let output = run(cmd);

    assert_exit(&output, 0);
    mock.assert();
    let saved = sb.out_dir().join("archivo_procesado.xlsx");
    assert_eq!(std::fs::read(&saved).unwrap(), payload);
    assert!(stdout(&output).contains("Saved processed file to"));
    assert!(stderr(&output).contains("Archivo procesado con éxito"));
}

#[test]
fn upload_server_error_shows_message_exits_11() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(400).json_body(serde_json::json!({ "error": "X" }));
    });

    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"])
        .args(["--endpoint", &server.base_url(), "--quiet"])
        .arg("--out-dir")
        .arg(sb.out_dir());
    let output = run(cmd);

    assert_exit(&output, 11);
    mock.assert_hits(1);
    assert!(stderr(&output).lines().any(|l| l == "error: X"), "stderr: {}", stderr(&output));
    assert!(!sb.out_dir().exists());
}

#[test]
fn upload_unreachable_server_exits_10() {
    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"])
        .args(["--endpoint", "http://127.0.0.1:1", "--quiet"]);
    let output = run(cmd);

    assert_exit(&output, 10);
    assert!(stderr(&output).contains("hint:"));
}

#[test]
fn upload_endpoint_from_environment() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(500).json_body(serde_json::json!({}));
    });

    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let mut cmd = sb.bufalo();
    cmd.env("BUFALO_ENDPOINT", server.base_url());
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10", "-q"]);
    let output = run(cmd);

    assert_exit(&output, 11);
    mock.assert();
    assert!(stderr(&output).contains("Server returned an error response"));
}

#[test]
fn upload_preview_json_contract() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(200).json_body(serde_json::json!({
            "data": [
                { "Fecha": "2024-03-04", "Ruta": "C6-001", "Pax": 310 },
                { "Fecha": "2024-03-05", "Ruta": "C6-001", "Pax": null }
            ]
        }));
    });

    let sb = Sandbox::new();
    let file = sb.workbook("semana.xlsx");
    let html = sb.path().join("preview.html");
    let mut cmd = sb.bufalo();
    cmd.args(["upload", file.to_str().unwrap(), "--from", "2024-03-04", "--to", "2024-03-10"])
        .args(["--endpoint", &server.base_url(), "--json", "--quiet"])
        .arg("--html")
        .arg(&html);
    let output = run(cmd);

    assert_exit(&output, 0);
    let v: serde_json::Value = serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON: {}\n{}", e, stdout(&output)));
    assert_eq!(v["outcome"], "preview_ready");
    assert_eq!(v["table"]["columns"], serde_json::json!(["Fecha", "Ruta", "Pax"]));
    assert_eq!(v["table"]["rows"][1], serde_json::json!(["2024-03-05", "C6-001", ""]));

    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("<th>Fecha</th>"));
    assert!(page.contains("<td>310</td>"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn config_path_honours_override() {
    let sb = Sandbox::new();
    let mut cmd = sb.bufalo();
    cmd.args(["config", "--path"]);
    let output = run(cmd);

    assert_exit(&output, 0);
    assert_eq!(stdout(&output).trim(), sb.path().join("settings.json").to_string_lossy());
}

#[test]
fn config_set_endpoint_persists() {
    let sb = Sandbox::new();
    let mut cmd = sb.bufalo();
    cmd.args(["config", "--set-endpoint", "http://localhost:8000/"]);
    assert_exit(&run(cmd), 0);

    let mut cmd = sb.bufalo();
    cmd.arg("config");
    let output = run(cmd);
    assert_exit(&output, 0);
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["settings"]["upload.endpoint"], "http://localhost:8000");
    assert_eq!(v["effective"]["upload_url"], "http://localhost:8000/upload/");
}

#[test]
fn config_rejects_non_http_endpoint() {
    let sb = Sandbox::new();
    let mut cmd = sb.bufalo();
    cmd.args(["config", "--set-endpoint", "ftp://example.com"]);
    let output = run(cmd);

    assert_exit(&output, 2);
    assert!(!sb.path().join("settings.json").exists());
}
