//! End-to-end CLI tests for the emudl binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary isolated from any user config file.
fn emudl(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("emudl").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--platform"));
}

#[test]
fn test_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_list_platforms_prints_menu_and_exits() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .arg("--list-platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("[19] Consoles - Sega Dreamcast"));
}

#[test]
fn test_out_of_range_platform_is_setup_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .args(["--platform", "999", "--base-url", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("wrong"));
}

#[test]
fn test_malformed_games_selection_is_setup_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .args(["--platform", "19", "--games", "1,x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--games"));
}

#[test]
fn test_oversized_files_range_is_setup_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .args(["--platform", "19", "--files", "0-18446744073709551615"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("too many"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_unreachable_catalog_reports_server_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .args(["--platform", "19", "--base-url", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Server Error"));
}

#[test]
fn test_non_numeric_prompt_answer_is_setup_error() {
    let home = TempDir::new().unwrap();
    emudl(&home)
        .args(["--base-url", "http://127.0.0.1:1"])
        .write_stdin("dreamcast\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a valid number"));
}

#[test]
fn test_bad_config_file_is_setup_error() {
    let home = TempDir::new().unwrap();
    std::fs::create_dir_all(home.path().join("emudl")).unwrap();
    std::fs::write(
        home.path().join("emudl").join("config.toml"),
        "unknown_key = true\n",
    )
    .unwrap();
    emudl(&home)
        .args(["--platform", "19"])
        .assert()
        .code(1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_downloads_selected_game() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let host = server.uri().trim_start_matches("http:").to_string();
    Mock::given(method("GET"))
        .and(path("/Sega_Dreamcast_ISOs/List-All-Titles/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a class="index gamelist" href="/Sega_Dreamcast_ISOs/Rez_(USA)/300">Rez (USA)</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Sega_Dreamcast_ISOs/Rez_(USA)/300"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<div class="download-link"><a href="{host}/files/rez.cdi">Download Rez (USA)</a></div>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/files/rez.cdi"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/octet-stream")
                .insert_header("Content-Length", "3")
                .set_body_bytes(b"rez".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/rez.cdi"))
        .and(header("Cookie", "epdprefs=ephttpdownload"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rez".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let uri = server.uri();
    let out_path = out.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        emudl(&home)
            .args(["--platform", "19", "--games", "0", "--no-progress"])
            .arg("--base-url")
            .arg(&uri)
            .arg("--output")
            .arg(&out_path)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Rez (USA)"));
    let saved = out
        .path()
        .join("Sega_Dreamcast_ISOs")
        .join("Rez_(USA)")
        .join("rez.cdi");
    assert_eq!(std::fs::read(saved).unwrap(), b"rez");
}
