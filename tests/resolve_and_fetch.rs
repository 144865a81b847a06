//! End-to-end pipeline test: probe a fake browser, resolve against a mock
//! storage index, download and extract the driver archive.

#![cfg(unix)]

use std::io::Write;
use std::path::{Path, PathBuf};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chromedriver_dl::Config;

/// Write an executable shell script that prints a Chrome-style version line
fn fake_browser(dir: &Path, version: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("google-chrome");
    std::fs::write(
        &path,
        format!("#!/bin/sh\nprintf 'Google Chrome %s\\n' \"{version}\"\n"),
    )
    .expect("write fake browser");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("mark fake browser executable");
    path
}

fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::FileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).expect("start zip entry");
            writer
                .write_all(contents.as_bytes())
                .expect("write zip entry");
        }
        writer.finish().expect("finish zip");
    }
    cursor.into_inner()
}

#[tokio::test]
async fn full_pipeline_installs_the_driver() {
    let release = "115.0.5790.170";
    let archive = build_zip(&[
        ("chromedriver.exe", "win32-driver-binary"),
        ("LICENSE.chromedriver", "license text"),
    ]);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/LATEST_RELEASE_115.0.5790"))
        .respond_with(ResponseTemplate::new(200).set_body_string(release))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("delimiter", "/"))
        .and(query_param("prefix", format!("{release}/")))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult>
  <Contents><Key>{release}/chromedriver_win32.zip</Key></Contents>
  <Contents><Key>{release}/chromedriver_linux64.zip</Key></Contents>
</ListBucketResult>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{release}/chromedriver_win32.zip")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;

    let browser_dir = tempfile::tempdir().expect("create browser dir");
    let output_dir = tempfile::tempdir().expect("create output dir");
    let config = Config::new(
        fake_browser(browser_dir.path(), release),
        Some("win32".to_string()),
        Some(output_dir.path().to_path_buf()),
        Some(server.uri()),
    )
    .expect("build config");

    let extracted = chromedriver_dl::run(&config).await.expect("pipeline should succeed");

    assert_eq!(extracted.len(), 2);
    let driver = std::fs::read_to_string(output_dir.path().join("chromedriver.exe"))
        .expect("driver should be extracted");
    assert_eq!(driver, "win32-driver-binary");
    let license = std::fs::read_to_string(output_dir.path().join("LICENSE.chromedriver"))
        .expect("license should be extracted");
    assert_eq!(license, "license text");
}

#[tokio::test]
async fn unknown_platform_fails_without_touching_output() {
    let release = "115.0.5790.170";

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/LATEST_RELEASE_115.0.5790"))
        .respond_with(ResponseTemplate::new(200).set_body_string(release))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<ListBucketResult><Contents><Key>{release}/chromedriver_linux64.zip</Key></Contents></ListBucketResult>"
        )))
        .mount(&server)
        .await;

    let browser_dir = tempfile::tempdir().expect("create browser dir");
    let output_dir = tempfile::tempdir().expect("create output dir");
    let config = Config::new(
        fake_browser(browser_dir.path(), release),
        Some("solaris".to_string()),
        Some(output_dir.path().to_path_buf()),
        Some(server.uri()),
    )
    .expect("build config");

    let err = chromedriver_dl::run(&config).await.expect_err("should fail");

    assert!(
        matches!(err, chromedriver_dl::Error::DriverNotFound { .. }),
        "got {err:?}"
    );
    assert_eq!(
        std::fs::read_dir(output_dir.path()).expect("read output dir").count(),
        0,
        "failed run must not write into the output directory"
    );
}
