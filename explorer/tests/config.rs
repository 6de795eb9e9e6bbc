use std::{fs, time::Duration};

use explorer::config::load_config_from;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

#[tokio::test]
async fn loads_server_and_source_sections() -> anyhow::Result<()> {
    let dir = temp_dir();
    let path = dir.path().join("app.yaml");
    fs::write(
        &path,
        "server:\n  host: 0.0.0.0\n  port: 9000\nsource:\n  api_host: https://data.example/\n  request_timeout_secs: 12\n",
    )?;

    let config = load_config_from(&path).await?;
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.source.connect_timeout_secs, 5);

    let http = config.source.http_config(Some("  secret ".to_string()));
    assert_eq!(http.token.as_deref(), Some("secret"));
    assert_eq!(http.request_timeout, Duration::from_secs(12));
    assert_eq!(http.api_host, "https://data.example/");

    assert!(config.source.http_config(Some(String::new())).token.is_none());
    Ok(())
}

#[tokio::test]
async fn missing_or_broken_files_are_errors() -> anyhow::Result<()> {
    let dir = temp_dir();
    let missing = load_config_from(&dir.path().join("absent.yaml")).await;
    assert!(missing.is_err());

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "server: [not, a, map]\n")?;
    let err = load_config_from(&broken).await.err().map(|err| err.to_string());
    assert!(err.is_some_and(|msg| msg.contains("Failed to parse config file")));
    Ok(())
}
