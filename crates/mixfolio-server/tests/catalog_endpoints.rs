mod support;

use std::path::Path;
use std::sync::Arc;

use mixfolio_model::fallback_tracks;
use mixfolio_server::{ApiConfig, AppState};
use mixfolio_store::{AssetResolver, CatalogLoader, FakeAssetStore, RetryPolicy};
use support::{get, spawn_server};
use tempfile::tempdir;

const CATALOG: &str = r#"
- title: "Dark Dreams"
  artist: "Data Drift"
  description: "Old school phonk song"
  type: "my"
  tags: ["my", "mix", "master"]
  genre: ["phonk"]
  file: "Dark Dreams"
- title: "Comet"
  artist: "Ricky Legend"
  description: "Mix and master of a pop song"
  type: "mix"
  tags: ["mix", "master"]
  genre: ["pop", "indie", "electronic"]
  file: "Comet"
- title: "Night Drive"
  artist: "Data Drift & Friend"
  type: "friend"
  genre: ["phonk", "electronic"]
  file: "Night Drive"
"#;

fn state(catalog_path: &Path) -> AppState {
    AppState::new(
        AssetResolver::new(Arc::new(FakeAssetStore::default()), RetryPolicy::none()),
        CatalogLoader::new(catalog_path.to_path_buf()),
        ApiConfig::default(),
    )
}

#[tokio::test]
async fn tracks_are_served_from_the_document() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, CATALOG).expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let resp = get(addr, "/api/tracks", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("x-catalog-source"), Some("document"));
    assert_eq!(resp.header("content-type"), Some("application/json"));
    let body = resp.json();
    let tracks = body.as_array().expect("array body");
    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0]["title"], "Dark Dreams");
    assert_eq!(tracks[1]["type"], "mix");
    assert_eq!(tracks[2]["type"], "friend");
}

#[tokio::test]
async fn missing_document_serves_the_fallback_catalog() {
    let dir = tempdir().expect("tempdir");
    let addr = spawn_server(state(&dir.path().join("missing.yaml"))).await;

    let resp = get(addr, "/api/tracks", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("x-catalog-source"), Some("fallback"));
    let served: Vec<mixfolio_model::Track> =
        serde_json::from_slice(&resp.body).expect("decode tracks");
    assert_eq!(served, fallback_tracks());
}

#[tokio::test]
async fn invalid_document_serves_exactly_the_fallback() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, "::: not yaml [").expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let resp = get(addr, "/api/tracks", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("x-catalog-source"), Some("fallback"));
    let served: Vec<mixfolio_model::Track> =
        serde_json::from_slice(&resp.body).expect("decode tracks");
    assert_eq!(served, fallback_tracks());

    let metrics = get(addr, "/metrics", &[]).await;
    let text = String::from_utf8(metrics.body).expect("utf8 metrics");
    assert!(text.contains("mixfolio_catalog_loads_total{source=\"fallback\"} 1\n"));
}

#[tokio::test]
async fn genre_and_type_filters_preserve_document_order() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, CATALOG).expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let phonk = get(addr, "/api/tracks?genre=phonk", &[]).await.json();
    let titles: Vec<_> = phonk
        .as_array()
        .expect("array")
        .iter()
        .map(|t| t["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["Dark Dreams", "Night Drive"]);

    let collab = get(addr, "/api/tracks?type=collaboration", &[]).await.json();
    assert_eq!(collab.as_array().map(Vec::len), Some(1));

    let bad = get(addr, "/api/tracks?type=remix", &[]).await;
    assert_eq!(bad.status, 400);
    assert_eq!(bad.json()["error"]["code"], "InvalidQueryParameter");
}

#[tokio::test]
async fn genres_are_sorted_and_deduplicated() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, CATALOG).expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let resp = get(addr, "/api/genres", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.json(),
        serde_json::json!(["electronic", "indie", "phonk", "pop"])
    );
}

#[tokio::test]
async fn unchanged_catalog_revalidates_with_304() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, CATALOG).expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let first = get(addr, "/api/tracks", &[]).await;
    let etag = first.header("etag").expect("etag").to_string();
    let second = get(addr, "/api/tracks", &[("if-none-match", etag.as_str())]).await;
    assert_eq!(second.status, 304);
    assert_eq!(second.header("etag"), Some(etag.as_str()));

    std::fs::write(&path, "[]").expect("rewrite catalog");
    let third = get(addr, "/api/tracks", &[("if-none-match", etag.as_str())]).await;
    assert_eq!(third.status, 200);
    assert_eq!(third.json(), serde_json::json!([]));
}

#[tokio::test]
async fn if_none_match_lists_and_weak_tags_revalidate() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("content_meta.yaml");
    std::fs::write(&path, CATALOG).expect("write catalog");
    let addr = spawn_server(state(&path)).await;

    let first = get(addr, "/api/genres", &[]).await;
    let etag = first.header("etag").expect("etag").to_string();

    let listed = format!("\"stale\", W/{etag}");
    let resp = get(addr, "/api/genres", &[("if-none-match", listed.as_str())]).await;
    assert_eq!(resp.status, 304);
    assert!(resp.body.is_empty());

    let wildcard = get(addr, "/api/genres", &[("if-none-match", "*")]).await;
    assert_eq!(wildcard.status, 304);

    let stale = get(addr, "/api/genres", &[("if-none-match", "\"stale\"")]).await;
    assert_eq!(stale.status, 200);
}
