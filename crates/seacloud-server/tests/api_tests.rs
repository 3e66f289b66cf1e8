use reqwest::{multipart, Client, StatusCode};
use seacloud_server::{
    error::ErrorBody,
    handlers::{Envelope, UploadResponse},
    routes, AppState, ServerConfig,
};
use seacloud_filer::{Cursor, Entry, ListingPage};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to spawn a server on a random port in front of a fake filer
async fn spawn_server(filer: &MockServer, stream_downloads: bool) -> String {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        filer_url: filer.uri(),
        stream_downloads,
        ..Default::default()
    };

    let state = Arc::new(AppState::new(config).unwrap());
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn file_record(full_path: &str, size: u64, mime: &str) -> Value {
    json!({
        "FullPath": full_path,
        "Mtime": "2024-06-01T12:00:00Z",
        "Crtime": "2024-06-01T11:00:00Z",
        "Mode": 0o644,
        "Mime": mime,
        "Md5": null,
        "FileSize": size,
    })
}

fn dir_record(full_path: &str) -> Value {
    json!({
        "FullPath": full_path,
        "Mode": (1u64 << 31) | 0o755,
    })
}

async fn mount_file(filer: &MockServer, remote_path: &str, content: &'static [u8], mime: &str) {
    Mock::given(method("GET"))
        .and(path(remote_path))
        .and(query_param("metadata", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_record(
            remote_path,
            content.len() as u64,
            mime,
        )))
        .mount(filer)
        .await;

    Mock::given(method("GET"))
        .and(path(remote_path))
        .and(query_param_is_missing("metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(filer)
        .await;
}

#[tokio::test]
async fn test_health_check() {
    let filer = MockServer::start().await;
    let base_url = spawn_server(&filer, false).await;

    let res = Client::new().get(format!("{}/healthz", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_metadata() {
    let filer = MockServer::start().await;
    mount_file(&filer, "/buckets/docs/a.txt", b"hello", "text/plain").await;
    let base_url = spawn_server(&filer, false).await;

    let res = Client::new()
        .get(format!("{}/api/files/metadata", base_url))
        .query(&[("path", "/docs/a.txt")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Envelope<Entry> = res.json().await.unwrap();
    assert_eq!(body.message, "success");
    let file = body.data.as_file().expect("file entry");
    assert_eq!(file.full_path, "/docs/a.txt");
    assert_eq!(file.size, 5);
}

#[tokio::test]
async fn test_metadata_not_found() {
    let filer = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;

    let res = Client::new()
        .get(format!("{}/api/files/metadata?path=/nope.txt", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("x-request-id"));

    let body: ErrorBody = res.json().await.unwrap();
    assert_eq!(body.message, "Not Found");
    assert!(body.info.contains("/nope.txt"));
}

#[tokio::test]
async fn test_filer_failure_is_bad_gateway() {
    let filer = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;

    let res = Client::new()
        .get(format!("{}/api/files/metadata?path=/a.txt", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_download_buffered_and_streamed() {
    for stream_downloads in [false, true] {
        let filer = MockServer::start().await;
        mount_file(&filer, "/buckets/img/logo.png", b"\x89PNG-data", "image/png").await;
        let base_url = spawn_server(&filer, stream_downloads).await;

        let res = Client::new()
            .get(format!("{}/api/files/download?path=/img/logo.png", base_url))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "image/png");
        assert_eq!(&res.bytes().await.unwrap()[..], b"\x89PNG-data");
    }
}

#[tokio::test]
async fn test_download_directory_is_bad_request() {
    let filer = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/buckets/img"))
        .and(query_param("metadata", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dir_record("/buckets/img")))
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;

    let res = Client::new()
        .get(format!("{}/api/files/download?path=/img", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_walks_all_pages() {
    let filer = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/buckets/docs/"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("lastFileName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Path": "/buckets/docs",
            "Entries": [
                file_record("/buckets/docs/a.txt", 1, "text/plain"),
                file_record("/buckets/docs/b.txt", 2, "text/plain"),
            ],
            "Limit": 2,
            "LastFileName": "b.txt",
            "ShouldDisplayLoadMore": true,
            "EmptyFolder": false,
        })))
        .mount(&filer)
        .await;

    Mock::given(method("GET"))
        .and(path("/buckets/docs/"))
        .and(query_param("limit", "2"))
        .and(query_param("lastFileName", "b.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Path": "/buckets/docs",
            "Entries": [file_record("/buckets/docs/c.txt", 3, "text/plain")],
            "Limit": 2,
            "LastFileName": "c.txt",
            "ShouldDisplayLoadMore": false,
            "EmptyFolder": false,
        })))
        .mount(&filer)
        .await;

    let base_url = spawn_server(&filer, false).await;
    let client = Client::new();

    let mut cursor = String::new();
    let mut names = Vec::new();
    let mut pages = 0;
    loop {
        let res = client
            .get(format!("{}/api/files/entries", base_url))
            .query(&[("dirpath", "/docs"), ("limit", "2"), ("cursor", cursor.as_str())])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Envelope<ListingPage> = res.json().await.unwrap();
        names.extend(body.data.entries.iter().map(|e| e.full_path().to_string()));
        pages += 1;

        if body.data.is_last() {
            break;
        }
        assert_eq!(Cursor::decode(&body.data.cursor).unwrap(), Cursor::after("b.txt"));
        cursor = body.data.cursor;
    }

    assert_eq!(pages, 2);
    assert_eq!(names, vec!["/docs/a.txt", "/docs/b.txt", "/docs/c.txt"]);
}

#[tokio::test]
async fn test_listing_validation() {
    let filer = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;
    let client = Client::new();

    for query in ["limit=0", "limit=1001", "cursor=***"] {
        let res = client
            .get(format!("{}/api/files/entries?dirpath=/docs&{}", base_url, query))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {}", query);
    }
}

#[tokio::test]
async fn test_upload() {
    let filer = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buckets/docs/report.txt"))
        .and(body_string_contains("filename=\"report.txt\""))
        .and(body_string_contains("quarterly sum"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "report.txt", "size": 13})))
        .expect(1)
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;

    let form = multipart::Form::new()
        .text("dirpath", "/docs")
        .part(
            "file",
            multipart::Part::bytes(b"quarterly sum".to_vec()).file_name("report.txt"),
        );

    let res = Client::new()
        .post(format!("{}/api/files", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Envelope<UploadResponse> = res.json().await.unwrap();
    assert_eq!(body.data.file_name, "report.txt");
    assert_eq!(body.data.full_path, "/docs/report.txt");
    assert_eq!(body.data.size, 13);
}

#[tokio::test]
async fn test_upload_without_file() {
    let filer = MockServer::start().await;
    let base_url = spawn_server(&filer, false).await;

    let form = multipart::Form::new().text("dirpath", "/docs");
    let res = Client::new()
        .post(format!("{}/api/files", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_dirpath_after_file_is_rejected() {
    let filer = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "a.txt", "size": 1})))
        .mount(&filer)
        .await;
    let base_url = spawn_server(&filer, false).await;

    let form = multipart::Form::new()
        .part("file", multipart::Part::bytes(b"a".to_vec()).file_name("a.txt"))
        .text("dirpath", "/docs");

    let res = Client::new()
        .post(format!("{}/api/files", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
