//! Upload endpoint integration tests.
//!
//! Run with: `cargo test -p thumbnailer-api --test upload_test`

mod helpers;

use std::future::IntoFuture;
use std::io;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request},
};
use bytes::Bytes;
use futures::{stream, StreamExt};
use helpers::fixtures;
use helpers::{call_json, setup_router_with, setup_test_app, setup_test_app_with};
use image::{GenericImageView, ImageFormat};
use thumbnailer_core::Config;

fn assert_cors(response: &axum_test::TestResponse) {
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(
        response.header("access-control-allow-methods"),
        "POST, OPTIONS"
    );
    assert_eq!(
        response.header("access-control-allow-headers"),
        "Content-Type"
    );
}

fn assert_cors_headers(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

fn streamed_upload(body: Body) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header("content-type", fixtures::multipart_content_type())
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_upload_small_png() {
    let server = setup_test_app();

    let response = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::red_png(10, 10)))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_cors(&response);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["format"], "jpeg");
    assert_eq!(body["metadata"]["width"], 200);
    assert_eq!(body["metadata"]["height"], 200);

    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
    let jpeg = fixtures::decode_data_url(url);
    assert_eq!(body["metadata"]["size"], jpeg.len());
    assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_upload_ignores_aspect_ratio() {
    let server = setup_test_app();

    for (width, height) in [(400, 50), (50, 400)] {
        let response = server
            .post("/upload")
            .multipart(fixtures::image_form(fixtures::red_png(width, height)))
            .await;
        assert_eq!(response.status_code(), 200);

        let body: serde_json::Value = response.json();
        let jpeg = fixtures::decode_data_url(body["imageUrl"].as_str().unwrap());
        let img = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
    }
}

#[tokio::test]
async fn test_upload_accepts_jpeg_and_gif_sources() {
    let server = setup_test_app();

    let sources = [
        ("photo.jpg", "image/jpeg", fixtures::solid_image(64, 48, [0, 200, 0], ImageFormat::Jpeg)),
        ("anim.gif", "image/gif", fixtures::solid_image(16, 16, [0, 0, 200], ImageFormat::Gif)),
    ];
    for (name, mime, data) in sources {
        let response = server
            .post("/upload")
            .multipart(fixtures::file_form("file", name, mime, data))
            .await;
        assert_eq!(response.status_code(), 200, "source {}", name);
        let body: serde_json::Value = response.json();
        assert_eq!(body["metadata"]["format"], "jpeg");
    }
}

#[tokio::test]
async fn test_thumbnail_reupload_is_stable() {
    let server = setup_test_app();

    let first: serde_json::Value = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::red_png(33, 77)))
        .await
        .json();
    let jpeg = fixtures::decode_data_url(first["imageUrl"].as_str().unwrap());

    let response = server
        .post("/upload")
        .multipart(fixtures::file_form("image", "thumb.jpg", "image/jpeg", jpeg))
        .await;
    assert_eq!(response.status_code(), 200);
    let second: serde_json::Value = response.json();
    assert_eq!(second["metadata"]["width"], 200);
    assert_eq!(second["metadata"]["height"], 200);
    assert_eq!(second["metadata"]["format"], "jpeg");
}

#[tokio::test]
async fn test_preflight_returns_no_content() {
    let server = setup_test_app();

    for path in ["/upload", "/", "/anything/else"] {
        let response = server.method(Method::OPTIONS, path).await;
        assert_eq!(response.status_code(), 204, "path {}", path);
        assert!(response.as_bytes().is_empty());
        assert_cors(&response);
    }
}

#[tokio::test]
async fn test_other_routes_serve_upload_page() {
    let server = setup_test_app();

    for path in ["/", "/index.html", "/upload"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), 200, "path {}", path);
        assert!(response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(response.text().contains("<html"));
        assert_cors(&response);
    }

    let response = server.put("/upload").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_upload_without_file() {
    let server = setup_test_app();

    let mut body = fixtures::raw_text_part("caption", "no file here");
    body.extend(fixtures::raw_closing());

    let response = server
        .post("/upload")
        .add_header("content-type", fixtures::multipart_content_type())
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 400);
    assert_cors(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json,
        serde_json::json!({"success": false, "error": "No file provided"})
    );
}

#[tokio::test]
async fn test_upload_empty_file() {
    let server = setup_test_app();

    let response = server
        .post("/upload")
        .multipart(fixtures::image_form(Vec::new()))
        .await;

    assert_eq!(response.status_code(), 400);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Uploaded file is empty");
}

#[tokio::test]
async fn test_upload_non_image() {
    let server = setup_test_app();

    let response = server
        .post("/upload")
        .multipart(fixtures::file_form(
            "file",
            "notes.txt",
            "text/plain",
            b"this is plain text, not pixels".to_vec(),
        ))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_cors(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode image"));
}

#[tokio::test]
async fn test_upload_truncated_body() {
    let server = setup_test_app();

    let mut body = fixtures::raw_file_part_head("image", "cut.png");
    body.extend_from_slice(&fixtures::red_png(20, 20)[..16]);

    let response = server
        .post("/upload")
        .add_header("content-type", fixtures::multipart_content_type())
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 500);
    assert_cors(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json,
        serde_json::json!({"success": false, "error": "Upload failed"})
    );
}

#[tokio::test]
async fn test_upload_without_boundary() {
    let server = setup_test_app();

    let response = server
        .post("/upload")
        .add_header("content-type", "multipart/form-data")
        .bytes(fixtures::red_png(4, 4).into())
        .await;

    assert_eq!(response.status_code(), 500);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Upload failed");
}

#[tokio::test]
async fn test_upload_over_size_cap() {
    let mut config = Config::default();
    config.upload.max_upload_bytes = 1024;
    let server = setup_test_app_with(config);

    let response = server
        .post("/upload")
        .multipart(fixtures::file_form(
            "image",
            "big.bin",
            "application/octet-stream",
            vec![0xAB; 8 * 1024],
        ))
        .await;

    assert_eq!(response.status_code(), 413);
    assert_cors(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_body_over_transport_limit() {
    let mut config = Config::default();
    config.upload.max_upload_bytes = 1024;
    let server = setup_test_app_with(config);

    let mut body = fixtures::raw_text_part("padding", &"p".repeat(256 * 1024));
    body.extend(fixtures::raw_file_part_head("image", "a.png"));
    body.extend(fixtures::red_png(2, 2));
    body.extend_from_slice(b"\r\n");
    body.extend(fixtures::raw_closing());

    let response = server
        .post("/upload")
        .add_header("content-type", fixtures::multipart_content_type())
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 413);
}

#[tokio::test]
async fn test_configured_field_name() {
    let mut config = Config::default();
    config.upload.field_name = Some("image".to_string());
    let server = setup_test_app_with(config);

    let response = server
        .post("/upload")
        .multipart(fixtures::file_form(
            "attachment",
            "a.png",
            "image/png",
            fixtures::red_png(5, 5),
        ))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::red_png(5, 5)))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_configured_thumbnail_box() {
    let mut config = Config::default();
    config.thumbnail.width = 120;
    config.thumbnail.height = 60;
    let server = setup_test_app_with(config);

    let body: serde_json::Value = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::red_png(10, 10)))
        .await
        .json();

    assert_eq!(body["metadata"]["width"], 120);
    assert_eq!(body["metadata"]["height"], 60);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = setup_test_app();

    let response = server
        .get("/")
        .add_header("x-request-id", "trace-me-42")
        .await;
    assert_eq!(response.header("x-request-id"), "trace-me-42");

    let response = server.get("/").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_concurrent_uploads_are_isolated() {
    let server = setup_test_app();

    let red = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::red_png(30, 30)));
    let blue = server
        .post("/upload")
        .multipart(fixtures::image_form(fixtures::blue_png(30, 30)));

    let (red, blue) = futures::future::join(red.into_future(), blue.into_future()).await;

    for (response, expect_red) in [(red, true), (blue, false)] {
        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        let jpeg = fixtures::decode_data_url(body["imageUrl"].as_str().unwrap());
        let img = image::load_from_memory(&jpeg).unwrap().to_rgb8();
        let [r, _, b] = img.get_pixel(100, 100).0;
        if expect_red {
            assert!(r > 200 && b < 60, "expected red, got {:?}", img.get_pixel(100, 100));
        } else {
            assert!(b > 200 && r < 60, "expected blue, got {:?}", img.get_pixel(100, 100));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_upload_hits_overall_deadline() {
    let mut config = Config::default();
    config.upload.timeout_secs = 2;
    config.upload.idle_timeout_secs = 1;
    let mut router = setup_router_with(config);

    let head = Bytes::from(fixtures::raw_file_part_head("image", "slow.png"));
    let drip = stream::iter(vec![Ok::<Bytes, io::Error>(head)]).chain(stream::unfold(
        (),
        |()| async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            Some((Ok::<Bytes, io::Error>(Bytes::from_static(b"x")), ()))
        },
    ));

    let (status, headers, json) =
        call_json(&mut router, streamed_upload(Body::from_stream(drip))).await;

    assert_eq!(status, 408);
    assert_cors_headers(&headers);
    assert_eq!(
        json,
        serde_json::json!({
            "success": false,
            "error": "Upload did not complete within 2 seconds"
        })
    );
}

#[tokio::test]
async fn test_body_read_failure_is_reported() {
    let mut router = setup_router_with(Config::default());

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from(fixtures::raw_file_part_head("image", "a.png"))),
        Ok(Bytes::from_static(b"abc")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
    ];

    let (status, headers, json) = call_json(
        &mut router,
        streamed_upload(Body::from_stream(stream::iter(chunks))),
    )
    .await;

    assert_eq!(status, 400);
    assert_cors_headers(&headers);
    assert_eq!(json["success"], false);
    let message = json["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert_ne!(message, "Upload failed");
}
