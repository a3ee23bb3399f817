//! Publishing and image edits through the multipart upload pipeline.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use super::test_utils::{
    BUCKET, DOCTOR_ID, FilePart, MockObjectStore, MockRepository, TestApp, json_body,
    multipart_body, png, post_multipart,
};

const MAX_UPLOAD: usize = 2 * 1024 * 1024;

#[tokio::test]
async fn test_publish_relays_image_and_inserts_row() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let body = multipart_body(
        &[("title", "T"), ("subtitle", "S"), ("text", "B")],
        Some(png(10 * 1024)),
    );
    let response = app
        .send(post_multipart("/add-new-article.json", Some(&doctor), body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let row = json_body(response).await;
    assert_eq!(row["id"], 26);
    assert_eq!(row["author_id"], DOCTOR_ID);
    assert_eq!(row["title"], "T");
    assert_eq!(row["subtitle"], "S");
    assert_eq!(row["text"], "B");

    let objects = app.store.objects().await;
    assert_eq!(objects.len(), 1);
    let object = &objects[0];
    assert!(object.key.ends_with(".png"));
    assert_eq!(object.content_type, "image/png");
    assert_eq!(object.bytes.len(), 10 * 1024);

    let url = row["image_url"].as_str().unwrap();
    assert_eq!(
        url,
        format!("https://s3.amazonaws.com/{}/{}", BUCKET, object.key)
    );
    assert!(url.ends_with(".png"));

    // The staged copy is only a handoff buffer.
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_publish_requires_doctor_session() {
    let app = TestApp::seeded().await;
    let user = app.login_user().await;
    let body = || {
        multipart_body(
            &[("title", "T"), ("subtitle", "S"), ("text", "B")],
            Some(png(16)),
        )
    };

    let anonymous = app
        .send(post_multipart("/add-new-article.json", None, body()))
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let plain_user = app
        .send(post_multipart("/add-new-article.json", Some(&user), body()))
        .await;
    assert_eq!(plain_user.status(), StatusCode::FORBIDDEN);

    assert!(app.store.objects().await.is_empty());
    assert_eq!(app.repo.write_count().await, 0);
}

#[tokio::test]
async fn test_publish_with_blank_field_writes_nothing() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let cases: [&[(&str, &str)]; 3] = [
        &[("title", ""), ("subtitle", "S"), ("text", "B")],
        &[("title", "T"), ("subtitle", "   "), ("text", "B")],
        &[("title", "T"), ("subtitle", "S")],
    ];

    for fields in cases {
        let body = multipart_body(fields, Some(png(1024)));
        let response = app
            .send(post_multipart("/add-new-article.json", Some(&doctor), body))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = json_body(response).await;
        assert_eq!(
            error["error"],
            "You must fill in all fields to publish an article."
        );
    }

    assert!(app.store.objects().await.is_empty());
    assert_eq!(app.repo.write_count().await, 0);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_publish_rejects_oversized_file() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    // Blank title too: the size check must win over validation.
    let body = multipart_body(
        &[("title", ""), ("subtitle", "S"), ("text", "B")],
        Some(png(MAX_UPLOAD + 1)),
    );
    let response = app
        .send(post_multipart("/add-new-article.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.store.objects().await.is_empty());
    assert_eq!(app.repo.write_count().await, 0);
}

#[tokio::test]
async fn test_publish_accepts_file_at_limit() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let body = multipart_body(
        &[("title", "T"), ("subtitle", "S"), ("text", "B")],
        Some(png(MAX_UPLOAD)),
    );
    let response = app
        .send(post_multipart("/add-new-article.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_publish_without_file_is_rejected() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let body = multipart_body(&[("title", "T"), ("subtitle", "S"), ("text", "B")], None);
    let response = app
        .send(post_multipart("/add-new-article.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "An image file is required."
    );
    assert_eq!(app.repo.write_count().await, 0);
}

#[tokio::test]
async fn test_relay_failure_is_bad_gateway() {
    let app = TestApp::new(
        MockRepository::seeded().with_articles(3).await,
        MockObjectStore::failing(),
    );
    let doctor = app.login_doctor().await;

    let body = multipart_body(
        &[("title", "T"), ("subtitle", "S"), ("text", "B")],
        Some(png(2048)),
    );
    let response = app
        .send(post_multipart("/add-new-article.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = json_body(response).await;
    assert_eq!(error["code"], 502);
    assert_eq!(app.repo.write_count().await, 0);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_edit_with_pic_replaces_image() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let file = FilePart {
        file_name: "new.JPEG",
        content_type: "image/jpeg",
        bytes: vec![0xff; 512],
    };
    let body = multipart_body(
        &[
            ("articleId", "7"),
            ("title", "Edited"),
            ("subtitle", "S"),
            ("text", "B"),
        ],
        Some(file),
    );
    let response = app
        .send(post_multipart("/edit-article-with-pic.json", Some(&doctor), body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let row = json_body(response).await;
    assert_eq!(row["id"], 7);
    assert_eq!(row["title"], "Edited");
    let url = row["image_url"].as_str().unwrap();
    assert!(url.starts_with(&format!("https://s3.amazonaws.com/{}/", BUCKET)));
    assert!(url.ends_with(".jpeg"));

    let stored = app.repo.article(7).await.unwrap();
    assert_eq!(stored.image_url.as_deref(), Some(url));
}

#[tokio::test]
async fn test_edit_with_pic_by_non_owner_skips_relay() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let body = multipart_body(
        &[
            ("articleId", "8"),
            ("title", "T"),
            ("subtitle", "S"),
            ("text", "B"),
        ],
        Some(png(512)),
    );
    let response = app
        .send(post_multipart("/edit-article-with-pic.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.store.objects().await.is_empty());
    assert_eq!(app.repo.write_count().await, 0);
}

#[tokio::test]
async fn test_edit_with_pic_requires_article_id() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let body = multipart_body(
        &[("title", "T"), ("subtitle", "S"), ("text", "B")],
        Some(png(512)),
    );
    let response = app
        .send(post_multipart("/edit-article-with-pic.json", Some(&doctor), body))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid article id.");
}

#[tokio::test]
async fn test_publish_without_multipart_boundary_is_json_error() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let response = app
        .send(
            Request::post("/add-new-article.json")
                .header(header::CONTENT_TYPE, "multipart/form-data")
                .header(header::COOKIE, &doctor)
                .body(Body::from("title=T"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], 400);
    assert_eq!(app.repo.write_count().await, 0);
}
