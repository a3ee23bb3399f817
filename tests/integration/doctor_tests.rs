//! Doctor profiles and per-doctor feeds.

use axum::http::StatusCode;

use super::test_utils::{DOCTOR_ID, OTHER_DOCTOR_ID, TestApp, get, ids, json_body};

#[tokio::test]
async fn test_own_profile_for_matching_doctor() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;

    let response = app.send(get("/doctor/1.json", Some(&doctor))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ownProfile"], true);
    assert_eq!(body["doctorInfo"]["id"], DOCTOR_ID);
}

#[tokio::test]
async fn test_own_profile_false_otherwise() {
    let app = TestApp::seeded().await;
    let doctor = app.login_doctor().await;
    let user = app.login_user().await;

    let uri = format!("/doctor/{}.json", OTHER_DOCTOR_ID);
    for cookie in [Some(doctor.as_str()), Some(user.as_str()), None] {
        let body = json_body(app.send(get(&uri, cookie)).await).await;
        assert_eq!(body["ownProfile"], false);
        assert_eq!(body["doctorInfo"]["id"], OTHER_DOCTOR_ID);
    }

    let body = json_body(app.send(get("/doctor/1.json", Some(&user))).await).await;
    assert_eq!(body["ownProfile"], false);
}

#[tokio::test]
async fn test_unknown_doctor_not_found() {
    let app = TestApp::seeded().await;

    // User 2 exists but is not a doctor.
    let response = app.send(get("/doctor/2.json", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_doctor_articles_only_by_that_doctor() {
    let app = TestApp::seeded().await;

    let body = json_body(app.send(get("/doctor-articles/1.json", None)).await).await;

    let rows = body.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row["author_id"] == DOCTOR_ID));
    let ids = ids(&body);
    assert_eq!(ids[0], 25);
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}

#[tokio::test]
async fn test_more_doctor_articles_below_cursor() {
    let app = TestApp::seeded().await;

    let response = app
        .send(get("/more-doctor-articles/3/10.json", None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(ids(&body), vec![8, 6, 4, 2]);
    assert!(
        body.as_array()
            .unwrap()
            .iter()
            .all(|row| row["author_id"] == OTHER_DOCTOR_ID)
    );
}

#[tokio::test]
async fn test_malformed_doctor_path_is_json_error() {
    let app = TestApp::seeded().await;

    for uri in ["/doctor/abc.json", "/more-doctor-articles/x/10.json"] {
        let response = app.send(get(uri, None)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json_body(response).await["code"], 400);
    }
}
