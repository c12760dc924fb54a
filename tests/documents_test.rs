mod common;

use common::{TestApp, TEST_USER_ID};

async fn analyzed_document_id(app: &TestApp, client: &reqwest::Client, owner: &str) -> String {
    let response = app
        .analyze(client, owner, "report.txt", b"some content".to_vec())
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["documentId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn history_is_owner_scoped_and_newest_first() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let first = analyzed_document_id(&app, &client, TEST_USER_ID).await;
    let second = analyzed_document_id(&app, &client, TEST_USER_ID).await;
    analyzed_document_id(&app, &client, "u2").await;

    let response = client
        .get(format!("{}/documents/history", app.address))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let documents = body.as_array().unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0]["id"], second.as_str());
    assert_eq!(documents[1]["id"], first.as_str());
    assert!(documents.iter().all(|d| d["owner_id"] == TEST_USER_ID));

    let stored = app.store.list(TEST_USER_ID).await.unwrap();
    assert!(stored[0].timestamp > stored[1].timestamp);
}

#[tokio::test]
async fn history_without_user_header_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = reqwest::Client::new()
        .get(format!("{}/documents/history", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fetching_a_missing_document_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = reqwest::Client::new()
        .get(format!("{}/documents/no-such-id", app.address))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_document_then_fetching_it_returns_not_found() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let document_id = analyzed_document_id(&app, &client, TEST_USER_ID).await;

    let deleted = client
        .delete(format!("{}/documents/{}", app.address, document_id))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(deleted.status(), reqwest::StatusCode::OK);

    let fetched = client
        .get(format!("{}/documents/{}", app.address, document_id))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(fetched.status(), reqwest::StatusCode::NOT_FOUND);

    // Deleting again distinguishes the no-op from the successful delete.
    let deleted_again = client
        .delete(format!("{}/documents/{}", app.address, document_id))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(deleted_again.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_nonexistent_document_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = reqwest::Client::new()
        .delete(format!("{}/documents/never-existed", app.address))
        .header("X-User-Id", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
