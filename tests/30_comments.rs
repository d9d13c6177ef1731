mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

async fn comment(app: &TestApp, token: &str, photo_id: &Value, message: &str) -> Result<Value> {
    let (status, body) = app
        .post("/comments", Some(token), json!({ "message": message, "photo_id": photo_id }))
        .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create comment returned {}: {}", status, body);
    Ok(body)
}

#[tokio::test]
async fn comment_on_missing_photo_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;

    let (status, body) = app
        .post("/comments", Some(&alice), json!({ "message": "hi", "photo_id": 999 }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Photo not found");
    Ok(())
}

#[tokio::test]
async fn author_comes_from_the_token_not_the_body() -> Result<()> {
    let app = TestApp::new();
    let (alice_id, alice) = app.signup("alice").await?;
    let (bob_id, _) = app.signup("bob").await?;
    let photo = app.create_photo(&alice, "sunset").await?;

    let (status, body) = app
        .post(
            "/comments",
            Some(&alice),
            json!({ "message": "hi", "photo_id": photo["id"], "user_id": bob_id }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], alice_id);

    let (_, stored) = app.get(&format!("/comments/{}", body["id"]), None).await?;
    assert_eq!(stored["user"]["id"], alice_id);
    Ok(())
}

#[tokio::test]
async fn reads_embed_author_and_photo() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;
    let (bob_id, bob) = app.signup("bob").await?;

    let photo = app.create_photo(&alice, "sunset").await?;
    let created = comment(&app, &bob, &photo["id"], "lovely").await?;
    assert_eq!(created["user_id"], bob_id);
    assert_eq!(created["photo_id"], photo["id"]);

    let (status, list) = app.get("/comments", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["message"], "lovely");
    assert_eq!(list[0]["user"]["username"], "bob");
    assert_eq!(list[0]["photo"]["title"], "sunset");

    let (status, one) = app.get(&format!("/comments/{}", created["id"]), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["photo"]["id"], photo["id"]);
    assert_eq!(one["user"]["id"], bob_id);
    Ok(())
}

#[tokio::test]
async fn only_the_author_can_edit_or_delete() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;
    let (_, bob) = app.signup("bob").await?;

    let photo = app.create_photo(&alice, "sunset").await?;
    let created = comment(&app, &bob, &photo["id"], "lovely").await?;
    let uri = format!("/comments/{}", created["id"]);

    // The photo owner is not the comment owner
    let (status, body) = app.put(&uri, Some(&alice), json!({ "message": "edited" })).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    let (status, _) = app.delete(&uri, Some(&alice)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, stored) = app.get(&uri, None).await?;
    assert_eq!(stored["message"], "lovely");

    let (status, body) = app.put(&uri, Some(&bob), json!({ "message": "edited" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "edited");

    let (status, _) = app.delete(&uri, Some(&bob)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_cannot_move_a_comment() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;
    let first = app.create_photo(&alice, "first").await?;
    let second = app.create_photo(&alice, "second").await?;

    let created = comment(&app, &alice, &first["id"], "hi").await?;
    let (status, body) = app
        .put(
            &format!("/comments/{}", created["id"]),
            Some(&alice),
            json!({ "message": "hello", "photo_id": second["id"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["photo_id"], first["id"]);
    assert_eq!(body["message"], "hello");
    Ok(())
}

#[tokio::test]
async fn deleting_a_photo_removes_its_comments() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;
    let (_, bob) = app.signup("bob").await?;

    let photo = app.create_photo(&alice, "sunset").await?;
    let created = comment(&app, &bob, &photo["id"], "lovely").await?;

    let (status, _) = app.delete(&format!("/photos/{}", photo["id"]), Some(&alice)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/comments/{}", created["id"]), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_comment_id() -> Result<()> {
    let app = TestApp::new();
    let (_, alice) = app.signup("alice").await?;

    let (status, body) = app.delete("/comments/1.5", Some(&alice)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid comment ID");
    Ok(())
}
