mod common;

use anyhow::Result;
use axum::body::to_bytes;
use axum::http::{header, Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use form_builder_api::storage::submission_path;

#[tokio::test]
async fn uploaded_assets_are_served_through_a_redirect() -> Result<()> {
    let app = common::TestApp::new(false).await;
    let upload = Uuid::new_v4();
    app.storage.put(&format!("tmp/{}", upload), vec![7u8; 64]).await?;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/forms/assets/upload",
            Some(json!({"url": format!("Cover Image_{}.jpg", upload)})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "File uploaded.");

    let file_name = format!("cover-image_{}.jpg", upload);
    assert_eq!(
        body["data"]["url"],
        format!("{}/forms/assets/{}", common::APP_URL, file_name)
    );

    let response = app
        .raw(None, Method::GET, &format!("/forms/assets/{}", file_name), None)
        .await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str()?;
    assert!(location.contains(&format!("assets/forms/{}", file_name)));
    assert!(location.contains("signature="));
    Ok(())
}

#[tokio::test]
async fn asset_redirects_lead_to_the_file() -> Result<()> {
    let app = common::TestApp::new(false).await;
    let upload = Uuid::new_v4();
    app.storage.put(&format!("tmp/{}", upload), b"\x89PNG logo".to_vec()).await?;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/forms/assets/upload",
            Some(json!({"url": format!("logo_{}.png", upload)})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .raw(None, Method::GET, &format!("/forms/assets/logo_{}.png", upload), None)
        .await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = url::Url::parse(response.headers()[header::LOCATION].to_str()?)?;
    assert!(location.path().starts_with("/storage/"));
    let target = format!("{}?{}", location.path(), location.query().unwrap_or_default());

    let response = app.raw(None, Method::GET, &target, None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"\x89PNG logo");

    let tampered = target.replace("signature=", "signature=00");
    let (status, _) = app.send_as(None, Method::GET, &tampered, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let unsigned = location.path().to_string();
    let (status, _) = app.send_as(None, Method::GET, &unsigned, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_uploads_and_assets_are_reported() -> Result<()> {
    let app = common::TestApp::new(false).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/forms/assets/upload",
            Some(json!({"url": Uuid::new_v4().to_string()})),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "File not found.");

    let (status, _) = app
        .send_as(None, Method::GET, "/forms/assets/nothing-here.png", None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn submitted_files_are_visible_to_members_only() -> Result<()> {
    let app = common::TestApp::new(false).await;
    let (_, body) = app
        .send(Method::POST, "/api/forms", Some(app.form_payload(json!([]))))
        .await?;
    let id = Uuid::parse_str(body["data"]["form"]["id"].as_str().unwrap())?;
    let uri = format!("/api/forms/{}/uploads/resume.pdf", id);

    let (status, _) = app.send(Method::GET, &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.storage.put(&submission_path(id, "resume.pdf"), b"%PDF".to_vec()).await?;

    let response = app.raw(Some(app.token.as_str()), Method::GET, &uri, None).await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let outsider = common::token_for(Uuid::new_v4());
    let (status, _) = app.send_as(Some(outsider.as_str()), Method::GET, &uri, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn workspace_helpers_require_membership() -> Result<()> {
    let app = common::TestApp::new(false).await;

    let users = format!("/api/workspaces/{}/users", app.workspace.id);
    let (status, body) = app.send(Method::GET, &users, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_array());

    let outsider = common::token_for(Uuid::new_v4());
    let (status, _) = app.send_as(Some(outsider.as_str()), Method::GET, &users, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
