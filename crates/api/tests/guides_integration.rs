//! Integration tests for guide visibility, ownership and presentation.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

async fn guide_titles(app: &axum::Router, token: &str) -> Vec<String> {
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/guides", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_owner_sees_own_guide_stranger_does_not() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());

    let owner = create_user_account(&pool).await;
    let stranger = create_user_account(&pool).await;

    let title = format!("Loire castles {}", uuid::Uuid::new_v4().simple());
    let guide_id = create_test_guide(&app, &owner.token, &title).await;

    assert!(guide_titles(&app, &owner.token).await.contains(&title));
    assert!(!guide_titles(&app, &stranger.token).await.contains(&title));

    // By id: owner reads it, the stranger gets NotFound (never Forbidden)
    let owner_get = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/guides/{}", guide_id),
            &owner.token,
        ))
        .await
        .unwrap();
    assert_eq!(owner_get.status(), StatusCode::OK);

    let stranger_get = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/guides/{}", guide_id),
            &stranger.token,
        ))
        .await
        .unwrap();
    assert_eq!(stranger_get.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invited_by_email_sees_guide_case_insensitively() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());

    let owner = create_user_account(&pool).await;
    // Registered email differs from the invited email only by case
    let invitee = create_account(&pool, "Casing.Test@Example.com", "invitee-pass", false).await;

    let title = format!("Brittany coast {}", uuid::Uuid::new_v4().simple());
    let guide_id = create_test_guide(&app, &owner.token, &title).await;
    create_test_invitation(&app, &owner.token, &guide_id, "casing.test@example.com").await;

    assert!(guide_titles(&app, &invitee.token).await.contains(&title));
}

#[tokio::test]
async fn test_admin_sees_all_guides() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());

    let owner = create_user_account(&pool).await;
    let admin = create_admin_account(&pool).await;

    let title = format!("Admin-visible {}", uuid::Uuid::new_v4().simple());
    create_test_guide(&app, &owner.token, &title).await;

    assert!(guide_titles(&app, &admin.token).await.contains(&title));
}

#[tokio::test]
async fn test_create_guide_ignores_client_supplied_owner() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());

    let creator = create_user_account(&pool).await;
    let other = create_user_account(&pool).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/guides",
        serde_json::json!({
            "title": "Owner-forcing test",
            "mobility": "bike",
            "season": "spring",
            "audience": "solo",
            "owner": other.user.id.to_string()
        }),
        &creator.token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["owner"], creator.user.id.to_string());
    assert_eq!(body["owner_username"], creator.user.username.as_str());
}

#[tokio::test]
async fn test_guide_create_rejects_bad_values() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());
    let owner = create_user_account(&pool).await;

    for payload in [
        serde_json::json!({"title": "T", "days": 0, "mobility": "car", "season": "summer", "audience": "family"}),
        serde_json::json!({"title": "T", "mobility": "rocket", "season": "summer", "audience": "family"}),
        serde_json::json!({"title": "T", "mobility": "car", "season": "monsoon", "audience": "family"}),
        serde_json::json!({"title": "T", "mobility": "car", "season": "summer", "audience": "pets"}),
    ] {
        let request =
            json_request_with_auth(Method::POST, "/api/guides", payload.clone(), &owner.token);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "accepted {:?}",
            payload
        );
    }
}

#[tokio::test]
async fn test_invitee_cannot_modify_guide() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());

    let owner = create_user_account(&pool).await;
    let invitee = create_user_account(&pool).await;

    let guide_id = create_test_guide(&app, &owner.token, "Read-only for invitees").await;
    create_test_invitation(&app, &owner.token, &guide_id, &invitee.user.email).await;

    // The invitee can read the guide but not modify it
    let update = json_request_with_auth(
        Method::PATCH,
        &format!("/api/guides/{}", guide_id),
        serde_json::json!({"title": "Hijacked"}),
        &invitee.token,
    );
    let response = app.clone().oneshot(update).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let delete = delete_request_with_auth(&format!("/api/guides/{}", guide_id), &invitee.token);
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guide_response_groups_activities_by_day() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());
    let owner = create_user_account(&pool).await;

    let guide_id = create_test_guide(&app, &owner.token, "Grouping test").await;

    // Insert out of order; the API must return canonical order
    create_test_activity(&app, &owner.token, &guide_id, "B", 1, 2).await;
    create_test_activity(&app, &owner.token, &guide_id, "A", 1, 1).await;
    create_test_activity(&app, &owner.token, &guide_id, "C", 2, 1).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/guides/{}", guide_id),
            &owner.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    let flat: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(flat, vec!["A", "B", "C"]);

    let day1: Vec<&str> = body["activities_by_day"]["1"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(day1, vec!["A", "B"]);

    let day2: Vec<&str> = body["activities_by_day"]["2"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(day2, vec!["C"]);
}

#[tokio::test]
async fn test_delete_guide_cascades_to_activities_and_invitations() {
    let Some(pool) = try_test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = create_test_app(pool.clone());
    let owner = create_user_account(&pool).await;

    let guide_id = create_test_guide(&app, &owner.token, "Cascade test").await;
    let activity_id = create_test_activity(&app, &owner.token, &guide_id, "Stop", 1, 1).await;
    let invitation_id =
        create_test_invitation(&app, &owner.token, &guide_id, &unique_email()).await;

    let delete = delete_request_with_auth(&format!("/api/guides/{}", guide_id), &owner.token);
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Everything under the guide is gone
    for uri in [
        format!("/api/guides/{}", guide_id),
        format!("/api/activities/{}", activity_id),
    ] {
        let response = app
            .clone()
            .oneshot(get_request_with_auth(&uri, &owner.token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} survived", uri);
    }

    let delete_invitation = delete_request_with_auth(
        &format!("/api/invitations/{}", invitation_id),
        &owner.token,
    );
    let response = app.clone().oneshot(delete_invitation).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
