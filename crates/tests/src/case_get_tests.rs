use axum::http::StatusCode;
use chrono::{Duration, Utc};

use crate::common::{
    get, seed_advocate, seed_analysis, seed_document, seed_history, test_app, timestamp,
    token_for, CaseSeed,
};

#[tokio::test]
async fn get_case_returns_flattened_detail() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let id = CaseSeed::new(me)
        .case_number("WP(C) 12/2024")
        .judge("Justice Nair")
        .hearing_in(Duration::days(4))
        .insert(&pool)
        .await;

    let (status, resp) = get(&app, &format!("/api/v1/cases/{id}"), Some(&token_for(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["id"], id.to_string());
    assert_eq!(resp["case_number"], "WP(C) 12/2024");
    assert_eq!(resp["judge_name"], "Justice Nair");
    assert_eq!(resp["status"], "pending");
    assert_eq!(resp["party_role"], "petitioner");
    assert!(resp["next_hearing_date"].as_str().unwrap().ends_with('Z'));
    assert_eq!(resp["documents"], serde_json::json!([]));
    assert_eq!(resp["history"], serde_json::json!([]));
    assert!(resp["ai_analysis"].is_null());
}

#[tokio::test]
async fn get_case_includes_related_records() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let id = CaseSeed::new(me).insert(&pool).await;
    let doc = seed_document(&pool, id, "interim-order").await;

    let now = Utc::now();
    let older = seed_history(&pool, id, now - Duration::days(20), "Notice issued").await;
    let newer = seed_history(&pool, id, now - Duration::days(2), "Adjourned").await;

    let first = seed_analysis(&pool, id, me, now - Duration::days(5), "first").await;
    seed_analysis(&pool, id, me, now - Duration::days(1), "second").await;

    let (status, resp) = get(&app, &format!("/api/v1/cases/{id}"), Some(&token_for(me))).await;
    assert_eq!(status, StatusCode::OK);

    let documents = resp["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["id"], doc.to_string());
    assert_eq!(documents[0]["category"], "order");
    assert_eq!(documents[0]["ai_metadata"]["pages"], 3);
    assert!(documents[0]["created_at"].as_str().unwrap().ends_with('Z'));

    let history = resp["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], newer.to_string());
    assert_eq!(history[1]["id"], older.to_string());
    assert!(timestamp(&history[0]["event_date"]) > timestamp(&history[1]["event_date"]));

    assert_eq!(resp["ai_analysis"]["id"], first.to_string());
    assert_eq!(resp["ai_analysis"]["case_summary"], "first");
    assert_eq!(resp["ai_analysis"]["analysis"]["issues"][0], "limitation");
}

#[tokio::test]
async fn get_foreign_case_is_forbidden() {
    let (app, pool, _guard) = test_app().await;

    let owner = seed_advocate(&pool).await;
    let intruder = seed_advocate(&pool).await;
    let id = CaseSeed::new(owner).insert(&pool).await;

    let (status, resp) = get(&app, &format!("/api/v1/cases/{id}"), Some(&token_for(intruder))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["message"], "Not authorized to access this case");
}

#[tokio::test]
async fn get_unknown_case_is_not_found() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    let (status, resp) = get(
        &app,
        &format!("/api/v1/cases/{}", uuid::Uuid::new_v4()),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["message"], "Case not found");
}

#[tokio::test]
async fn get_with_malformed_id_is_bad_request() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    let (status, resp) = get(&app, "/api/v1/cases/not-a-uuid", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid UUID format");
}

#[tokio::test]
async fn hidden_case_is_still_retrievable_by_owner() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let id = CaseSeed::new(me).hidden().insert(&pool).await;

    let (status, resp) = get(&app, &format!("/api/v1/cases/{id}"), Some(&token_for(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["is_visible"], false);
}
