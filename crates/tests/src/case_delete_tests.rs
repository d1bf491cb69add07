use axum::http::StatusCode;
use chrono::Duration;

use crate::common::{case_ids, delete, get, seed_advocate, test_app, timestamp, token_for, CaseSeed};

#[tokio::test]
async fn delete_hides_case_but_keeps_row() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let id = CaseSeed::new(me)
        .case_number("2024/CW/77")
        .hearing_in(Duration::days(2))
        .updated_ago(Duration::days(1))
        .insert(&pool)
        .await;
    let token = token_for(me);

    let (status, resp) = delete(&app, &format!("/api/v1/cases/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Case deleted successfully");
    assert_eq!(resp["case_id"], id.to_string());

    let (visible, updated_at): (bool, chrono::DateTime<chrono::Utc>) =
        sqlx::query_as("SELECT is_visible, updated_at FROM cases WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!visible);
    assert!(updated_at > chrono::Utc::now() - Duration::minutes(5));

    let (status, detail) = get(&app, &format!("/api/v1/cases/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["is_visible"], false);
    assert!(timestamp(&detail["updated_at"]) > chrono::Utc::now() - Duration::minutes(5));
}

#[tokio::test]
async fn deleted_case_leaves_every_listing() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let id = CaseSeed::new(me)
        .case_number("2024/CW/78")
        .hearing_in(Duration::days(2))
        .insert(&pool)
        .await;
    let token = token_for(me);

    delete(&app, &format!("/api/v1/cases/{id}"), &token).await;

    let (_, list) = get(&app, "/api/v1/cases", Some(&token)).await;
    assert!(case_ids(&list).is_empty());
    assert_eq!(list["total"], 0);

    let (_, search) = get(&app, "/api/v1/cases/search?q=2024%2FCW%2F78", Some(&token)).await;
    assert!(case_ids(&search).is_empty());

    let (_, upcoming) = get(&app, "/api/v1/cases/upcoming-hearings", Some(&token)).await;
    assert!(case_ids(&upcoming).is_empty());
}

#[tokio::test]
async fn delete_foreign_case_is_forbidden() {
    let (app, pool, _guard) = test_app().await;

    let owner = seed_advocate(&pool).await;
    let intruder = seed_advocate(&pool).await;
    let id = CaseSeed::new(owner).insert(&pool).await;

    let (status, resp) = delete(&app, &format!("/api/v1/cases/{id}"), &token_for(intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["message"], "Not authorized to delete this case");

    let (_, list) = get(&app, "/api/v1/cases", Some(&token_for(owner))).await;
    assert_eq!(case_ids(&list), vec![id.to_string()]);
}

#[tokio::test]
async fn delete_unknown_case_is_not_found() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    let (status, _) = delete(
        &app,
        &format!("/api/v1/cases/{}", uuid::Uuid::new_v4()),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
