use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{get, seed_advocate, seed_document, test_app, token_for, CaseSeed};

#[tokio::test]
async fn stats_count_visible_cases_by_status_and_type() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let other = seed_advocate(&pool).await;
    CaseSeed::new(me).status("pending").case_type("WP(C)").insert(&pool).await;
    CaseSeed::new(me).status("pending").case_type("OP").insert(&pool).await;
    CaseSeed::new(me).status("disposed").case_type("WP(C)").insert(&pool).await;
    CaseSeed::new(me).status("pending").case_type("OP").hidden().insert(&pool).await;
    CaseSeed::new(other).status("pending").insert(&pool).await;

    let (status, stats) = get(&app, "/api/v1/cases/stats", Some(&token_for(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_cases"], 3);
    assert_eq!(stats["pending_cases"], 2);
    assert_eq!(stats["disposed_cases"], 1);
    assert_eq!(
        stats["cases_by_status"],
        json!({"filed": 0, "registered": 0, "pending": 2, "disposed": 1, "transferred": 0})
    );
    assert_eq!(stats["cases_by_type"], json!({"WP(C)": 2, "OP": 1}));
}

#[tokio::test]
async fn upcoming_hearing_count_includes_hidden_cases() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    CaseSeed::new(me).hearing_in(Duration::days(2)).insert(&pool).await;
    CaseSeed::new(me).hearing_in(Duration::days(3)).hidden().insert(&pool).await;
    CaseSeed::new(me).hearing_in(Duration::days(30)).insert(&pool).await;

    let (_, stats) = get(&app, "/api/v1/cases/stats", Some(&token_for(me))).await;
    assert_eq!(stats["upcoming_hearings"], 2);
    assert_eq!(stats["total_cases"], 2);
}

#[tokio::test]
async fn monthly_trend_groups_recent_cases_chronologically() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    // 39 days apart, so always two distinct calendar months.
    CaseSeed::new(me).created_ago(Duration::days(1)).insert(&pool).await;
    CaseSeed::new(me).created_ago(Duration::days(40)).insert(&pool).await;
    CaseSeed::new(me).created_ago(Duration::days(40)).hidden().insert(&pool).await;
    CaseSeed::new(me).created_ago(Duration::days(200)).insert(&pool).await;

    let (_, stats) = get(&app, "/api/v1/cases/stats", Some(&token_for(me))).await;

    let now = Utc::now();
    let label = |age: i64| (now - Duration::days(age)).format("%b").to_string();
    assert_eq!(
        stats["monthly_trend"],
        json!([
            {"month": label(40), "count": 2},
            {"month": label(1), "count": 1},
        ])
    );
}

#[tokio::test]
async fn stats_for_new_advocate_are_zero() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let (_, stats) = get(&app, "/api/v1/cases/stats", Some(&token_for(me))).await;
    assert_eq!(
        stats,
        json!({
            "total_cases": 0,
            "pending_cases": 0,
            "disposed_cases": 0,
            "upcoming_hearings": 0,
            "total_documents": 0,
            "cases_by_status": {
                "filed": 0,
                "registered": 0,
                "pending": 0,
                "disposed": 0,
                "transferred": 0,
            },
            "cases_by_type": {},
            "monthly_trend": [],
        })
    );
}

#[tokio::test]
async fn total_documents_counts_visible_owned_cases_only() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let other = seed_advocate(&pool).await;
    let visible = CaseSeed::new(me).insert(&pool).await;
    let hidden = CaseSeed::new(me).hidden().insert(&pool).await;
    let foreign = CaseSeed::new(other).insert(&pool).await;
    seed_document(&pool, visible, "petition").await;
    seed_document(&pool, visible, "interim-order").await;
    seed_document(&pool, hidden, "old-order").await;
    seed_document(&pool, foreign, "their-order").await;

    let (_, stats) = get(&app, "/api/v1/cases/stats", Some(&token_for(me))).await;
    assert_eq!(stats["total_documents"], 2);
}
