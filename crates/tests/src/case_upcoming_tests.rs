use axum::http::StatusCode;
use chrono::Duration;

use crate::common::{case_ids, get, seed_advocate, test_app, token_for, CaseSeed};

#[tokio::test]
async fn upcoming_lists_window_soonest_first() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let in_five = CaseSeed::new(me).hearing_in(Duration::days(5)).insert(&pool).await;
    let in_one = CaseSeed::new(me).hearing_in(Duration::days(1)).insert(&pool).await;
    CaseSeed::new(me).hearing_in(Duration::days(10)).insert(&pool).await;
    CaseSeed::new(me).hearing_in(-Duration::days(1)).insert(&pool).await;
    CaseSeed::new(me).insert(&pool).await;

    let (status, resp) = get(&app, "/api/v1/cases/upcoming-hearings", Some(&token_for(me))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case_ids(&resp), vec![in_one.to_string(), in_five.to_string()]);
}

#[tokio::test]
async fn upcoming_window_is_configurable() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let soon = CaseSeed::new(me).hearing_in(Duration::days(2)).insert(&pool).await;
    let later = CaseSeed::new(me).hearing_in(Duration::days(40)).insert(&pool).await;
    let token = token_for(me);

    let (_, resp) = get(&app, "/api/v1/cases/upcoming-hearings?days=1", Some(&token)).await;
    assert!(case_ids(&resp).is_empty());

    let (_, resp) = get(&app, "/api/v1/cases/upcoming-hearings?days=90", Some(&token)).await;
    assert_eq!(case_ids(&resp), vec![soon.to_string(), later.to_string()]);
}

#[tokio::test]
async fn upcoming_excludes_foreign_and_hidden_cases() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let other = seed_advocate(&pool).await;
    let mine = CaseSeed::new(me).hearing_in(Duration::days(3)).insert(&pool).await;
    CaseSeed::new(me).hearing_in(Duration::days(3)).hidden().insert(&pool).await;
    CaseSeed::new(other).hearing_in(Duration::days(3)).insert(&pool).await;

    let (_, resp) = get(&app, "/api/v1/cases/upcoming-hearings", Some(&token_for(me))).await;
    assert_eq!(case_ids(&resp), vec![mine.to_string()]);
}

#[tokio::test]
async fn days_out_of_range_is_rejected() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    for days in [0, 91, -3] {
        let (status, _) = get(
            &app,
            &format!("/api/v1/cases/upcoming-hearings?days={days}"),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "days={days}");
    }
}
