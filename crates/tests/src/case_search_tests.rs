use axum::http::StatusCode;

use crate::common::{case_ids, get, seed_advocate, test_app, token_for, CaseSeed};

#[tokio::test]
async fn search_finds_case_by_number() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let target = CaseSeed::new(me).case_number("2024/CW/1").insert(&pool).await;
    CaseSeed::new(me).case_number("2023/OP/9").insert(&pool).await;

    let (status, resp) = get(
        &app,
        "/api/v1/cases/search?q=2024%2FCW%2F1",
        Some(&token_for(me)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case_ids(&resp), vec![target.to_string()]);
    assert!(resp.get("total").is_none());
}

#[tokio::test]
async fn search_matches_efiling_number_and_parties() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let by_respondent = CaseSeed::new(me)
        .parties("Lakshmi", "Kerala State Electricity Board")
        .insert(&pool)
        .await;
    let token = token_for(me);

    let (_, resp) = get(&app, "/api/v1/cases/search?q=electricity", Some(&token)).await;
    assert_eq!(case_ids(&resp), vec![by_respondent.to_string()]);

    let (_, resp) = get(&app, "/api/v1/cases/search?q=EF-", Some(&token)).await;
    assert_eq!(case_ids(&resp).len(), 1);
}

#[tokio::test]
async fn search_is_scoped_to_owner_and_visible() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    let other = seed_advocate(&pool).await;
    let mine = CaseSeed::new(me).parties("Shared Name", "X").insert(&pool).await;
    CaseSeed::new(me).parties("Shared Name", "Y").hidden().insert(&pool).await;
    CaseSeed::new(other).parties("Shared Name", "Z").insert(&pool).await;

    let (_, resp) = get(&app, "/api/v1/cases/search?q=shared", Some(&token_for(me))).await;
    assert_eq!(case_ids(&resp), vec![mine.to_string()]);
}

#[tokio::test]
async fn search_is_capped_at_fifty() {
    let (app, pool, _guard) = test_app().await;

    let me = seed_advocate(&pool).await;
    for _ in 0..55 {
        CaseSeed::new(me).parties("Bulk Petitioner", "State").insert(&pool).await;
    }

    let (_, resp) = get(&app, "/api/v1/cases/search?q=bulk", Some(&token_for(me))).await;
    assert_eq!(case_ids(&resp).len(), 50);
}

#[tokio::test]
async fn short_query_is_rejected() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    let (status, resp) = get(&app, "/api/v1/cases/search?q=a", Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        resp["field_errors"]["q"],
        "Search query must be at least 2 characters"
    );
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let (app, pool, _guard) = test_app().await;

    let token = token_for(seed_advocate(&pool).await);
    let (status, _) = get(&app, "/api/v1/cases/search", Some(&token)).await;
    assert!(status.is_client_error());
}
