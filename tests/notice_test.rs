mod common;

use common::*;

async fn create_notice(
    app: &TestApp,
    token: &str,
    body: serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = app
        .client
        .post(app.url("/notices"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn notice_mutations_are_admin_gated() {
    let app = spawn_app().await;
    let (user_id, user_token) = seed_user(&app.db, "pleb").await;

    let resp = app
        .client
        .post(app.url("/notices"))
        .json(&serde_json::json!({ "title": "T", "content": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "로그인이 필요합니다.");

    let (status, body) = create_notice(
        &app,
        &user_token,
        serde_json::json!({ "title": "T", "content": "C" }),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "관리자 권한이 필요합니다.");

    // The role is re-read on every request, so promotion is immediate
    make_admin(&app.db, user_id).await;
    let (status, body) = create_notice(
        &app,
        &user_token,
        serde_json::json!({ "title": "점검 안내", "content": "내용", "type": "MAINTENANCE" }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["notice"]["type"], "MAINTENANCE");
    assert_eq!(body["notice"]["isPinned"], false);
}

#[tokio::test]
async fn unpublished_notices_hide_behind_a_404_for_non_admins() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = seed_user(&app.db, "admin").await;
    make_admin(&app.db, admin_id).await;
    let (_user_id, user_token) = seed_user(&app.db, "pleb").await;

    let (status, body) = create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "비공개", "content": "준비 중" }),
    )
    .await;
    assert_eq!(status, 201);
    let notice_id = body["notice"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "isPublished": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Anonymous and plain users both get a 404, never a 403
    for token in [None, Some(&user_token)] {
        let mut req = app.client.get(app.url(&format!("/notices/{}", notice_id)));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.unwrap();
        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "공지사항을 찾을 수 없습니다.");
    }

    let resp = app
        .client
        .get(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["content"], "준비 중");

    // And it disappears from the public listing
    let body: serde_json::Value = app
        .client
        .get(app.url("/notices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn type_filter_validates_against_the_allow_list() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = seed_user(&app.db, "admin").await;
    make_admin(&app.db, admin_id).await;

    create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "공지", "content": "내용" }),
    )
    .await;
    create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "이벤트", "content": "내용", "type": "EVENT" }),
    )
    .await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/notices?type=EVENT"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert_eq!(body["notices"][0]["title"], "이벤트");

    // Unknown values mean "no filter", not an error
    let body: serde_json::Value = app
        .client
        .get(app.url("/notices?type=PARTY"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"].as_u64().unwrap(), 2);
}

#[tokio::test]
async fn pinned_notices_sort_before_newer_ones() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = seed_user(&app.db, "admin").await;
    make_admin(&app.db, admin_id).await;

    create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "고정 공지", "content": "내용", "isPinned": true }),
    )
    .await;
    create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "최신 공지", "content": "내용" }),
    )
    .await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/notices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["notices"][0]["title"], "고정 공지");
    assert_eq!(body["notices"][1]["title"], "최신 공지");
}

#[tokio::test]
async fn date_fields_distinguish_null_from_omitted() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = seed_user(&app.db, "admin").await;
    make_admin(&app.db, admin_id).await;

    let (status, body) = create_notice(
        &app,
        &admin_token,
        serde_json::json!({
            "title": "이벤트",
            "content": "기간 한정",
            "type": "EVENT",
            "startDate": "2026-09-01T00:00:00Z",
            "endDate": "2026-09-30T23:59:59Z",
        }),
    )
    .await;
    assert_eq!(status, 201);
    let notice_id = body["notice"]["id"].as_i64().unwrap();
    assert!(body["notice"]["startDate"].as_str().is_some());

    // Omitting both dates leaves them untouched
    let resp = app
        .client
        .put(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "title": "이벤트 (수정)" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["notice"]["startDate"].as_str().is_some());
    assert!(body["notice"]["endDate"].as_str().is_some());

    // An explicit null clears just that field
    let resp = app
        .client
        .put(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "startDate": null }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["notice"]["startDate"].is_null());
    assert!(body["notice"]["endDate"].as_str().is_some());
}

#[tokio::test]
async fn delete_answers_success_true() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = seed_user(&app.db, "admin").await;
    make_admin(&app.db, admin_id).await;

    let (_status, body) = create_notice(
        &app,
        &admin_token,
        serde_json::json!({ "title": "지울 공지", "content": "내용" }),
    )
    .await;
    let notice_id = body["notice"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let resp = app
        .client
        .delete(app.url(&format!("/notices/{}", notice_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
