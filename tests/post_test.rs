mod common;

use common::*;

#[tokio::test]
async fn create_and_fetch_post_round_trip() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "writer").await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;

    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "My First Post",
            "content": "본문 내용입니다.",
            "categoryId": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(created["slug"]
        .as_str()
        .unwrap()
        .starts_with("my-first-post-"));

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched["title"], "My First Post");
    assert_eq!(fetched["content"], "본문 내용입니다.");
    assert_eq!(fetched["category"]["id"].as_i64().unwrap(), category_id as i64);
}

#[tokio::test]
async fn create_post_requires_login() {
    let app = spawn_app().await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;

    let resp = app
        .client
        .post(app.url("/posts"))
        .json(&serde_json::json!({
            "title": "T",
            "content": "C",
            "categoryId": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "로그인이 필요합니다.");
}

#[tokio::test]
async fn create_post_validates_required_fields() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "writer").await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;

    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "   ",
            "content": "C",
            "categoryId": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "제목은 필수입니다.");

    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "T",
            "content": "C",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "카테고리는 필수입니다.");
}

#[tokio::test]
async fn each_detail_fetch_increments_view_count_by_one() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "viewer").await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;
    let post_id = create_test_post(&app, &token, category_id, "조회수 테스트", "내용").await;

    let first: serde_json::Value = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: serde_json::Value = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let third: serde_json::Value = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let v1 = first["viewCount"].as_i64().unwrap();
    let v2 = second["viewCount"].as_i64().unwrap();
    let v3 = third["viewCount"].as_i64().unwrap();
    assert_eq!(v2, v1 + 1);
    assert_eq!(v3, v2 + 1);
}

#[tokio::test]
async fn pagination_past_the_last_page_returns_empty() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "bulk").await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;

    for i in 0..50 {
        create_test_post(&app, &token, category_id, &format!("글 {}", i), "내용").await;
    }

    let body: serde_json::Value = app
        .client
        .get(app.url("/posts?limit=20&page=4"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"].as_u64().unwrap(), 50);
    assert_eq!(body["totalPages"].as_u64().unwrap(), 3);
    assert_eq!(body["page"].as_u64().unwrap(), 4);
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);

    let body: serde_json::Value = app
        .client
        .get(app.url("/posts?limit=20&page=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["posts"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn only_the_author_may_update_or_delete() {
    let app = spawn_app().await;
    let (_owner_id, owner_token) = seed_user(&app.db, "owner").await;
    let (_other_id, other_token) = seed_user(&app.db, "other").await;
    let (category_id, _slug) = seed_category(&app.db, "free").await;
    let post_id = create_test_post(&app, &owner_token, category_id, "내 글", "내용").await;

    let resp = app
        .client
        .put(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({ "title": "탈취" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "수정 권한이 없습니다.");

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "삭제 권한이 없습니다.");

    // Owner update applies only the supplied fields
    let resp = app
        .client
        .put(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&owner_token)
        .json(&serde_json::json!({ "title": "수정된 제목" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "수정된 제목");
    assert_eq!(body["content"], "내용");

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "게시글이 삭제되었습니다.");
}

#[tokio::test]
async fn mutating_a_missing_post_is_not_found_before_ownership() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "ghost").await;

    let resp = app
        .client
        .put(app.url("/posts/999999"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "title": "없는 글" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "게시글을 찾을 수 없습니다.");
}

#[tokio::test]
async fn list_filters_by_category_slug() {
    let app = spawn_app().await;
    let (_user_id, token) = seed_user(&app.db, "writer").await;
    let (free_id, free_slug) = seed_category(&app.db, "free").await;
    let (guide_id, _guide_slug) = seed_category(&app.db, "guide").await;

    create_test_post(&app, &token, free_id, "자유글", "내용").await;
    create_test_post(&app, &token, guide_id, "공략글", "내용").await;

    let body: serde_json::Value = app
        .client
        .get(app.url(&format!("/posts?category={}", free_slug)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert_eq!(body["posts"][0]["title"], "자유글");

    // An unknown slug matches nothing rather than erroring
    let body: serde_json::Value = app
        .client
        .get(app.url("/posts?category=no-such-board"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"].as_u64().unwrap(), 0);
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
}
