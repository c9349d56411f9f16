//! End-to-end tests against the in-memory store.

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use api_server::{AppState, configure_routes};
use circle_core::ports::TokenService;
use circle_infra::{JwtConfig, JwtTokenService, MediaConfig};

const SECRET: &str = "test-secret";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        ..JwtConfig::default()
    }
}

fn state(uploads: &TempDir) -> AppState {
    AppState::in_memory(
        jwt_config(),
        MediaConfig {
            root: uploads.path().to_path_buf(),
            public_base_url: "/uploads".to_string(),
            max_bytes: 1024,
        },
    )
}

macro_rules! app {
    ($uploads:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state(&$uploads)))
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request, returning the status and the JSON body (`Null` if none).
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }};
}

/// Register a user and return `(token, user_id)`.
macro_rules! register {
    ($app:expr, $name:expr, $email:expr) => {{
        let (status, body) = send!(
            $app,
            TestRequest::post().uri("/api/users/register").set_json(json!({
                "name": $name,
                "email": $email,
                "password": "secret123",
            }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let token = body["token"].as_str().unwrap().to_string();

        let (_, me) = send!($app, authed(TestRequest::get().uri("/api/users"), &token));
        (token, me["id"].as_str().unwrap().to_string())
    }};
}

fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("x-auth-token", token))
}

fn profile_body(skills: Value) -> Value {
    json!({ "status": "Developer", "skills": skills, "company": "Acme" })
}

#[actix_web::test]
async fn test_health_is_public() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);

    let (status, body) = send!(app, TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);

    let (token, id) = register!(app, "Ada", "Ada@Example.com");

    let (status, me) = send!(app, authed(TestRequest::get().uri("/api/users"), &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "ada@example.com");
    assert!(me["avatar"].as_str().unwrap().contains("gravatar"));
    assert!(me.get("password").is_none());
    assert!(me.get("password_hash").is_none());

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret123" }))
    );
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap();
    assert_eq!(body["expires_in"], 5 * 24 * 3600);

    let (_, me) = send!(app, authed(TestRequest::get().uri("/api/users"), login_token));
    assert_eq!(me["id"], id);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret124" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid credentials");

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "nobody@example.com", "password": "secret123" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_registration_is_conflict() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);

    register!(app, "Ada", "ada@example.com");

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/users/register").set_json(json!({
            "name": "Other",
            "email": "ADA@example.com",
            "password": "secret123",
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Conflict");
    assert_eq!(body["detail"], "User already exists");
}

#[actix_web::test]
async fn test_validation_reports_every_field() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({ "email": "not-an-email", "password": "123" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/login")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, id) = register!(app, "Ada", "ada@example.com");

    let (status, body) = send!(app, TestRequest::get().uri("/api/posts"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Authentication Required");

    let (status, _) = send!(app, TestRequest::get().uri("/api/users"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (head, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{head}.{flipped}{}", &signature[1..]);
    let (status, body) = send!(app, authed(TestRequest::get().uri("/api/profiles"), &tampered));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Invalid Token");

    let expired = JwtTokenService::new(JwtConfig {
        expiration_hours: -2,
        ..jwt_config()
    })
    .generate_token(id.parse().unwrap())
    .unwrap();
    let (status, body) = send!(app, authed(TestRequest::get().uri("/api/users"), &expired));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Token Expired");
}

#[actix_web::test]
async fn test_profile_skills_round_trip() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, id) = register!(app, "Ada", "ada@example.com");

    let (status, _) = send!(
        app,
        authed(TestRequest::get().uri("/api/profiles/me"), &token)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token)
            .set_json(profile_body(json!("a, b, c")))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, profile) = send!(
        app,
        authed(TestRequest::get().uri("/api/profiles/me"), &token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["skills"], json!(["a", "b", "c"]));
    assert_eq!(profile["user"]["id"], id);
    assert_eq!(profile["user"]["name"], "Ada");

    let (status, by_user) = send!(
        app,
        authed(
            TestRequest::get().uri(&format!("/api/profiles/user/{id}")),
            &token
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_user["id"], profile["id"]);

    let (status, all) = send!(app, authed(TestRequest::get().uri("/api/profiles"), &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_profile_upsert_overwrites_and_normalizes() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, _) = register!(app, "Ada", "ada@example.com");

    send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token).set_json(json!({
            "status": "Developer",
            "skills": ["rust"],
            "company": "Acme",
            "website": "acme.io",
            "twitter": "http://twitter.com/ada",
        }))
    );
    let (_, profile) = send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token).set_json(json!({
            "status": "Lead",
            "skills": ["go"],
            "github": "github.com/ada",
        }))
    );

    assert_eq!(profile["status"], "Lead");
    assert_eq!(profile["company"], "");
    assert_eq!(profile["website"], "");
    assert_eq!(profile["skills"], json!(["go"]));
    assert_eq!(profile["social"]["twitter"], "");
    assert_eq!(profile["social"]["github"], "https://github.com/ada");

    let (status, body) = send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token).set_json(json!({}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_experience_add_and_remove() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, _) = register!(app, "Ada", "ada@example.com");
    send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token)
            .set_json(profile_body(json!("rust")))
    );

    for title in ["First", "Second", "Third"] {
        let (status, _) = send!(
            app,
            authed(TestRequest::put().uri("/api/profiles/experience"), &token).set_json(json!({
                "title": title,
                "company": "Acme",
                "from": "2020-01-01",
            }))
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (_, profile) = send!(app, authed(TestRequest::get().uri("/api/profiles/me"), &token));
    let titles = |p: &Value| -> Vec<String> {
        p["experience"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(titles(&profile), vec!["Third", "Second", "First"]);

    let second = profile["experience"][1]["id"].as_str().unwrap().to_string();
    let (status, profile) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/profiles/experience/{second}")),
            &token
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&profile), vec!["Third", "First"]);

    let unknown = uuid::Uuid::new_v4();
    let (status, profile) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/profiles/experience/{unknown}")),
            &token
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&profile), vec!["Third", "First"]);

    let (status, body) = send!(
        app,
        authed(TestRequest::put().uri("/api/profiles/experience"), &token).set_json(json!({
            "title": "Bad",
            "company": "Acme",
            "from": "2020-01-01",
            "to": "2019-01-01",
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "to");
}

#[actix_web::test]
async fn test_education_add_and_remove() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, _) = register!(app, "Ada", "ada@example.com");
    send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &token)
            .set_json(profile_body(json!("rust")))
    );

    let (status, profile) = send!(
        app,
        authed(TestRequest::put().uri("/api/profiles/education"), &token).set_json(json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldofstudy": "CS",
            "from": "2010-09-01",
            "current": true,
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["education"][0]["fieldofstudy"], "CS");

    let id = profile["education"][0]["id"].as_str().unwrap().to_string();
    let (_, profile) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/profiles/education/{id}")),
            &token
        )
    );
    assert_eq!(profile["education"], json!([]));
}

#[actix_web::test]
async fn test_follow_twice_keeps_duplicates() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (a_token, a_id) = register!(app, "Ada", "ada@example.com");
    let (b_token, b_id) = register!(app, "Bob", "bob@example.com");

    // Following needs the caller's profile.
    let (status, _) = send!(
        app,
        authed(
            TestRequest::put().uri(&format!("/api/profiles/follow/{b_id}")),
            &a_token
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    for token in [&a_token, &b_token] {
        send!(
            app,
            authed(TestRequest::post().uri("/api/profiles"), token)
                .set_json(profile_body(json!("rust")))
        );
    }

    for _ in 0..2 {
        let (status, _) = send!(
            app,
            authed(
                TestRequest::put().uri(&format!("/api/profiles/follow/{b_id}")),
                &a_token
            )
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (_, following) = send!(
        app,
        authed(TestRequest::get().uri("/api/profiles/following"), &a_token)
    );
    let following = following.as_array().unwrap();
    assert_eq!(following.len(), 2);
    assert!(following.iter().all(|f| f["user"] == b_id && f["name"] == "Bob"));

    // The target's followers list is maintained separately.
    let (_, followers) = send!(
        app,
        authed(
            TestRequest::get().uri(&format!("/api/profiles/followers/{b_id}")),
            &a_token
        )
    );
    assert_eq!(followers, json!([]));

    let (_, following) = send!(
        app,
        authed(
            TestRequest::get().uri(&format!("/api/profiles/following/{a_id}")),
            &b_token
        )
    );
    assert_eq!(following.as_array().unwrap().len(), 2);

    let (status, following) = send!(
        app,
        authed(
            TestRequest::put().uri(&format!("/api/profiles/unfollow/{b_id}")),
            &a_token
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(following, json!([]));

    let ghost = uuid::Uuid::new_v4();
    let (status, _) = send!(
        app,
        authed(
            TestRequest::put().uri(&format!("/api/profiles/follow/{ghost}")),
            &a_token
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_posts_newest_first_and_lookup() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, id) = register!(app, "Ada", "ada@example.com");

    let mut ids = Vec::new();
    for text in ["one", "two"] {
        let (status, post) = send!(
            app,
            authed(TestRequest::post().uri("/api/posts"), &token).set_json(json!({ "text": text }))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post["user"], id);
        assert_eq!(post["name"], "Ada");
        ids.push(post["id"].as_str().unwrap().to_string());
    }

    let (_, posts) = send!(app, authed(TestRequest::get().uri("/api/posts"), &token));
    let texts: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["two", "one"]);

    let (status, post) = send!(
        app,
        authed(TestRequest::get().uri(&format!("/api/posts/{}", ids[0])), &token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["text"], "one");

    let (status, _) = send!(
        app,
        authed(TestRequest::get().uri("/api/posts/not-a-uuid"), &token)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        authed(TestRequest::post().uri("/api/posts"), &token).set_json(json!({ "text": "  " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_like_twice_is_rejected() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, id) = register!(app, "Ada", "ada@example.com");

    let (_, post) = send!(
        app,
        authed(TestRequest::post().uri("/api/posts"), &token).set_json(json!({ "text": "hi" }))
    );
    let post_id = post["id"].as_str().unwrap().to_string();

    let (status, likes) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/posts/like/{post_id}")), &token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(likes, json!([{ "user": id }]));

    let (status, body) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/posts/like/{post_id}")), &token)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Post already liked");

    let (_, post) = send!(
        app,
        authed(TestRequest::get().uri(&format!("/api/posts/{post_id}")), &token)
    );
    assert_eq!(post["likes"].as_array().unwrap().len(), 1);

    let (status, likes) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/posts/unlike/{post_id}")), &token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(likes, json!([]));

    let (status, body) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/posts/unlike/{post_id}")), &token)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Post has not yet been liked");
}

#[actix_web::test]
async fn test_only_authors_remove_comments_and_posts() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (a_token, _) = register!(app, "Ada", "ada@example.com");
    let (b_token, b_id) = register!(app, "Bob", "bob@example.com");

    let (_, post) = send!(
        app,
        authed(TestRequest::post().uri("/api/posts"), &a_token).set_json(json!({ "text": "hi" }))
    );
    let post_id = post["id"].as_str().unwrap().to_string();

    let (status, comments) = send!(
        app,
        authed(
            TestRequest::post().uri(&format!("/api/posts/comment/{post_id}")),
            &b_token
        )
        .set_json(json!({ "text": "nice" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments[0]["user"], b_id);
    assert_eq!(comments[0]["name"], "Bob");
    let comment_id = comments[0]["id"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/posts/comment/{post_id}/{comment_id}")),
            &a_token
        )
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, post) = send!(
        app,
        authed(TestRequest::get().uri(&format!("/api/posts/{post_id}")), &a_token)
    );
    assert_eq!(post["comments"].as_array().unwrap().len(), 1);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/posts/comment/{post_id}/{missing}")),
            &b_token
        )
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Comment not found");

    let (status, comments) = send!(
        app,
        authed(
            TestRequest::delete().uri(&format!("/api/posts/comment/{post_id}/{comment_id}")),
            &b_token
        )
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments, json!([]));

    let (status, _) = send!(
        app,
        authed(TestRequest::delete().uri(&format!("/api/posts/{post_id}")), &b_token)
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        authed(TestRequest::delete().uri(&format!("/api/posts/{post_id}")), &a_token)
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Post removed");

    let (status, _) = send!(
        app,
        authed(TestRequest::get().uri(&format!("/api/posts/{post_id}")), &a_token)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_account_deletion_cascades() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (a_token, _) = register!(app, "Ada", "ada@example.com");
    let (b_token, _) = register!(app, "Bob", "bob@example.com");

    send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &a_token)
            .set_json(profile_body(json!("rust")))
    );
    for token in [&a_token, &a_token, &b_token] {
        send!(
            app,
            authed(TestRequest::post().uri("/api/posts"), token).set_json(json!({ "text": "x" }))
        );
    }

    let (status, body) = send!(app, authed(TestRequest::delete().uri("/api/profiles"), &a_token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "User deleted");

    let (status, _) = send!(app, authed(TestRequest::get().uri("/api/users"), &a_token));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, posts) = send!(app, authed(TestRequest::get().uri("/api/posts"), &b_token));
    assert_eq!(posts.as_array().unwrap().len(), 1);

    let (_, profiles) = send!(app, authed(TestRequest::get().uri("/api/profiles"), &b_token));
    assert_eq!(profiles, json!([]));

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret123" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_token_outliving_its_account() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (a_token, _) = register!(app, "Ada", "ada@example.com");
    let (b_token, b_id) = register!(app, "Bob", "bob@example.com");

    send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &b_token)
            .set_json(profile_body(json!("go")))
    );
    let (_, post) = send!(
        app,
        authed(TestRequest::post().uri("/api/posts"), &b_token).set_json(json!({ "text": "hi" }))
    );
    let post_id = post["id"].as_str().unwrap().to_string();

    let (status, _) = send!(app, authed(TestRequest::delete().uri("/api/profiles"), &a_token));
    assert_eq!(status, StatusCode::OK);

    // Ada's token still verifies, but every write needs a stored account.
    let (status, body) = send!(
        app,
        authed(TestRequest::post().uri("/api/profiles"), &a_token)
            .set_json(profile_body(json!("rust")))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");

    let (status, _) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/posts/like/{post_id}")), &a_token)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        authed(TestRequest::post().uri(&format!("/api/posts/comment/{post_id}")), &a_token)
            .set_json(json!({ "text": "ghost" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        authed(TestRequest::put().uri(&format!("/api/profiles/follow/{b_id}")), &a_token)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, profiles) = send!(app, authed(TestRequest::get().uri("/api/profiles"), &b_token));
    let profiles = profiles.as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["user"]["name"], "Bob");

    let (_, post) = send!(
        app,
        authed(TestRequest::get().uri(&format!("/api/posts/{post_id}")), &b_token)
    );
    assert_eq!(post["likes"], json!([]));
    assert_eq!(post["comments"], json!([]));
}

fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----circle-test-boundary";
    let mut body = Vec::new();
    for (name, content_type, data) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match content_type {
            Some(ct) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.bin\"\r\nContent-Type: {ct}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[actix_web::test]
async fn test_upload_stores_images_only() {
    let uploads = tempfile::tempdir().unwrap();
    let app = app!(uploads);
    let (token, _) = register!(app, "Ada", "ada@example.com");

    let upload = |content_type: String, body: Vec<u8>| {
        authed(TestRequest::post().uri("/api/profiles/upload"), &token)
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
    };

    let (ct, body) = multipart(&[("image", Some("image/png"), b"\x89PNG-bytes")]);
    let (status, stored) = send!(app, upload(ct, body));
    assert_eq!(status, StatusCode::OK, "{stored}");
    let url = stored["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/") && url.ends_with(".png"));
    let file_name = stored["file_name"].as_str().unwrap();
    assert!(uploads.path().join(file_name).exists());

    let (ct, body) = multipart(&[("doc", Some("application/pdf"), b"%PDF")]);
    let (status, _) = send!(app, upload(ct, body));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (ct, body) = multipart(&[("image", Some("image/gif"), &[0u8; 2048])]);
    let (status, _) = send!(app, upload(ct, body));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (ct, body) = multipart(&[
        ("doc", Some("application/pdf"), &b"%PDF"[..]),
        ("image", Some("image/png"), &b"\x89PNG-bytes"[..]),
    ]);
    let (status, stored) = send!(app, upload(ct, body));
    assert_eq!(status, StatusCode::OK, "{stored}");
    assert!(stored["url"].as_str().unwrap().ends_with(".png"));

    let (ct, body) = multipart(&[("caption", None, b"hello")]);
    let (status, body) = send!(app, upload(ct, body));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No file uploaded");
}
