use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use luxora_rs::{FavoritesError, FavoritesStore, Luxora, Product, SessionStore};

fn stores_for(server: &MockServer) -> (Arc<SessionStore>, FavoritesStore) {
    let client = Luxora::new(&server.base_url());
    let session = Arc::new(SessionStore::new(client.clone()));
    let favorites = FavoritesStore::new(client, Arc::clone(&session));

    (session, favorites)
}

fn mock_login(server: &MockServer, email: &str) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login")
            .json_body_partial(format!(r#"{{ "email": "{email}" }}"#));
        then.status(200).json_body(json!({
            "token": format!("token-{email}"),
            "user": { "email": email }
        }));
    });
}

fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        ..Product::default()
    }
}

#[tokio::test]
async fn fetch_without_a_session_records_a_login_prompt_and_sends_nothing() {
    let server = MockServer::start();
    let fetch_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200).json_body(json!({ "favorites": [] }));
    });

    let (_session, favorites) = stores_for(&server);
    favorites.fetch().await;

    fetch_mock.assert_hits(0);
    assert_eq!(favorites.error(), Some(FavoritesError::LoginRequired));
}

#[tokio::test]
async fn toggle_without_a_session_records_a_login_prompt_and_sends_nothing() {
    let server = MockServer::start();
    let toggle_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites/toggle");
        then.status(200).json_body(json!({ "isFavorited": true }));
    });

    let (_session, favorites) = stores_for(&server);
    favorites.toggle(&product("p1")).await;

    toggle_mock.assert_hits(0);
    assert_eq!(favorites.error(), Some(FavoritesError::LoginRequired));
    assert!(!favorites.is_favorite("p1"));
}

#[tokio::test]
async fn toggle_refuses_a_listing_without_an_id() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    let toggle_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites/toggle");
        then.status(200).json_body(json!({ "isFavorited": true }));
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();

    favorites.toggle(&product("")).await;

    toggle_mock.assert_hits(0);
    assert_eq!(favorites.error(), Some(FavoritesError::MissingProductId));
}

#[tokio::test]
async fn toggle_acknowledgments_apply_immediately_in_both_directions() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    let mut favorited_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/favorites/toggle")
            .json_body_partial(r#"{ "email": "a@x.com", "productId": "p1" }"#);
        then.status(200).json_body(json!({ "isFavorited": true }));
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();

    favorites.toggle(&product("p1")).await;

    favorited_mock.assert();
    assert!(favorites.is_favorite("p1"));
    assert_eq!(favorites.count(), 1);
    assert_eq!(favorites.favorites()[0].is_favorited, Some(true));
    assert!(favorites.error().is_none());

    favorited_mock.delete();
    server.mock(|when, then| {
        when.method(POST).path("/api/favorites/toggle");
        then.status(200).json_body(json!({ "isFavorited": false }));
    });

    favorites.toggle(&product("p1")).await;

    assert!(!favorites.is_favorite("p1"));
    assert_eq!(favorites.count(), 0);
}

#[tokio::test]
async fn a_reacknowledged_toggle_does_not_duplicate_the_entry() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    server.mock(|when, then| {
        when.method(POST).path("/api/favorites/toggle");
        then.status(200).json_body(json!({ "isFavorited": true }));
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();

    favorites.toggle(&product("p1")).await;
    favorites.toggle(&product("p1")).await;

    assert_eq!(favorites.count(), 1);
}

#[tokio::test]
async fn failed_fetch_preserves_the_previous_list() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    let mut fetch_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200).json_body(json!({
            "favorites": [{ "_id": "p1", "title": "Daytona" }]
        }));
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();
    favorites.fetch().await;
    assert_eq!(favorites.count(), 1);

    fetch_mock.delete();
    server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(500)
            .json_body(json!({ "message": "Favorites are unavailable right now." }));
    });

    favorites.fetch().await;

    assert_eq!(favorites.count(), 1);
    assert_eq!(
        favorites.error(),
        Some(FavoritesError::Request(
            "Favorites are unavailable right now.".to_string()
        ))
    );
}

#[tokio::test]
async fn switching_users_fetches_once_and_replaces_the_whole_list() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    mock_login(&server, "b@x.com");
    let fetch_a = server.mock(|when, then| {
        when.method(POST)
            .path("/api/favorites")
            .json_body(json!({ "email": "a@x.com" }));
        then.status(200).json_body(json!({
            "favorites": [{ "_id": "a1" }, { "_id": "a2" }]
        }));
    });
    let fetch_b = server.mock(|when, then| {
        when.method(POST)
            .path("/api/favorites")
            .json_body(json!({ "email": "b@x.com" }));
        then.status(200)
            .json_body(json!({ "favorites": [{ "_id": "b1" }] }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/auth/logout");
        then.status(200);
    });

    let (session, favorites) = stores_for(&server);

    session.login("a@x.com", "pw", false).await.unwrap();
    favorites.sync().await;
    fetch_a.assert();
    assert!(favorites.is_favorite("a1"));

    session.logout().await;
    session.login("b@x.com", "pw", false).await.unwrap();
    favorites.sync().await;

    // One fetch for the new user; nothing of user A's list survives.
    fetch_b.assert();
    fetch_a.assert_hits(1);
    assert_eq!(favorites.count(), 1);
    assert!(favorites.is_favorite("b1"));
    assert!(!favorites.is_favorite("a1"));
}

#[tokio::test]
async fn logging_out_leaves_the_stale_list_until_the_next_authenticated_fetch() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200)
            .json_body(json!({ "favorites": [{ "_id": "p1" }] }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/auth/logout");
        then.status(200);
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();
    favorites.sync().await;
    assert_eq!(favorites.count(), 1);

    session.logout().await;
    favorites.sync().await;

    // The signed-out fetch fails fast; the list stays populated, gated only
    // by the UI reading a signed-out session.
    assert_eq!(favorites.count(), 1);
    assert_eq!(favorites.error(), Some(FavoritesError::LoginRequired));
}

#[tokio::test]
async fn sync_without_a_pending_change_does_nothing() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    let fetch_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200).json_body(json!({ "favorites": [] }));
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();

    favorites.sync().await;
    favorites.sync().await;

    fetch_mock.assert_hits(1);
}

#[tokio::test]
async fn clear_all_only_empties_the_list_once_the_server_confirmed() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200).json_body(json!({
            "favorites": [{ "_id": "p1" }, { "_id": "p2" }]
        }));
    });
    let mut failing_clear = server.mock(|when, then| {
        when.method(DELETE).path("/api/favorites");
        then.status(500);
    });

    let (session, favorites) = stores_for(&server);
    session.login("a@x.com", "pw", false).await.unwrap();
    favorites.fetch().await;

    favorites.clear_all().await;
    assert_eq!(favorites.count(), 2);
    assert!(matches!(favorites.error(), Some(FavoritesError::Request(_))));

    failing_clear.delete();
    server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/favorites")
            .json_body(json!({ "email": "a@x.com" }));
        then.status(200);
    });

    favorites.clear_all().await;

    assert_eq!(favorites.count(), 0);
    assert!(favorites.error().is_none());
}

#[tokio::test]
async fn run_follows_user_changes_in_the_background() {
    let server = MockServer::start();
    mock_login(&server, "a@x.com");
    let fetch_mock = server.mock(|when, then| {
        when.method(POST).path("/api/favorites");
        then.status(200)
            .json_body(json!({ "favorites": [{ "_id": "p1" }] }));
    });

    let client = Luxora::new(&server.base_url());
    let session = Arc::new(SessionStore::new(client.clone()));
    let favorites = Arc::new(FavoritesStore::new(client, Arc::clone(&session)));

    let follower = tokio::spawn({
        let favorites = Arc::clone(&favorites);
        async move { favorites.run().await }
    });

    session.login("a@x.com", "pw", false).await.unwrap();

    // Give the follower a chance to observe the change and fetch.
    for _ in 0..50 {
        if favorites.count() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    fetch_mock.assert();
    assert!(favorites.is_favorite("p1"));

    drop(session);
    follower.abort();
}
