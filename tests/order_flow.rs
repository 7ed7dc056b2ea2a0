//! End-to-end submission flow tests against a mock HTTP server.

#![cfg(feature = "async")]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use souk_rs::checkout::SubmitOutcome;
use souk_rs::error::SoukError;
use souk_rs::models::{Amount, Credentials, LineId, Product, ProductId};
use souk_rs::notice::{CollectingSink, Notice};
use souk_rs::souk::Souk;
use souk_rs::storage::{InMemorySessionStorage, SessionStorage};

/// Builds an async facade pointed at the mock server, over empty
/// in-memory storage, publishing to the given sink.
fn facade_for(server: &MockServer, sink: &Arc<CollectingSink>) -> Souk<InMemorySessionStorage> {
    Souk::builder()
        .storage(InMemorySessionStorage::new())
        .base_url(server.uri())
        .fallback_phone("22200001111")
        .notices(Box::new(Arc::clone(sink)))
        .build()
        .unwrap()
}

/// Builds a sample product.
fn product(id: &str, price: u64) -> Product {
    Product {
        id: ProductId::from(id),
        name: format!("item {id}"),
        price: Amount::new(price),
        image_url: String::new(),
        store: None,
        description: None,
    }
}

/// Mounts a successful login responder for the `tok-1` / `u1` session.
async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"id": "u1", "name": "Aminetou", "phone": "22244556677"}
        })))
        .mount(server)
        .await;
}

/// Logs the facade in against the mounted responder.
async fn log_in<S: SessionStorage>(facade: &Souk<S>) {
    let user = facade
        .login(&Credentials {
            login: "22244556677".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(user.name, "Aminetou");
}

#[tokio::test]
async fn accepted_order_clears_cart_and_reports_receipt() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_partial_json(json!({"userId": "u1", "total": 2_500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderId": "o-77"})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;

    facade.add_product(&product("p1", 1_000)).unwrap();
    facade.add_product(&product("p1", 1_000)).unwrap();
    facade.add_product(&product("p2", 500)).unwrap();

    let outcome = facade.checkout().await.unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Placed(souk_rs::models::OrderId::from("o-77"))
    );
    // Confirmed acceptance empties the cart.
    assert_eq!(facade.cart_item_count().unwrap(), 0);
    assert!(sink.snapshot().iter().any(|notice| matches!(
        notice,
        Notice::OrderPlaced { total, .. } if *total == Amount::new(2_500)
    )));
}

#[tokio::test]
async fn line_added_during_submission_survives_acceptance() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"orderId": "o-12"}))
                .set_delay(core::time::Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;
    facade.add_product(&product("p1", 1_000)).unwrap();

    // Only the snapshotted line is dropped on acceptance; the line
    // added while the request was in flight stays in the cart.
    let (outcome, ()) = tokio::join!(facade.checkout(), async {
        tokio::time::sleep(core::time::Duration::from_millis(50)).await;
        facade.add_product(&product("p2", 500)).unwrap();
    });
    assert!(matches!(outcome.unwrap(), SubmitOutcome::Placed(_)));

    let lines = facade.cart_lines().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().unwrap().id, LineId::from("p2"));
}

#[tokio::test]
async fn rejected_order_falls_back_and_keeps_cart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "base indisponible"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;
    facade.add_product(&product("p3", 800)).unwrap();

    let outcome = facade.checkout().await.unwrap();
    let SubmitOutcome::Fallback(link) = outcome else {
        panic!("expected fallback, got {outcome:?}");
    };
    assert_eq!(link.host_str(), Some("wa.me"));
    // The cart survives a failed submission so the user can retry.
    assert_eq!(facade.cart_item_count().unwrap(), 1);

    let notices = sink.snapshot();
    assert!(notices.iter().any(|notice| matches!(
        notice,
        Notice::SubmissionFailed { message } if message.contains("base indisponible")
    )));
    assert!(notices.contains(&Notice::FallbackUsed));
}

#[tokio::test]
async fn anonymous_checkout_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    facade.add_product(&product("p2", 500)).unwrap();

    let outcome = facade.checkout().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Fallback(_)));
    assert_eq!(facade.cart_item_count().unwrap(), 1);
}

#[tokio::test]
async fn double_trigger_submits_exactly_once() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"orderId": "o-1"}))
                .set_delay(core::time::Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;
    facade.add_product(&product("p1", 1_000)).unwrap();

    let (first, second) = tokio::join!(facade.checkout(), facade.checkout());
    let outcomes = [first.unwrap(), second.unwrap()];
    assert!(outcomes
        .iter()
        .any(|outcome| matches!(outcome, SubmitOutcome::Placed(_))));
    assert!(outcomes.contains(&SubmitOutcome::InFlight));
}

#[tokio::test]
async fn failed_login_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "mot de passe incorrect"})),
        )
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);

    let err = facade
        .login(&Credentials {
            login: "22244556677".to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .unwrap_err();
    match err {
        SoukError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "mot de passe incorrect");
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert!(!facade.is_logged_in().unwrap());
    assert!(sink
        .snapshot()
        .iter()
        .any(|notice| matches!(notice, Notice::ApiError { .. })));
}

#[tokio::test]
async fn logout_notifies_backend_and_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;
    assert!(facade.is_logged_in().unwrap());

    facade.logout().await.unwrap();
    assert!(!facade.is_logged_in().unwrap());
    assert!(sink.snapshot().contains(&Notice::LoggedOut));
}

#[tokio::test]
async fn unreachable_logout_endpoint_still_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;

    // The notification is best-effort; its failure never blocks logout.
    facade.logout().await.unwrap();
    assert!(!facade.is_logged_in().unwrap());
}

#[tokio::test]
async fn upload_image_attaches_bearer_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "https://img.souk.mr/u/9.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let facade = facade_for(&server, &sink);
    log_in(&facade).await;

    let uploaded = facade
        .upload_image("photo.jpg".to_owned(), vec![0xFF_u8, 0xD8_u8], "image/jpeg")
        .await
        .unwrap();
    assert_eq!(uploaded.url, "https://img.souk.mr/u/9.jpg");
}

#[cfg(feature = "storage-file")]
#[tokio::test]
async fn session_survives_process_restart() {
    use souk_rs::storage::FileSessionStorage;

    let server = MockServer::start().await;
    mount_login(&server).await;

    let dir = tempfile::tempdir().unwrap();
    {
        let facade = Souk::builder()
            .storage(FileSessionStorage::new(dir.path().to_path_buf()).unwrap())
            .base_url(server.uri())
            .build()
            .unwrap();
        log_in(&facade).await;
    }

    // A fresh facade over the same directory rehydrates the session.
    let reopened = Souk::builder()
        .storage(FileSessionStorage::new(dir.path().to_path_buf()).unwrap())
        .base_url(server.uri())
        .build()
        .unwrap();
    assert!(!reopened.is_logged_in().unwrap());
    assert!(reopened.restore_session().await.unwrap());
    assert_eq!(
        reopened.current_user().unwrap().map(|user| user.name),
        Some("Aminetou".to_owned())
    );
}
