//! End-to-end tests for the gateway's public routes.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_get_person() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("abc", "Ann", &["c1", "c2"]);
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/abc"))
        .header("requestId", "req-1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "req-1");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"personId": "abc", "name": "Ann", "children": ["c1", "c2"]}));
    assert_eq!(persons.request_ids(), vec!["req-1".to_string()]);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_get_person_children_in_parent_order() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("p", "Parent", &["c2", "c1", "c3"]);
    persons.insert("c1", "One", &[]);
    persons.insert("c2", "Two", &["g1"]);
    persons.insert("c3", "Three", &[]);
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/p/children"))
        .header("requestId", "req-kids")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            {"personId": "c2", "name": "Two", "children": ["g1"]},
            {"personId": "c1", "name": "One", "children": []},
            {"personId": "c3", "name": "Three", "children": []}
        ])
    );
    assert_eq!(persons.gets(), 4);
    assert!(persons.request_ids().iter().all(|id| id == "req-kids"));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_childless_person_has_empty_children() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("solo", "Solo", &[]);
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/solo/children"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));
    assert_eq!(persons.gets(), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_delete_person_publishes_notification() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("abc", "Ann", &[]);
    let mut gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .delete(gateway.url("/v1/persons/abc"))
        .header("requestId", "req-del")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());
    assert_eq!(persons.deletes(), 1);

    let message = gateway.notifications.try_recv().unwrap();
    assert_eq!(message.topic, "persons.deleted.test");
    assert_eq!(message.message, json!({"personId": "abc", "requestId": "req-del"}));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_get_unknown_person_is_404() {
    let (service, _persons) = common::start_persons_service().await;
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/nobody"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "code": "404 - Not Found",
            "type": "GET_PERSON",
            "details": ["person not found"]
        })
    );

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_delete_unknown_person_is_404_without_notification() {
    let (service, _persons) = common::start_persons_service().await;
    let mut gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .delete(gateway.url("/v1/persons/nobody"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["type"], "DELETE_PERSON");
    assert_eq!(body["details"], json!(["person not found"]));
    assert!(gateway.notifications.try_recv().is_err());

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_unsupported_path_and_method() {
    let (service, persons) = common::start_persons_service().await;
    let gateway = common::start_gateway(&format!("http://{}", service)).await;
    let client = common::client();

    for res in [
        client.get(gateway.url("/v2/persons/abc")).send().await.unwrap(),
        client.get(gateway.url("/nowhere")).send().await.unwrap(),
        client.post(gateway.url("/v1/persons/abc")).send().await.unwrap(),
        client.delete(gateway.url("/v1/persons/abc/children")).send().await.unwrap(),
    ] {
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({
                "code": "404 - Not Found",
                "type": "UNSUPPORTED_PATH",
                "details": ["No such path"]
            })
        );
    }
    assert_eq!(persons.gets() + persons.deletes(), 0);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_status() {
    let (service, _persons) = common::start_persons_service().await;
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client().get(gateway.url("/status")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"status": "OK"}));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_generated_when_absent() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("abc", "Ann", &[]);
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/abc"))
        .send()
        .await
        .unwrap();

    let echoed = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&echoed).is_ok());
    assert_eq!(persons.request_ids(), vec![echoed]);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_x_request_id_is_propagated() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("abc", "Ann", &[]);
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    let res = common::client()
        .get(gateway.url("/v1/persons/abc"))
        .header("x-request-id", "trace-7")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "trace-7");
    assert_eq!(persons.request_ids(), vec!["trace-7".to_string()]);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let (service, _persons) = common::start_persons_service().await;
    let gateway = common::start_gateway(&format!("http://{}", service)).await;

    gateway.shutdown.trigger();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), gateway.server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_encoded_slash_in_id_cannot_reach_another_person() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("abc", "Ann", &[]);
    let mut gateway = common::start_gateway(&format!("http://{}", service)).await;
    let client = common::client();

    let res = client
        .get(gateway.url("/v1/persons/zzz%2F..%2Fabc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap()["type"], "GET_PERSON");

    let res = client
        .delete(gateway.url("/v1/persons/zzz%2F..%2Fabc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(gateway.notifications.try_recv().is_err());

    let res = client.get(gateway.url("/v1/persons/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_reserved_characters_in_id_are_passed_through() {
    let (service, persons) = common::start_persons_service().await;
    persons.insert("a?b#c d", "Odd", &[]);
    let mut gateway = common::start_gateway(&format!("http://{}", service)).await;
    let client = common::client();

    let res = client
        .get(gateway.url("/v1/persons/a%3Fb%23c%20d"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"personId": "a?b#c d", "name": "Odd", "children": []})
    );

    let res = client
        .delete(gateway.url("/v1/persons/a%3Fb%23c%20d"))
        .header("requestId", "req-odd")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(persons.deletes(), 1);
    assert_eq!(
        gateway.notifications.try_recv().unwrap().message,
        json!({"personId": "a?b#c d", "requestId": "req-odd"})
    );

    gateway.shutdown.trigger();
}
