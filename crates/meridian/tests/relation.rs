//! Relation conventions over HTTP.

mod common;

use std::sync::Arc;

use common::{client, person_ns, MISSING_ID};
use http::StatusCode;
use meridian::prelude::*;
use meridian_test::TestClient;
use serde_json::json;

#[test]
fn test_create_for_known_person() {
    let (client, store) = client();
    let person_id = store.add_person("Alice", "Smith");

    let response = client
        .post(format!("/api/v1/person/{person_id}/address"))
        .json(&json!({"street": "1 Main St"}))
        .send();
    response.assert_status(StatusCode::CREATED);
    let body = response.json_value().unwrap();
    assert_eq!(body["personId"], person_id);
    assert_eq!(body["street"], "1 Main St");
}

#[test]
fn test_create_for_unknown_person_is_404() {
    let (client, _) = client();
    client
        .post(format!("/api/v1/person/{MISSING_ID}/address"))
        .json(&json!({"street": "1 Main St"}))
        .send()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error(404, "No such address");
}

#[test]
fn test_search_for_links_keep_parent_id() {
    let (client, store) = client();
    let person_id = store.add_person("Alice", "Smith");
    for street in ["1 Main St", "2 Main St", "3 Main St"] {
        client
            .post(format!("/api/v1/person/{person_id}/address"))
            .json(&json!({"street": street}))
            .send()
            .assert_status(StatusCode::CREATED);
    }

    let body = client
        .get(format!("/api/v1/person/{person_id}/address"))
        .query("offset", 1)
        .query("limit", 1)
        .send()
        .json_value()
        .unwrap();

    assert_eq!(body["count"], 3);
    assert_eq!(body["items"][0]["street"], "2 Main St");
    let base = format!("http://localhost/api/v1/person/{person_id}/address");
    assert_eq!(body["_links"]["self"]["href"], format!("{base}?offset=1&limit=1"));
    assert_eq!(body["_links"]["next"]["href"], format!("{base}?offset=2&limit=1"));
    assert_eq!(body["_links"]["prev"]["href"], format!("{base}?offset=0&limit=1"));
}

#[test]
fn test_search_for_without_context_is_an_error() {
    let mut app = Application::default();
    configure_relation(
        &mut app,
        &Namespace::relation("person", "address").with_version("v1"),
        Mappings::new().with(
            Operation::SearchFor,
            Handler::search(|_| Ok(SearchResult::new(Vec::new(), 0))),
        ),
    )
    .unwrap();
    let client = TestClient::new(Arc::new(app));

    client
        .get(format!("/api/v1/person/{MISSING_ID}/address"))
        .send()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_relation_and_crud_share_a_version() {
    let (app, _) = common::application(MeridianConfig::default());
    let endpoints: Vec<_> = app.endpoints().collect();
    assert!(endpoints.contains(&"person.search.v1"));
    assert!(endpoints.contains(&"person.search_for.address.v1"));
    assert_eq!(person_ns().effective_version(), "v1");
}
