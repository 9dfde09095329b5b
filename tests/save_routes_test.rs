mod common;

use actix_web::test;
use bson::oid::ObjectId;
use serde_json::{json, Value};

use common::TestApp;

#[actix_rt::test]
async fn test_save_copies_trip_into_callers_collection() {
    let test_app = TestApp::new();
    let owner = test_app.seed_user("Ala", "ala@example.com").await;
    let saver = test_app.seed_user("Olek", "olek@example.com").await;
    let source_id = test_app.seed_trip(&owner, "Kyoto", true).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/trips/{}/itinerary", source_id))
        .insert_header(owner.bearer())
        .set_json(json!({ "date": "2025-03-02", "time": "10:00", "description": "Temple", "cost": 20 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri(&format!("/trips/{}/save", source_id))
        .insert_header(saver.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let copy: Value = test::read_body_json(resp).await;
    assert_ne!(copy["id"], source_id.to_hex());
    assert_eq!(copy["userId"], saver.id.to_hex());
    assert_eq!(copy["originalTripId"], source_id.to_hex());
    assert_eq!(copy["isPublic"], false);
    assert_eq!(copy["isOwner"], true);
    assert_eq!(copy["destination"], "Kyoto");
    assert_eq!(copy["itinerary"][0]["activities"][0]["description"], "Temple");

    let source = test_app.store.trip(&source_id).unwrap();
    assert_eq!(source.user_id, owner.id);
    assert!(source.is_public);
    assert_eq!(test_app.store.trip_count(), 2);

    let req = test::TestRequest::get()
        .uri("/trips")
        .insert_header(saver.bearer())
        .to_request();
    let trips: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(trips.len(), 1);
}

#[actix_rt::test]
async fn test_save_unknown_trip_or_anonymous() {
    let test_app = TestApp::new();
    let owner = test_app.seed_user("Ala", "ala@example.com").await;
    let source_id = test_app.seed_trip(&owner, "Kyoto", true).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/trips/{}/save", ObjectId::new()))
        .insert_header(owner.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri(&format!("/trips/{}/save", source_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
    assert_eq!(test_app.store.trip_count(), 1);
}

#[actix_rt::test]
async fn test_saved_copy_is_independent_of_source() {
    let test_app = TestApp::new();
    let owner = test_app.seed_user("Ala", "ala@example.com").await;
    let saver = test_app.seed_user("Olek", "olek@example.com").await;
    let source_id = test_app.seed_trip(&owner, "Kyoto", true).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/trips/{}", source_id))
        .insert_header(owner.bearer())
        .set_json(json!({
            "status": "booked",
            "hotels": [{ "name": "Ryokan", "price": 500.0, "rating": 5.0 }]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri(&format!("/trips/{}/save", source_id))
        .insert_header(saver.bearer())
        .to_request();
    let copy: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(copy["status"], "planning");
    assert_eq!(copy["hotels"][0]["name"], "Ryokan");
    let copy_id = ObjectId::parse_str(copy["id"].as_str().unwrap()).unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/trips/{}", source_id))
        .insert_header(owner.bearer())
        .set_json(json!({ "destination": "Osaka", "hotels": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let copy = test_app.store.trip(&copy_id).unwrap();
    assert_eq!(copy.destination, "Kyoto");
    assert_eq!(copy.hotels.len(), 1);
    assert_eq!(copy.hotels[0].name, "Ryokan");
    assert_eq!(copy.status, "planning");
    assert_eq!(copy.user_id, saver.id);
}
