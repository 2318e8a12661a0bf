use std::path::PathBuf;

use mountforge::data::{load_catalog, Catalog};
use mountforge::server::routes::route_request;

fn catalog() -> Catalog {
    load_catalog(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")).expect("sample catalog should load")
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&catalog(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    let payload = json(&response.body);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["catalog"]["bases"], 5);
}

#[test]
fn bases_endpoint_lists_mounts_and_vehicles() {
    let response = route_request(&catalog(), "GET", "/api/bases", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["bases"][0]["id"], "griffon");
    assert_eq!(payload["bases"][0]["size"], "Large");
}

#[test]
fn derive_endpoint_returns_derivation_and_statblock() {
    let body = r#"{"baseId":"sky_skiff","mountSelections":{"bow":{"weaponId":"heavy_ballista","qty":1}}}"#;
    let response = route_request(&catalog(), "POST", "/api/derive", body);
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["derivation"]["mountedWeapons"][0]["crewGroup"], "gunners");
    assert!(payload["statblock"].as_str().unwrap_or_default().starts_with("Sky Skiff\n"));
}

#[test]
fn export_then_import_endpoints() {
    let catalog = catalog();
    let body = r#"{"baseId":"white_wyvern","saddleId":"wyvern_howdah","mountSelections":{"tail":{"weaponId":"scythe_blades","qty":1}}}"#;
    let response = route_request(&catalog, "POST", "/api/export", body);
    assert_eq!(response.status_code, 200);
    let document = json(&response.body)["document"].to_string();
    assert!(document.contains("\"mountId\":\"tail\""));

    let response = route_request(&catalog, "POST", "/api/import", &document);
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["sheet"]["name"], "White Wyvern");
    assert_eq!(payload["configuration"]["saddleId"], "wyvern_howdah");
}

#[test]
fn bad_bodies_are_rejected_with_400() {
    let catalog = catalog();
    for (path, body) in [
        ("/api/derive", "{not json"),
        ("/api/derive", r#"{"baseId":"dragon_turtle"}"#),
        ("/api/export", r#"{"baseId":"griffon","modIds":["ghost"]}"#),
        ("/api/import", "no document here"),
        ("/api/import", r#"{"schema":"other/2","baseId":"griffon"}"#),
    ] {
        let response = route_request(&catalog, "POST", path, body);
        assert_eq!(response.status_code, 400, "{path} {body}");
        let payload = json(&response.body);
        assert_eq!(payload["status"], "error");
        assert!(payload["message"].as_str().is_some());
    }
}

#[test]
fn unknown_routes_and_methods() {
    let catalog = catalog();
    assert_eq!(route_request(&catalog, "GET", "/api/nowhere", "").status_code, 404);
    assert_eq!(route_request(&catalog, "GET", "/api/derive", "").status_code, 405);
    let response = route_request(&catalog, "GET", "/api/health?verbose=1", "");
    assert!(response.to_http_string().starts_with("HTTP/1.1 200 OK\r\n"));
}
