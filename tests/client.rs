use aemet_opendata::{Client, ClientConfig, Error};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const API_KEY: &str = "test-key";

fn client_for(server: &Server) -> Client {
    let mut cfg = ClientConfig::new(API_KEY);
    cfg.url = format!("{}/opendata/api", server.url());
    Client::with_config(cfg).unwrap()
}

fn expect_get(server: &mut Server, path: &str, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("api_key".into(), API_KEY.into()))
        .match_header("cache-control", "no-cache")
        .with_status(status)
        .with_body(body)
        .expect(1)
        .create()
}

#[test]
fn lightnings_map_hits_fixed_path() {
    let mut server = Server::new();
    let mock = expect_get(
        &mut server,
        "/opendata/api/red/rayos/mapa",
        200,
        r#"{"foo": "bar"}"#,
    );

    let data = client_for(&server).get_lightnings_map().unwrap();

    mock.assert();
    assert_eq!(data, Some(json!({"foo": "bar"})));
}

#[test]
fn town_id_is_appended_to_path() {
    let mut server = Server::new();
    let body = r#"[{"id": "id28079", "nombre": "Madrid"}]"#;
    let mock = expect_get(&mut server, "/opendata/api/maestro/municipio/28079", 200, body);

    let data = client_for(&server).get_town("28079").unwrap();

    mock.assert();
    assert_eq!(data, Some(json!([{"id": "id28079", "nombre": "Madrid"}])));
}

#[test]
fn towns_list() {
    let mut server = Server::new();
    let mock = expect_get(
        &mut server,
        "/opendata/api/maestro/municipios",
        200,
        r#"[{"id": "id01001"}, {"id": "id01002"}]"#,
    );

    let data = client_for(&server).get_towns().unwrap().unwrap();

    mock.assert();
    assert_eq!(data.as_array().map(Vec::len), Some(2));
}

#[test]
fn call_endpoint_composes_base_and_path() {
    let mut server = Server::new();
    let mock = expect_get(
        &mut server,
        "/opendata/api/observacion/convencional/todas",
        200,
        r#"{"estado": 200}"#,
    );

    let data = client_for(&server)
        .call_endpoint("observacion/convencional/todas")
        .unwrap();

    mock.assert();
    assert_eq!(data, Some(json!({"estado": 200})));
}

#[test]
fn empty_body_is_none_regardless_of_status() {
    for status in [200, 204, 404, 500] {
        let mut server = Server::new();
        let mock = expect_get(&mut server, "/opendata/api/maestro/municipios", status, "");

        let data = client_for(&server).get_towns().unwrap();

        mock.assert();
        assert!(data.is_none(), "status {status} should give None");
    }
}

#[test]
fn error_status_body_is_returned_verbatim() {
    let mut server = Server::new();
    let body = r#"{"descripcion": "API key invalido", "estado": 401}"#;
    let mock = expect_get(&mut server, "/opendata/api/maestro/municipio/0", 401, body);

    let data = client_for(&server).get_town("0").unwrap();

    mock.assert();
    assert_eq!(
        data,
        Some(json!({"descripcion": "API key invalido", "estado": 401}))
    );
}

#[test]
fn invalid_json_is_a_parse_error() {
    let mut server = Server::new();
    let mock = expect_get(&mut server, "/opendata/api/red/rayos/mapa", 200, "not json");

    let err = client_for(&server).get_lightnings_map().unwrap_err();

    mock.assert();
    match err {
        Error::Parse { status, ref url, .. } => {
            assert_eq!(status, 200);
            assert!(url.ends_with("/opendata/api/red/rayos/mapa"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn connection_failure_is_a_transport_error() {
    let mut cfg = ClientConfig::new("secret-key");
    cfg.url = "http://127.0.0.1:1/opendata/api".to_string();
    cfg.timeout = Duration::from_secs(2);
    let client = Client::with_config(cfg).unwrap();

    let err = client.get_towns().unwrap_err();

    assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
    let rendered = format!("{err:?} {err}");
    assert!(!rendered.contains("secret-key"));
}

#[test]
fn requests_keep_working_across_tls_toggles() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/opendata/api/maestro/municipios")
        .match_query(Matcher::UrlEncoded("api_key".into(), API_KEY.into()))
        .match_header("cache-control", "no-cache")
        .with_body("[]")
        .expect(3)
        .create();

    let mut client = client_for(&server);
    assert_eq!(client.get_towns().unwrap(), Some(json!([])));

    assert!(!client.set_tls_verify(false).unwrap());
    assert_eq!(client.get_towns().unwrap(), Some(json!([])));

    assert!(client.set_tls_verify(true).unwrap());
    assert!(client.tls_verify());
    assert_eq!(client.get_towns().unwrap(), Some(json!([])));

    mock.assert();
}

#[test]
fn caller_supplied_http_client_is_used() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/opendata/api/red/rayos/mapa")
        .match_query(Matcher::UrlEncoded("api_key".into(), API_KEY.into()))
        .match_header("x-caller", "demo")
        .match_header("cache-control", "no-cache")
        .with_body(r#"{"ok": true}"#)
        .expect(1)
        .create();

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-caller", reqwest::header::HeaderValue::from_static("demo"));
    let http = reqwest::blocking::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let mut cfg = ClientConfig::new(API_KEY);
    cfg.url = format!("{}/opendata/api", server.url());
    let client = Client::with_http_client(cfg, http).unwrap();

    assert_eq!(
        client.get_lightnings_map().unwrap(),
        Some(json!({"ok": true}))
    );
    mock.assert();
}
