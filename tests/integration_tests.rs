//! Integration tests using wiremock to simulate REST endpoints.

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use rest_resource::transport::{Transport, TransportError, TransportResponse};
use rest_resource::{
    ApiError, Arg, CallParams, Customizer, Error, ErrorCode, ErrorFormatter, RequestDescriptor,
    RequestInfo, RequestType, ResourceClient, Response, Verb,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/endpoint/:id", server.uri())
}

/// Registers a callback through `invoke` and waits for the outcome it receives.
async fn via_callback(
    client: &ResourceClient,
    verb: Verb,
    mut args: Vec<Arg>,
) -> Result<Response, ApiError> {
    let (tx, rx) = oneshot::channel();
    args.push(Arg::callback(move |result| {
        let _ = tx.send(result);
    }));

    let handle = client.invoke(verb, args).unwrap();
    assert!(handle.is_none());
    rx.await.unwrap()
}

/// A transport that records every request and answers from a fixed outcome.
struct RecordingTransport {
    requests: Mutex<Vec<RequestDescriptor>>,
    outcome: Result<TransportResponse, TransportError>,
}

impl RecordingTransport {
    fn ok(body: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            outcome: Ok(TransportResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: body.to_string(),
            }),
        })
    }

    fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            outcome: Err(error),
        })
    }

    fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        request: RequestDescriptor,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcome.clone()
    }
}

#[test]
fn test_constructor_requires_url() {
    assert!(matches!(ResourceClient::new(""), Err(Error::Argument(_))));
    assert!(ResourceClient::new("http://domain.com/endpoint").is_ok());
}

#[test]
fn test_constructor_rejects_relative_url() {
    assert!(matches!(
        ResourceClient::new("domain.com/endpoint"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_unknown_case_fails_at_construction() {
    let result = ResourceClient::builder("http://domain.com/endpoint")
        .query_case("sarcasmCase")
        .build();

    assert!(matches!(result, Err(Error::ConfigurationError(_))));
}

#[test]
fn test_invalid_proxy_fails_at_construction() {
    let result = ResourceClient::builder("http://domain.com/endpoint")
        .proxy("not a url")
        .build();

    assert!(matches!(result, Err(Error::ConfigurationError(_))));
}

#[tokio::test]
async fn test_get_all_without_arguments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let response = client.get_all(CallParams::new()).unwrap().await.unwrap();
    assert_eq!(response.data, json!([]));
    assert_eq!(response.status, StatusCode::OK);

    let pending = client.invoke(Verb::Get, vec![]).unwrap().unwrap();
    assert_eq!(pending.await.unwrap().data, json!([]));
}

#[tokio::test]
async fn test_get_all_accepts_a_callback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let response = via_callback(&client, Verb::GetAll, vec![]).await.unwrap();
    assert_eq!(response.data, json!([{ "id": 1 }]));
}

#[tokio::test]
async fn test_get_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 1, "name": "Test" }))
                .insert_header("x-request-id", "abc"),
        )
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let response = client
        .get(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap();

    let user: User = response.json().unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            name: "Test".to_string()
        }
    );
    assert_eq!(response.header("x-request-id"), Some("abc"));
}

#[tokio::test]
async fn test_nested_template_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7/posts"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        ResourceClient::new(format!("{}/users/:userId/posts/:id", mock_server.uri())).unwrap();

    client
        .get_all(CallParams::new().with("userId", 7).with("page", 2))
        .unwrap()
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=2"));
}

#[tokio::test]
async fn test_create_single_and_two_argument_forms() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoint"))
        .and(body_json(json!({ "name": "x" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "name": "x" })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let explicit = client
        .create(CallParams::new(), &json!({ "name": "x" }))
        .unwrap()
        .await
        .unwrap();
    let single = client
        .invoke(Verb::Create, vec![json!({ "name": "x" }).into()])
        .unwrap()
        .unwrap()
        .await
        .unwrap();
    let two = client
        .invoke(Verb::Create, vec![json!({}).into(), json!({ "name": "x" }).into()])
        .unwrap()
        .unwrap()
        .await
        .unwrap();

    assert_eq!(explicit.status, StatusCode::CREATED);
    assert_eq!(explicit.data, single.data);
    assert_eq!(single.data, two.data);
}

#[tokio::test]
async fn test_create_with_preserialized_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoint"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"raw"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let response = client
        .post(CallParams::new(), r#"{"name":"raw"}"#)
        .unwrap()
        .await
        .unwrap();
    assert_eq!(response.data, Value::Null);
}

#[tokio::test]
async fn test_missing_data_is_an_argument_fault() {
    let transport = RecordingTransport::ok(json!({}));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport.clone())
        .build()
        .unwrap();

    let err = client
        .invoke(Verb::Patch, vec![json!({ "id": 1 }).into()])
        .unwrap_err();
    assert!(matches!(err, Error::Argument(ref m) if m == "The data must be an object"));

    let err = client
        .invoke(Verb::Update, vec![json!({ "id": 1 }).into()])
        .unwrap_err();
    assert!(matches!(err, Error::Argument(ref m) if m == "The data must be an object"));

    let err = client
        .put(CallParams::new().with("id", 1), &42)
        .unwrap_err();
    assert!(matches!(err, Error::Argument(ref m) if m == "The data must be an object"));

    let err = client.create(CallParams::new(), &true).unwrap_err();
    assert!(err.is_argument());

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_update_and_patch_send_expected_methods() {
    let transport = RecordingTransport::ok(json!({ "id": 1 }));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport.clone())
        .build()
        .unwrap();

    client
        .update(CallParams::new().with("id", 1), &json!({ "name": "a" }))
        .unwrap()
        .await
        .unwrap();
    client
        .patch(CallParams::new().with("id", 1), &json!({}))
        .unwrap()
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, http::Method::PUT);
    assert_eq!(requests[0].url.as_str(), "http://domain.com/endpoint/1");
    assert_eq!(requests[0].body, Some(json!({ "name": "a" })));
    assert_eq!(requests[1].method, http::Method::PATCH);
    assert!(requests[1].query.is_empty());
}

#[tokio::test]
async fn test_update_requires_id() {
    let client = ResourceClient::new("http://domain.com/endpoint/:id").unwrap();

    let err = client
        .update(CallParams::new(), &json!({ "name": "a" }))
        .unwrap_err();
    assert!(matches!(err, Error::Argument(ref m) if m == "A resource ID is required"));
}

#[tokio::test]
async fn test_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/endpoint/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let err = client.delete(CallParams::new()).unwrap_err();
    assert!(err.is_argument());
    assert!(client.invoke(Verb::Delete, vec![]).is_err());

    let response = client
        .delete(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/endpoint/3"))
        .and(body_json(json!({ "reason": "spam" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(endpoint(&mock_server)).unwrap();

    let response = client
        .delete_with_body(CallParams::new().with("id", 3), &json!({ "reason": "spam" }))
        .unwrap()
        .await
        .unwrap();
    assert_eq!(response.data, json!({ "deleted": true }));
}

#[tokio::test]
async fn test_query_and_body_case_conversion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoint"))
        .and(query_param("first_name", "a"))
        .and(body_json(json!({ "last_name": "b" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .query_case("snakeCase")
        .body_case("snakeCase")
        .build()
        .unwrap();

    client
        .create(
            CallParams::new().with("firstName", "a"),
            &json!({ "lastName": "b" }),
        )
        .unwrap()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_response_case_conversion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "first_name": "a" })))
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .response_case("camelCase")
        .build()
        .unwrap();

    let response = client
        .get(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(response.data["firstName"], "a");
    assert!(response.data.get("first_name").is_none());
}

#[tokio::test]
async fn test_repeat_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let repeating = ResourceClient::new(endpoint(&mock_server)).unwrap();
    let joining = ResourceClient::builder(endpoint(&mock_server))
        .repeat_params(false)
        .build()
        .unwrap();

    let params = || CallParams::new().with("tag", json!(["a", "b"]));
    repeating.get_all(params()).unwrap().await.unwrap();
    joining.get_all(params()).unwrap().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("tag=a&tag=b"));
    assert_eq!(requests[1].url.query(), Some("tag=a%2Cb"));
}

#[tokio::test]
async fn test_error_message_from_body() {
    init_tracing();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "bad" })))
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .error_formatter(ErrorFormatter::new().message("error"))
        .build()
        .unwrap();

    let err = client
        .get(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap_err();

    assert_eq!(err.name, "APIError");
    assert_eq!(err.message, "bad");
    assert_eq!(
        err.status_code,
        Some(ErrorCode::Http(StatusCode::INTERNAL_SERVER_ERROR))
    );
    assert_eq!(err.request_info.method, http::Method::GET);
    assert_eq!(
        err.request_info.url,
        format!("{}/endpoint/1", mock_server.uri())
    );
}

#[tokio::test]
async fn test_error_name_function_and_factory() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/endpoint/5"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "errors": [{ "code": "forbidden", "detail": "nope" }] })),
        )
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .error_formatter(
            ErrorFormatter::new()
                .name(rest_resource::ErrorField::func(|body| {
                    body.pointer("/errors/0/code").cloned()
                }))
                .message("errors.0.detail"),
        )
        .error_factory(
            |name: String,
             message: String,
             status_code: Option<ErrorCode>,
             request_info: RequestInfo,
             original_error: Arc<dyn std::error::Error + Send + Sync>| ApiError {
                name: name.to_uppercase(),
                message,
                status_code,
                request_info,
                original_error,
            },
        )
        .build()
        .unwrap();

    let err = client
        .delete(CallParams::new().with("id", 5))
        .unwrap()
        .await
        .unwrap_err();

    assert_eq!(err.name, "FORBIDDEN");
    assert_eq!(err.message, "nope");
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.request_info.method, http::Method::DELETE);
}

#[tokio::test]
async fn test_network_error() {
    init_tracing();

    // Nothing listens on port 1.
    let client = ResourceClient::new("http://127.0.0.1:1/endpoint").unwrap();

    let err = client
        .get_all(CallParams::new())
        .unwrap()
        .await
        .unwrap_err();

    assert_eq!(err.name, "APIError");
    assert!(matches!(err.status_code, Some(ErrorCode::Transport(_))));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_callback_and_pending_are_equivalent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/endpoint/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "gone" })))
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .error_formatter(ErrorFormatter::new().message("message"))
        .build()
        .unwrap();

    let awaited = client
        .get(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap();
    let called = via_callback(&client, Verb::Get, vec![json!({ "id": 1 }).into()])
        .await
        .unwrap();
    assert_eq!(awaited.data, called.data);
    assert_eq!(awaited.status, called.status);

    let awaited = client
        .get(CallParams::new().with("id", 2))
        .unwrap()
        .await
        .unwrap_err();
    let called = via_callback(&client, Verb::Get, vec![json!({ "id": 2 }).into()])
        .await
        .unwrap_err();
    assert_eq!(awaited.name, called.name);
    assert_eq!(awaited.message, "gone");
    assert_eq!(awaited.message, called.message);
    assert_eq!(awaited.status_code, called.status_code);
}

#[tokio::test]
async fn test_sync_customizer_changes_submitted_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoint"))
        .and(body_json(json!({ "name": "x", "stamped": true })))
        .and(header("x-trace", "t-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .customizer(Customizer::sync(|request, _params| {
            if let Some(Value::Object(body)) = request.body.as_mut() {
                body.insert("stamped".to_string(), json!(true));
            }
            let _ = request.set_header("x-trace", "t-1");
        }))
        .build()
        .unwrap();

    client
        .create(CallParams::new(), &json!({ "name": "x" }))
        .unwrap()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_call_customizer_runs_after_client_customizer() {
    let transport = RecordingTransport::ok(json!([]));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport.clone())
        .customizer(Customizer::sync(|request, _params| {
            let _ = request.set_header("x-stage", "client");
        }))
        .build()
        .unwrap();

    let params = CallParams::new()
        .with("page", 1)
        .with_customizer(Customizer::with_continuation(|mut request, params, next| {
            assert_eq!(params.get("page"), Some(&json!(1)));
            assert_eq!(request.headers.get("x-stage").unwrap(), "client");
            let _ = request.set_header("x-stage", "call");
            next.proceed(request);
        }));

    client.get_all(params).unwrap().await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].headers.get("x-stage").unwrap(), "call");
    assert_eq!(requests[0].query_value("page"), Some("1"));
}

#[tokio::test]
async fn test_async_customizer_abort_never_reaches_transport() {
    init_tracing();

    let transport = RecordingTransport::ok(json!({}));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport.clone())
        .customizer(Customizer::with_continuation(|_request, _params, next| {
            tokio::spawn(async move {
                next.abort("token refresh failed");
            });
        }))
        .build()
        .unwrap();

    let err = client
        .get(CallParams::new().with("id", 1))
        .unwrap()
        .await
        .unwrap_err();
    assert_eq!(err.name, "CustomizerError");
    assert_eq!(err.message, "token refresh failed");
    assert_eq!(err.request_info.url, "http://domain.com/endpoint/1");

    let called = via_callback(&client, Verb::Get, vec![json!({ "id": 1 }).into()])
        .await
        .unwrap_err();
    assert_eq!(called.message, "token refresh failed");

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_injected_transport_failure_is_normalized() {
    let transport = RecordingTransport::failing(TransportError::from_status(
        StatusCode::UNPROCESSABLE_ENTITY,
        HeaderMap::new(),
        r#"{"error":{"type":"Validation","fields":["name"]}}"#,
    ));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport)
        .error_formatter(ErrorFormatter::new().name("error.type").message("error.fields"))
        .build()
        .unwrap();

    let err = client
        .create(CallParams::new(), &json!({}))
        .unwrap()
        .await
        .unwrap_err();

    assert_eq!(err.name, "Validation");
    assert_eq!(err.message, r#"["name"]"#);
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
}

#[tokio::test]
async fn test_form_encoding_and_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoint"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("accept", "application/json"))
        .and(header("x-api-version", "2"))
        .and(body_string("name=x"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .request_type(RequestType::Form)
        .header("x-api-version", "2")
        .keep_alive(true)
        .build()
        .unwrap();

    let response = client
        .create(CallParams::new(), &json!({ "name": "x" }))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(response.data, json!("created"));
    assert_eq!(response.raw_body, "created");
}

#[tokio::test]
async fn test_unencodable_form_body_is_an_argument_fault() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = ResourceClient::builder(endpoint(&mock_server))
        .request_type(RequestType::Form)
        .build()
        .unwrap();

    for body in [json!([1, 2]), json!({ "a": { "b": 1 } }), json!({ "a": null })] {
        let err = client.create(CallParams::new(), &body).unwrap_err();
        assert!(err.is_argument(), "{} should be rejected", body);

        let err = client
            .invoke(Verb::Create, vec![body.clone().into(), Arg::callback(|_| {})])
            .unwrap_err();
        assert!(err.is_argument());
    }

    // The same shapes stay valid as JSON.
    let json_client = ResourceClient::new(endpoint(&mock_server)).unwrap();
    assert!(json_client
        .create(CallParams::new(), &json!({ "a": { "b": 1 } }))
        .is_ok());
}

#[tokio::test]
async fn test_template_query_is_sent_with_call_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint/1"))
        .and(query_param("api_key", "k"))
        .and(query_param("fields", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "a" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        ResourceClient::new(format!("{}/endpoint/:id?api_key=k", mock_server.uri())).unwrap();

    let response = client
        .get(CallParams::new().with("id", 1).with("fields", "name"))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(response.data["name"], "a");
}

#[test]
fn test_callback_outside_runtime_is_a_configuration_error() {
    let transport = RecordingTransport::ok(json!({}));
    let client = ResourceClient::builder("http://domain.com/endpoint/:id")
        .transport(transport.clone())
        .build()
        .unwrap();

    let err = client
        .invoke(Verb::GetAll, vec![Arg::callback(|_| {})])
        .unwrap_err();

    assert!(matches!(err, Error::ConfigurationError(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_options_document_configures_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .and(query_param("page_size", "5,10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 2 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options: rest_resource::Options = serde_json::from_value(json!({
        "query": { "convertCase": "snakeCase", "repeatParams": false },
        "response": { "body": { "convertCase": "camelCase" } }
    }))
    .unwrap();

    let client = ResourceClient::builder(endpoint(&mock_server))
        .options(options)
        .build()
        .unwrap();

    let response = client
        .get_all(CallParams::new().with("pageSize", json!([5, 10])))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(response.data, json!({ "totalCount": 2 }));
}
