//! Verify build/parse methods and the retry schedule against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::collections::VecDeque;
use std::time::Duration;

use ecomarket_core::retry::{ClassifiedFailure, FixedJitter, Sleeper};
use ecomarket_core::{
    ApiError, EcoMarketClient, HttpMethod, HttpRequest, HttpResponse, NewProduct, Product,
    ProductPatch, RetryExecutor, RetryPolicy,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> EcoMarketClient {
    EcoMarketClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Compare method, url, headers and JSON body against `expected_request`.
fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: NewProduct = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_product(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let product = c.parse_create_product(simulated_response(case)).unwrap();
        let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(product, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let raw = include_str!("../../test-vectors/get.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_get_product(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_product(simulated_response(case));
        match case["expected_error"].as_str() {
            None => {
                let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(result.unwrap(), expected, "{name}: parsed result");
            }
            Some("not_found") => assert!(matches!(result, Err(ApiError::NotFound)), "{name}"),
            Some("http") => assert!(matches!(result, Err(ApiError::Http { .. })), "{name}"),
            Some(other) => panic!("unknown expected_error: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Update (PATCH)
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let raw = include_str!("../../test-vectors/update.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let patch: ProductPatch = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_product(id, &patch).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let product = c.parse_update_product(simulated_response(case)).unwrap();
        let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(product, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Retry schedule
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingSleeper {
    delays: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, delay: Duration) {
        self.delays.push(delay);
    }
}

/// `"ok"` is a success, a number is an HTTP failure, `null` a transport failure.
fn scripted_result(step: &Value) -> Result<(), ClassifiedFailure> {
    match step {
        Value::String(s) if s == "ok" => Ok(()),
        Value::Number(n) => Err(ClassifiedFailure::http(n.as_u64().unwrap() as u16, "scripted")),
        Value::Null => Err(ClassifiedFailure::transport("connection refused")),
        other => panic!("unknown scripted step: {other}"),
    }
}

#[test]
fn retry_test_vectors() {
    let raw = include_str!("../../test-vectors/retry.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let p = &vectors["policy"];
    let policy = RetryPolicy {
        max_retries: p["max_retries"].as_u64().unwrap() as u32,
        base_delay: Duration::from_millis(p["base_delay_ms"].as_u64().unwrap()),
        exponent_base: 2,
        max_jitter: Duration::from_millis(p["max_jitter_ms"].as_u64().unwrap()),
    };
    let jitter = vectors["jitter_sample"].as_f64().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut script: VecDeque<Result<(), ClassifiedFailure>> = case["statuses"]
            .as_array()
            .unwrap()
            .iter()
            .map(scripted_result)
            .collect();

        let mut executor =
            RetryExecutor::with_parts(policy, FixedJitter(jitter), RecordingSleeper::default());
        let outcome = executor.run_with_outcome(name, || {
            script.pop_front().expect("operation called more often than scripted")
        });

        assert_eq!(
            u64::from(outcome.attempts),
            case["expected_attempts"].as_u64().unwrap(),
            "{name}: attempts"
        );
        let expected_delays: Vec<Duration> = case["expected_delays_ms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|ms| Duration::from_millis(ms.as_u64().unwrap()))
            .collect();
        assert_eq!(executor.sleeper().delays, expected_delays, "{name}: delays");

        match &case["expected_status"] {
            Value::String(s) if s == "ok" => assert!(outcome.result.is_ok(), "{name}"),
            Value::Number(n) => {
                assert_eq!(outcome.result.unwrap_err().status, Some(n.as_u64().unwrap() as u16), "{name}")
            }
            Value::Null => assert_eq!(outcome.result.unwrap_err().status, None, "{name}"),
            other => panic!("unknown expected_status: {other}"),
        }
    }
}
