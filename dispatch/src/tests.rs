use super::{Client, Error, Form, Json};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Recorded = Arc<Mutex<Vec<Request<Bytes>>>>;

fn recording(status: StatusCode, body: &'static str) -> (Client, Recorded) {
    let recorded = Recorded::default();
    let client = Client::new(tower::service_fn({
        let recorded = recorded.clone();
        move |request: Request<Bytes>| {
            recorded.lock().unwrap().push(request);
            let mut response = Response::new(Bytes::from_static(body.as_bytes()));
            *response.status_mut() = status;
            async move { Ok::<_, Infallible>(response) }
        }
    }));
    (client, recorded)
}

#[tokio::test]
async fn test_send_json() {
    #[derive(Serialize)]
    struct Ping<'a> {
        message: &'a str,
    }

    #[derive(Deserialize)]
    struct Pong {
        reply: String,
    }

    let (client, recorded) = recording(StatusCode::OK, r#"{"reply":"pong"}"#);
    let response = client
        .send::<_, Json<Pong>>(
            Method::PUT,
            "https://example.com/ping".parse().unwrap(),
            Json(Ping { message: "ping" }),
        )
        .await
        .unwrap();
    assert_eq!(response.0.reply, "pong");

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method(), Method::PUT);
    assert_eq!(recorded[0].uri(), "https://example.com/ping");
    assert_eq!(recorded[0].headers()[CONTENT_TYPE], "application/json");
    assert_eq!(recorded[0].body(), r#"{"message":"ping"}"#);
}

#[tokio::test]
async fn test_send_form() {
    let (client, recorded) = recording(StatusCode::OK, "");
    client
        .send::<_, Bytes>(
            Method::POST,
            "https://example.com/token".parse().unwrap(),
            Form(&[("grant_type", "a:b"), ("assertion", "x+y z")]),
        )
        .await
        .unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(
        recorded[0].headers()[CONTENT_TYPE],
        "application/x-www-form-urlencoded",
    );
    assert_eq!(recorded[0].body(), "grant_type=a%3Ab&assertion=x%2By+z");
}

#[tokio::test]
async fn test_http_error() {
    let (client, recorded) = recording(StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#);
    let e = client
        .send::<_, Bytes>(
            Method::POST,
            "https://example.com/token".parse().unwrap(),
            Bytes::new(),
        )
        .await
        .unwrap_err();
    match e {
        Error::Http { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, r#"{"error":"invalid_grant"}"#);
        }
        e => panic!("unexpected error: {e:?}"),
    }
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_json() {
    let (client, _) = recording(StatusCode::OK, "not json");
    let e = client
        .send::<_, Json<serde_json::Value>>(
            Method::GET,
            "https://example.com/".parse().unwrap(),
            Bytes::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(e, Error::Json(_)), "{e:?}");
}

#[tokio::test]
async fn test_service_error() {
    let client = Client::new(tower::service_fn(|_: Request<Bytes>| async {
        Err::<Response<Bytes>, _>(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }));
    let e = client
        .send::<_, Bytes>(
            Method::GET,
            "https://example.com/".parse().unwrap(),
            Bytes::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(e, Error::Service(_)), "{e:?}");
}

#[tokio::test]
async fn test_timeout() {
    let client = Client::with_timeout(
        tower::service_fn(|_: Request<Bytes>| {
            std::future::pending::<Result<Response<Bytes>, Infallible>>()
        }),
        Some(Duration::from_millis(10)),
    );
    let e = client
        .send::<_, Bytes>(
            Method::GET,
            "https://example.com/".parse().unwrap(),
            Bytes::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(e, Error::Timeout(_)), "{e:?}");
}

#[tokio::test]
async fn test_with_timeout_forwards_service_errors() {
    for timeout in [None, Some(Duration::from_secs(30))] {
        let client = Client::with_timeout(
            tower::service_fn(|_: Request<Bytes>| async {
                Err::<Response<Bytes>, _>(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }),
            timeout,
        );
        let e = client
            .send::<_, Bytes>(
                Method::GET,
                "https://example.com/".parse().unwrap(),
                Bytes::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(e, Error::Service(_)), "{timeout:?}: {e:?}");
    }
}
