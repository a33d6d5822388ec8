use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::Timeout;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceExt};

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request timed out")]
    Timeout(#[source] BoxError),
    #[error(transparent)]
    Service(BoxError),
    #[error("[{status:?}] {body:?}")]
    Http { status: StatusCode, body: Bytes },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Request(#[from] http::Error),
}

impl Error {
    fn service(e: BoxError) -> Self {
        if e.is::<tower::timeout::error::Elapsed>() || is_transport_timeout(&e) {
            Self::Timeout(e)
        } else {
            Self::Service(e)
        }
    }
}

#[cfg(feature = "reqwest")]
fn is_transport_timeout(e: &BoxError) -> bool {
    e.downcast_ref::<reqwest::Error>()
        .is_some_and(|e| e.is_timeout())
}

#[cfg(not(feature = "reqwest"))]
fn is_transport_timeout(_: &BoxError) -> bool {
    false
}

type BoxedService = BoxService<Request<Bytes>, Response<Bytes>, BoxError>;

/// A cloneable handle to any `tower::Service` that speaks buffered HTTP.
#[derive(Clone)]
pub struct Client(Buffer<BoxedService, Request<Bytes>>);

impl Client {
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request<Bytes>, Response = Response<Bytes>> + Send + 'static,
        S::Future: Send + 'static,
        S::Error: Into<BoxError>,
    {
        Self(Buffer::new(
            BoxService::new(service.map_err(Into::into)),
            1024,
        ))
    }

    /// Like [`Client::new`], failing requests with [`Error::Timeout`] once `timeout` elapses.
    pub fn with_timeout<S>(service: S, timeout: Option<Duration>) -> Self
    where
        S: Service<Request<Bytes>, Response = Response<Bytes>> + Send + 'static,
        S::Future: Send + 'static,
        S::Error: Into<BoxError>,
    {
        match timeout {
            Some(timeout) => Self::new(Timeout::new(service, timeout)),
            None => Self::new(service),
        }
    }

    #[cfg(feature = "reqwest")]
    pub fn reqwest(client: reqwest::Client, timeout: Option<Duration>) -> Self {
        Self::with_timeout(
            tower::service_fn(move |request: Request<Bytes>| {
                let client = client.clone();
                async move {
                    let response = client
                        .execute(reqwest::Request::try_from(request)?)
                        .await?;
                    let status = response.status();
                    let headers = response.headers().clone();
                    let mut response = Response::new(response.bytes().await?);
                    *response.status_mut() = status;
                    *response.headers_mut() = headers;
                    Ok::<_, reqwest::Error>(response)
                }
            }),
            timeout,
        )
    }

    /// Sends exactly one request. Non-2xx responses become [`Error::Http`].
    pub async fn send<T, U>(&self, method: Method, uri: Uri, body: T) -> Result<U, Error>
    where
        T: IntoBody,
        U: FromBody,
    {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = T::CONTENT_TYPE {
            request = request.header(CONTENT_TYPE, content_type);
        }
        let request = request.body(body.into_body()?)?;

        let response = self
            .0
            .clone()
            .oneshot(request)
            .await
            .map_err(Error::service)?;
        let (parts, body) = response.into_parts();
        if parts.status.is_success() {
            U::from_body(body)
        } else {
            Err(Error::Http {
                status: parts.status,
                body,
            })
        }
    }
}

pub trait IntoBody {
    const CONTENT_TYPE: Option<&'static str> = None;

    fn into_body(self) -> Result<Bytes, Error>;
}

pub trait FromBody: Sized {
    fn from_body(body: Bytes) -> Result<Self, Error>;
}

impl IntoBody for Bytes {
    fn into_body(self) -> Result<Bytes, Error> {
        Ok(self)
    }
}

impl FromBody for Bytes {
    fn from_body(body: Bytes) -> Result<Self, Error> {
        Ok(body)
    }
}

#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T> IntoBody for Json<T>
where
    T: Serialize,
{
    const CONTENT_TYPE: Option<&'static str> = Some("application/json");

    fn into_body(self) -> Result<Bytes, Error> {
        Ok(serde_json::to_vec(&self.0)?.into())
    }
}

impl<T> FromBody for Json<T>
where
    T: DeserializeOwned,
{
    fn from_body(body: Bytes) -> Result<Self, Error> {
        Ok(Self(serde_json::from_slice(&body)?))
    }
}

/// `application/x-www-form-urlencoded` pairs, in order.
pub struct Form<'a>(pub &'a [(&'a str, &'a str)]);

impl IntoBody for Form<'_> {
    const CONTENT_TYPE: Option<&'static str> = Some("application/x-www-form-urlencoded");

    fn into_body(self) -> Result<Bytes, Error> {
        Ok(url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0)
            .finish()
            .into())
    }
}
