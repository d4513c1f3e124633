// src/extract.rs

use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::{dev::Payload, error::PayloadError, web, FromRequest, HttpRequest};
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// Largest JSON body accepted by the CRUD endpoints.
pub const MAX_JSON_BYTES: usize = 256 * 1024;

/// Drains a body stream. Fails with `PayloadTooLarge` as soon as more than
/// `limit` bytes have arrived.
pub async fn read_limited<S>(stream: S, limit: usize) -> ApiResult<web::BytesMut>
where
    S: Stream<Item = Result<web::Bytes, PayloadError>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut body = web::BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Blank input means "no body" and gives `T::default()`.
pub fn parse_or_default<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// A JSON body the caller may leave out. The content type is not checked,
/// and an absent body reads as `T::default()`.
#[derive(Debug)]
pub struct OptionalJson<T>(pub T);

impl<T> OptionalJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for OptionalJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for OptionalJson<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let payload = payload.take();
        Box::pin(async move {
            let body = read_limited(payload, MAX_JSON_BYTES).await?;
            Ok(OptionalJson(parse_or_default(&body)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Body {
        #[serde(default)]
        name: String,
    }

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<web::Bytes, PayloadError>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok::<_, PayloadError>(web::Bytes::from_static(*p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn blank_body_is_default() {
        assert_eq!(parse_or_default::<Body>(b"").unwrap(), Body::default());
        assert_eq!(parse_or_default::<Body>(b" \n ").unwrap(), Body::default());
        assert_eq!(
            parse_or_default::<Body>(br#"{"name":"x"}"#).unwrap().name,
            "x"
        );
    }

    #[test]
    fn malformed_body_is_invalid() {
        assert!(matches!(
            parse_or_default::<Body>(b"{oops"),
            Err(ApiError::InvalidBody(_))
        ));
    }

    #[actix_web::test]
    async fn reads_up_to_the_limit() {
        let body = read_limited(chunks(&[b"abc", b"def"]), 6).await.unwrap();
        assert_eq!(&body[..], b"abcdef");
    }

    #[actix_web::test]
    async fn stops_past_the_limit() {
        match read_limited(chunks(&[b"abc", b"defg"]), 6).await {
            Err(ApiError::PayloadTooLarge(limit)) => assert_eq!(limit, 6),
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }
    }
}
