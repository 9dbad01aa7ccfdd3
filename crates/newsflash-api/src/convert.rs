//! Response body converters

use std::sync::Arc;

use newsflash_http::Response;
use serde::de::DeserializeOwned;

use crate::{ApiError, Result};

/// Type-erased outcome of a body conversion
#[derive(Debug, Clone)]
pub enum Decoded {
    /// The explicit "no value" result, distinct from a decoding error
    Absent,
    /// An erased JSON document, mapped to the declared type by the chain
    Json(serde_json::Value),
}

/// One converter in a fixed-order chain.
///
/// Returning `None` defers the response to the next converter in the
/// chain; returning `Some` finishes the conversion, success or not.
pub trait BodyConverter: Send + Sync {
    fn convert(&self, response: &Response) -> Option<Result<Decoded>>;
}

/// Maps declared-empty bodies to the absent value.
///
/// The check is on the declared content length only; bytes actually read
/// are never consulted. Responses without a declared length (chunked
/// transfers) are deferred to the next converter.
pub struct EmptyBodyConverter;

impl BodyConverter for EmptyBodyConverter {
    fn convert(&self, response: &Response) -> Option<Result<Decoded>> {
        if response.declared_length == Some(0) {
            Some(Ok(Decoded::Absent))
        } else {
            None
        }
    }
}

/// General-purpose JSON converter backed by serde_json.
///
/// Decode failures are returned as the codec's own error, untransformed.
pub struct JsonConverter;

impl BodyConverter for JsonConverter {
    fn convert(&self, response: &Response) -> Option<Result<Decoded>> {
        Some(
            serde_json::from_slice(&response.body)
                .map(Decoded::Json)
                .map_err(ApiError::from),
        )
    }
}

/// Fixed-order list of converters, consulted first to last
pub struct ConverterChain {
    converters: Vec<Arc<dyn BodyConverter>>,
}

impl ConverterChain {
    /// Build a chain from converters in consultation order
    pub fn new(converters: Vec<Arc<dyn BodyConverter>>) -> Self {
        Self { converters }
    }

    /// Decode a response into the declared type.
    ///
    /// `Ok(None)` is the absent value; decode failures from whichever
    /// converter claimed the response propagate unchanged.
    pub fn decode<T: DeserializeOwned>(&self, response: &Response) -> Result<Option<T>> {
        for converter in &self.converters {
            if let Some(outcome) = converter.convert(response) {
                return match outcome? {
                    Decoded::Absent => Ok(None),
                    Decoded::Json(value) => Ok(Some(serde_json::from_value(value)?)),
                };
            }
        }
        Err(ApiError::NoConverter)
    }

    /// Number of converters in the chain
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the chain has no converters
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use newsflash_http::{header::HeaderMap, StatusCode};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Article {
        title: String,
    }

    fn response(body: &[u8], declared_length: Option<u64>) -> Response {
        Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.to_vec(),
            declared_length,
            from_cache: false,
        }
    }

    fn default_chain() -> ConverterChain {
        ConverterChain::new(vec![Arc::new(EmptyBodyConverter), Arc::new(JsonConverter)])
    }

    #[test]
    fn declared_empty_body_decodes_to_none() {
        let chain = default_chain();
        let decoded: Option<Article> = chain.decode(&response(b"", Some(0))).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn declared_length_wins_over_actual_bytes() {
        // A body that reports zero length but carries bytes is still absent.
        let chain = default_chain();
        let decoded: Option<Article> = chain
            .decode(&response(br#"{"title":"ignored"}"#, Some(0)))
            .unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn non_empty_body_is_decoded_by_the_delegate() {
        let chain = default_chain();
        let decoded: Option<Article> = chain
            .decode(&response(br#"{"title":"breaking"}"#, Some(19)))
            .unwrap();
        assert_eq!(
            decoded,
            Some(Article {
                title: "breaking".to_string()
            })
        );
    }

    #[test]
    fn missing_declared_length_defers_to_the_delegate() {
        let chain = default_chain();
        let decoded: Option<Article> = chain
            .decode(&response(br#"{"title":"chunked"}"#, None))
            .unwrap();
        assert_eq!(
            decoded,
            Some(Article {
                title: "chunked".to_string()
            })
        );
    }

    #[test]
    fn malformed_body_propagates_the_codec_error() {
        let chain = default_chain();
        let result: Result<Option<Article>> = chain.decode(&response(b"not json", Some(8)));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn wrong_shape_propagates_the_codec_error() {
        let chain = default_chain();
        let result: Result<Option<Article>> = chain.decode(&response(br#"{"no":"title"}"#, Some(14)));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn converters_are_consulted_in_registration_order() {
        struct ClaimEverything;

        impl BodyConverter for ClaimEverything {
            fn convert(&self, _response: &Response) -> Option<Result<Decoded>> {
                Some(Ok(Decoded::Json(serde_json::json!({"title": "claimed"}))))
            }
        }

        let chain = ConverterChain::new(vec![Arc::new(ClaimEverything), Arc::new(JsonConverter)]);
        let decoded: Option<Article> = chain.decode(&response(b"whatever", Some(8))).unwrap();
        assert_eq!(
            decoded,
            Some(Article {
                title: "claimed".to_string()
            })
        );
    }

    #[test]
    fn exhausted_chain_is_an_error() {
        let chain = ConverterChain::new(Vec::new());
        let result: Result<Option<Article>> = chain.decode(&response(b"{}", Some(2)));
        assert!(matches!(result, Err(ApiError::NoConverter)));
        assert!(chain.is_empty());
    }
}
