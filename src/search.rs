//! HTTP client for the product search service.
//!
//! Exact-UPC filtering happens service-side; the widget only ranks and
//! displays whatever the service returns.

use crate::ProductCandidate;
use gloo_net::http::Request;
use std::fmt;

/// Failures talking to the search service.
#[derive(Debug)]
pub enum SearchError {
    /// The request never completed, or came back non-2xx.
    Request(String),
    /// The response body did not match the expected hit shape.
    Payload(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Request(detail) => write!(f, "search request failed: {}", detail),
            SearchError::Payload(detail) => {
                write!(f, "search response was malformed: {}", detail)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Thin fetch wrapper around the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClient {
    endpoint: String,
    hits_per_page: u32,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>, hits_per_page: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            hits_per_page,
        }
    }

    /// Fetch raw hits for a UPC. Timeouts and retries are the service's
    /// concern; callers fall back to an empty result set on `Err`.
    pub async fn search(&self, upc: &str) -> Result<Vec<ProductCandidate>, SearchError> {
        let hits = self.hits_per_page.to_string();
        let response = Request::get(&self.endpoint)
            .query([("upc", upc), ("hitsPerPage", hits.as_str())])
            .send()
            .await
            .map_err(|err| SearchError::Request(err.to_string()))?;
        if !response.ok() {
            return Err(SearchError::Request(format!("status {}", response.status())));
        }
        response
            .json::<Vec<ProductCandidate>>()
            .await
            .map_err(|err| SearchError::Payload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hits_deserialize_from_the_service_shape() {
        let body = json!([
            {
                "id": "store-81#0123",
                "vendor": "Acme Foods",
                "productName": "Sparkling Water 12pk",
                "unitPrice": 6.99,
                "upc": "012345678905",
                "storeName": "Acme Market #81",
                "onHandQuantity": 3,
                "category": "Beverages",
                "geo": {"lat": 42.1, "lng": -71.2},
                "distanceMeters": 500.0
            },
            {
                "id": "store-12#0123"
            }
        ]);
        let hits: Vec<ProductCandidate> = serde_json::from_value(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].unit_price, Some(6.99));
        assert_eq!(hits[0].on_hand_quantity, Some(3));
        assert_eq!(hits[0].distance_meters, Some(500.0));

        // A bare hit still carries the identifier; everything else is optional.
        assert_eq!(hits[1].id, "store-12#0123");
        assert!(hits[1].store_name.is_none());
        assert!(hits[1].distance_meters.is_none());
        assert_eq!(hits[1].max_quantity(), 1);
        assert_eq!(hits[1].price(), 0.0);
    }

    #[test]
    fn errors_render_their_cause() {
        let err = SearchError::Request("status 503".to_string());
        assert_eq!(err.to_string(), "search request failed: status 503");
    }
}
