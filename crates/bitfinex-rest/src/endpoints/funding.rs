//! Private margin-funding endpoints
//!
//! These endpoints require authentication.

use bitfinex_auth::{Credentials, NonceSource, SignedPayload};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::RestResult;
use crate::response;
use crate::types::{Credit, Offer, OfferRequest, TakenFund};

/// Private margin-funding endpoints
pub struct FundingEndpoints<'a> {
    http: &'a Client,
    base_url: &'a str,
    credentials: &'a Credentials,
    nonce: &'a Mutex<NonceSource>,
}

impl<'a> FundingEndpoints<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        credentials: &'a Credentials,
        nonce: &'a Mutex<NonceSource>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            nonce,
        }
    }

    /// Make an authenticated POST request
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: Map<String, Value>,
    ) -> RestResult<T> {
        let nonce = self.nonce.lock().next();
        let signed = SignedPayload::build(self.credentials, path, nonce, params)?;

        let url = format!("{}/{}", self.base_url, path);
        debug!("Making authenticated request to {}", path);

        let mut request = self.http.post(&url).header("Content-Type", "application/json");
        for (name, value) in signed.headers() {
            request = request.header(name, value);
        }

        let response = request.body(signed.body().to_owned()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let value = response::interpret_json(status, &body)?;
        response::decode(value)
    }

    /// Place a new margin-funding offer
    ///
    /// # Arguments
    /// * `offer` - Offer request with currency, amount, rate, period and
    ///   direction
    #[instrument(
        skip(self, offer),
        fields(currency = %offer.currency, direction = %offer.direction)
    )]
    pub async fn new_offer(&self, offer: &OfferRequest) -> RestResult<Offer> {
        debug!(
            "Placing {} offer of {} {} at {}% for {} days",
            offer.direction, offer.amount, offer.currency, offer.rate, offer.period
        );

        self.post("offer/new", offer.to_params()).await
    }

    /// Cancel an active offer
    ///
    /// # Arguments
    /// * `offer_id` - ID of the offer to cancel
    #[instrument(skip(self))]
    pub async fn cancel_offer(&self, offer_id: u64) -> RestResult<Offer> {
        let mut params = Map::new();
        params.insert("offer_id".to_string(), Value::from(offer_id));

        debug!("Cancelling offer {}", offer_id);

        self.post("offer/cancel", params).await
    }

    /// Get the current status of an offer
    ///
    /// # Arguments
    /// * `offer_id` - ID of the offer to inspect
    #[instrument(skip(self))]
    pub async fn offer_status(&self, offer_id: u64) -> RestResult<Offer> {
        let mut params = Map::new();
        params.insert("offer_id".to_string(), Value::from(offer_id));

        self.post("offer/status", params).await
    }

    /// List the account's active offers
    #[instrument(skip(self))]
    pub async fn active_offers(&self) -> RestResult<Vec<Offer>> {
        self.post("offers", Map::new()).await
    }

    /// List active credits (funds currently lent out)
    #[instrument(skip(self))]
    pub async fn active_credits(&self) -> RestResult<Vec<Credit>> {
        self.post("credits", Map::new()).await
    }

    /// List margin funds taken and in use
    #[instrument(skip(self))]
    pub async fn taken_funds(&self) -> RestResult<Vec<TakenFund>> {
        self.post("taken_funds", Map::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    // Full-envelope vector for an offer placement, computed independently
    // with Python's hmac/hashlib/base64.
    #[test]
    fn test_offer_envelope_signature_vector() {
        let creds = Credentials::new("K", "secret");
        let offer = OfferRequest::lend(
            "USD",
            Decimal::from_str("50.0").unwrap(),
            Decimal::from_str("20.0").unwrap(),
            2,
        );

        let signed =
            SignedPayload::build(&creds, "offer/new", 1_444_272_165, offer.to_params()).unwrap();

        assert_eq!(
            signed.body(),
            r#"{"request":"/v1/offer/new","nonce":"1444272165","currency":"USD","amount":"50.0","rate":"20.0","period":2,"direction":"lend"}"#
        );
        assert_eq!(
            signed.signature(),
            "82e3d59d56eb6bc8a57afa8366a32c9376cebbc58465fe67083f8fe44955da69a8bd27856477166fd1fdbdd64b919c2b"
        );
    }
}
