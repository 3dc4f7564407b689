//! Geolocation: turn an IP address or a place name into a [`Place`].
//!
//! IP addresses go to the IP geolocation upstream, anything else to the
//! free-text geocoder. Whatever goes wrong, the resolver answers with
//! [`Place::fallback`].

use std::{fmt::Debug, net::IpAddr};

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    Config,
    error::UpstreamError,
    geo::{ipapi::IpApiLocator, nominatim::NominatimGeocoder},
    model::Place,
    provider::{Provenance, Resolved},
};

pub mod ipapi;
pub mod nominatim;

#[async_trait]
pub trait GeoProvider: Send + Sync + Debug {
    async fn locate(&self, query: &str) -> Result<Place, UpstreamError>;
}

/// How an identifier will be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    Address(IpAddr),
    Name(&'a str),
    Empty,
}

impl<'a> Identifier<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Identifier::Empty
        } else if let Ok(addr) = trimmed.parse::<IpAddr>() {
            Identifier::Address(addr)
        } else {
            Identifier::Name(trimmed)
        }
    }
}

#[derive(Debug)]
pub struct GeoResolver {
    by_address: Box<dyn GeoProvider>,
    by_name: Box<dyn GeoProvider>,
}

impl GeoResolver {
    pub fn new(by_address: Box<dyn GeoProvider>, by_name: Box<dyn GeoProvider>) -> Self {
        Self { by_address, by_name }
    }

    pub fn from_config(config: &Config, http: &Client) -> Self {
        Self::new(
            Box::new(IpApiLocator::new(http.clone(), &config.endpoints.ipapi)),
            Box::new(NominatimGeocoder::new(http.clone(), &config.endpoints.nominatim)),
        )
    }

    /// Resolve `identifier`, never failing. One attempt, no retries.
    pub async fn resolve(&self, identifier: &str) -> Resolved<Place> {
        let result = match Identifier::parse(identifier) {
            Identifier::Address(addr) => self.by_address.locate(&addr.to_string()).await,
            Identifier::Name(name) => self.by_name.locate(name).await,
            Identifier::Empty => {
                tracing::debug!("empty identifier, using fallback place");
                return Resolved::new(Place::fallback(), Provenance::Fallback);
            }
        };

        match result.and_then(validate) {
            Ok(place) => Resolved::new(place, Provenance::Live),
            Err(err) => {
                tracing::warn!(error = %err, identifier, "geolocation failed, using fallback place");
                Resolved::new(Place::fallback(), Provenance::Fallback)
            }
        }
    }
}

fn validate(place: Place) -> Result<Place, UpstreamError> {
    if place.city.trim().is_empty() {
        return Err(UpstreamError::malformed("geo", "empty city"));
    }
    if !place.latitude.is_finite() || !place.longitude.is_finite() {
        return Err(UpstreamError::malformed("geo", "non-finite coordinates"));
    }
    Ok(place)
}
