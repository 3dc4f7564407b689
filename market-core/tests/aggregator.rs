//! End-to-end aggregation against wiremock upstreams.

use std::time::Duration;

use chrono::{Datelike, Local};
use market_core::{
    Config, ContextAggregator, ContextRequest, Endpoints, MarketContext, Place, ProviderId,
    Season, Trend,
    social::synthetic::HASHTAGS,
};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    Config {
        endpoints: Endpoints::all_at(base_url),
        request_timeout_ms: 500,
        seed: Some(42),
        ..Config::default()
    }
}

fn with_all_keys(mut config: Config) -> Config {
    config.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".into());
    config.upsert_provider_api_key(ProviderId::SocialBlade, "SB_KEY".into());
    config
}

fn current_season() -> Season {
    Season::from_month(Local::now().month())
}

async fn mount_mumbai_ip(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/49.36.0.1/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Mumbai",
            "country_name": "India",
            "latitude": 19.07,
            "longitude": 72.88
        })))
        .mount(server)
        .await;
}

fn assert_complete(ctx: &MarketContext) {
    let json = serde_json::to_value(ctx).expect("serialize");
    for key in ["place", "weather", "trend", "season", "timestamp"] {
        assert!(!json[key].is_null(), "missing {key}");
    }
    for key in ["city", "country", "lat", "lon"] {
        assert!(!json["place"][key].is_null(), "missing place.{key}");
    }
    for key in ["temperature", "condition", "humidity", "wind"] {
        assert!(!json["weather"][key].is_null(), "missing weather.{key}");
    }
    assert!(Trend::ALL.contains(&ctx.trend));
    assert_eq!(ctx.season, current_season());
}

#[tokio::test]
async fn rain_in_fashion_forward_city_is_rain_ready() {
    let server = MockServer::start().await;
    mount_mumbai_ip(&server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": { "temp": 27.2, "humidity": 91 },
            "weather": [{ "main": "Rain", "description": "moderate rain" }],
            "wind": { "speed": 6.2 }
        })))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".into());
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let ctx = aggregator.aggregate(&ContextRequest::new("49.36.0.1")).await;

    assert_complete(&ctx);
    assert_eq!(ctx.place.city, "Mumbai");
    assert_eq!(ctx.weather.condition, "Rain");
    assert_eq!(ctx.trend, Trend::RainReadyFashion);
}

#[tokio::test]
async fn no_credentials_still_gives_a_complete_context() {
    let server = MockServer::start().await;
    mount_mumbai_ip(&server).await;

    let config = test_config(&server.uri());
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let ctx = aggregator.aggregate(&ContextRequest::new("49.36.0.1")).await;

    assert_complete(&ctx);
    assert!((17.0..=35.0).contains(&ctx.weather.temperature));
    assert!((30..=90).contains(&ctx.weather.humidity));
    assert!((0.5..=5.2).contains(&ctx.weather.wind));

    let social = ctx.social.expect("synthesized social stats");
    assert_eq!(social.handle, "demo_brand");
    assert_eq!(social.recent_post.hashtags.len(), 3);
    assert!(
        social
            .recent_post
            .hashtags
            .iter()
            .all(|t| HASHTAGS.contains(&t.as_str()))
    );
}

#[tokio::test]
async fn no_credentials_and_geo_down_keeps_synthetic_values() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let ctx = aggregator
        .aggregate(&ContextRequest::new("Nowhere").with_handle("acme"))
        .await;

    assert_complete(&ctx);
    assert_eq!(ctx.place, Place::fallback());
    assert_eq!(ctx.social.expect("synthesized").handle, "acme");
}

#[tokio::test]
async fn geo_timeout_keeps_live_weather_for_fallback_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/8.8.8.8/json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "city": "Mountain View",
                    "country_name": "United States",
                    "latitude": 37.4,
                    "longitude": -122.1
                }))
                .set_delay(Duration::from_millis(2_000)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "12.97"))
        .and(query_param("lon", "77.59"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": { "temp": 22.6, "humidity": 55 },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "wind": { "speed": 2.6 }
        })))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".into());
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let ctx = aggregator.aggregate(&ContextRequest::new("8.8.8.8")).await;

    assert_complete(&ctx);
    assert_eq!(ctx.place, Place::fallback());
    assert_eq!(ctx.weather.temperature, 23.0);
    assert_eq!(ctx.weather.condition, "Clear");
    assert_eq!(ctx.weather.humidity, 55);
}

#[tokio::test]
async fn every_upstream_failing_gives_the_last_resort_context() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let config = with_all_keys(test_config(&server.uri()));
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let ctx = aggregator
        .aggregate(&ContextRequest::new("49.36.0.1").with_handle("acme"))
        .await;

    assert_eq!(ctx, MarketContext::last_resort(ctx.timestamp, current_season()));
    assert_eq!(ctx.trend, Trend::ModernChic);
    assert_eq!(ctx.weather.condition, "clear");
    assert!(ctx.social.is_none());
}

#[tokio::test]
async fn concurrent_callers_are_independent() {
    let server = MockServer::start().await;
    mount_mumbai_ip(&server).await;

    let config = test_config(&server.uri());
    let aggregator = ContextAggregator::from_config(&config).expect("aggregator");

    let requests: Vec<ContextRequest> = (0..8)
        .map(|i| {
            let identifier = if i % 2 == 0 { "49.36.0.1" } else { "" };
            ContextRequest::new(identifier).with_handle(format!("brand_{i}"))
        })
        .collect();

    let contexts =
        futures::future::join_all(requests.iter().map(|r| aggregator.aggregate(r))).await;

    for (i, ctx) in contexts.iter().enumerate() {
        assert_complete(ctx);
        let expected_city = if i % 2 == 0 { "Mumbai" } else { "Bangalore" };
        assert_eq!(ctx.place.city, expected_city);
        assert_eq!(
            ctx.social.as_ref().expect("social").handle,
            format!("brand_{i}")
        );
    }
}
