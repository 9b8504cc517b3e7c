//! Transport-independent request dispatcher.
//!
//! Maps a route and a JSON body onto one calculation and wraps the outcome
//! as `{"data": ...}` (status 200) or `{"error": ..., "kind": ...}`.

use super::dns::{query_records, RecordResolver, RecordType, SystemResolver};
use crate::config::Config;
use crate::error::NetError;
use crate::processing::{
    convert_batch, describe, summarize, summarize_cidrs, v4_to_v6, v6_to_v4, Conversion,
    DivideType, SubnetPlan,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const ROUTE_CALCULATE: &str = "/api/network/calculate";
pub const ROUTE_SUMMARY: &str = "/api/ip/summary";
pub const ROUTE_CONVERT: &str = "/api/ip/convert";
pub const ROUTE_FORMAT: &str = "/api/ip/format";
pub const ROUTE_DIVIDE: &str = "/api/network/divide";
pub const ROUTE_DNS: &str = "/api/dns/query";

/// Every route [`Service::handle`] answers.
pub const ROUTES: &[&str] = &[
    ROUTE_CALCULATE,
    ROUTE_SUMMARY,
    ROUTE_CONVERT,
    ROUTE_FORMAT,
    ROUTE_DIVIDE,
    ROUTE_DNS,
];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown route {0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid request body at '{path}': {message}")]
    Body { path: String, message: String },
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("cannot encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::Encode(_) => 500,
            _ => 400,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) | ApiError::Body { .. } => "BadRequest",
            ApiError::Net(e) => e.kind(),
            ApiError::Encode(_) => "InternalError",
        }
    }
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_result(result: Result<Value, ApiError>) -> Response {
        match result {
            Ok(data) => Response {
                status: 200,
                body: json!({ "data": data }),
            },
            Err(e) => Response {
                status: e.status(),
                body: json!({ "error": e.to_string(), "kind": e.kind() }),
            },
        }
    }
}

/// A string or a bare number; form fields arrive as either.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(u64),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct CalculateRequest {
    ip: Option<String>,
    mask: Option<Scalar>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SummaryRequest {
    #[serde(default)]
    ip_ranges: Vec<String>,
    #[serde(default)]
    as_cidr: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    #[serde(rename = "v4tov6")]
    V4ToV6,
    #[serde(rename = "v6tov4")]
    V6ToV4,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest {
    direction: Direction,
    #[serde(default)]
    ips: Vec<String>,
    #[serde(default)]
    ipv6_prefix: String,
}

#[derive(Deserialize, Debug)]
struct FormatRequest {
    conversion: Conversion,
    #[serde(default)]
    ips: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DivideRequest {
    network: Option<String>,
    divide_type: DivideType,
    value: Scalar,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DnsRequest {
    domain: Option<String>,
    #[serde(default)]
    record_types: Vec<RecordType>,
}

/// Parse a request body, reporting the JSON path of any mismatch.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ApiError::Body {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("{name} must not be empty"))),
    }
}

fn non_empty(items: &[String], name: &str) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::BadRequest(format!("{name} must not be empty")));
    }
    Ok(())
}

fn to_data<T: Serialize>(data: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(data)?)
}

/// Request handler holding its collaborators explicitly.
pub struct Service<R = SystemResolver> {
    config: Config,
    resolver: R,
}

impl Service<SystemResolver> {
    pub fn with_system_resolver(config: Config) -> Self {
        Service::new(config, SystemResolver::new())
    }
}

impl<R: RecordResolver> Service<R> {
    pub fn new(config: Config, resolver: R) -> Self {
        Service { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatch one request.
    pub async fn handle(&self, route: &str, body: &str) -> Response {
        log::info!("request {route}");
        log::trace!("request {route} body={body}");
        let result = self.dispatch(route.trim(), body).await;
        if let Err(e) = &result {
            log::warn!("request {route} failed ({}): {e}", e.status());
        }
        Response::from_result(result)
    }

    async fn dispatch(&self, route: &str, body: &str) -> Result<Value, ApiError> {
        match route {
            ROUTE_CALCULATE => {
                let req: CalculateRequest = parse_body(body)?;
                let ip = required(req.ip, "ip")?;
                let mask = required(req.mask.map(Scalar::into_text), "mask")?;
                to_data(describe(&ip, &mask)?)
            }
            ROUTE_SUMMARY => {
                let req: SummaryRequest = parse_body(body)?;
                non_empty(&req.ip_ranges, "ipRanges")?;
                if req.as_cidr {
                    to_data(summarize_cidrs(&req.ip_ranges)?)
                } else {
                    to_data(summarize(&req.ip_ranges)?)
                }
            }
            ROUTE_CONVERT => {
                let req: ConvertRequest = parse_body(body)?;
                non_empty(&req.ips, "ips")?;
                match req.direction {
                    Direction::V4ToV6 => {
                        let prefix = required(Some(req.ipv6_prefix), "ipv6Prefix")?;
                        to_data(v4_to_v6(&req.ips, &prefix)?)
                    }
                    Direction::V6ToV4 => to_data(v6_to_v4(&req.ips)?),
                }
            }
            ROUTE_FORMAT => {
                let req: FormatRequest = parse_body(body)?;
                non_empty(&req.ips, "ips")?;
                to_data(convert_batch(req.conversion, &req.ips)?)
            }
            ROUTE_DIVIDE => {
                let req: DivideRequest = parse_body(body)?;
                let network = required(req.network, "network")?;
                let text = req.value.into_text();
                let value: u64 = text.trim().parse().map_err(|_| {
                    ApiError::BadRequest(format!("value '{text}' must be a positive integer"))
                })?;
                let plan = SubnetPlan::new(&network, req.divide_type, value)?;
                let limit = self.config.max_subnets;
                if plan.remaining() > limit as u128 {
                    return Err(NetError::range(format!(
                        "dividing {network} into /{} gives {} subnets, limit is {limit}",
                        plan.prefix(),
                        plan.remaining()
                    ))
                    .into());
                }
                to_data(plan.collect::<Vec<_>>())
            }
            ROUTE_DNS => {
                let req: DnsRequest = parse_body(body)?;
                let domain = required(req.domain, "domain")?;
                if req.record_types.is_empty() {
                    return Err(ApiError::BadRequest(
                        "recordTypes must not be empty".to_string(),
                    ));
                }
                let sets = query_records(
                    &self.resolver,
                    &domain,
                    &req.record_types,
                    self.config.dns_workers,
                    self.config.dns_timeout,
                )
                .await;
                to_data(sets)
            }
            other => Err(ApiError::NotFound(other.to_string())),
        }
    }
}
