//! Request parameter validators.
//!
//! Each validator checks a flat map of raw path or query values and either
//! produces a typed value or the full list of problems found. Error details
//! keep the shape clients of the original service already parse:
//!
//! ```json
//! [{"message":"\"id\" must be a number","path":["id"],"type":"number.base",
//!   "context":{"label":"id","key":"id","value":"abc"}}]
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Raw key/value pairs taken from a path or query string.
pub type RawParams = HashMap<String, String>;

/// Largest integer a client-side double holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// One problem with one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDetail {
    pub message: String,
    pub path: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub context: DetailContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailContext {
    pub label: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ValidationDetail {
    fn new(key: &str, kind: &str, message: String, value: Option<&str>) -> Self {
        Self {
            message,
            path: vec![key.to_string()],
            kind: kind.to_string(),
            context: DetailContext {
                label: key.to_string(),
                key: key.to_string(),
                value: value.map(str::to_string),
            },
        }
    }
}

/// Every problem found in one set of parameters. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationDetail>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|d| d.message.as_str()).collect();
        write!(f, "{}", messages.join(". "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn details(&self) -> &[ValidationDetail] {
        &self.0
    }
}

/// Checks raw parameters and converts them into a typed value.
pub trait ParamValidator {
    type Output;

    fn validate(&self, params: &RawParams) -> Result<Self::Output, ValidationErrors>;
}

/// Validated `id` path parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductId {
    pub id: f64,
}

impl ProductId {
    /// The primary key this id can match, if any.
    ///
    /// Ids are whole numbers, so a fractional id matches no row.
    pub fn key(&self) -> Option<i64> {
        // Within the safe range, so the cast is exact.
        (self.id.fract() == 0.0).then_some(self.id as i64)
    }
}

/// Validated `priceLimit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLimit {
    pub price_limit: f64,
}

/// Requires a numeric `id` and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierValidator;

/// Requires a numeric `priceLimit` and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceLimitValidator;

impl ParamValidator for IdentifierValidator {
    type Output = ProductId;

    fn validate(&self, params: &RawParams) -> Result<ProductId, ValidationErrors> {
        let mut details = unknown_keys(params, "id");
        let id = required_number(params, "id")
            .map_err(|detail| details.push(detail))
            .ok();

        match id {
            Some(id) if details.is_empty() => Ok(ProductId { id }),
            _ => Err(ValidationErrors(details)),
        }
    }
}

impl ParamValidator for PriceLimitValidator {
    type Output = PriceLimit;

    fn validate(&self, params: &RawParams) -> Result<PriceLimit, ValidationErrors> {
        let mut details = unknown_keys(params, "priceLimit");
        let limit = required_number(params, "priceLimit")
            .map_err(|detail| details.push(detail))
            .ok();

        match limit {
            Some(price_limit) if details.is_empty() => Ok(PriceLimit { price_limit }),
            _ => Err(ValidationErrors(details)),
        }
    }
}

/// Convert a raw value the way a lenient client-side number conversion does:
/// surrounding whitespace is ignored, decimals and exponents are accepted,
/// empty and non-finite values are not numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // f64's parser also knows "inf" and "nan"; only plain digits count here.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn required_number(params: &RawParams, key: &str) -> Result<f64, ValidationDetail> {
    let Some(raw) = params.get(key) else {
        return Err(ValidationDetail::new(
            key,
            "any.required",
            format!("\"{key}\" is required"),
            None,
        ));
    };
    let Some(n) = parse_number(raw) else {
        return Err(ValidationDetail::new(
            key,
            "number.base",
            format!("\"{key}\" must be a number"),
            Some(raw),
        ));
    };
    if n.abs() > MAX_SAFE_INTEGER {
        return Err(ValidationDetail::new(
            key,
            "number.unsafe",
            format!("\"{key}\" must be a safe number"),
            Some(raw),
        ));
    }
    Ok(n)
}

fn unknown_keys(params: &RawParams, allowed: &str) -> Vec<ValidationDetail> {
    let mut keys: Vec<&String> = params.keys().filter(|k| k.as_str() != allowed).collect();
    keys.sort();
    keys.into_iter()
        .map(|k| {
            ValidationDetail::new(
                k,
                "object.unknown",
                format!("\"{k}\" is not allowed"),
                params.get(k).map(String::as_str),
            )
        })
        .collect()
}
