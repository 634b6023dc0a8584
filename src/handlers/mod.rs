pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod stats;
pub mod users;
pub mod wishlist;

use actix_web::{web, HttpResponse};

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Runs repository work on the blocking pool and lifts its error into HTTP.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

/// Malformed JSON bodies get the same `{"message": ...}` shape as every other
/// failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {err}");
        AppError::BadRequest(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {err}")).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {err}")).into()
    })
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "health"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("Api tested !!")
}

/// Money travels as decimal strings. Requests may also send plain JSON
/// numbers; they are read through their textual form so no binary float
/// rounding is introduced.
pub(crate) mod decimal {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn parse<E: Error>(value: Value) -> Result<BigDecimal, E> {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => return Err(E::custom(format!("expected a decimal, found {other}"))),
        };
        BigDecimal::from_str(text.trim()).map_err(|_| E::custom(format!("invalid decimal '{text}'")))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse(Value::deserialize(deserializer)?)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse(value).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "super::decimal::deserialize")]
        price: BigDecimal,
        #[serde(default, deserialize_with = "super::decimal::deserialize_option")]
        discount: Option<BigDecimal>,
    }

    #[test]
    fn decimals_accept_strings_and_numbers() {
        let a: Priced = serde_json::from_str(r#"{"price": "1000.50"}"#).expect("string price");
        let b: Priced = serde_json::from_str(r#"{"price": 1000.5, "discount": 10}"#).expect("number price");
        assert_eq!(a.price, b.price);
        assert_eq!(a.discount, None);
        assert_eq!(b.discount, Some(BigDecimal::from_str("10").expect("decimal")));
    }

    #[test]
    fn decimals_reject_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "ten"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }
}
