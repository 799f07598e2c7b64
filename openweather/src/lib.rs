//! Client for the OpenWeather One Call 3.0 API.
//!
//! This crate defines:
//! - [`OpenWeather`], which binds an API key
//! - [`OneCall`], which issues the forecast, timemachine, day summary and overview requests
//! - The small set of parameter types those requests take
//!
//! Responses are returned as decoded JSON ([`ResponseBody`]) without any schema applied.
//!
//! ```no_run
//! use openweather::{Exclude, OpenWeather, Units};
//!
//! # async fn run() -> Result<(), openweather::Error> {
//! let onecall = OpenWeather::new("API_KEY").onecall();
//! let body = onecall
//!     .forecast(37.566, 126.9784, &[Exclude::Minutely], Some(Units::Metric), None)
//!     .await?;
//! println!("{}", body["timezone"]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod onecall;
pub mod query;
pub mod transport;

use std::fmt;

pub use error::{Error, TransportError};
pub use model::{DateSpec, Exclude, ParseTokenError, ResponseBody, Units};
pub use onecall::{OneCall, VERSION};
pub use query::QueryParams;
pub use transport::{HttpTransport, Transport};

/// Entry point holding the API key.
///
/// The key is not validated; a bad key is rejected by the service on first use.
#[derive(Clone)]
pub struct OpenWeather {
    api_key: String,
}

impl OpenWeather {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// A fresh One Call client bound to this key.
    pub fn onecall(&self) -> OneCall {
        OneCall::new(self.api_key.clone())
    }
}

impl fmt::Debug for OpenWeather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeather")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
