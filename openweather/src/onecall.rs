//! One Call 3.0 operations.
//!
//! See <https://openweathermap.org/api/one-call-3>.

use std::{fmt, sync::Arc};
use tracing::{debug, instrument};

use crate::{
    error::Error,
    model::{DateSpec, Exclude, ResponseBody, Units},
    query::QueryParams,
    transport::{HttpTransport, Transport},
};

/// API version segment of the base URL.
pub const VERSION: &str = "3.0";

pub(crate) fn default_base_url() -> String {
    format!("https://api.openweathermap.org/data/{VERSION}/")
}

/// Issues One Call requests with a bound API key.
///
/// Operations are independent of each other and may run concurrently on the
/// same value; the only shared state is the key and the transport.
#[derive(Clone)]
pub struct OneCall {
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl OneCall {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(api_key, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            transport,
        }
    }

    /// Point the client at another server (for testing with wiremock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current and forecast weather data.
    ///
    /// `exclude` is sent as one comma-joined value and only when non-empty.
    #[instrument(level = "debug", skip(self))]
    pub async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        exclude: &[Exclude],
        units: Option<Units>,
        lang: Option<&str>,
    ) -> Result<ResponseBody, Error> {
        let mut params = coordinates(lat, lon);
        params
            .push_opt("exclude", Exclude::join(exclude))
            .push_opt("units", units)
            .push_opt("lang", lang);

        self.request("onecall", params).await
    }

    /// Weather data for a Unix timestamp (UTC).
    #[instrument(level = "debug", skip(self))]
    pub async fn timemachine(
        &self,
        lat: f64,
        lon: f64,
        dt: i64,
        units: Option<Units>,
        lang: Option<&str>,
    ) -> Result<ResponseBody, Error> {
        let mut params = coordinates(lat, lon);
        params
            .push("dt", dt)
            .push_opt("units", units)
            .push_opt("lang", lang);

        self.request("onecall/timemachine", params).await
    }

    /// Daily aggregation for one date.
    #[instrument(level = "debug", skip(self, date))]
    pub async fn day_summary(
        &self,
        lat: f64,
        lon: f64,
        date: impl Into<DateSpec>,
        units: Option<Units>,
        lang: Option<&str>,
    ) -> Result<ResponseBody, Error> {
        let mut params = coordinates(lat, lon);
        params
            .push("date", date.into().to_query_value())
            .push_opt("units", units)
            .push_opt("lang", lang);

        self.request("onecall/day_summary", params).await
    }

    /// Weather overview for today, or for `date` when given.
    ///
    /// The service does not document a `lang` parameter here, so none is taken.
    #[instrument(level = "debug", skip(self))]
    pub async fn overview(
        &self,
        lat: f64,
        lon: f64,
        date: Option<DateSpec>,
        units: Option<Units>,
    ) -> Result<ResponseBody, Error> {
        let mut params = coordinates(lat, lon);
        params
            .push_opt(
                "date",
                date.filter(|d| !d.is_empty()).map(|d| d.to_query_value()),
            )
            .push_opt("units", units);

        self.request("onecall/overview", params).await
    }

    /// Adds `appid`, performs the GET and decodes whatever JSON comes back.
    ///
    /// An error-shaped body under a 2xx status is returned as a normal value.
    async fn request(&self, path: &str, mut params: QueryParams) -> Result<ResponseBody, Error> {
        debug!(
            path,
            params = ?params.keys().collect::<Vec<_>>(),
            "sending OneCall request"
        );
        params.set("appid", &self.api_key);

        let url = join_url(&self.base_url, path);
        let body = self.transport.get(&url, &params).await?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Debug for OneCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneCall")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish()
    }
}

fn coordinates(lat: f64, lon: f64) -> QueryParams {
    let mut params = QueryParams::new();
    params.push("lat", lat).push("lon", lon);
    params
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
