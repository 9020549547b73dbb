use crate::error::Result;
use crate::push::PushPayload;
use crate::transport::{endpoint, Auth, Transport};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

/// Recurrence unit for periodical triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    Month,
}

/// Fire once at a fixed time
#[derive(Debug, Clone, Serialize)]
pub struct SingleTrigger {
    /// yyyy-MM-dd HH:mm:ss
    pub time: String,
}

/// Fire repeatedly between start and end
#[derive(Debug, Clone, Serialize)]
pub struct PeriodicalTrigger {
    pub start: String,
    pub end: String,
    pub time: String,
    pub time_unit: TimeUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i32>,
    /// Weekday names or month days, depending on the time unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Value>,
}

/// Exactly one of the two trigger shapes is populated
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<SingleTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodical: Option<PeriodicalTrigger>,
}

impl Trigger {
    pub fn single(time: &str) -> Self {
        Trigger {
            single: Some(SingleTrigger {
                time: time.to_string(),
            }),
            periodical: None,
        }
    }

    pub fn periodical(periodical: PeriodicalTrigger) -> Self {
        Trigger {
            single: None,
            periodical: Some(periodical),
        }
    }
}

/// A scheduled push task: trigger plus the embedded push payload
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    pub name: String,
    pub enabled: bool,
    pub trigger: Trigger,
    pub push: PushPayload,
}

/// Client for the scheduled-push endpoints.
///
/// The schedule endpoints are the least structured of the API; results come
/// back as untyped JSON objects.
#[derive(Clone)]
pub struct ScheduleClient {
    transport: Transport,
    url: String,
}

impl ScheduleClient {
    pub fn new(transport: Transport, url: String) -> Self {
        ScheduleClient { transport, url }
    }

    /// Create a schedule. POST /v3/schedules
    pub fn create(&self, payload: &SchedulePayload) -> Result<Map<String, Value>> {
        let url = endpoint(&self.url, "/v3/schedules", None)?;
        let body = serde_json::to_vec(payload)?;
        self.transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?
            .into_map()
    }

    /// List schedules, 50 per page. GET /v3/schedules
    pub fn list(&self, page: u32) -> Result<Map<String, Value>> {
        let query = if page > 0 {
            Some(format!("page={}", page))
        } else {
            None
        };
        let url = endpoint(&self.url, "/v3/schedules", query.as_deref())?;
        self.transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?
            .into_map()
    }

    /// Fetch one schedule. GET /v3/schedules/{id}
    pub fn view(&self, schedule_id: &str) -> Result<Map<String, Value>> {
        let url = endpoint(&self.url, &format!("/v3/schedules/{}", schedule_id), None)?;
        self.transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?
            .into_map()
    }

    /// Replace one schedule. PUT /v3/schedules/{id}
    pub fn update(
        &self,
        schedule_id: &str,
        payload: &SchedulePayload,
    ) -> Result<Map<String, Value>> {
        let url = endpoint(&self.url, &format!("/v3/schedules/{}", schedule_id), None)?;
        let body = serde_json::to_vec(payload)?;
        self.transport
            .request(Method::PUT, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?
            .into_map()
    }

    /// Delete one schedule. DELETE /v3/schedules/{id}
    pub fn delete(&self, schedule_id: &str) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/schedules/{}", schedule_id), None)?;
        self.transport
            .request(Method::DELETE, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        Ok(())
    }
}
