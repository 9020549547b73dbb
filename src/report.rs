use crate::error::{Error, Result};
use crate::transport::{endpoint, Auth, Transport};
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// The report service sends `null` for counters that do not apply to the
/// message; treat those as zero.
fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Per-message delivery counters from /v3/received/detail
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedDetail {
    pub msg_id: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub jpush_received: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub android_pns_sent: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ios_apns_sent: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ios_apns_received: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ios_msg_received: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub wp_mpns_sent: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub quickapp_jpush_received: i64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub quickapp_pns_sent: i64,
}

/// Query body for /v3/status/message
#[derive(Debug, Clone, Serialize)]
pub struct MessageStatusPayload {
    pub msg_id: i64,
    pub registration_ids: Vec<String>,
    /// yyyy-mm-dd; defaults to today on the remote when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Delivery status of one registration id
#[derive(Debug, Clone, Deserialize)]
pub struct MessageStatus {
    pub status: i32,
}

/// Client for the delivery-report endpoints
#[derive(Clone)]
pub struct ReportClient {
    transport: Transport,
    url: String,
}

impl ReportClient {
    pub fn new(transport: Transport, url: String) -> Self {
        ReportClient { transport, url }
    }

    /// Fetch delivery counters for up to 100 message ids.
    /// GET /v3/received/detail
    pub fn received_detail(&self, msg_ids: &[String]) -> Result<Vec<ReceivedDetail>> {
        if msg_ids.is_empty() {
            return Err(Error::InvalidInput("empty msg id list".to_string()));
        }
        let url = endpoint(
            &self.url,
            "/v3/received/detail",
            Some(&format!("msg_ids={}", msg_ids.join(","))),
        )?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        resp.json()
    }

    /// Per-device delivery status of one message, keyed by registration id.
    /// POST /v3/status/message
    pub fn message_status(
        &self,
        payload: &MessageStatusPayload,
    ) -> Result<HashMap<String, MessageStatus>> {
        let url = endpoint(&self.url, "/v3/status/message", None)?;
        let body = serde_json::to_vec(payload)?;
        let resp = self
            .transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?;
        resp.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Config;
    use crate::transport::Credentials;

    #[test]
    fn test_received_detail_null_counters_become_zero() {
        let json = r#"[{
            "msg_id": "67554217262909280",
            "jpush_received": 317,
            "android_pns_sent": null,
            "ios_apns_sent": 16
        }]"#;
        let details: Vec<ReceivedDetail> = serde_json::from_str(json).unwrap();
        assert_eq!(details[0].msg_id, "67554217262909280");
        assert_eq!(details[0].jpush_received, 317);
        assert_eq!(details[0].android_pns_sent, 0);
        assert_eq!(details[0].ios_apns_sent, 16);
        assert_eq!(details[0].wp_mpns_sent, 0);
    }

    #[test]
    fn test_received_detail_rejects_empty_input() {
        let transport = Transport::new(Credentials::new("k", "s"), &Config::default());
        let client = ReportClient::new(transport, "https://report.jpush.cn".to_string());
        let err = client.received_detail(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_message_status_payload_omits_absent_date() {
        let payload = MessageStatusPayload {
            msg_id: 67554217262909280,
            registration_ids: vec!["140fe1da9e038c6b343".to_string()],
            date: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("date").is_none());
        assert_eq!(json["msg_id"], 67554217262909280i64);
    }
}
