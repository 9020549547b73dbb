use crate::error::{Error, Result};
use crate::transport::{endpoint, Auth, Transport};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Target platform of a push payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    All,
    Android,
    Ios,
    Winphone,
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Platform::All),
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "winphone" => Ok(Platform::Winphone),
            other => Err(Error::InvalidInput(format!("unknown platform: {}", other))),
        }
    }
}

/// Audience selection; all selectors absent means broadcast
#[derive(Debug, Clone, Default, Serialize)]
pub struct Audience {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>, // max 20
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_and: Vec<String>, // max 20
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_not: Vec<String>, // max 20
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>, // max 1000
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registration_id: Vec<String>, // max 1000
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub abtest: Vec<String>,
}

/// Visible notification; only the sub-structure matching the payload's
/// platform is consulted by the remote
#[derive(Debug, Clone, Default, Serialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidNotification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosNotification>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AndroidNotification {
    pub alert: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>, // -2..=2, default 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_pic_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_icon_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_add_num: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_begin_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_foreground: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IosNotification {
    /// Either a plain string or an APNs alert dictionary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i32>,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<bool>,
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
    #[serde(rename = "thread-id", skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// In-app (silent) message delivered to the application layer
#[derive(Debug, Clone, Default, Serialize)]
pub struct Message {
    pub msg_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
}

/// SMS fallback sent when the push is not delivered in time
#[derive(Debug, Clone, Default, Serialize)]
pub struct SmsMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_time: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PushOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sendno: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_msg_id: Option<i64>,
    pub apns_production: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns_collapse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_push_duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_channel: Option<ThirdPartyChannel>,
}

/// Vendor channel routing hints for Android manufacturers
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThirdPartyChannel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xiaomi: Option<XiaomiChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub huawei: Option<HuaweiChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meizu: Option<MeizuChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm: Option<FcmChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oppo: Option<OppoChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vivo: Option<VivoChannel>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct XiaomiChannel {
    pub distribution: String, // jpush, ospush, secondary_push
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_icon_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_icon_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fcm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_customize: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HuaweiChannel {
    pub distribution: String, // jpush, ospush, secondary_push
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fcm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_icon_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_icon_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbox: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<i32>,
    pub only_use_vendor_style: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MeizuChannel {
    pub distribution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fcm: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FcmChannel {
    pub distribution: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OppoChannel {
    pub distribution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fcm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_pic_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VivoChannel {
    pub distribution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fcm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_mode: Option<i32>,
}

/// Delivery receipt callback registration
#[derive(Debug, Clone, Default, Serialize)]
pub struct Callback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
}

/// Notification delivered through a vendor channel when the device is
/// offline for JPush
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThirdPartyNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_add_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
}

/// Complete push request body for /v3/push
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_message: Option<SmsMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PushOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<Callback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_3rd: Option<ThirdPartyNotification>,
}

impl PushPayload {
    /// Empty payload targeting the given platform
    pub fn new(platform: Platform) -> Self {
        PushPayload {
            cid: None,
            platform,
            audience: None,
            notification: None,
            message: None,
            sms_message: None,
            options: None,
            callback: None,
            notification_3rd: None,
        }
    }
}

/// Result of an accepted push
#[derive(Debug, Clone, Deserialize)]
pub struct PushResult {
    #[serde(default)]
    pub sendno: Option<i64>,
    pub msg_id: String,
}

#[derive(Debug, Deserialize)]
struct CidPool {
    cidlist: Vec<String>,
}

/// Client for the push endpoints
#[derive(Clone)]
pub struct PushClient {
    transport: Transport,
    url: String,
}

impl PushClient {
    pub fn new(transport: Transport, url: String) -> Self {
        PushClient { transport, url }
    }

    fn send_push(&self, path: &str, payload: &PushPayload) -> Result<PushResult> {
        let url = endpoint(&self.url, path, None)?;
        let body = serde_json::to_vec(payload)?;
        let resp = self
            .transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?;
        resp.json()
    }

    /// Send a push. POST /v3/push
    pub fn push(&self, payload: &PushPayload) -> Result<PushResult> {
        self.send_push("/v3/push", payload)
    }

    /// Validate a payload without delivering it. POST /v3/push/validate
    pub fn push_validate(&self, payload: &PushPayload) -> Result<PushResult> {
        self.send_push("/v3/push/validate", payload)
    }

    /// Reserve a pool of cids for later idempotent pushes.
    /// GET /v3/push/cid
    pub fn cid_pool(&self, count: u32, cid_type: Option<&str>) -> Result<Vec<String>> {
        let mut query = Vec::new();
        if count > 0 {
            query.push(format!("count={}", count));
        }
        if let Some(cid_type) = cid_type {
            query.push(format!("type={}", cid_type));
        }
        let query = if query.is_empty() {
            None
        } else {
            Some(query.join("&"))
        };
        let url = endpoint(&self.url, "/v3/push/cid", query.as_deref())?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        let pool: CidPool = resp.json()?;
        Ok(pool.cidlist)
    }

    /// Revoke a push that has not finished delivering.
    /// DELETE /v3/push/{msg_id}
    pub fn push_delete(&self, msg_id: &str) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/push/{}", msg_id), None)?;
        self.transport
            .request(Method::DELETE, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        Ok(())
    }

    /// Push to every application of a group using the group credentials.
    /// POST /v3/grouppush
    pub fn group_push(&self, payload: &PushPayload) -> Result<Map<String, Value>> {
        let url = endpoint(&self.url, "/v3/grouppush", None)?;
        let body = serde_json::to_vec(payload)?;
        self.transport
            .request(Method::POST, url.as_str(), Some(body), Auth::Group)?
            .ensure_ok()?
            .into_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_wire_names() {
        assert_eq!(serde_json::to_string(&Platform::All).unwrap(), r#""all""#);
        assert_eq!(
            serde_json::to_string(&Platform::Android).unwrap(),
            r#""android""#
        );
        assert_eq!(serde_json::to_string(&Platform::Ios).unwrap(), r#""ios""#);
        assert_eq!(
            serde_json::to_string(&Platform::Winphone).unwrap(),
            r#""winphone""#
        );
    }

    #[test]
    fn test_platform_from_str_rejects_unknown() {
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        let err = "blackberry".parse::<Platform>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_audience_omits_empty_selectors() {
        let audience = Audience {
            alias: vec!["qiu".to_string()],
            ..Audience::default()
        };
        assert_eq!(
            serde_json::to_string(&audience).unwrap(),
            r#"{"alias":["qiu"]}"#
        );
    }

    #[test]
    fn test_payload_omits_absent_sections() {
        let mut payload = PushPayload::new(Platform::Android);
        payload.audience = Some(Audience {
            registration_id: vec!["140fe1da9e038c6b343".to_string()],
            ..Audience::default()
        });
        payload.message = Some(Message {
            msg_content: "ping".to_string(),
            ..Message::default()
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["platform"], "android");
        assert!(json.get("notification").is_none());
        assert!(json.get("options").is_none());
        assert!(json["message"].get("title").is_none());
    }

    #[test]
    fn test_ios_notification_reserved_names() {
        let ios = IosNotification {
            alert: Some(Value::String("hello".to_string())),
            content_available: Some(true),
            thread_id: Some("chat".to_string()),
            ..IosNotification::default()
        };
        let json = serde_json::to_value(&ios).unwrap();
        assert_eq!(json["content-available"], true);
        assert_eq!(json["thread-id"], "chat");
        assert!(json.get("mutable-content").is_none());
    }

    #[test]
    fn test_options_always_carry_apns_production() {
        let options = PushOptions::default();
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"apns_production":false}"#
        );
    }

    #[test]
    fn test_push_result_decodes_without_sendno() {
        let result: PushResult = serde_json::from_str(r#"{"msg_id":"1828256757"}"#).unwrap();
        assert_eq!(result.msg_id, "1828256757");
        assert_eq!(result.sendno, None);
    }
}
