use crate::client::Config;
use crate::device::{DeviceClient, DevicePayload, TagMembers, TagsUpdate};
use crate::error::{Error, Result};
use crate::push::{
    Audience, AndroidNotification, IosNotification, Message, Notification, Platform, PushClient,
    PushPayload,
};
use crate::report::ReportClient;
use crate::schedule::ScheduleClient;
use crate::transport::{Credentials, Transport};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Platform selector for [`PushMessageRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePlatform {
    All,
    Android,
    Ios,
}

impl FromStr for MessagePlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(MessagePlatform::All),
            "android" => Ok(MessagePlatform::Android),
            "ios" => Ok(MessagePlatform::Ios),
            other => Err(Error::InvalidInput(format!("unknown platform: {}", other))),
        }
    }
}

/// Device tag/alias update request
#[derive(Debug, Clone)]
pub struct SetDeviceRequest {
    /// Registration id of the device
    pub id: String,
    /// Alias to bind; an empty string unbinds the current alias
    pub alias: String,
    /// Tag mutation: clear everything or an add/remove edit
    pub tags: TagsUpdate,
}

/// Tags and alias currently bound to a device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub id: String,
    pub alias: String,
    pub tags: Vec<String>,
}

/// Tag membership edit by registration id
#[derive(Debug, Clone, Default)]
pub struct UpdateTagRequest {
    pub tag: String,
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

/// Audience of a [`PushMessageRequest`]; empty strings are filtered out
/// before serialization
#[derive(Debug, Clone, Default)]
pub struct MessageAudience {
    pub alias_list: Vec<String>,
    pub tag_list: Vec<String>,
}

/// An application-level push request, adapted into the wire payload by
/// [`PushApi::push_message`]
#[derive(Debug, Clone)]
pub struct PushMessageRequest {
    pub platform: MessagePlatform,
    /// Correlation id stamped into the extras map as `msg_id`
    pub id: i64,
    /// Message type tag stamped into the extras map as `msg_type`
    pub msg_type: String,
    /// Alert text (visible) or message content (silent)
    pub alert: String,
    pub audience: MessageAudience,
    /// true delivers a visible notification, false a silent in-app message;
    /// the two are mutually exclusive per message
    pub presentation: bool,
}

impl PushMessageRequest {
    fn extras(&self) -> Map<String, Value> {
        let mut extras = Map::new();
        extras.insert("msg_id".to_string(), Value::from(self.id));
        extras.insert("msg_type".to_string(), Value::from(self.msg_type.clone()));
        extras
    }

    /// Adapt the request into the wire payload.
    ///
    /// Exactly one delivery shape is populated: a silent `message` body when
    /// presentation is off, otherwise the notification sub-structure(s)
    /// matching the platform.
    pub fn to_payload(&self) -> PushPayload {
        let extras = self.extras();

        let audience = Audience {
            tag: self
                .audience
                .tag_list
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .collect(),
            alias: self
                .audience
                .alias_list
                .iter()
                .filter(|a| !a.is_empty())
                .cloned()
                .collect(),
            ..Audience::default()
        };

        let mut payload = PushPayload::new(match self.platform {
            MessagePlatform::All => Platform::All,
            MessagePlatform::Android => Platform::Android,
            MessagePlatform::Ios => Platform::Ios,
        });
        payload.audience = Some(audience);

        if !self.presentation {
            payload.message = Some(Message {
                msg_content: self.alert.clone(),
                title: None,
                content_type: None,
                extras: Some(extras),
            });
            return payload;
        }

        payload.notification = Some(match self.platform {
            MessagePlatform::All => Notification {
                alert: Some(self.alert.clone()),
                android: Some(AndroidNotification {
                    extras: Some(extras.clone()),
                    ..AndroidNotification::default()
                }),
                ios: Some(IosNotification {
                    thread_id: Some(self.msg_type.clone()),
                    extras: Some(extras),
                    ..IosNotification::default()
                }),
            },
            MessagePlatform::Android => Notification {
                alert: None,
                android: Some(AndroidNotification {
                    alert: self.alert.clone(),
                    extras: Some(extras),
                    ..AndroidNotification::default()
                }),
                ios: None,
            },
            MessagePlatform::Ios => Notification {
                alert: None,
                android: None,
                ios: Some(IosNotification {
                    alert: Some(Value::from(self.alert.clone())),
                    thread_id: Some(self.msg_type.clone()),
                    extras: Some(extras),
                    ..IosNotification::default()
                }),
            },
        });
        payload
    }
}

/// Delivery counters of one pushed message
#[derive(Debug, Clone)]
pub struct MessageReceipt {
    pub msg_id: String,
    pub android_received: i64,
    pub ios_apns_sent: i64,
    pub ios_apns_received: i64,
    pub ios_msg_received: i64,
}

/// The uniform operation set exposed by the facade
pub trait PushApi {
    /// Bind an alias and edit the tags of a device
    fn set_device(&self, req: &SetDeviceRequest) -> Result<()>;
    /// Fetch the alias and tags bound to a device
    fn get_device(&self, registration_id: &str) -> Result<DeviceInfo>;
    /// Edit the registration ids carrying a tag
    fn update_tag(&self, req: &UpdateTagRequest) -> Result<()>;
    /// Delete a tag across all platforms
    fn delete_tag(&self, tag: &str) -> Result<()>;
    /// Check whether a device carries a tag
    fn check_tag(&self, tag: &str, registration_id: &str) -> Result<bool>;
    /// Send a push message; returns the remote message id
    fn push_message(&self, req: &PushMessageRequest) -> Result<String>;
    /// Fetch delivery receipts for previously pushed messages
    fn inspect_message(&self, msg_ids: &[String]) -> Result<Vec<MessageReceipt>>;
}

/// Facade over the JPush services.
///
/// Composes the four resource clients around one shared transport; the
/// sub-clients stay public for endpoints the [`PushApi`] surface does not
/// cover (schedules, group push, push validation).
#[derive(Clone)]
pub struct JPush {
    pub device: DeviceClient,
    pub push: PushClient,
    pub report: ReportClient,
    pub schedule: ScheduleClient,
}

impl JPush {
    /// Client authenticated with an application key/secret pair
    pub fn new(app_key: &str, master_secret: &str) -> Self {
        Self::with_config(Credentials::new(app_key, master_secret), Config::default())
    }

    /// Client that can also issue group pushes
    pub fn with_group(
        app_key: &str,
        master_secret: &str,
        group_key: &str,
        group_master_secret: &str,
    ) -> Self {
        Self::with_config(
            Credentials::new(app_key, master_secret).with_group(group_key, group_master_secret),
            Config::default(),
        )
    }

    /// Client with explicit credentials and configuration
    pub fn with_config(credentials: Credentials, config: Config) -> Self {
        let transport = Transport::new(credentials, &config);
        JPush {
            device: DeviceClient::new(transport.clone(), config.device_url.clone()),
            push: PushClient::new(transport.clone(), config.push_url.clone()),
            report: ReportClient::new(transport.clone(), config.report_url.clone()),
            schedule: ScheduleClient::new(transport, config.push_url),
        }
    }
}

impl PushApi for JPush {
    fn set_device(&self, req: &SetDeviceRequest) -> Result<()> {
        let payload = DevicePayload {
            tags: Some(req.tags.clone()),
            alias: Some(req.alias.clone()),
            mobile: None,
        };
        self.device.device_set(&req.id, &payload)
    }

    fn get_device(&self, registration_id: &str) -> Result<DeviceInfo> {
        let device = self.device.device_view(registration_id)?;
        Ok(DeviceInfo {
            id: registration_id.to_string(),
            alias: device.alias,
            tags: device.tags,
        })
    }

    fn update_tag(&self, req: &UpdateTagRequest) -> Result<()> {
        let members = TagMembers {
            add: req.add.clone(),
            remove: req.remove.clone(),
        };
        self.device.tag_update(&req.tag, &members)
    }

    fn delete_tag(&self, tag: &str) -> Result<()> {
        self.device.tag_delete(tag, &[])
    }

    fn check_tag(&self, tag: &str, registration_id: &str) -> Result<bool> {
        self.device.tag_check(tag, registration_id)
    }

    fn push_message(&self, req: &PushMessageRequest) -> Result<String> {
        let result = self.push.push(&req.to_payload())?;
        Ok(result.msg_id)
    }

    fn inspect_message(&self, msg_ids: &[String]) -> Result<Vec<MessageReceipt>> {
        let details = self.report.received_detail(msg_ids)?;
        Ok(details
            .into_iter()
            .map(|d| MessageReceipt {
                msg_id: d.msg_id,
                android_received: d.jpush_received,
                ios_apns_sent: d.ios_apns_sent,
                ios_apns_received: d.ios_apns_received,
                ios_msg_received: d.ios_msg_received,
            })
            .collect())
    }
}
