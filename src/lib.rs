//! # jpush - JPush REST API client for Rust
//!
//! A typed client for the JPush push-notification provider's HTTP/JSON REST
//! API: device management, tagging and aliasing, message push, scheduled
//! push, and delivery reporting.
//!
//! ## Features
//!
//! - Basic authentication with application or group key/secret pairs
//! - Typed request payloads that omit absent optional fields
//! - One resource client per service (device, push, report, schedule)
//! - A [`PushApi`] facade with a uniform operation set
//! - Strict status handling: anything other than HTTP 200 is an error
//!
//! No retries are performed; timeouts are configurable through [`Config`]
//! and resilience beyond that is the caller's responsibility.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use jpush::{JPush, PushApi, PushMessageRequest, MessageAudience, MessagePlatform};
//!
//! fn main() -> Result<(), jpush::Error> {
//!     let client = JPush::new("app_key", "master_secret");
//!
//!     let msg_id = client.push_message(&PushMessageRequest {
//!         platform: MessagePlatform::Android,
//!         id: 123,
//!         msg_type: "order".to_string(),
//!         alert: "your order has shipped".to_string(),
//!         audience: MessageAudience {
//!             alias_list: vec!["user-42".to_string()],
//!             tag_list: vec![],
//!         },
//!         presentation: true,
//!     })?;
//!
//!     println!("pushed: {}", msg_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Direct endpoint access
//!
//! The resource clients remain public for endpoints the facade does not
//! cover:
//!
//! ```no_run
//! use jpush::{JPush, Trigger, SchedulePayload, PushPayload, Platform};
//!
//! let client = JPush::new("app_key", "master_secret");
//! let created = client.schedule.create(&SchedulePayload {
//!     cid: None,
//!     name: "morning-digest".to_string(),
//!     enabled: true,
//!     trigger: Trigger::single("2026-09-01 08:00:00"),
//!     push: PushPayload::new(Platform::All),
//! })?;
//! # Ok::<(), jpush::Error>(())
//! ```

pub mod api;
pub mod client;
pub mod device;
pub mod error;
pub mod push;
pub mod report;
pub mod schedule;
pub mod transport;

// Re-export main types for convenience
pub use api::{
    DeviceInfo, JPush, MessageAudience, MessagePlatform, MessageReceipt, PushApi,
    PushMessageRequest, SetDeviceRequest, UpdateTagRequest,
};
pub use client::Config;
pub use device::{Alias, Device, DeviceClient, DevicePayload, TagList, TagMembers, TagsUpdate};
pub use error::{Error, Result};
pub use push::{
    Audience, Message, Notification, Platform, PushClient, PushOptions, PushPayload, PushResult,
};
pub use report::{MessageStatus, MessageStatusPayload, ReceivedDetail, ReportClient};
pub use schedule::{PeriodicalTrigger, SchedulePayload, ScheduleClient, TimeUnit, Trigger};
pub use transport::{ApiResponse, Auth, Credentials, Transport};
