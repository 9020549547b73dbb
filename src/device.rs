use crate::error::Result;
use crate::transport::{endpoint, Auth, Transport};
use reqwest::Method;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A device record as returned by the device service
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub mobile: String,
}

/// Tag mutation for a device.
///
/// The remote API overloads one JSON field: an empty string clears every
/// tag, an `{add, remove}` object edits membership. The two shapes are
/// mutually exclusive, so they are one enum here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsUpdate {
    /// Remove all tags from the device (serialized as `""`)
    ClearAll,
    /// Add and/or remove individual tags; empty lists are omitted
    AddRemove {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

impl TagsUpdate {
    /// Convenience constructor for an add/remove edit
    pub fn edit(add: Vec<String>, remove: Vec<String>) -> Self {
        TagsUpdate::AddRemove { add, remove }
    }
}

impl Serialize for TagsUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TagsUpdate::ClearAll => serializer.serialize_str(""),
            TagsUpdate::AddRemove { add, remove } => {
                let mut map = serializer.serialize_map(None)?;
                if !add.is_empty() {
                    map.serialize_entry("add", add)?;
                }
                if !remove.is_empty() {
                    map.serialize_entry("remove", remove)?;
                }
                map.end()
            }
        }
    }
}

/// Payload for updating a device record; absent fields are left untouched
/// by the remote
#[derive(Debug, Clone, Default, Serialize)]
pub struct DevicePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

/// Registration ids bound to an alias
#[derive(Debug, Clone, Deserialize)]
pub struct Alias {
    #[serde(default)]
    pub registration_ids: Vec<String>,
}

/// All tags known to the application
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagCheckResult {
    result: bool,
}

/// Registration-id membership edit for a tag; empty lists are omitted
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagMembers {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

#[derive(Serialize)]
struct RegistrationIdsBody<'a, T: Serialize> {
    registration_ids: &'a T,
}

#[derive(Serialize)]
struct AliasUnbindBody<'a> {
    remove: &'a [String],
}

/// Client for the device/alias/tag endpoints
#[derive(Clone)]
pub struct DeviceClient {
    transport: Transport,
    url: String,
}

impl DeviceClient {
    pub fn new(transport: Transport, url: String) -> Self {
        DeviceClient { transport, url }
    }

    fn platform_query(platforms: &[String]) -> Option<String> {
        if platforms.is_empty() {
            None
        } else {
            Some(format!("platform={}", platforms.join(",")))
        }
    }

    /// Fetch the tags, alias and mobile bound to a registration id.
    /// GET /v3/devices/{registration_id}
    pub fn device_view(&self, registration_id: &str) -> Result<Device> {
        let url = endpoint(&self.url, &format!("/v3/devices/{}", registration_id), None)?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        resp.json()
    }

    /// Update the tags, alias and/or mobile of a registration id.
    /// POST /v3/devices/{registration_id}
    pub fn device_set(&self, registration_id: &str, payload: &DevicePayload) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/devices/{}", registration_id), None)?;
        let body = serde_json::to_vec(payload)?;
        self.transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?;
        Ok(())
    }

    /// Look up the registration ids bound to an alias, optionally filtered
    /// by platform. GET /v3/aliases/{alias}
    pub fn alias_get(&self, alias: &str, platforms: &[String]) -> Result<Alias> {
        let url = endpoint(
            &self.url,
            &format!("/v3/aliases/{}", alias),
            Self::platform_query(platforms).as_deref(),
        )?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        resp.json()
    }

    /// Delete an alias and unbind every device from it.
    /// DELETE /v3/aliases/{alias}
    pub fn alias_delete(&self, alias: &str) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/aliases/{}", alias), None)?;
        self.transport
            .request(Method::DELETE, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        Ok(())
    }

    /// Unbind specific registration ids from an alias.
    /// POST /v3/aliases/{alias}
    pub fn alias_unbind(&self, alias: &str, registration_ids: &[String]) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/aliases/{}", alias), None)?;
        let body = serde_json::to_vec(&RegistrationIdsBody {
            registration_ids: &AliasUnbindBody {
                remove: registration_ids,
            },
        })?;
        self.transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?;
        Ok(())
    }

    /// List every tag of the application. GET /v3/tags/
    pub fn tags_get(&self) -> Result<TagList> {
        let url = endpoint(&self.url, "/v3/tags/", None)?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        resp.json()
    }

    /// Check whether a device carries a tag.
    /// GET /v3/tags/{tag}/registration_ids/{registration_id}
    pub fn tag_check(&self, tag: &str, registration_id: &str) -> Result<bool> {
        let url = endpoint(
            &self.url,
            &format!("/v3/tags/{}/registration_ids/{}", tag, registration_id),
            None,
        )?;
        let resp = self
            .transport
            .request(Method::GET, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        let out: TagCheckResult = resp.json()?;
        Ok(out.result)
    }

    /// Bind/unbind registration ids to a tag. POST /v3/tags/{tag}
    pub fn tag_update(&self, tag: &str, members: &TagMembers) -> Result<()> {
        let url = endpoint(&self.url, &format!("/v3/tags/{}", tag), None)?;
        let body = serde_json::to_vec(&RegistrationIdsBody {
            registration_ids: members,
        })?;
        self.transport
            .request(Method::POST, url.as_str(), Some(body), Auth::App)?
            .ensure_ok()?;
        Ok(())
    }

    /// Delete a tag, optionally only for some platforms.
    /// DELETE /v3/tags/{tag}
    pub fn tag_delete(&self, tag: &str, platforms: &[String]) -> Result<()> {
        let url = endpoint(
            &self.url,
            &format!("/v3/tags/{}", tag),
            Self::platform_query(platforms).as_deref(),
        )?;
        self.transport
            .request(Method::DELETE, url.as_str(), None, Auth::App)?
            .ensure_ok()?;
        Ok(())
    }
}
