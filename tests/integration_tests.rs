use base64::{engine::general_purpose::STANDARD, Engine};
use jpush::{
    Config, Credentials, JPush, MessageAudience, MessagePlatform, PushApi, PushMessageRequest,
    SetDeviceRequest, TagsUpdate,
};
use mockito::Matcher;

const APP_KEY: &str = "60823c3e0d364f99832722ad";
const MASTER_SECRET: &str = "54f21a5ea295367e8524a257";
const REGISTRATION_ID: &str = "140fe1da9e038c6b343";

fn client_for(server: &mockito::Server) -> JPush {
    JPush::with_config(
        Credentials::new(APP_KEY, MASTER_SECRET),
        Config::with_base_url(&server.url()),
    )
}

fn basic_auth() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", APP_KEY, MASTER_SECRET))
    )
}

#[test]
fn test_set_device_clears_tags_and_sets_alias() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", format!("/v3/devices/{}", REGISTRATION_ID).as_str())
        .match_header("authorization", basic_auth().as_str())
        .match_header("content-type", "application/json")
        .match_header("user-agent", Matcher::Regex("jpush-rs/".to_string()))
        .match_body(Matcher::Json(serde_json::json!({
            "tags": "",
            "alias": "qiu"
        })))
        .with_status(200)
        .create();

    let client = client_for(&server);
    client
        .set_device(&SetDeviceRequest {
            id: REGISTRATION_ID.to_string(),
            alias: "qiu".to_string(),
            tags: TagsUpdate::ClearAll,
        })
        .expect("set_device failed");

    mock.assert();
}

#[test]
fn test_set_device_error_carries_status_text() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", format!("/v3/devices/{}", REGISTRATION_ID).as_str())
        .with_status(500)
        .create();

    let client = client_for(&server);
    let err = client
        .set_device(&SetDeviceRequest {
            id: REGISTRATION_ID.to_string(),
            alias: "qiu".to_string(),
            tags: TagsUpdate::ClearAll,
        })
        .expect_err("expected status error");

    assert_eq!(err.status_code(), Some(500));
    assert!(
        err.to_string().contains("Internal Server Error"),
        "unexpected error message: {}",
        err
    );
}

#[test]
fn test_set_device_error_prefers_body_text() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", format!("/v3/devices/{}", REGISTRATION_ID).as_str())
        .with_status(400)
        .with_body(r#"{"error":{"code":7002,"message":"invalid tags"}}"#)
        .create();

    let client = client_for(&server);
    let err = client
        .set_device(&SetDeviceRequest {
            id: REGISTRATION_ID.to_string(),
            alias: "qiu".to_string(),
            tags: TagsUpdate::edit(vec!["a".to_string()], vec![]),
        })
        .expect_err("expected status error");

    assert_eq!(err.status_code(), Some(400));
    assert!(err.to_string().contains("invalid tags"));
}

#[test]
fn test_get_device_returns_alias_and_tags() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", format!("/v3/devices/{}", REGISTRATION_ID).as_str())
        .match_header("authorization", basic_auth().as_str())
        .with_status(200)
        .with_body(r#"{"tags":["mobile","vip"],"alias":"qiu","mobile":""}"#)
        .create();

    let client = client_for(&server);
    let device = client.get_device(REGISTRATION_ID).expect("get_device failed");

    assert_eq!(device.id, REGISTRATION_ID);
    assert_eq!(device.alias, "qiu");
    assert_eq!(device.tags, vec!["mobile".to_string(), "vip".to_string()]);
}

#[test]
fn test_get_device_404_is_an_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", format!("/v3/devices/{}", REGISTRATION_ID).as_str())
        .with_status(404)
        .create();

    let client = client_for(&server);
    let err = client
        .get_device(REGISTRATION_ID)
        .expect_err("expected 404 error");
    assert!(err.is_not_found());
}

#[test]
fn test_push_message_returns_msg_id() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/push")
        .match_header("authorization", basic_auth().as_str())
        .match_body(Matcher::Json(serde_json::json!({
            "platform": "android",
            "audience": {"alias": ["qiu"]},
            "notification": {
                "android": {
                    "alert": "hello",
                    "extras": {"msg_id": 123, "msg_type": "6"}
                }
            }
        })))
        .with_status(200)
        .with_body(r#"{"sendno":0,"msg_id":"1828256757"}"#)
        .create();

    let client = client_for(&server);
    let msg_id = client
        .push_message(&PushMessageRequest {
            platform: MessagePlatform::Android,
            id: 123,
            msg_type: "6".to_string(),
            alert: "hello".to_string(),
            audience: MessageAudience {
                alias_list: vec!["qiu".to_string(), "".to_string()],
                tag_list: vec![],
            },
            presentation: true,
        })
        .expect("push_message failed");

    assert_eq!(msg_id, "1828256757");
    mock.assert();
}

#[test]
fn test_silent_push_sends_message_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v3/push")
        .match_body(Matcher::Json(serde_json::json!({
            "platform": "all",
            "audience": {"tag": ["mobile"]},
            "message": {
                "msg_content": "sync",
                "extras": {"msg_id": 7, "msg_type": "refresh"}
            }
        })))
        .with_status(200)
        .with_body(r#"{"msg_id":"99"}"#)
        .create();

    let client = client_for(&server);
    client
        .push_message(&PushMessageRequest {
            platform: MessagePlatform::All,
            id: 7,
            msg_type: "refresh".to_string(),
            alert: "sync".to_string(),
            audience: MessageAudience {
                alias_list: vec![],
                tag_list: vec!["mobile".to_string()],
            },
            presentation: false,
        })
        .expect("push_message failed");

    mock.assert();
}

#[test]
fn test_check_tag_returns_membership() {
    let mut server = mockito::Server::new();
    server
        .mock(
            "GET",
            format!("/v3/tags/mobile/registration_ids/{}", REGISTRATION_ID).as_str(),
        )
        .with_status(200)
        .with_body(r#"{"result":true}"#)
        .create();

    let client = client_for(&server);
    let member = client
        .check_tag("mobile", REGISTRATION_ID)
        .expect("check_tag failed");
    assert!(member);
}

#[test]
fn test_inspect_message_maps_counters() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v3/received/detail")
        .match_query(Matcher::UrlEncoded(
            "msg_ids".to_string(),
            "67554217262909280,67554217262909281".to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"[
                {"msg_id":"67554217262909280","jpush_received":317,"ios_apns_sent":16,
                 "ios_apns_received":12,"ios_msg_received":null},
                {"msg_id":"67554217262909281","jpush_received":null,"ios_apns_sent":null,
                 "ios_apns_received":null,"ios_msg_received":null}
            ]"#,
        )
        .create();

    let client = client_for(&server);
    let receipts = client
        .inspect_message(&[
            "67554217262909280".to_string(),
            "67554217262909281".to_string(),
        ])
        .expect("inspect_message failed");

    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0].msg_id, "67554217262909280");
    assert_eq!(receipts[0].android_received, 317);
    assert_eq!(receipts[0].ios_apns_sent, 16);
    assert_eq!(receipts[1].android_received, 0);
}

#[test]
fn test_group_push_uses_group_credentials() {
    let mut server = mockito::Server::new();
    let group_auth = format!(
        "Basic {}",
        STANDARD.encode("group-2ed1465b94aab3f03f6778e0:d4ee2375846bc30fa51334f5")
    );
    let mock = server
        .mock("POST", "/v3/grouppush")
        .match_header("authorization", group_auth.as_str())
        .with_status(200)
        .with_body(r#"{"60823c3e0d364f99832722ad":{"msg_id":"42","sendno":"0"}}"#)
        .create();

    let client = JPush::with_config(
        Credentials::new(APP_KEY, MASTER_SECRET)
            .with_group("2ed1465b94aab3f03f6778e0", "d4ee2375846bc30fa51334f5"),
        Config::with_base_url(&server.url()),
    );
    let result = client
        .push
        .group_push(&jpush::PushPayload::new(jpush::Platform::All))
        .expect("group_push failed");

    assert!(result.contains_key("60823c3e0d364f99832722ad"));
    mock.assert();
}

#[test]
fn test_alias_lookup_with_platform_filter() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v3/aliases/qiu")
        .match_query(Matcher::UrlEncoded(
            "platform".to_string(),
            "android,ios".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"registration_ids":["140fe1da9e038c6b343"]}"#)
        .create();

    let client = client_for(&server);
    let alias = client
        .device
        .alias_get("qiu", &["android".to_string(), "ios".to_string()])
        .expect("alias_get failed");

    assert_eq!(alias.registration_ids, vec![REGISTRATION_ID.to_string()]);
    mock.assert();
}

#[test]
fn test_schedule_round_trip() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v3/schedules")
        .with_status(200)
        .with_body(
            r#"{"schedule_id":"0eac1b80-c2ac-4b69-948b-c65b34b96033","name":"digest"}"#,
        )
        .create();
    server
        .mock("DELETE", "/v3/schedules/0eac1b80-c2ac-4b69-948b-c65b34b96033")
        .with_status(200)
        .create();

    let client = client_for(&server);
    let created = client
        .schedule
        .create(&jpush::SchedulePayload {
            cid: None,
            name: "digest".to_string(),
            enabled: true,
            trigger: jpush::Trigger::single("2026-09-01 08:00:00"),
            push: jpush::PushPayload::new(jpush::Platform::All),
        })
        .expect("schedule create failed");
    let schedule_id = created["schedule_id"].as_str().expect("schedule_id");

    client
        .schedule
        .delete(schedule_id)
        .expect("schedule delete failed");
}
