//! End-to-end tests of the façade over real HTTP against a mock server.

use bbbapi::{BbbApi, ClientConfig, ErrorKind, Params, Scheme, Slide, sign};
use mockito::{Matcher, Server, ServerGuard};

const SECRET: &str = "8cd8ef52e8e101574e400365b55e11a6";

fn api_for(server: &ServerGuard) -> BbbApi {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port.rsplit_once(':').unwrap();
    let config = ClientConfig::new(host, SECRET)
        .with_scheme(Scheme::Http)
        .with_port(port.parse().unwrap());
    BbbApi::new(config).unwrap()
}

fn path(call: &str) -> Matcher {
    Matcher::Regex(format!("^/bigbluebutton/api/{}", call))
}

fn create_params() -> Params {
    Params::new()
        .with("name", "Club")
        .with("meetingID", "club")
        .with("attendeePW", "oneone")
        .with("moderatorPW", "twotwo")
}

fn join_params() -> Params {
    Params::new()
        .with("meetingID", "club")
        .with("fullName", "Gerald Wodni")
        .with("password", "oneone")
        .with("redirect", false)
}

#[tokio::test]
async fn get_meetings_sends_signed_request() {
    let mut server = Server::new_async().await;
    let checksum = sign("getMeetings", "", SECRET);
    let mock = server
        .mock("GET", path("getMeetings"))
        .match_query(Matcher::UrlEncoded("checksum".into(), checksum))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(
            "<response><returncode>SUCCESS</returncode><meetings><meeting>\
             <meetingName>Club</meetingName><meetingID>club</meetingID><running>true</running>\
             <attendees><attendee><userID>w_1</userID><fullName>Ada</fullName><role>MODERATOR</role></attendee></attendees>\
             </meeting></meetings></response>",
        )
        .create_async()
        .await;

    let result = api_for(&server).get_meetings().await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.response.status, 200);
    assert_eq!(result.meetings.len(), 1);
    assert_eq!(result.meetings[0].meeting_id.as_deref(), Some("club"));
    assert_eq!(result.meetings[0].attendees.len(), 1);
    assert!(result.meetings[0].attendees[0].is_moderator());
}

#[tokio::test]
async fn failed_returncode_surfaces_as_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", path("create"))
        .with_status(200)
        .with_body(
            "<response><returncode>FAILED</returncode><messageKey>idNotUnique</messageKey>\
             <message>A meeting already exists with that meeting ID.</message></response>",
        )
        .create_async()
        .await;

    let err = api_for(&server).create(&create_params()).await.unwrap_err();

    let api_err = err.api_error().unwrap();
    assert_eq!(api_err.message_key, "idNotUnique");
    assert_eq!(api_err.return_code, "FAILED");
}

#[tokio::test]
async fn redirect_failure_is_not_followed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", path("join"))
        .with_status(302)
        .with_header(
            "location",
            r#"https://bbb.example.com/html5client/join#/[{"message":"Meeting not found","key":"notFound"}]"#,
        )
        .create_async()
        .await;

    let err = api_for(&server).join(&join_params()).await.unwrap_err();

    let api_err = err.api_error().unwrap();
    assert_eq!(api_err.message, "Meeting not found");
    assert_eq!(api_err.message_key, "notFound");
    assert_eq!(api_err.return_code, "FAILED");
}

#[tokio::test]
async fn join_returns_url_and_cookie() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", path("join"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("fullName".into(), "Gerald Wodni".into()),
            Matcher::UrlEncoded("redirect".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("set-cookie", "JSESSIONID=abc; Path=/")
        .with_body(
            "<response><returncode>SUCCESS</returncode><messageKey>successfullyJoined</messageKey>\
             <url>https://bbb.example.com/html5client/join?sessionToken=tok</url></response>",
        )
        .create_async()
        .await;

    let joined = api_for(&server).join(&join_params()).await.unwrap();

    assert_eq!(
        joined.join.url.as_deref(),
        Some("https://bbb.example.com/html5client/join?sessionToken=tok")
    );
    assert_eq!(joined.join.cookies, vec!["JSESSIONID=abc; Path=/"]);
}

#[tokio::test]
async fn create_with_slides_posts_xml() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", path("create"))
        .match_header("content-type", "text/xml")
        .match_body(Matcher::Regex(
            r#"<module name="presentation"><document url="https://example\.com/a\.pdf" filename="a\.pdf"/></module>"#
                .to_string(),
        ))
        .with_status(200)
        .with_body("<response><returncode>SUCCESS</returncode><meetingID>club</meetingID></response>")
        .create_async()
        .await;

    let slides = vec![Slide::new("https://example.com/a.pdf", "a.pdf")];
    let response = api_for(&server)
        .create_with_slides(&create_params(), &slides)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.field("meetingID"), Some("club"));
}

#[tokio::test]
async fn persistent_room_skips_join_when_create_fails() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("GET", path("create"))
        .with_status(200)
        .with_body(
            "<response><returncode>FAILED</returncode><messageKey>checksumError</messageKey>\
             <message>Checksums do not match</message></response>",
        )
        .expect(1)
        .create_async()
        .await;
    let join = server
        .mock("GET", path("join"))
        .with_status(200)
        .with_body("<response><returncode>SUCCESS</returncode></response>")
        .expect(0)
        .create_async()
        .await;

    let err = api_for(&server)
        .join_persistent_room(&join_params(), &create_params(), &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.message_key(), Some("checksumError"));
    create.assert_async().await;
    join.assert_async().await;
}

#[tokio::test]
async fn persistent_room_url_only_creates() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("GET", path("create"))
        .with_status(200)
        .with_body(
            "<response><returncode>SUCCESS</returncode><messageKey>duplicateWarning</messageKey></response>",
        )
        .expect(1)
        .create_async()
        .await;
    let join = server
        .mock("GET", path("join"))
        .expect(0)
        .create_async()
        .await;

    let api = api_for(&server);
    let signed = api
        .join_persistent_room_url(&join_params(), &create_params(), &[])
        .await
        .unwrap();

    create.assert_async().await;
    join.assert_async().await;

    let expected_prefix = format!("http://{}/bigbluebutton/api/join?", server.host_with_port());
    assert!(signed.url.starts_with(&expected_prefix));
    let (unsigned, checksum) = signed.url[expected_prefix.len()..]
        .rsplit_once("&checksum=")
        .unwrap();
    assert_eq!(checksum, sign("join", unsigned, SECRET));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let config = ClientConfig::new("127.0.0.1", SECRET)
        .with_scheme(Scheme::Http)
        .with_port(1);
    let err = BbbApi::new(config)
        .unwrap()
        .get_meetings()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
