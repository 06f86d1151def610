use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use fauna_client::errors::{ClientTimeoutError, Elapsed, NotFoundError};
use fauna_client::errors::{ProtocolEncodingError, ServerError};
use fauna_protocol::expr::Obj;
use fauna_protocol::model::Ref;
use fauna_protocol::path;
use fauna_protocol::query::{class, create, get};
use fauna_protocol::value::Value;

use crate::mock::{client, MockTransport};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test_log::test]
fn resource_ref() -> Result<(), fauna_client::Error> {
    let transport = MockTransport::new(200,
        r#"{"resource": {"@ref": "classes/spells/93044099947429888"}}"#);
    let client = client(&transport);
    let value = client.query(&get(Ref::new("classes/spells/93044099947429888")))
        .wait(TIMEOUT)?;
    assert_eq!(value, Value::Ref(Ref::new("classes/spells/93044099947429888")));

    let requests = transport.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(&requests[0].body[..],
               br#"{"get":{"@ref":"classes/spells/93044099947429888"}}"#);
    assert_eq!(&*requests[0].secret, "test-secret");
    Ok(())
}

#[test_log::test]
fn not_found() {
    let transport = MockTransport::new(404, r#"{"errors": [{
        "position": ["ref"],
        "code": "instance not found",
        "description": "Instance not found."
    }]}"#);
    let client = client(&transport);
    let err = client.query(&get(Ref::new("classes/spells/1234")))
        .wait(TIMEOUT)
        .unwrap_err();
    assert!(err.is::<NotFoundError>());
    assert!(err.is::<ServerError>());
    assert_eq!(err.status(), Some(404));
    let errors = err.query_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].position, vec!["ref".to_string()]);
    assert_eq!(errors[0].code, "instance not found");
}

#[test_log::test]
fn missing_resource() {
    let transport = MockTransport::new(200, r#"{"result": 1}"#);
    let err = client(&transport).query("x").wait(TIMEOUT).unwrap_err();
    assert!(err.is::<ProtocolEncodingError>());
}

#[test_log::test]
fn session_secret() -> Result<(), fauna_client::Error> {
    let transport = MockTransport::new(200, r#"{"resource": null}"#);
    let client = client(&transport);
    let session = client.with_secret("session-secret");
    assert_eq!(session.query(&1).wait(TIMEOUT)?, Value::Null);
    assert_eq!(client.query(&2).wait(TIMEOUT)?, Value::Null);

    let requests = transport.requests.lock();
    let secrets: Vec<&str> = requests.iter().map(|r| &*r.secret).collect();
    assert_eq!(secrets, ["session-secret", "test-secret"]);
    Ok(())
}

#[test_log::test]
fn wait_timeout() {
    let transport = MockTransport::delayed(
        200, r#"{"resource": 1}"#, Duration::from_secs(2));
    let client = client(&transport);
    let start = Instant::now();
    let err = client.query(&1).wait(Duration::from_millis(100)).unwrap_err();
    let elapsed = start.elapsed();
    assert!(err.is::<ClientTimeoutError>());
    let waited = Elapsed::find(&err).unwrap();
    assert!(waited >= Duration::from_millis(100));
    assert!(waited <= elapsed);
    assert!(format!("{:#}", err).contains("no result after"), "{:#}", err);
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(1), "waited {:?}", elapsed);
}

#[test_log::test(tokio::test)]
async fn await_result() -> Result<(), fauna_client::Error> {
    let transport = MockTransport::new(200, r#"{"resource": {
        "ref": {"@ref": "classes/spells/1"},
        "ts": 1509244539203043,
        "data": {"name": "Fire Beak", "element": ["air", "fire"]}
    }}"#);
    let client = client(&transport);
    let spell = client.query(&create(
        class("spells"),
        Obj::new().field("data", Obj::new().field("name", "Fire Beak")),
    )).await?;
    assert_eq!(spell.get::<Ref>("ref")?, Some(Ref::new("classes/spells/1")));
    assert_eq!(spell.get_array::<String>(path!("data", "element"))?,
               Some(vec!["air".to_string(), "fire".to_string()]));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn chained() -> Result<(), fauna_client::Error> {
    let transport = MockTransport::new(200,
        r#"{"resource": {"data": {"cost": 15}}}"#);
    let client = client(&transport);
    let second = client.clone();
    let cost = client.query(&get(Ref::new("classes/spells/1")))
        .flat_map(move |spell| {
            second.query(&spell.get::<i64>(path!("data", "cost")).ok().flatten())
        })
        .map(|value| value.get::<i64>(path!("data", "cost")).ok().flatten())
        .await?;
    assert_eq!(cost, Some(15));
    assert_eq!(transport.requests.lock().len(), 2);
    Ok(())
}

#[test]
fn diagnostic() {
    use miette::Diagnostic;

    let err = fauna_client::errors::check_response(404, br#"{"errors": [{
        "position": [],
        "code": "instance not found",
        "description": "Instance not found."
    }]}"#).unwrap();
    assert_eq!(err.code().unwrap().to_string(), "NotFoundError");
    assert_eq!(err.help().unwrap().to_string(), "Instance not found.");
}
