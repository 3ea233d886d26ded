//! Golden JSON round-trip tests: `Event`, `ServerOutput` and `HeadState`,
//! parameterized by the in-memory test ledger, must serialize and
//! deserialize losslessly.

use head_common::test_support::{party, TestLedger, TestTx};
use head_common::{
    Command, CoordinatedHeadState, Event, HeadParameters, HeadState, NetworkMessage, OpenState,
    ServerOutput,
};
use std::time::Duration;

fn roundtrip_json<T>(value: &T) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let bytes = serde_json::to_vec(value).expect("serialize");
    serde_json::from_slice(&bytes).expect("deserialize")
}

#[test]
fn event_command_round_trips() {
    let parameters = HeadParameters::new(Duration::from_secs(42), vec![party(1), party(2)]);
    let event: Event<TestLedger> = Event::ClientEvent(Command::Init(parameters));
    let bytes = serde_json::to_vec(&event).unwrap();
    let back: Event<TestLedger> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(format!("{back:?}"), format!("{event:?}"));
}

#[test]
fn event_network_message_round_trips() {
    let tx = TestTx::new(7, &[1], &[(2, 5)]);
    let event: Event<TestLedger> = Event::NetworkEvent(NetworkMessage::ReqTx(party(1), tx));
    let back = roundtrip_json(&event);
    assert_eq!(format!("{back:?}"), format!("{event:?}"));
}

#[test]
fn network_message_wire_tags_are_stable() {
    let msg: NetworkMessage<TestLedger> = NetworkMessage::Connected("peer-a".into());
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("Connected"));
    let back: NetworkMessage<TestLedger> = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, NetworkMessage::Connected(h) if h == "peer-a"));
}

#[test]
fn server_output_round_trips() {
    let out: ServerOutput<TestLedger> = ServerOutput::UTxO([(1u64, 10u64)].into_iter().collect());
    let back = roundtrip_json(&out);
    assert_eq!(format!("{back:?}"), format!("{out:?}"));
}

#[test]
fn head_state_open_round_trips() {
    let parameters = HeadParameters::new(Duration::from_secs(42), vec![party(1), party(2)]);
    let state: HeadState<TestLedger> = HeadState::Open(OpenState {
        parameters,
        coordinated: CoordinatedHeadState::initial([(1u64, 10u64)].into_iter().collect()),
        prev: Box::new(HeadState::Idle),
    });
    let bytes = serde_json::to_vec(&state).unwrap();
    let back: HeadState<TestLedger> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(format!("{back:?}"), format!("{state:?}"));
}

#[test]
fn head_state_idle_and_final_round_trip() {
    let idle: HeadState<TestLedger> = HeadState::Idle;
    assert_eq!(format!("{:?}", roundtrip_json(&idle)), format!("{idle:?}"));
    let fin: HeadState<TestLedger> = HeadState::Final;
    assert_eq!(format!("{:?}", roundtrip_json(&fin)), format!("{fin:?}"));
}
