//! Request serialization.
//!
//! Encoding follows proto3 canonical rules, so the same request always
//! yields the same bytes. Default scalars are omitted; `state` is always
//! written for `SetState`/`SetRpm`, even when every field is zero.

use super::messages::{LauncherState, Request, RequestKind, RequestProto, RequestType, StateProto};
use crate::error::{Error, Result};
use prost::Message as ProstMessage;

/// Serialize a request to its protobuf bytes
pub fn encode(request: &Request) -> Vec<u8> {
    to_proto(request).encode_to_vec()
}

/// Parse protobuf bytes into a request
///
/// Fails with [`Error::MalformedMessage`] when the bytes are not a valid
/// `Request` message or when a `SetState`/`SetRpm` has no `state`, and with
/// [`Error::UnknownRequestKind`] when the kind tag is not one of the three
/// known values.
pub fn decode(bytes: &[u8]) -> Result<Request> {
    let proto = RequestProto::decode(bytes)?;
    from_proto(proto)
}

fn to_proto(request: &Request) -> RequestProto {
    let state = match request {
        Request::SetState(state) | Request::SetRpm(state) => Some(StateProto::from(state)),
        Request::LaunchBall => None,
    };
    RequestProto {
        request: RequestType::from(request.kind()) as i32,
        state,
    }
}

fn from_proto(proto: RequestProto) -> Result<Request> {
    let request_type =
        RequestType::try_from(proto.request).map_err(|_| Error::UnknownRequestKind(proto.request))?;

    let kind = RequestKind::from(request_type);
    match kind {
        RequestKind::SetState => Ok(Request::SetState(require_state(proto.state, kind)?)),
        RequestKind::SetRpm => Ok(Request::SetRpm(require_state(proto.state, kind)?)),
        // A state attached to a launch carries no meaning and is dropped
        RequestKind::LaunchBall => Ok(Request::LaunchBall),
    }
}

fn require_state(state: Option<StateProto>, kind: RequestKind) -> Result<LauncherState> {
    state
        .map(LauncherState::from)
        .ok_or_else(|| Error::MalformedMessage(format!("{} request without state", kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::Motors;

    #[test]
    fn test_set_state_round_trip() {
        let request = Request::SetState(LauncherState::new(
            0.5,
            0.3,
            Motors::new(0.25, 0.75, 1.0),
        ));
        assert_eq!(decode(&encode(&request)).unwrap(), request);
    }

    #[test]
    fn test_zero_state_keeps_payload() {
        // An all-zero state must still survive, otherwise SetRpm would decode as malformed
        let request = Request::SetRpm(LauncherState::default());
        let bytes = encode(&request);
        assert_eq!(bytes, vec![0x08, 0x01, 0x12, 0x00]);
        assert_eq!(decode(&bytes).unwrap(), request);
    }

    #[test]
    fn test_launch_ball_bytes() {
        assert_eq!(encode(&Request::LaunchBall), vec![0x08, 0x02]);
        assert_eq!(decode(&[0x08, 0x02]).unwrap(), Request::LaunchBall);
    }

    #[test]
    fn test_set_state_bytes() {
        let request = Request::SetState(LauncherState::new(0.5, 0.3, Motors::default()));
        let expected = vec![
            0x12, 0x0a, // field 2 (state), 10 bytes
            0x0d, 0x00, 0x00, 0x00, 0x3f, // phi = 0.5
            0x15, 0x9a, 0x99, 0x99, 0x3e, // theta = 0.3
        ];
        assert_eq!(encode(&request), expected);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let request = Request::SetRpm(LauncherState::new(0.1, 0.9, Motors::new(0.4, 0.4, 0.2)));
        let rebuilt = Request::SetRpm(LauncherState::new(0.1, 0.9, Motors::new(0.4, 0.4, 0.2)));
        assert_eq!(encode(&request), encode(&rebuilt));
    }

    #[test]
    fn test_garbage_is_malformed() {
        for bytes in [&b"not a request"[..], &[0xff, 0xff, 0xff], &[0x12, 0x0a, 0x0d]] {
            assert!(
                matches!(decode(bytes), Err(Error::MalformedMessage(_))),
                "decoded {:?}",
                bytes
            );
        }
    }

    #[test]
    fn test_missing_state_is_malformed() {
        // Empty input is SET_STATE with no state
        assert!(matches!(decode(&[]), Err(Error::MalformedMessage(_))));
        assert!(matches!(decode(&[0x08, 0x01]), Err(Error::MalformedMessage(_))));
    }

    #[test]
    fn test_unknown_kind() {
        let proto = RequestProto {
            request: 7,
            state: None,
        };
        let bytes = proto.encode_to_vec();
        assert!(matches!(decode(&bytes), Err(Error::UnknownRequestKind(7))));
    }

    #[test]
    fn test_launch_ignores_state() {
        let proto = RequestProto {
            request: RequestType::LaunchBall as i32,
            state: Some(StateProto::from(&LauncherState::neutral())),
        };
        assert_eq!(decode(&proto.encode_to_vec()).unwrap(), Request::LaunchBall);
    }
}
