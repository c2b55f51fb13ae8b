//! Human-readable reasons for broker result codes. Covers the MQTT v3
//! connect return codes (1–5) and the v5 reason codes the broker can answer
//! a CONNECT or DISCONNECT with; anything else maps to a generic string.

use rumqttc::ConnectReturnCode;

/// Numeric rc for a CONNACK return code, matching the v3 wire values.
pub fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}

/// Fixed rc -> reason table; unrecognized codes fall back to
/// `"Unknown error (rc: N)"`.
pub fn reason_for(rc: u8) -> String {
    let reason = match rc {
        0 => "Connection accepted",
        1 => "Connection refused: incorrect protocol version",
        2 => "Connection refused: invalid client identifier",
        3 => "Connection refused: server unavailable",
        4 => "Connection refused: bad username or password",
        5 => "Connection refused: not authorised",
        16 => "No matching subscribers",
        17 => "No subscription existed",
        24 => "Continue authentication",
        25 => "Re-authenticate",
        128 => "Unspecified error",
        129 => "Malformed packet",
        130 => "Protocol error",
        131 => "Implementation specific error",
        132 => "Unsupported protocol version",
        133 => "Client identifier not valid",
        134 => "Bad user name or password",
        135 => "Not authorized",
        136 => "Server unavailable",
        137 => "Server busy",
        138 => "Banned",
        140 => "Bad authentication method",
        142 => "Session taken over",
        144 => "Topic name invalid",
        149 => "Packet too large",
        other => return format!("Unknown error (rc: {other})"),
    };
    reason.to_string()
}
