use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::domain::entities::outcome::CheckOutcome;
use crate::domain::ports::probe::{Probe, ProbeError};

const DEFAULT_PORT: u16 = 25565;
const HANDSHAKE_PROTOCOL_VERSION: i32 = 4;

/// Liveness probe for Minecraft servers using the Server List Ping protocol:
/// a VarInt-framed handshake followed by a status request, answered with a
/// JSON status document carrying the MOTD and player counts.
#[derive(Debug, Default)]
pub struct MinecraftProbe;

impl MinecraftProbe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    description: Motd,
    players: Players,
}

#[derive(Debug, Deserialize)]
struct Players {
    online: u32,
    max: u32,
}

/// The MOTD is either a plain string or a chat component tree.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Motd {
    Text(String),
    Component {
        #[serde(default)]
        text: String,
        #[serde(default)]
        extra: Vec<Motd>,
    },
}

impl Motd {
    fn flatten(&self, out: &mut String) {
        match self {
            Motd::Text(text) => out.push_str(text),
            Motd::Component { text, extra } => {
                out.push_str(text);
                for part in extra {
                    part.flatten(out);
                }
            }
        }
    }
}

/// Drop `§x` formatting codes, keeping the visible text.
fn strip_formatting(motd: &str) -> String {
    let mut out = String::with_capacity(motd.len());
    let mut chars = motd.chars();
    while let Some(c) = chars.next() {
        if c == '§' {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out.trim().to_string()
}

fn parse_address(address: &str) -> Result<(String, u16), ProbeError> {
    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            let port = port.parse().map_err(|_| {
                ProbeError::InvalidAddress(format!("invalid port in '{address}'"))
            })?;
            Ok((host.to_string(), port))
        }
        // More than one colon means a bare IPv6 address; use the default port.
        _ => Ok((address.to_string(), DEFAULT_PORT)),
    }
}

fn push_varint(buf: &mut Vec<u8>, mut value: i32) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value = ((value as u32) >> 7) as i32;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

async fn read_varint(stream: &mut TcpStream) -> Result<i32, ProbeError> {
    let mut value: i32 = 0;
    for shift in 0..5 {
        let byte = stream
            .read_u8()
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        value |= i32::from(byte & 0x7f) << (shift * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(ProbeError::MalformedResponse(
        "VarInt longer than 5 bytes".to_string(),
    ))
}

fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::with_capacity(host.len() + 16);
    body.push(0x00);
    push_varint(&mut body, HANDSHAKE_PROTOCOL_VERSION);
    push_varint(&mut body, host.len() as i32);
    body.extend_from_slice(host.as_bytes());
    body.extend_from_slice(&port.to_be_bytes());
    push_varint(&mut body, 0x01);

    let mut packet = Vec::with_capacity(body.len() + 2);
    push_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(&body);
    packet
}

async fn fetch_status(host: &str, port: u16) -> Result<StatusResponse, ProbeError> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|_| ProbeError::Connection(format!("{host}:{port} is offline or unreachable")))?;

    stream
        .write_all(&handshake_packet(host, port))
        .await
        .map_err(|e| ProbeError::Connection(e.to_string()))?;
    // Status request: length 1, packet id 0x00.
    stream
        .write_all(&[0x01, 0x00])
        .await
        .map_err(|e| ProbeError::Connection(e.to_string()))?;

    let packet_len = read_varint(&mut stream).await?;
    if !(0..=1_048_576).contains(&packet_len) {
        return Err(ProbeError::MalformedResponse(format!(
            "implausible packet length {packet_len}"
        )));
    }
    let _packet_id = read_varint(&mut stream).await?;
    let json_len = read_varint(&mut stream).await?;
    if json_len < 0 || json_len > packet_len {
        return Err(ProbeError::MalformedResponse(format!(
            "implausible payload length {json_len}"
        )));
    }

    let mut payload = vec![0u8; json_len as usize];
    stream
        .read_exact(&mut payload)
        .await
        .map_err(|e| ProbeError::Connection(e.to_string()))?;

    serde_json::from_slice(&payload)
        .map_err(|e| ProbeError::MalformedResponse(format!("bad status JSON: {e}")))
}

#[async_trait]
impl Probe for MinecraftProbe {
    fn name(&self) -> &'static str {
        "Minecraft"
    }

    fn description(&self) -> &'static str {
        "Monitor Minecraft servers and fetch their MOTD."
    }

    async fn monitor(&self, address: &str) -> Result<CheckOutcome, ProbeError> {
        let (host, port) = parse_address(address)?;
        let status = fetch_status(&host, port).await?;

        let mut motd = String::new();
        status.description.flatten(&mut motd);
        let motd = strip_formatting(&motd);

        Ok(CheckOutcome::up(format!(
            "{motd}\nPlayers: {}/{}",
            status.players.online, status.players.max
        )))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_uses_default_port() {
        let (host, port) = parse_address("mc.example.com").expect("parse");
        assert_eq!(host, "mc.example.com");
        assert_eq!(port, DEFAULT_PORT);
    }

    #[test]
    fn explicit_port_is_honored() {
        let (host, port) = parse_address("mc.example.com:25570").expect("parse");
        assert_eq!(host, "mc.example.com");
        assert_eq!(port, 25570);
    }

    #[test]
    fn garbage_port_is_rejected() {
        assert!(matches!(
            parse_address("mc.example.com:notaport"),
            Err(ProbeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn bare_ipv6_uses_default_port() {
        let (host, port) = parse_address("2001:db8::1").expect("parse");
        assert_eq!(host, "2001:db8::1");
        assert_eq!(port, DEFAULT_PORT);
    }

    #[test]
    fn formatting_codes_are_stripped() {
        assert_eq!(strip_formatting("§aHello §lWorld§r"), "Hello World");
        assert_eq!(strip_formatting("  plain  "), "plain");
    }

    #[test]
    fn varint_encoding_matches_protocol() {
        let mut buf = Vec::new();
        push_varint(&mut buf, 0);
        assert_eq!(buf, [0x00]);

        buf.clear();
        push_varint(&mut buf, 127);
        assert_eq!(buf, [0x7f]);

        buf.clear();
        push_varint(&mut buf, 128);
        assert_eq!(buf, [0x80, 0x01]);

        buf.clear();
        push_varint(&mut buf, 25565);
        assert_eq!(buf, [0xdd, 0xc7, 0x01]);
    }

    #[test]
    fn handshake_is_length_prefixed() {
        let packet = handshake_packet("mc.example.com", 25565);
        // First byte is the body length; the body follows in full.
        assert_eq!(packet[0] as usize, packet.len() - 1);
        assert_eq!(packet[1], 0x00);
        // Next state must be 1 (status).
        assert_eq!(*packet.last().expect("non-empty"), 0x01);
    }

    #[test]
    fn motd_component_tree_flattens() {
        let status: StatusResponse = serde_json::from_str(
            r#"{
                "description": {"text": "A ", "extra": [{"text": "server"}]},
                "players": {"online": 3, "max": 20}
            }"#,
        )
        .expect("parse");

        let mut motd = String::new();
        status.description.flatten(&mut motd);
        assert_eq!(motd, "A server");
        assert_eq!(status.players.online, 3);
    }

    #[test]
    fn plain_string_motd_parses() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"description": "§6Legacy server", "players": {"online": 0, "max": 10}}"#,
        )
        .expect("parse");

        let mut motd = String::new();
        status.description.flatten(&mut motd);
        assert_eq!(strip_formatting(&motd), "Legacy server");
    }

    #[tokio::test]
    async fn status_exchange_against_local_stub() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            // Drain the handshake and status request.
            let mut scratch = [0u8; 256];
            let _ = socket.read(&mut scratch).await.expect("read");

            let json = r#"{"description":"§aHi","players":{"online":1,"max":5}}"#.as_bytes();
            let mut body = vec![0x00];
            push_varint(&mut body, json.len() as i32);
            body.extend_from_slice(json);
            let mut packet = Vec::new();
            push_varint(&mut packet, body.len() as i32);
            packet.extend_from_slice(&body);
            socket.write_all(&packet).await.expect("write");
        });

        let status = fetch_status("127.0.0.1", addr.port()).await.expect("status");
        let mut motd = String::new();
        status.description.flatten(&mut motd);
        assert_eq!(strip_formatting(&motd), "Hi");
        assert_eq!(status.players.max, 5);
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn closed_port_is_a_connection_error() {
        // Bind then drop to get a port that is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let err = fetch_status("127.0.0.1", port).await.expect_err("error");
        assert!(matches!(err, ProbeError::Connection(_)));
        assert!(err.to_string().contains("offline or unreachable"));
    }
}
