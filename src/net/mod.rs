/// Server connection.
///
/// The UI loop only talks to a `Transport`: it pushes requests and drains
/// events once per frame. Nothing here blocks the caller.

pub mod socket;

use crate::domain::command::Request;
use crate::domain::snapshot::Snapshot;
use crate::error::Result;

#[derive(Clone, PartialEq, Debug)]
pub enum NetEvent {
    Connected,
    Snapshot(Snapshot),
    Disconnected(String),
}

pub trait Transport {
    /// Queue a request for the server. Fails if there is no live connection.
    fn send(&mut self, request: &Request) -> Result<()>;

    /// Every event that arrived since the last call, oldest first.
    fn poll(&mut self) -> Vec<NetEvent>;
}

/// Keep only the newest snapshot of a batch; connection events pass through.
pub fn latest_snapshot(events: Vec<NetEvent>) -> (Option<Snapshot>, Vec<NetEvent>) {
    let mut latest = None;
    let mut other = Vec::new();
    for event in events {
        match event {
            NetEvent::Snapshot(s) => latest = Some(s),
            e => other.push(e),
        }
    }
    (latest, other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wire;

    #[test]
    fn only_the_newest_snapshot_survives() {
        let a = wire::decode(r#"{"input_type":"menu","main_text":"a"}"#).unwrap();
        let b = wire::decode(r#"{"input_type":"menu","main_text":"b"}"#).unwrap();
        let (latest, other) = latest_snapshot(vec![
            NetEvent::Connected,
            NetEvent::Snapshot(a),
            NetEvent::Snapshot(b.clone()),
        ]);
        assert_eq!(latest, Some(b));
        assert_eq!(other, vec![NetEvent::Connected]);
    }
}
