//! Tests for wire messages and their mapping onto the session.

use tictactoe_pro::{
    Command, GameSession, Mark, Move, Origin, Position, SessionEvent, WireMessage,
};

#[test]
fn test_decodes_documented_shapes() {
    assert_eq!(
        WireMessage::decode(r#"{"type":"move","position":4,"mark":"X"}"#).unwrap(),
        WireMessage::Move {
            position: 4,
            mark: Mark::X
        }
    );
    assert_eq!(WireMessage::decode(r#"{"type":"undo"}"#).unwrap(), WireMessage::Undo);
    assert_eq!(WireMessage::decode(r#"{"type":"redo"}"#).unwrap(), WireMessage::Redo);
    assert_eq!(WireMessage::decode("{\"type\":\"reset\"}\n").unwrap(), WireMessage::Reset);
    assert_eq!(
        WireMessage::decode(r#"{"type":"assign","me":"O","you":"X"}"#).unwrap(),
        WireMessage::Assign {
            me: Mark::O,
            you: Mark::X
        }
    );
}

#[test]
fn test_encodes_single_line() {
    let line = WireMessage::Move {
        position: 8,
        mark: Mark::O,
    }
    .encode()
    .unwrap();
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["type"], "move");
    assert_eq!(value["position"], 8);
    assert_eq!(value["mark"], "O");
}

#[test]
fn test_rejects_malformed_lines() {
    assert!(WireMessage::decode("not json").is_err());
    assert!(WireMessage::decode(r#"{"type":"castle"}"#).is_err());
    assert!(WireMessage::decode(r#"{"type":"move","position":4,"mark":"Z"}"#).is_err());
}

#[test]
fn test_inbound_messages_become_remote_commands() {
    let origin = Origin::Remote;
    assert_eq!(
        WireMessage::Move {
            position: 2,
            mark: Mark::O
        }
        .into_command(),
        Command::Move {
            position: 2,
            mark: Mark::O,
            origin
        }
    );
    assert_eq!(WireMessage::Undo.into_command(), Command::Undo { origin });
    assert_eq!(WireMessage::Redo.into_command(), Command::Redo { origin });
    assert_eq!(WireMessage::Reset.into_command(), Command::NewGame { origin });
    assert_eq!(
        WireMessage::Assign {
            me: Mark::O,
            you: Mark::X
        }
        .into_command(),
        Command::BindOnlineMark(Mark::O)
    );
}

#[test]
fn test_only_local_events_are_relayed() {
    let mv = Move::new(Position::Center, Mark::X);
    assert_eq!(
        WireMessage::from_event(&SessionEvent::MoveAccepted {
            mv,
            origin: Origin::Local
        }),
        Some(WireMessage::Move {
            position: 4,
            mark: Mark::X
        })
    );
    assert_eq!(
        WireMessage::from_event(&SessionEvent::MoveAccepted {
            mv,
            origin: Origin::Remote
        }),
        None
    );
    assert_eq!(
        WireMessage::from_event(&SessionEvent::Reset {
            origin: Origin::Local
        }),
        Some(WireMessage::Reset)
    );
    assert_eq!(WireMessage::from_event(&SessionEvent::Draw), None);
    assert_eq!(WireMessage::from_event(&SessionEvent::Rewound { index: -1 }), None);
}

/// Relays every local event of one session into the other, as the console does.
fn relay(from: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>, to: &mut GameSession) {
    while let Ok(event) = from.try_recv() {
        if let Some(message) = WireMessage::from_event(&event) {
            let line = message.encode().unwrap();
            let command = WireMessage::decode(&line).unwrap().into_command();
            assert!(to.dispatch(command), "peer rejected {line}");
        }
    }
}

#[test]
fn test_two_sessions_stay_in_sync() {
    let mut host = GameSession::local();
    let mut guest = GameSession::local();
    host.bind_online_mark(Mark::X);
    guest.bind_online_mark(Mark::O);
    let mut host_events = host.subscribe();
    let mut guest_events = guest.subscribe();

    host.request_move(4, Mark::X, Origin::Local).unwrap();
    relay(&mut host_events, &mut guest);
    guest.request_move(0, Mark::O, Origin::Local).unwrap();
    relay(&mut guest_events, &mut host);
    host.request_move(8, Mark::X, Origin::Local).unwrap();
    relay(&mut host_events, &mut guest);
    assert_eq!(host.board(), guest.board());
    assert_eq!(guest.to_move(), Mark::O);

    // Guest takes back X's move on its own turn; both sides follow.
    guest.request_undo(Origin::Local).unwrap();
    relay(&mut guest_events, &mut host);
    assert_eq!(host.board(), guest.board());
    assert_eq!(host.to_move(), Mark::X);

    host.request_redo(Origin::Local).unwrap();
    relay(&mut host_events, &mut guest);
    assert_eq!(host.board(), guest.board());
    assert_eq!(guest.to_move(), Mark::O);

    guest.request_move(2, Mark::O, Origin::Local).unwrap();
    relay(&mut guest_events, &mut host);
    host.request_undo(Origin::Local).unwrap();
    relay(&mut host_events, &mut guest);
    assert_eq!(host.board(), guest.board());
    assert_eq!(host.to_move(), guest.to_move());

    host.new_game(Origin::Local);
    relay(&mut host_events, &mut guest);
    assert!(guest.history().played().is_empty());

    // The guest's reset arrived as remote, so nothing bounces back.
    let mut echoed = Vec::new();
    while let Ok(event) = guest_events.try_recv() {
        echoed.extend(WireMessage::from_event(&event));
    }
    assert!(echoed.is_empty());
}
