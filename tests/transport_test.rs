//! Loopback tests for the peer link.

use tictactoe_pro::{Mark, PeerLink, PeerListener, WireMessage};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[tokio::test]
async fn test_host_assigns_marks_and_relays_moves() {
    let listener = PeerListener::bind("127.0.0.1:0").await.expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");

    let (hosted, joined) = tokio::join!(listener.accept(), PeerLink::join(addr));
    let (mut host, host_mark) = hosted.expect("Accept failed");
    let (mut guest, guest_mark) = joined.expect("Join failed");
    assert_eq!(host_mark, Mark::X);
    assert_eq!(guest_mark, Mark::O);

    let mv = WireMessage::Move {
        position: 4,
        mark: Mark::X,
    };
    host.send(&mv).await.expect("Send failed");
    assert_eq!(guest.recv().await.expect("Recv failed"), Some(mv));

    guest.send(&WireMessage::Undo).await.expect("Send failed");
    guest.send(&WireMessage::Reset).await.expect("Send failed");
    assert_eq!(host.recv().await.expect("Recv failed"), Some(WireMessage::Undo));
    assert_eq!(host.recv().await.expect("Recv failed"), Some(WireMessage::Reset));
}

#[tokio::test]
async fn test_disconnect_ends_stream() {
    let listener = PeerListener::bind("127.0.0.1:0").await.expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");

    let (hosted, joined) = tokio::join!(listener.accept(), PeerLink::join(addr));
    let (host, _) = hosted.expect("Accept failed");
    let (mut guest, _) = joined.expect("Join failed");

    drop(host);
    assert_eq!(guest.recv().await.expect("Recv failed"), None);
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let listener = PeerListener::bind("127.0.0.1:0").await.expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");

    let raw_peer = async {
        let mut stream = TcpStream::connect(addr).await.expect("Connect failed");
        stream
            .write_all(b"garbage\n\n{\"type\":\"redo\"}\n")
            .await
            .expect("Write failed");
        stream
    };
    let (hosted, _stream) = tokio::join!(listener.accept(), raw_peer);
    let (mut host, _) = hosted.expect("Accept failed");

    assert_eq!(host.recv().await.expect("Recv failed"), Some(WireMessage::Redo));
}

#[tokio::test]
async fn test_join_requires_assignment() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");

    let fake_host = async {
        let (mut stream, _) = listener.accept().await.expect("Accept failed");
        stream
            .write_all(b"{\"type\":\"reset\"}\n")
            .await
            .expect("Write failed");
        stream
    };
    let (joined, _stream) = tokio::join!(PeerLink::join(addr), fake_host);
    assert!(joined.is_err());
}
