//! End-to-end check that the game's HTTP sink and the bridge server speak
//! the same protocol: a note posted by the sink comes out of the serial
//! side of the bridge as a firmware frame.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use melodica_cli::commands::serve::{process, read_request};
use melodica_game::{MatchResult, Note, Sequence};
use melodica_relay::{GameSession, HttpSink, Relay, RelayOutcome, SerialSink};

/// Serves bridge connections on an ephemeral port until the listener task
/// is dropped; returns the bound address and the board side of the serial
/// connection.
async fn spawn_bridge() -> (std::net::SocketAddr, tokio::io::DuplexStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (client, board) = tokio::io::duplex(1024);
    let serial = Arc::new(Mutex::new(SerialSink::new(client)));

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let serial = Arc::clone(&serial);
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.split();
                let mut reader = BufReader::new(read_half);
                if let Ok(Some(request)) = read_request(&mut reader).await {
                    let response = process(&request, Some(&serial)).await;
                    let _ = write_half.write_all(&response.to_bytes()).await;
                    let _ = write_half.shutdown().await;
                }
            });
        }
    });

    (addr, board)
}

#[tokio::test]
async fn sink_note_reaches_the_board_through_the_bridge() {
    let (addr, mut board) = spawn_bridge().await;

    let mut relay = Relay::new().with_http(HttpSink::new(addr));
    let report = relay.send(Note::E).await;
    assert_eq!(report.summary(), RelayOutcome::Delivered);

    let mut buf = vec![0u8; 12];
    board.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"PLAY_NOTE_E\n");
}

#[tokio::test]
async fn full_round_relays_every_accepted_note() {
    let (addr, mut board) = spawn_bridge().await;

    let mut session = GameSession::new(Relay::new().with_http(HttpSink::new(addr)));
    session.start_round(Some(Sequence::parse("E,G").unwrap()));

    assert_eq!(
        session.submit_note(Note::E),
        MatchResult::Correct { position: 1 }
    );
    assert_eq!(
        session.submit_note(Note::G),
        MatchResult::Completed { score: 2 }
    );

    // Two frames arrive, in whatever order the notification tasks ran.
    let mut buf = vec![0u8; 24];
    board.read_exact(&mut buf).await.unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("PLAY_NOTE_E\n"));
    assert!(text.contains("PLAY_NOTE_G\n"));
}

#[tokio::test]
async fn replay_through_the_bridge_is_cancellable() {
    let (addr, mut board) = spawn_bridge().await;

    let relay = Arc::new(Mutex::new(Relay::new().with_http(HttpSink::new(addr))));
    let mut playback = melodica_relay::start_replay(
        relay,
        Sequence::parse("E,G,C,D,A").unwrap(),
        Duration::from_millis(5),
    );

    playback.next_ack().await.unwrap();
    drop(playback);

    // Whatever was in flight settles; the rest of the melody never arrives.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let mut buf = vec![0u8; 1024];
    let n = board.read(&mut buf).await.unwrap();
    let frames = buf[..n].split(|&b| b == b'\n').filter(|s| !s.is_empty()).count();
    assert!(frames <= 2, "expected at most two frames, saw {}", frames);
}
