//! Integration tests for the gpsd client against an in-process fake daemon

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use integration_gpsd::{FixMode, GpsClient, GpsdClient, GpsdConfig, GpsdError};

const VERSION: &str =
    r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#;
const NO_FIX: &str = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":1}"#;
const FIX_2D: &str = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":2,"lat":52.5,"lon":13.4,"eph":25.0}"#;
const FIX_3D: &str = r#"{"class":"TPV","device":"/dev/ttyACM0","mode":3,"time":"2026-03-01T12:00:00.000Z","lat":52.520008,"lon":13.404954,"altHAE":74.2,"eph":4.5,"speed":0.5}"#;
const FIX_3D_NEXT: &str =
    r#"{"class":"TPV","mode":3,"lat":52.521,"lon":13.405,"altHAE":75.0,"eph":4.0}"#;

/// Behavior of the fake daemon for one connection after the watch command
enum Script {
    /// Send the reports, then close the connection
    SendAndClose(Vec<Vec<u8>>),
    /// Send the reports, then keep the socket open until the client disconnects
    SendAndHold(Vec<Vec<u8>>, oneshot::Sender<()>),
}

fn reports(lines: &[&str]) -> Vec<Vec<u8>> {
    lines.iter().map(|line| line.as_bytes().to_vec()).collect()
}

/// Start a fake gpsd serving one connection and return its config
async fn fake_gpsd(script: Script) -> GpsdConfig {
    fake_gpsd_sessions(vec![script]).await
}

/// Start a fake gpsd serving one script per accepted connection, in order
async fn fake_gpsd_sessions(scripts: Vec<Script>) -> GpsdConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        for script in scripts {
            let (socket, _) = listener.accept().await.unwrap();
            serve(socket, script).await;
        }
    });

    GpsdConfig::for_testing(port)
}

async fn serve(socket: tokio::net::TcpStream, script: Script) {
    let mut reader = BufReader::new(socket);

    let mut command = String::new();
    reader.read_line(&mut command).await.unwrap();
    assert!(command.starts_with("?WATCH="), "unexpected command: {command}");
    assert!(command.contains(r#""json":true"#));

    let mut socket = reader.into_inner();
    socket.write_all(format!("{VERSION}\n").as_bytes()).await.unwrap();

    let (lines, disconnected) = match script {
        Script::SendAndClose(lines) => (lines, None),
        Script::SendAndHold(lines, disconnected) => (lines, Some(disconnected)),
    };
    for mut line in lines {
        line.push(b'\n');
        socket.write_all(&line).await.unwrap();
    }

    if let Some(disconnected) = disconnected {
        let mut buf = [0_u8; 64];
        while socket.read(&mut buf).await.unwrap_or(0) > 0 {}
        let _ = disconnected.send(());
    }
}

#[tokio::test]
async fn current_fix_returns_first_3d_fix() {
    let config =
        fake_gpsd(Script::SendAndClose(reports(&[NO_FIX, "garbage", FIX_2D, FIX_3D]))).await;
    let client = GpsdClient::new(config);

    let fix = client
        .current_fix(true, Duration::from_secs(2))
        .await
        .unwrap();

    assert_eq!(fix.mode, FixMode::ThreeD);
    assert!((fix.latitude - 52.520_008).abs() < 1e-9);
    assert_eq!(fix.horizontal_error_meters, Some(4.5));
}

#[tokio::test]
async fn current_fix_accepts_2d_without_high_accuracy() {
    let config = fake_gpsd(Script::SendAndClose(reports(&[NO_FIX, FIX_2D, FIX_3D]))).await;
    let client = GpsdClient::new(config);

    let fix = client
        .current_fix(false, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(fix.mode, FixMode::TwoD);
}

#[tokio::test]
async fn current_fix_times_out_without_fix() {
    let (tx, _rx) = oneshot::channel();
    let config = fake_gpsd(Script::SendAndHold(reports(&[NO_FIX, FIX_2D]), tx)).await;
    let client = GpsdClient::new(config);

    let err = client
        .current_fix(true, Duration::from_millis(200))
        .await
        .unwrap_err();
    assert_eq!(err, GpsdError::NoFix { timeout_ms: 200 });
}

#[tokio::test]
async fn current_fix_reports_closed_connection() {
    let config = fake_gpsd(Script::SendAndClose(reports(&[NO_FIX]))).await;
    let client = GpsdClient::new(config);

    let err = client
        .current_fix(true, Duration::from_secs(2))
        .await
        .unwrap_err();
    assert_eq!(err, GpsdError::ConnectionClosed);
}

#[tokio::test]
async fn connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = GpsdClient::new(GpsdConfig::for_testing(port));
    let err = client
        .current_fix(true, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GpsdError::ConnectionFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn watch_streams_fixes_in_order_and_reports_disconnect() {
    let config =
        fake_gpsd(Script::SendAndClose(reports(&[FIX_3D, NO_FIX, FIX_2D, FIX_3D_NEXT]))).await;
    let client = GpsdClient::new(config);

    let mut fixes = client.watch(false).await.unwrap();

    let first = fixes.recv().await.unwrap().unwrap();
    let second = fixes.recv().await.unwrap().unwrap();
    let third = fixes.recv().await.unwrap().unwrap();
    assert_eq!(first.mode, FixMode::ThreeD);
    assert_eq!(second.mode, FixMode::TwoD);
    assert!((third.latitude - 52.521).abs() < 1e-9);

    assert_eq!(
        fixes.recv().await.unwrap(),
        Err(GpsdError::ConnectionClosed)
    );
}

#[tokio::test]
async fn watch_skips_undecodable_report() {
    let mut lines = reports(&[FIX_3D]);
    lines.push(b"\xff\xfe bad bytes".to_vec());
    lines.extend(reports(&[FIX_3D_NEXT]));
    let (tx, _disconnected) = oneshot::channel();
    let config = fake_gpsd(Script::SendAndHold(lines, tx)).await;
    let client = GpsdClient::new(config);

    let mut fixes = client.watch(true).await.unwrap();

    let first = fixes.recv().await.unwrap().unwrap();
    let second = fixes.recv().await.unwrap().unwrap();
    assert!((first.latitude - 52.520_008).abs() < 1e-9);
    assert!((second.latitude - 52.521).abs() < 1e-9);
}

#[tokio::test]
async fn watch_reconnects_after_daemon_closes() {
    let (tx, _disconnected) = oneshot::channel();
    let config = fake_gpsd_sessions(vec![
        Script::SendAndClose(reports(&[FIX_3D])),
        Script::SendAndHold(reports(&[FIX_3D_NEXT]), tx),
    ])
    .await;
    let client = GpsdClient::new(config);

    let mut fixes = client.watch(true).await.unwrap();

    let first = fixes.recv().await.unwrap().unwrap();
    assert!((first.latitude - 52.520_008).abs() < 1e-9);
    assert_eq!(fixes.recv().await.unwrap(), Err(GpsdError::ConnectionClosed));

    let after_reconnect = tokio::time::timeout(Duration::from_secs(2), fixes.recv())
        .await
        .expect("watch did not reconnect")
        .unwrap()
        .unwrap();
    assert!((after_reconnect.latitude - 52.521).abs() < 1e-9);
}

#[tokio::test]
async fn watch_with_high_accuracy_skips_2d() {
    let config = fake_gpsd(Script::SendAndClose(reports(&[FIX_2D, FIX_3D_NEXT]))).await;
    let client = GpsdClient::new(config);

    let mut fixes = client.watch(true).await.unwrap();
    let fix = fixes.recv().await.unwrap().unwrap();
    assert!(fix.is_3d());
}

#[tokio::test]
async fn dropping_watch_disconnects() {
    let (tx, disconnected) = oneshot::channel();
    let config = fake_gpsd(Script::SendAndHold(reports(&[FIX_3D]), tx)).await;
    let client = GpsdClient::new(config);

    let mut fixes = client.watch(true).await.unwrap();
    tokio_test::assert_ok!(fixes.recv().await.unwrap());
    drop(fixes);

    tokio::time::timeout(Duration::from_secs(2), disconnected)
        .await
        .expect("client did not disconnect")
        .unwrap();
}
