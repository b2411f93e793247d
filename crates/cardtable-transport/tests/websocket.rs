//! Integration tests for the WebSocket transport: a real server and client
//! talking over a loopback socket.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use cardtable_transport::{Connection, Transport, WebSocketTransport};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on a random port and returns (transport, addr).
    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_accept_and_send_receive() {
        let (mut transport, addr) = bind().await;

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");

        assert!(server_conn.id().into_inner() > 0);

        // Server sends, client receives.
        server_conn
            .send(b"hello from server")
            .await
            .expect("send should succeed");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from server");

        // Client sends, server receives.
        client_ws
            .send(Message::Binary(b"hello from client".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"hello from client");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind().await;

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_text_frames_are_delivered_as_bytes() {
        let (mut transport, addr) = bind().await;

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        // Browser clients send JSON as text frames.
        client_ws
            .send(Message::Text(r#"{"action": "shuffle"}"#.into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, br#"{"action": "shuffle"}"#);
    }

    #[tokio::test]
    async fn test_send_progresses_while_recv_is_parked() {
        let (mut transport, addr) = bind().await;

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let mut client_ws = connect_client(&addr).await;
        let server_conn = std::sync::Arc::new(server_handle.await.unwrap());

        // Park a reader on the connection; the client sends nothing yet.
        let reader_conn = std::sync::Arc::clone(&server_conn);
        let reader = tokio::spawn(async move { reader_conn.recv().await });

        // Sends must complete even though a recv is in flight.
        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::time::timeout(Duration::from_secs(1), server_conn.send(b"broadcast"))
            .await
            .expect("send must not wait on the parked reader")
            .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"broadcast");

        // Unblock and finish the reader.
        client_ws
            .send(Message::Binary(b"done".to_vec().into()))
            .await
            .unwrap();
        let received = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(received, b"done");
    }
}
