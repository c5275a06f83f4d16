//! Integration tests per il canale WebSocket
//!
//! Il server gira davvero su una porta locale e i client si collegano con
//! tokio-tungstenite, autenticati con lo stesso JWT delle rotte HTTP.
//! Il canale trasporta solo eventi effimeri: nessun accesso al database.

mod common;

#[cfg(test)]
mod websocket_tests {
    use super::common::*;
    use findsomeone::AppState;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::{Duration, sleep, timeout};
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
    use uuid::Uuid;

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = findsomeone::create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn connect(addr: SocketAddr, user_id: Uuid) -> Client {
        let mut request = format!("ws://{}/ws", addr).into_client_request().unwrap();
        request
            .headers_mut()
            .insert("authorization", bearer(user_id).parse().unwrap());
        let (client, _) = tokio_tungstenite::connect_async(request).await.unwrap();
        client
    }

    async fn send(client: &mut Client, event: Value) {
        client.send(Message::Text(event.to_string())).await.unwrap();
    }

    /// Prossimo evento testuale dal server, ignorando ping/pong
    async fn next_event(client: &mut Client) -> Value {
        loop {
            let msg = timeout(Duration::from_secs(5), client.next())
                .await
                .expect("no event received in time")
                .expect("connection closed")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    /// Un evento malformato produce un errore che passa dalla stessa coda
    /// dei segnali interni: quando arriva, i segnali precedenti sono stati applicati.
    async fn sync(client: &mut Client) {
        client
            .send(Message::Text("{ not json }".to_string()))
            .await
            .unwrap();
        let event = next_event(client).await;
        assert_eq!(event["type"], "Error");
    }

    fn subscribe(conversation_id: &str) -> Value {
        json!({ "type": "Subscribe", "data": { "conversation_id": conversation_id } })
    }

    fn typing(conversation_id: &str, is_typing: bool) -> Value {
        json!({
            "type": "Typing",
            "data": { "conversation_id": conversation_id, "is_typing": is_typing }
        })
    }

    // ============================================================
    // Relay degli eventi di digitazione
    // ============================================================

    /// Scenario:
    /// 1. Anna e Jan si iscrivono alla stessa conversazione
    /// 2. Anna scrive
    /// 3. Jan riceve l'evento con l'id di Anna
    /// 4. Anna non riceve la propria digitazione
    #[tokio::test]
    async fn test_typing_is_relayed_to_other_participant() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        let mut jan = connect(addr, JAN_ID).await;

        send(&mut anna, subscribe("conv-anna-jan")).await;
        send(&mut jan, subscribe("conv-anna-jan")).await;
        sync(&mut anna).await;
        sync(&mut jan).await;

        send(&mut anna, typing("conv-anna-jan", true)).await;

        let event = next_event(&mut jan).await;
        assert_eq!(event["type"], "Typing");
        assert_eq!(event["data"]["user_id"], ANNA_ID.to_string());
        assert_eq!(event["data"]["is_typing"], true);
        assert_eq!(event["data"]["conversation_id"], "conv-anna-jan");

        // il primo evento che Anna vede è l'errore di sync, non la sua digitazione
        sync(&mut anna).await;
    }

    #[tokio::test]
    async fn test_typing_stays_inside_its_conversation() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        let mut jan = connect(addr, JAN_ID).await;

        send(&mut jan, subscribe("conv-a")).await;
        send(&mut anna, subscribe("conv-b")).await;
        sync(&mut jan).await;
        sync(&mut anna).await;

        send(&mut anna, typing("conv-b", true)).await;
        sleep(Duration::from_millis(200)).await;

        // Jan non è iscritto a conv-b
        sync(&mut jan).await;
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_typing_events() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        let mut jan = connect(addr, JAN_ID).await;

        send(&mut jan, subscribe("conv-1")).await;
        send(
            &mut jan,
            json!({ "type": "Unsubscribe", "data": { "conversation_id": "conv-1" } }),
        )
        .await;
        sync(&mut jan).await;

        send(&mut anna, typing("conv-1", true)).await;
        sleep(Duration::from_millis(200)).await;

        sync(&mut jan).await;
        assert!(state.channels.is_empty(), "unused channel should be removed");
    }

    /// Flusso client completo: `TypingNotifier` lato Anna, `TypingIndicator` lato Jan
    #[tokio::test]
    async fn test_typing_notifier_reaches_peer_indicator() {
        use findsomeone::dtos::{ClientEventDTO, ServerEventDTO};
        use findsomeone::presence::{TypingIndicator, TypingNotifier};

        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        let mut jan = connect(addr, JAN_ID).await;
        send(&mut anna, subscribe("conv-notifier")).await;
        send(&mut jan, subscribe("conv-notifier")).await;
        sync(&mut anna).await;
        sync(&mut jan).await;

        let (tx, mut outbound) = tokio::sync::mpsc::channel::<ClientEventDTO>(8);
        let notifier = TypingNotifier::new("conv-notifier", tx);
        assert!(notifier.send_typing(true));

        let event = outbound.recv().await.unwrap();
        send(&mut anna, serde_json::to_value(&event).unwrap()).await;

        let indicator = TypingIndicator::new(ANNA_ID);
        let received: ServerEventDTO = serde_json::from_value(next_event(&mut jan).await).unwrap();
        match received {
            ServerEventDTO::Typing(typing) => indicator.handle(&typing),
            other => panic!("expected Typing event, got {:?}", other),
        }
        assert!(indicator.is_typing());
    }

    // ============================================================
    // Validazione degli eventi
    // ============================================================

    #[tokio::test]
    async fn test_blank_conversation_id_is_rejected() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state).await;

        let mut anna = connect(addr, ANNA_ID).await;
        send(&mut anna, subscribe("   ")).await;

        let event = next_event(&mut anna).await;
        assert_eq!(event["type"], "Error");
        assert_eq!(event["data"]["code"], 400);
        assert_eq!(event["data"]["message"], "Invalid conversation id");
    }

    #[tokio::test]
    async fn test_malformed_event_keeps_connection_open() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        for raw in ["", "42", "[1, 2, 3]", r#"{"type":"Unknown","data":{}}"#] {
            anna.send(Message::Text(raw.to_string())).await.unwrap();
            let event = next_event(&mut anna).await;
            assert_eq!(event["data"]["message"], "Invalid event");
        }

        assert!(state.users_online.is_user_online(&ANNA_ID));
    }

    // ============================================================
    // Registro delle connessioni
    // ============================================================

    #[tokio::test]
    async fn test_connection_is_removed_after_close() {
        let state = create_test_state(lazy_pool());
        let addr = spawn_server(state.clone()).await;

        let mut anna = connect(addr, ANNA_ID).await;
        let mut second_tab = connect(addr, ANNA_ID).await;
        sync(&mut anna).await;
        sync(&mut second_tab).await;
        assert_eq!(state.users_online.online_count(), 1);

        anna.close(None).await.unwrap();
        second_tab.close(None).await.unwrap();

        let mut offline = false;
        for _ in 0..50 {
            if !state.users_online.is_user_online(&ANNA_ID) {
                offline = true;
                break;
            }
            sleep(Duration::from_millis(20)).await;
        }
        assert!(offline, "user should be offline after closing every connection");
    }
}
