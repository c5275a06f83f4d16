//! WebSocket Connection Management - Gestione connessioni WebSocket

use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::{
    AppState,
    dtos::{ClientEventDTO, ServerEventDTO, TypingEventDTO},
    ws::{event_handlers::process_client_event, usermap::InternalSignal},
};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, MissedTickBehavior, interval, timeout};
use tokio_stream::StreamMap;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(ws, state), fields(user_id = %user_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: Uuid) {
    info!("WebSocket connection established");

    // Dividiamo il WebSocket in due metà: sender e receiver
    let (ws_tx, ws_rx) = ws.split();

    // Canale unbounded per comunicazione interna, nessun segnale va perso
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    // Ogni tab apre la sua connessione, identificata separatamente
    let connection_id = Uuid::new_v4();
    state
        .users_online
        .register_online(user_id, connection_id, int_tx.clone());
    info!("User registered as online");

    // task in ascolto del websocket
    tokio::spawn(listen_ws(user_id, connection_id, ws_rx, int_tx, state.clone()));

    // task in ascolto sui canali broadcast delle conversazioni e sui segnali interni
    tokio::spawn(write_ws(user_id, ws_tx, int_rx, state));
}

#[instrument(skip(websocket_tx, internal_rx, state), fields(user_id = %user_id))]
pub async fn write_ws(
    user_id: Uuid,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Write task started");

    let mut stream_map: StreamMap<String, BroadcastStream<Arc<TypingEventDTO>>> =
        StreamMap::new();

    'external: loop {
        tokio::select! {
            Some((conversation_id, result)) = tokio_stream::StreamExt::next(&mut stream_map) => {
                let event = match result {
                    Ok(event) => event,
                    Err(e) => {
                        // receiver troppo lento, eventi di digitazione persi: non è grave
                        warn!(conversation_id, "Typing events lagged: {:?}", e);
                        continue;
                    }
                };

                // l'utente non riceve la propria digitazione
                if event.user_id == user_id {
                    continue;
                }

                let payload = ServerEventDTO::Typing(event.as_ref().clone());
                if send_event(&mut websocket_tx, &payload).await.is_err() {
                    warn!("Failed to send typing event, closing connection");
                    break 'external;
                }
            }

            signal = internal_rx.recv() => {
                match signal {
                    Some(InternalSignal::Shutdown) => {
                        info!("Shutdown signal received");
                        break 'external;
                    }
                    Some(InternalSignal::Subscribe(conversation_id)) => {
                        if stream_map.contains_key(&conversation_id) {
                            debug!(conversation_id, "Already subscribed");
                            continue;
                        }
                        info!(conversation_id, "Adding conversation subscription");
                        let rx = state.channels.subscribe(&conversation_id);
                        stream_map.insert(conversation_id, BroadcastStream::new(rx));
                    }
                    Some(InternalSignal::Unsubscribe(conversation_id)) => {
                        info!(conversation_id, "Removing conversation subscription");
                        if stream_map.remove(&conversation_id).is_some() {
                            state.channels.remove_if_unused(&conversation_id);
                        }
                    }
                    Some(InternalSignal::Error(err_msg)) => {
                        warn!(error_message = err_msg, "Sending error message to client");
                        let payload = ServerEventDTO::Error {
                            code: 400,
                            message: err_msg.to_string(),
                        };
                        if send_event(&mut websocket_tx, &payload).await.is_err() {
                            break 'external;
                        }
                    }
                    Some(InternalSignal::NewMessage(message)) => {
                        info!(message_id = %message.id, "Pushing new message to client");
                        let payload = ServerEventDTO::NewMessage(message.as_ref().clone());
                        if send_event(&mut websocket_tx, &payload).await.is_err() {
                            break 'external;
                        }
                    }
                    None => {
                        info!("Internal channel closed");
                        break 'external; // listener chiuso, stacca tutto
                    }
                }
            }
        }
    }

    // Rilascia le sottoscrizioni e pulisce i canali rimasti senza ricevitori
    let conversations: Vec<String> = stream_map.keys().cloned().collect();
    drop(stream_map);
    for conversation_id in conversations {
        state.channels.remove_if_unused(&conversation_id);
    }

    let _ = websocket_tx.close().await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &ServerEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize server event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx
        .send(Message::Text(Utf8Bytes::from(json)))
        .await
        .map_err(|e| {
            error!("Failed to send event through WebSocket: {:?}", e);
            e
        })
}

#[instrument(skip(websocket_rx, internal_tx, state), fields(user_id = %user_id))]
pub async fn listen_ws(
    user_id: Uuid,
    connection_id: Uuid,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    rate_limiter.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, StreamExt::next(&mut websocket_rx)).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEventDTO>(&text) {
                        Ok(event) => {
                            debug!("Event received from client");
                            process_client_event(&state, user_id, &internal_tx, event);
                        }
                        Err(_) => {
                            warn!("Failed to deserialize client event");
                            let _ = internal_tx.send(InternalSignal::Error("Invalid event"));
                        }
                    },
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(
                    timeout_secs = TIMEOUT_DURATION_SECONDS,
                    "Connection timeout"
                );
                break;
            }
        }
    }

    // Cleanup
    info!("Cleaning up connection");
    let _ = internal_tx.send(InternalSignal::Shutdown);
    state
        .users_online
        .remove_from_online(&user_id, &connection_id);
    info!("Listen task terminated");
}
