//! Heartbeat di presenza
//!
//! Ciclo di vita:
//! - `start`: se c'è un utente segnala subito `online`, poi ogni `HEARTBEAT_INTERVAL`
//! - `on_visibility_change`: `away` quando la pagina è nascosta, `online` quando torna visibile
//! - `on_unload`: `offline` best-effort via canale non bloccante (chiamata diretta se il canale non accetta), poi il ciclo termina
//! - `stop`: ferma il task e segnala `offline`

use super::{HEARTBEAT_INTERVAL, PresenceReporter};
use crate::entities::PresenceStatus;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Hidden,
    Visible,
    Unload,
}

impl PageEvent {
    fn status(self) -> PresenceStatus {
        match self {
            PageEvent::Hidden => PresenceStatus::Away,
            PageEvent::Visible => PresenceStatus::Online,
            PageEvent::Unload => PresenceStatus::Offline,
        }
    }
}

pub struct PresenceHeartbeat {
    reporter: Arc<dyn PresenceReporter>,
    // None quando non c'è un utente: nessun task, nessun report
    events_tx: Option<Sender<PageEvent>>,
    task: Option<JoinHandle<()>>,
}

impl PresenceHeartbeat {
    #[instrument(skip(reporter))]
    pub fn start(user_id: Option<Uuid>, reporter: Arc<dyn PresenceReporter>) -> Self {
        let Some(user_id) = user_id else {
            debug!("No user, presence heartbeat disabled");
            return Self {
                reporter,
                events_tx: None,
                task: None,
            };
        };

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(run_heartbeat(user_id, reporter.clone(), events_rx));
        info!("Presence heartbeat started");

        Self {
            reporter,
            events_tx: Some(events_tx),
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn on_visibility_change(&self, hidden: bool) {
        let Some(tx) = &self.events_tx else { return };
        let event = if hidden { PageEvent::Hidden } else { PageEvent::Visible };
        if tx.send(event).await.is_err() {
            warn!("Presence task gone, visibility change dropped");
        }
    }

    /// Non blocca se il canale ha spazio; altrimenti segnala `offline` direttamente
    pub async fn on_unload(&self) {
        let Some(tx) = &self.events_tx else { return };
        if tx.try_send(PageEvent::Unload).is_err() {
            debug!("Unload event not queued, reporting offline directly");
            report_logged(self.reporter.as_ref(), PresenceStatus::Offline).await;
        }
    }

    #[instrument(skip(self))]
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            // dopo un unload il task è già terminato e l'offline è già stato inviato
            let running = !task.is_finished();
            task.abort();
            if running {
                report_logged(self.reporter.as_ref(), PresenceStatus::Offline).await;
            }
            info!("Presence heartbeat stopped");
        }
    }
}

impl Drop for PresenceHeartbeat {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[instrument(skip(reporter, events_rx), fields(user_id = %user_id))]
async fn run_heartbeat(
    user_id: Uuid,
    reporter: Arc<dyn PresenceReporter>,
    mut events_rx: Receiver<PageEvent>,
) {
    report_logged(reporter.as_ref(), PresenceStatus::Online).await;

    // primo tick dopo un intervallo intero: l'online iniziale è già stato inviato
    let mut ticker = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report_logged(reporter.as_ref(), PresenceStatus::Online).await;
            }
            event = events_rx.recv() => {
                match event {
                    Some(PageEvent::Unload) => {
                        // pagina chiusa: nessun altro heartbeat dopo l'offline
                        report_logged(reporter.as_ref(), PresenceStatus::Offline).await;
                        break;
                    }
                    Some(event) => report_logged(reporter.as_ref(), event.status()).await,
                    None => break,
                }
            }
        }
    }
    debug!("Presence loop terminated");
}

async fn report_logged(reporter: &dyn PresenceReporter, status: PresenceStatus) {
    if let Err(e) = reporter.report(status).await {
        warn!("Presence update {:?} failed: {}", status, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::PresenceError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Default)]
    struct RecordingReporter {
        reports: Mutex<Vec<PresenceStatus>>,
    }

    impl RecordingReporter {
        fn reports(&self) -> Vec<PresenceStatus> {
            self.reports.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PresenceReporter for RecordingReporter {
        async fn report(&self, status: PresenceStatus) -> Result<(), PresenceError> {
            self.reports.lock().unwrap().push(status);
            Ok(())
        }
    }

    struct FailingReporter;

    #[async_trait]
    impl PresenceReporter for FailingReporter {
        async fn report(&self, _status: PresenceStatus) -> Result<(), PresenceError> {
            Err(PresenceError::Status(500))
        }
    }

    use PresenceStatus::{Away, Offline, Online};

    #[tokio::test(start_paused = true)]
    async fn reports_online_immediately_and_every_interval() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(reporter.reports(), vec![Online]);

        sleep(HEARTBEAT_INTERVAL).await;
        assert_eq!(reporter.reports(), vec![Online, Online]);

        sleep(HEARTBEAT_INTERVAL).await;
        assert_eq!(reporter.reports(), vec![Online, Online, Online]);

        heartbeat.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn visibility_changes_map_to_away_and_online() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());
        sleep(Duration::from_millis(10)).await;

        heartbeat.on_visibility_change(true).await;
        sleep(Duration::from_millis(10)).await;
        heartbeat.on_visibility_change(false).await;
        sleep(Duration::from_millis(10)).await;

        assert_eq!(reporter.reports(), vec![Online, Away, Online]);
        heartbeat.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_reports_offline_and_cancels_interval() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());
        sleep(Duration::from_millis(10)).await;

        heartbeat.stop().await;
        sleep(HEARTBEAT_INTERVAL * 3).await;

        assert_eq!(reporter.reports(), vec![Online, Offline]);
    }

    #[tokio::test(start_paused = true)]
    async fn without_user_nothing_is_reported() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(None, reporter.clone());
        assert!(!heartbeat.is_running());

        heartbeat.on_visibility_change(true).await;
        heartbeat.on_unload().await;
        sleep(HEARTBEAT_INTERVAL * 2).await;
        heartbeat.stop().await;

        assert!(reporter.reports().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unload_goes_through_the_channel() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());
        sleep(Duration::from_millis(10)).await;

        heartbeat.on_unload().await;
        sleep(Duration::from_millis(10)).await;

        assert_eq!(reporter.reports(), vec![Online, Offline]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_online_report_after_unload() {
        let reporter = Arc::new(RecordingReporter::default());
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());
        sleep(Duration::from_millis(10)).await;

        heartbeat.on_unload().await;
        sleep(HEARTBEAT_INTERVAL + Duration::from_secs(1)).await;

        assert_eq!(reporter.reports(), vec![Online, Offline]);
        assert!(!heartbeat.is_running());

        heartbeat.stop().await;
        assert_eq!(reporter.reports(), vec![Online, Offline]);
    }

    #[tokio::test(start_paused = true)]
    async fn unload_falls_back_to_direct_call_when_channel_is_closed() {
        let reporter = Arc::new(RecordingReporter::default());
        let mut heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), reporter.clone());
        sleep(Duration::from_millis(10)).await;

        if let Some(task) = heartbeat.task.take() {
            task.abort();
            let _ = task.await;
        }

        heartbeat.on_unload().await;
        assert_eq!(reporter.reports(), vec![Online, Offline]);
    }

    #[tokio::test(start_paused = true)]
    async fn reporter_failures_are_swallowed() {
        let heartbeat = PresenceHeartbeat::start(Some(Uuid::new_v4()), Arc::new(FailingReporter));
        sleep(HEARTBEAT_INTERVAL + Duration::from_secs(1)).await;
        assert!(heartbeat.is_running());
        heartbeat.stop().await;
    }
}
