use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::services::flood::ports::MessageEvent;
use crate::services::flood::service::AntiFlood;

/// Input to the flood worker
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A chat message to check
    Message(MessageEvent),
    /// The bot left the chat; its lane can go
    ChatClosed(i64),
}

/// Pumps message events from the host into the flood detector.
///
/// Each chat gets its own lane task, so one chat's events are handled in
/// arrival order while different chats proceed concurrently. Submitting an
/// event never waits.
pub struct FloodWorker {
    antiflood: Arc<AntiFlood>,
    lanes: HashMap<i64, mpsc::UnboundedSender<MessageEvent>>,
    lane_handles: Vec<JoinHandle<()>>,
}

impl FloodWorker {
    pub fn new(antiflood: Arc<AntiFlood>) -> Self {
        Self {
            antiflood,
            lanes: HashMap::new(),
            lane_handles: Vec::new(),
        }
    }

    /// Start consuming `events` until every sender is dropped. The returned
    /// handle resolves once all lanes have drained.
    pub fn spawn(self, events: mpsc::UnboundedReceiver<WorkerEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<WorkerEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }

        info!("Flood event source closed, draining {} chat lanes", self.lanes.len());
        self.lanes.clear();
        for handle in self.lane_handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Flood lane task failed: {:?}", e);
            }
        }
    }

    fn handle(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Message(event) => self.dispatch(event),
            WorkerEvent::ChatClosed(chat_id) => self.close_lane(chat_id),
        }
    }

    fn dispatch(&mut self, event: MessageEvent) {
        let chat_id = event.chat_id();

        let event = match self.lanes.get(&chat_id) {
            Some(lane) => match lane.send(event) {
                Ok(()) => return,
                Err(mpsc::error::SendError(event)) => event,
            },
            None => event,
        };

        let lane = self.open_lane(chat_id);
        if lane.send(event).is_err() {
            error!("Flood lane for chat {} closed right after opening", chat_id);
        }
    }

    fn open_lane(&mut self, chat_id: i64) -> mpsc::UnboundedSender<MessageEvent> {
        debug!("Opening flood lane for chat {}", chat_id);

        let (tx, mut rx) = mpsc::unbounded_channel::<MessageEvent>();
        let antiflood = self.antiflood.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                process_event(&antiflood, &event).await;
            }
        });

        self.lane_handles.push(handle);
        self.lanes.insert(chat_id, tx.clone());
        tx
    }

    /// Dropping the sender lets the lane finish its queued events and exit
    fn close_lane(&mut self, chat_id: i64) {
        if self.lanes.remove(&chat_id).is_some() {
            debug!("Closed flood lane for chat {}", chat_id);
        }
        self.lane_handles.retain(|handle| !handle.is_finished());
    }
}

async fn process_event(antiflood: &AntiFlood, event: &MessageEvent) {
    match antiflood.on_message(event).await {
        Ok(Some(audit)) => antiflood.record_audit(event.chat_id(), &audit).await,
        Ok(None) => {}
        Err(e) => {
            error!("Flood check failed in chat {}: {:?}", event.chat_id(), e);
        }
    }
}
