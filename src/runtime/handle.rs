use std::time::{SystemTime, UNIX_EPOCH};

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{self, Duration, MissedTickBehavior},
};
use tracing::info;

use crate::{
    bandmap::Bandmap,
    core::{entries::BandSummary, entry::Entry},
    spot::Spot,
    types::{Band, EntryId, FreqHz},
};

use super::events::{BandmapEvent, BroadcastListener};

/// Errors surfaced by [`BandmapHandle`].
#[derive(Debug)]
pub enum RuntimeError {
    /// The runtime task is gone.
    ChannelClosed,
}

/// Runtime tuning.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of the command queue.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
    /// Period of the clean-out sweep; 0 disables it.
    pub cleanout_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
            cleanout_interval_ms: 5_000,
        }
    }
}

/// Navigation requests understood by [`BandmapHandle::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// By entry id.
    Entry(EntryId),
    /// By callsign.
    Callsign(String),
    /// Most valuable entry not yet worked.
    HighestValue,
    /// Closest entry to a frequency.
    Nearest(FreqHz),
    /// Next entry above a frequency.
    NextUp(FreqHz),
    /// Next entry below a frequency.
    NextDown(FreqHz),
}

/// Cloneable handle to a running bandmap task.
pub struct BandmapHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<BandmapEvent>,
}

impl Clone for BandmapHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    AddSpot {
        spot: Spot,
        resp: oneshot::Sender<()>,
    },
    CleanOut {
        resp: oneshot::Sender<()>,
    },
    SetVisibleBand {
        band: Band,
        resp: oneshot::Sender<()>,
    },
    UpdateFrequency {
        freq_hz: FreqHz,
        resp: oneshot::Sender<()>,
    },
    Select {
        nav: Navigation,
        resp: oneshot::Sender<Option<Entry>>,
    },
    VisibleEntries {
        resp: oneshot::Sender<Vec<Entry>>,
    },
    Bands {
        resp: oneshot::Sender<Vec<BandSummary>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `bandmap` into a task that serializes every call and runs the
/// periodic clean-out.
pub fn spawn_bandmap(mut bandmap: Bandmap, config: RuntimeConfig) -> BandmapHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<BandmapEvent>(config.event_capacity);
    bandmap.notify(Box::new(BroadcastListener::new(events_tx.clone())));

    tokio::spawn(async move {
        info!(
            bands = bandmap.config().bands.len(),
            cleanout_interval_ms = config.cleanout_interval_ms,
            "bandmap runtime started"
        );
        let mut ticker = (config.cleanout_interval_ms > 0).then(|| {
            let mut ticker = time::interval(Duration::from_millis(config.cleanout_interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            if let Some(ticker) = ticker.as_mut() {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break; };
                        if handle_command(cmd, &mut bandmap) {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        bandmap.clean_out(now_ms());
                    }
                }
            } else {
                let Some(cmd) = cmd_rx.recv().await else { break; };
                if handle_command(cmd, &mut bandmap) {
                    break;
                }
            }
        }

        info!("bandmap runtime stopped");
    });

    BandmapHandle { cmd_tx, events_tx }
}

impl BandmapHandle {
    /// Subscribes to entry and selection events.
    pub fn subscribe(&self) -> broadcast::Receiver<BandmapEvent> {
        self.events_tx.subscribe()
    }

    /// Feeds a spot, stamped with the current time.
    pub async fn add_spot(&self, spot: Spot) -> Result<(), RuntimeError> {
        self.request(|resp| Command::AddSpot { spot, resp }).await
    }

    /// Runs a clean-out sweep now.
    pub async fn clean_out(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::CleanOut { resp }).await
    }

    /// Switches the visible band.
    pub async fn set_visible_band(&self, band: Band) -> Result<(), RuntimeError> {
        self.request(|resp| Command::SetVisibleBand { band, resp }).await
    }

    /// Reports the radio's frequency.
    pub async fn update_frequency(&self, freq_hz: FreqHz) -> Result<(), RuntimeError> {
        self.request(|resp| Command::UpdateFrequency { freq_hz, resp })
            .await
    }

    /// Moves the selection.
    pub async fn select(&self, nav: Navigation) -> Result<Option<Entry>, RuntimeError> {
        self.request(|resp| Command::Select { nav, resp }).await
    }

    /// Entries of the visible band.
    pub async fn visible_entries(&self) -> Result<Vec<Entry>, RuntimeError> {
        self.request(|resp| Command::VisibleEntries { resp }).await
    }

    /// Band summaries.
    pub async fn bands(&self) -> Result<Vec<BandSummary>, RuntimeError> {
        self.request(|resp| Command::Bands { resp }).await
    }

    /// Stops the task.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(cmd: Command, bandmap: &mut Bandmap) -> bool {
    match cmd {
        Command::AddSpot { spot, resp } => {
            bandmap.add_spot(spot, now_ms());
            let _ = resp.send(());
        }
        Command::CleanOut { resp } => {
            bandmap.clean_out(now_ms());
            let _ = resp.send(());
        }
        Command::SetVisibleBand { band, resp } => {
            bandmap.set_visible_band(band);
            let _ = resp.send(());
        }
        Command::UpdateFrequency { freq_hz, resp } => {
            bandmap.update_frequency(freq_hz);
            let _ = resp.send(());
        }
        Command::Select { nav, resp } => {
            let selected = match nav {
                Navigation::Entry(id) => bandmap.select_entry(id),
                Navigation::Callsign(call) => bandmap.select_by_callsign(&call),
                Navigation::HighestValue => bandmap.select_highest_value(),
                Navigation::Nearest(freq_hz) => bandmap.select_nearest(freq_hz),
                Navigation::NextUp(freq_hz) => bandmap.select_next_up(freq_hz),
                Navigation::NextDown(freq_hz) => bandmap.select_next_down(freq_hz),
            };
            let _ = resp.send(selected);
        }
        Command::VisibleEntries { resp } => {
            let _ = resp.send(bandmap.visible_entries());
        }
        Command::Bands { resp } => {
            let _ = resp.send(bandmap.bands());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
