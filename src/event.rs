use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Metrics tick, fires at the configured poll interval.
    Tick,
    /// Fixed 1 s tick driving the elapsed-recording display.
    Second,
    Resize,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tick_rate: watch::Sender<Duration>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let (rate_tx, mut rate_rx) = watch::channel(tick_rate);

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);
            let mut second_interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    _ = second_interval.tick() => {
                        if tx.send(Event::Second).is_err() {
                            break;
                        }
                    }
                    changed = rate_rx.changed() => {
                        match changed {
                            // A fresh interval ticks once immediately, so a
                            // rate change also delivers an immediate sample.
                            Ok(()) => {
                                let rate = *rate_rx.borrow_and_update();
                                tick_interval = tokio::time::interval(rate);
                            }
                            Err(_) => break,
                        }
                    }
                }
            }
        });

        Self {
            rx,
            tick_rate: rate_tx,
            _task: task,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Retune the metrics tick without restarting the event task.
    pub fn set_tick_rate(&self, rate: Duration) {
        let _ = self.tick_rate.send(rate);
    }
}
