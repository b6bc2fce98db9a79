//! Event loop driving a [`Session`]
//!
//! Input, position results and place responses all arrive on one channel and
//! are applied in arrival order by a single task. Lookups run as spawned
//! tasks; nothing is debounced or cancelled. A task that panics still reports
//! back as a failure, so the loop always drains.

use crate::position::{PositionError, PositionSource};
use crate::state::{LookupRequest, LookupTicket, Session};
use chrono::Utc;
use geolocator_geo::{Field, GeoPoint};
use geolocator_geocode::{GeocodeError, GeocodeResult, PlaceResolver, PlaceResponse};
use geolocator_telemetry::metrics;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

enum Message {
    Manual { latitude: String, longitude: String },
    ManualField { field: Field, text: String },
    Position(Result<GeoPoint, PositionError>),
    Place {
        ticket: LookupTicket,
        result: GeocodeResult<PlaceResponse>,
    },
    Close,
}

/// What a handled message changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Update {
    /// Position acquired and distances computed
    Located,
    /// Position source failed; the session stays loading
    PositionFailed,
    /// Manual input changed
    Input {
        /// Lookup issued for the new input, if any
        ticket: Option<LookupTicket>,
    },
    /// A place response arrived
    Place {
        /// Lookup the response belongs to
        ticket: LookupTicket,
        /// Whether it replaced the displayed place
        applied: bool,
    },
    /// A lookup failed; the displayed place is unchanged
    LookupFailed {
        /// Lookup that failed
        ticket: LookupTicket,
    },
}

/// Sends input to a running controller
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl SessionHandle {
    /// Replace both manual fields. Returns `false` once the loop has exited.
    pub fn set_manual(&self, latitude: impl Into<String>, longitude: impl Into<String>) -> bool {
        self.tx
            .send(Message::Manual {
                latitude: latitude.into(),
                longitude: longitude.into(),
            })
            .is_ok()
    }

    /// Replace one manual field
    pub fn set_field(&self, field: Field, text: impl Into<String>) -> bool {
        self.tx
            .send(Message::ManualField {
                field,
                text: text.into(),
            })
            .is_ok()
    }

    /// Stop accepting input; the loop exits once pending work completes
    pub fn close(&self) {
        let _ = self.tx.send(Message::Close);
    }
}

/// Owns a session and applies events to it
pub struct SessionController<R: PlaceResolver + ?Sized + 'static> {
    session: Session,
    resolver: Arc<R>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
    closing: bool,
}

impl<R: PlaceResolver + ?Sized + 'static> SessionController<R> {
    /// Controller for `session` resolving places through `resolver`
    pub fn new(session: Session, resolver: Arc<R>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            resolver,
            tx,
            rx,
            in_flight: 0,
            closing: false,
        }
    }

    /// Handle for feeding input
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Current session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Request the position from `source`, once
    pub fn locate(&mut self, source: Arc<dyn PositionSource>) {
        let tx = self.tx.clone();
        self.in_flight += 1;
        debug!(source = source.name(), "Requesting position");

        let task = tokio::spawn(async move { source.current_position().await });
        tokio::spawn(async move {
            let result = task.await.unwrap_or_else(|e| {
                Err(PositionError::Unavailable(format!("position task failed: {e}")))
            });
            let _ = tx.send(Message::Position(result));
        });
    }

    /// Process events until closed and idle, calling `observer` after each
    /// change. Returns the final session.
    pub async fn run<F>(mut self, mut observer: F) -> Session
    where
        F: FnMut(&Session, &Update),
    {
        while !(self.closing && self.in_flight == 0) {
            let Some(message) = self.rx.recv().await else {
                break;
            };
            if let Some(update) = self.apply(message) {
                observer(&self.session, &update);
            }
        }
        self.session
    }

    fn apply(&mut self, message: Message) -> Option<Update> {
        match message {
            Message::Manual {
                latitude,
                longitude,
            } => {
                let request = self.session.set_manual(latitude, longitude);
                Some(self.after_input(request))
            }
            Message::ManualField { field, text } => {
                let request = self.session.set_manual_field(field, text);
                Some(self.after_input(request))
            }
            Message::Position(result) => {
                self.in_flight -= 1;
                Some(self.after_position(result))
            }
            Message::Place { ticket, result } => {
                self.in_flight -= 1;
                Some(self.after_place(ticket, result))
            }
            Message::Close => {
                self.closing = true;
                None
            }
        }
    }

    fn after_input(&mut self, request: Option<LookupRequest>) -> Update {
        let ticket = request.map(|request| {
            let ticket = request.ticket;
            self.issue(request);
            ticket
        });
        Update::Input { ticket }
    }

    fn after_position(&mut self, result: Result<GeoPoint, PositionError>) -> Update {
        match result {
            Ok(point) => {
                if self.session.position_acquired(point, Utc::now()) {
                    info!(%point, "Position acquired");
                }
                Update::Located
            }
            Err(err) => {
                metrics().increment("session.position_failures");
                warn!(error = %err, "Position unavailable");
                Update::PositionFailed
            }
        }
    }

    fn after_place(
        &mut self,
        ticket: LookupTicket,
        result: GeocodeResult<PlaceResponse>,
    ) -> Update {
        match result {
            Ok(response) => {
                let applied = self.session.apply_place(ticket, &response);
                if !applied {
                    metrics().increment("session.stale_responses");
                    debug!(%ticket, "Discarded stale place response");
                }
                Update::Place { ticket, applied }
            }
            Err(err) => {
                metrics().increment("session.lookup_failures");
                warn!(%ticket, error = %err, "Place lookup failed");
                Update::LookupFailed { ticket }
            }
        }
    }

    fn issue(&mut self, request: LookupRequest) {
        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        self.in_flight += 1;
        metrics().increment("session.lookups");
        debug!(ticket = %request.ticket, query = %request.query, "Issuing place lookup");

        let ticket = request.ticket;
        let task = tokio::spawn(async move { resolver.resolve(&request.query).await });
        tokio::spawn(async move {
            let result = task
                .await
                .unwrap_or_else(|e| Err(GeocodeError::Interrupted(e.to_string())));
            let _ = tx.send(Message::Place { ticket, result });
        });
    }
}
