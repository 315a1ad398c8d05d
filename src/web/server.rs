//! HTTP API + WebSocket status push (ESP-IDF only).
//!
//! Routes mirror the shipped UI contract:
//!
//! | route                      | method | action                         |
//! |----------------------------|--------|--------------------------------|
//! | `/api/state`               | GET    | cached status snapshot         |
//! | `/api/process/start`       | POST   | enqueue `StartProcess`         |
//! | `/api/process/cancel`      | POST   | enqueue `CancelProcess`        |
//! | `/api/process/transition`  | POST   | enqueue `TransitionProcess`    |
//! | `/api/profile/custom`      | POST   | enqueue `SetCustomProfile`     |
//! | `/api/reset`               | POST   | enqueue `ResetState`           |
//! | `/ws`                      | WS     | periodic status broadcast      |
//!
//! Handlers run on IDF server tasks and only touch the mailbox and the
//! status cache; every mutation happens on the control thread.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use esp_idf_svc::http::server::{ws::EspHttpWsDetachedSender, Configuration, EspHttpServer, Method};
use esp_idf_svc::io::{Read, Write};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::ws::FrameType;
use log::{info, warn};

use crate::app::commands::AppCommand;
use crate::error::{CommsError, Error};

use super::payload::{CommandResponse, CustomProfileRequest, StartRequest};
use super::{cached_status, submit_command};

/// Concurrent WebSocket clients (one per open UI tab).
const MAX_WS_CLIENTS: usize = 4;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 256;

static WS_SENDERS: BlockingMutex<
    CriticalSectionRawMutex,
    RefCell<heapless::Vec<EspHttpWsDetachedSender, MAX_WS_CLIENTS>>,
> = BlockingMutex::new(RefCell::new(heapless::Vec::new()));

pub struct WebServer {
    // Dropping the server unregisters every handler.
    _server: EspHttpServer<'static>,
}

impl WebServer {
    /// Start the server and register all routes.
    pub fn start(port: u16) -> Result<Self, Error> {
        let config = Configuration {
            http_port: port,
            ..Configuration::default()
        };
        let mut server =
            EspHttpServer::new(&config).map_err(|_| Error::Comms(CommsError::HttpServerFailed))?;

        server
            .fn_handler("/api/state", Method::Get, |req| {
                match cached_status() {
                    Some(report) => {
                        let json = super::payload::status_json(&report);
                        let mut resp = req.into_response(
                            200,
                            Some("OK"),
                            &[("Content-Type", "application/json")],
                        )?;
                        resp.write_all(json.as_bytes())?;
                    }
                    None => {
                        // First tick has not run yet.
                        req.into_status_response(503)?;
                    }
                }
                Ok::<(), EspError>(())
            })
            .map_err(|_| Error::Comms(CommsError::HttpServerFailed))?;

        Self::command_route(&mut server, "/api/process/start", |body| {
            let req: StartRequest =
                serde_json::from_slice(body).map_err(|_| "bad_request")?;
            req.into_command()
        })?;

        Self::command_route(&mut server, "/api/process/cancel", |_| {
            Ok(AppCommand::CancelProcess)
        })?;

        Self::command_route(&mut server, "/api/process/transition", |_| {
            Ok(AppCommand::TransitionProcess)
        })?;

        Self::command_route(&mut server, "/api/profile/custom", |body| {
            let req: CustomProfileRequest =
                serde_json::from_slice(body).map_err(|_| "bad_request")?;
            Ok(req.into_command())
        })?;

        Self::command_route(&mut server, "/api/reset", |_| Ok(AppCommand::ResetState))?;

        server
            .ws_handler("/ws", |conn| {
                if conn.is_new() {
                    let sender = conn.create_detached_sender()?;
                    WS_SENDERS.lock(|cell| {
                        if cell.borrow_mut().push(sender).is_err() {
                            warn!("ws: client limit reached, dropping broadcast slot");
                        }
                    });
                    info!("ws: client connected");
                } else if conn.is_closed() {
                    info!("ws: client disconnected");
                }
                // Inbound frames are ignored; the feed is push-only.
                Ok::<(), EspError>(())
            })
            .map_err(|_| Error::Comms(CommsError::HttpServerFailed))?;

        info!("web server listening on port {port}");
        Ok(Self { _server: server })
    }

    /// Register one command-enqueuing POST route.
    fn command_route(
        server: &mut EspHttpServer<'static>,
        uri: &str,
        parse: fn(&[u8]) -> Result<AppCommand, &'static str>,
    ) -> Result<(), Error> {
        server
            .fn_handler(uri, Method::Post, move |mut req| {
                let mut body = [0u8; MAX_BODY_BYTES];
                let mut len = 0;
                loop {
                    let n = req.read(&mut body[len..])?;
                    if n == 0 {
                        break;
                    }
                    len += n;
                    if len == body.len() {
                        break;
                    }
                }

                let response = match parse(&body[..len]) {
                    Ok(cmd) => {
                        if submit_command(cmd) {
                            CommandResponse::accepted()
                        } else {
                            CommandResponse::rejected("busy")
                        }
                    }
                    Err(err) => CommandResponse::rejected(err),
                };

                let status = if response.ok { 200 } else { 400 };
                let mut resp = req.into_response(
                    status,
                    None,
                    &[("Content-Type", "application/json")],
                )?;
                resp.write_all(response.to_json().as_bytes())?;
                Ok::<(), EspError>(())
            })
            .map(|_| ())
            .map_err(|_| Error::Comms(CommsError::HttpServerFailed))
    }

    /// Broadcast a status JSON frame to every connected client, pruning
    /// sessions whose send fails (closed tabs).
    pub fn broadcast_status(&mut self, json: &str) {
        WS_SENDERS.lock(|cell| {
            let mut senders = cell.borrow_mut();
            let mut i = 0;
            while i < senders.len() {
                let alive = senders[i]
                    .send(FrameType::Text(false), json.as_bytes())
                    .is_ok();
                if alive {
                    i += 1;
                } else {
                    let _ = senders.swap_remove(i);
                }
            }
        });
    }
}
