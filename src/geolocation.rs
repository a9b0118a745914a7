//! Browser geolocation as a future.

use crate::workout::Coords;
use futures::channel::oneshot;
use js_sys::Function;
use log::{debug, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// The browser has no geolocation API.
    Unsupported,
    /// The request was refused or failed; carries the browser's message.
    Denied(String),
    /// The browser dropped the request without calling back.
    Dropped,
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationError::Unsupported => write!(f, "Geolocation is not supported"),
            GeolocationError::Denied(msg) => write!(f, "Could not get your position: {}", msg),
            GeolocationError::Dropped => write!(f, "Position request was abandoned"),
        }
    }
}

impl std::error::Error for GeolocationError {}

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<Coords, GeolocationError>>>>>;

fn respond(reply: &Reply, result: Result<Coords, GeolocationError>) {
    if let Some(tx) = reply.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

/// Ask the browser for the user's current position.
pub async fn current_position() -> Result<Coords, GeolocationError> {
    let window = web_sys::window().ok_or(GeolocationError::Unsupported)?;
    let geolocation = window
        .navigator()
        .geolocation()
        .map_err(|_| GeolocationError::Unsupported)?;

    let (tx, rx) = oneshot::channel();
    let reply: Reply = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let reply = reply.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |position: JsValue| {
            let position: web_sys::Position = position.unchecked_into();
            let coords = position.coords();
            respond(&reply, Ok(Coords::new(coords.latitude(), coords.longitude())));
        })
    };
    let on_error = {
        let reply = reply.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
            let error: web_sys::PositionError = error.unchecked_into();
            respond(&reply, Err(GeolocationError::Denied(error.message())));
        })
    };

    geolocation
        .get_current_position_with_error_callback(
            on_success.as_ref().unchecked_ref::<Function>(),
            Some(on_error.as_ref().unchecked_ref::<Function>()),
        )
        .map_err(|e| GeolocationError::Denied(format!("{:?}", e)))?;
    debug!("Position requested");

    // Both closures stay alive until one of them has answered.
    let result = rx.await.unwrap_or(Err(GeolocationError::Dropped));
    drop((on_success, on_error));

    if let Err(ref e) = result {
        warn!("{}", e);
    }
    result
}
