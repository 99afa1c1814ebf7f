//! Replaying adapters that serve recorded interactions.

pub mod gpio;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::CassetteError;

pub use gpio::ReplayingGpio;

/// Replayer shared by every adapter handed out during one session.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Outcome of replaying one `Result`-returning call.
#[derive(Debug)]
pub(crate) enum Replayed<T> {
    /// The recorded call succeeded with this value.
    Ok(T),
    /// The recorded call failed with this message.
    Err(String),
}

/// Serve the next recorded result for `port::method`.
///
/// Mirror of `recording::record_result`: `{"ok": v}` decodes into `T`,
/// `{"err": msg}` is handed back as the message.
pub(crate) fn replay_result<T>(
    replayer: &SharedReplayer,
    port: &str,
    method: &str,
) -> Result<Replayed<T>, CassetteError>
where
    T: DeserializeOwned,
{
    let output = {
        let mut replayer = replayer.lock().unwrap_or_else(PoisonError::into_inner);
        replayer.next_interaction(port, method)?.output.clone()
    };
    let malformed = |reason: String| CassetteError::Malformed {
        port: port.to_string(),
        method: method.to_string(),
        reason,
    };

    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Ok(Replayed::Err(msg));
    }
    let value = output.get("ok").ok_or_else(|| malformed("missing `ok` or `err`".into()))?;
    serde_json::from_value(value.clone())
        .map(Replayed::Ok)
        .map_err(|e| malformed(e.to_string()))
}
