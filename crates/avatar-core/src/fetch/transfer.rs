//! Blocking curl GET that hands its head and body chunks to the async side.

use std::cell::{Cell, RefCell};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use super::head::{HeadCollector, ResponseHead};

pub(super) struct TransferSpec {
    pub url: String,
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

/// Performs one GET without following redirects. Must run on a blocking thread.
///
/// The head is sent at the first body byte, or after a clean finish when there
/// is no body, so a proxy's CONNECT answer is never mistaken for the response.
/// Body chunks are only forwarded for 2xx responses with a body; anything else
/// aborts the transfer at the first body byte, as does a dropped receiver.
pub(super) fn run(
    spec: TransferSpec,
    head_tx: oneshot::Sender<ResponseHead>,
    body_tx: mpsc::Sender<Vec<u8>>,
) -> Result<(), curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(&spec.url)?;
    easy.get(true)?;
    easy.follow_location(false)?;
    if let Some(t) = spec.connect_timeout {
        easy.connect_timeout(t)?;
    }
    if let Some(t) = spec.timeout {
        easy.timeout(t)?;
    }

    let collector = RefCell::new(HeadCollector::default());
    let head_tx = RefCell::new(Some(head_tx));
    let forwarding = Cell::new(false);

    let result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            collector.borrow_mut().push_line(line);
            true
        })?;
        transfer.write_function(|data| {
            if let Some(tx) = head_tx.borrow_mut().take() {
                match collector.borrow_mut().take_final() {
                    Some(head) => {
                        forwarding.set(head.is_success() && !head.has_no_body());
                        let _ = tx.send(head);
                    }
                    None => return Ok(0),
                }
            }
            if !forwarding.get() {
                return Ok(0);
            }
            match body_tx.blocking_send(data.to_vec()) {
                Ok(()) => Ok(data.len()),
                Err(_) => Ok(0),
            }
        })?;
        transfer.perform()
    };

    if result.is_ok() {
        if let (Some(tx), Some(head)) = (
            head_tx.into_inner(),
            collector.into_inner().take_final(),
        ) {
            let _ = tx.send(head);
        }
    }
    result
}
