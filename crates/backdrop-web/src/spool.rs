use crate::dom::{js_err, window, Listener};
use backdrop_core::constants::SPOOL_EVENT;
use web_sys as web;

/// Dispatch the spool event on `window`; every mounted warp-family layer
/// reacts.
pub fn trigger() -> anyhow::Result<()> {
    let event = web::CustomEvent::new(SPOOL_EVENT).map_err(js_err)?;
    window()?.dispatch_event(&event).map_err(js_err)?;
    Ok(())
}

pub fn listen(on_spool: impl FnMut() + 'static) -> anyhow::Result<Listener> {
    let mut on_spool = on_spool;
    Listener::new(window()?.as_ref(), SPOOL_EVENT, move |_| on_spool())
}
