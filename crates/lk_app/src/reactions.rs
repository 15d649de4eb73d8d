//! Explicit reaction handlers. Each states its trigger and its effect; the
//! loop after every dispatch fires the first eligible handler until none is
//! left or the pass bound is hit. Load attempts are latched inside the sync
//! engine so a failing backend cannot spin the loop.

use crate::state::AppState;
use crate::sync::{self, Backend};

const MAX_PASSES: usize = 8;

pub fn run<B: Backend>(state: &mut AppState, backend: &B) {
    for _ in 0..MAX_PASSES {
        if !pass(state, backend) {
            return;
        }
    }
    log::debug!("reaction loop stopped at pass bound");
}

fn pass<B: Backend>(state: &mut AppState, backend: &B) -> bool {
    default_selection(state)
        || load_profile(state, backend)
        || load_catalog_index(state, backend)
        || refresh_mirror(state, backend)
}

/// Trigger: lists present and a selection missing.
/// Effect: the default-selection policy; pure.
fn default_selection(state: &mut AppState) -> bool {
    if state.catalog.apply_default_selection() {
        state.sync_view();
        return true;
    }
    false
}

/// Trigger: token present, identity absent, not yet attempted for this
/// token. Effect: profile lookup.
fn load_profile<B: Backend>(state: &mut AppState, backend: &B) -> bool {
    if !state.profile_needed() {
        return false;
    }
    if let Err(err) = sync::fetch_profile(state, backend) {
        state.last_error = Some(err.to_string());
    }
    true
}

/// Trigger: token present, catalog index neither loaded nor attempted.
/// Effect: index read, with a single retry on generic failure. No other
/// operation retries.
fn load_catalog_index<B: Backend>(state: &mut AppState, backend: &B) -> bool {
    if !state.catalog_needed() {
        return false;
    }
    state.note_catalog_attempt();
    let mut result = sync::fetch_catalog_index(state, backend);
    if let Err(err) = &result {
        log::warn!("catalog index read failed, retrying once: {err}");
        result = sync::fetch_catalog_index(state, backend);
    }
    if let Err(err) = result {
        state.last_error = Some(err.to_string());
    }
    true
}

/// Trigger: token present, project+language selected, mirror neither synced
/// nor attempted for that pair. Effect: full mirror read.
fn refresh_mirror<B: Backend>(state: &mut AppState, backend: &B) -> bool {
    if !state.mirror_needed() {
        return false;
    }
    if let Err(err) = sync::refresh_translations(state, backend) {
        state.last_error = Some(err.to_string());
    }
    true
}
