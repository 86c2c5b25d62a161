//! Forward-only state tracking for a single loader run.

use serde::Serialize;
use tracing::debug;

/// Phase of the asset loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderState {
  /// Nothing has happened yet.
  Unstarted,
  /// The deployment mode is known.
  ModeResolved,
  /// The supplementary manifest was requested (local mode only).
  LocalMapFetched,
  /// Every stylesheet link has been appended.
  AssetsInjected,
  /// The application may render.
  Ready,
}

/// Ordered record of the states a loader passed through.
#[derive(Debug, Clone)]
pub(crate) struct StateTrail {
  visited: Vec<LoaderState>,
}

impl StateTrail {
  pub(crate) fn new() -> Self {
    Self {
      visited: vec![LoaderState::Unstarted],
    }
  }

  pub(crate) fn current(&self) -> LoaderState {
    self.visited.last().copied().unwrap_or(LoaderState::Unstarted)
  }

  /// Move to `next`; states are never revisited.
  pub(crate) fn advance(&mut self, next: LoaderState) {
    let current = self.current();
    debug_assert!(next > current, "loader cannot move from {current:?} to {next:?}");
    debug!(from = ?current, to = ?next, "asset loader state change");
    self.visited.push(next);
  }

  pub(crate) fn into_states(self) -> Vec<LoaderState> {
    self.visited
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn records_states_in_order() {
    let mut trail = StateTrail::new();
    trail.advance(LoaderState::ModeResolved);
    trail.advance(LoaderState::AssetsInjected);
    trail.advance(LoaderState::Ready);

    assert_eq!(trail.current(), LoaderState::Ready);
    assert_eq!(trail.into_states(), vec![
      LoaderState::Unstarted,
      LoaderState::ModeResolved,
      LoaderState::AssetsInjected,
      LoaderState::Ready,
    ]);
  }

  #[test]
  #[should_panic(expected = "loader cannot move")]
  fn refuses_to_revisit_states() {
    let mut trail = StateTrail::new();
    trail.advance(LoaderState::Ready);
    trail.advance(LoaderState::ModeResolved);
  }
}
