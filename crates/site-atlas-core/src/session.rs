//! Load-state machine around the single dataset fetch.
//!
//! ```text
//! Loading ──ok──▶ Ready(Controller)
//!    │
//!    └──err──▶ Failed(reason)      (permanent, no retry)
//! ```
//!
//! The fetch itself runs outside the session (see
//! [`fetch_canonical`](crate::source::fetch_canonical)) so a caller that
//! keeps the session behind a lock never holds the lock across an await;
//! [`Session::complete`] then records the result. [`Session::load`] does
//! both steps for single-owner callers.

use crate::controller::Controller;
use crate::error::{LoadError, SessionError};
use crate::models::Dataset;
use crate::source::{fetch_canonical, DatasetSource};

pub enum LoadState {
    Loading,
    Ready(Box<Controller>),
    Failed(String),
}

pub struct Session {
    state: LoadState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// `"loading"`, `"ready"` or `"failed"`.
    pub fn status(&self) -> &'static str {
        match self.state {
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        }
    }

    /// Record the outcome of the one and only fetch.
    ///
    /// Refused once the session has left `Loading`.
    pub fn complete(&mut self, outcome: Result<Dataset, LoadError>) -> Result<(), SessionError> {
        if !matches!(self.state, LoadState::Loading) {
            return Err(SessionError::AlreadySettled);
        }
        self.state = match outcome {
            Ok(dataset) => LoadState::Ready(Box::new(Controller::new(dataset))),
            Err(e) => LoadState::Failed(e.to_string()),
        };
        Ok(())
    }

    /// Fetch, sanitize and record the result in one step.
    ///
    /// A load failure leaves the session in `Failed` and is also returned
    /// as [`SessionError::NoData`].
    pub async fn load<S>(&mut self, source: &S) -> Result<&mut Controller, SessionError>
    where
        S: DatasetSource + ?Sized,
    {
        if !matches!(self.state, LoadState::Loading) {
            return Err(SessionError::AlreadySettled);
        }
        let outcome = fetch_canonical(source).await;
        self.complete(outcome)?;
        self.controller_mut()
    }

    pub fn controller(&self) -> Result<&Controller, SessionError> {
        match &self.state {
            LoadState::Loading => Err(SessionError::Loading),
            LoadState::Ready(c) => Ok(c.as_ref()),
            LoadState::Failed(reason) => Err(SessionError::NoData(reason.clone())),
        }
    }

    pub fn controller_mut(&mut self) -> Result<&mut Controller, SessionError> {
        match &mut self.state {
            LoadState::Loading => Err(SessionError::Loading),
            LoadState::Ready(c) => Ok(c.as_mut()),
            LoadState::Failed(reason) => Err(SessionError::NoData(reason.clone())),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
