//! Finite state machine
//!
//! A registry of named state factories with a single active state. States
//! are built fresh on every activation, receive `enter`/`exit` hooks, and
//! request transitions by returning a state name from `update`.
//!
//! Shared resources are not owned by the machine or its states; the caller
//! passes a context into every call.

use std::collections::HashMap;

use crate::error::FsmError;

/// Behaviour of one state
pub trait State {
    /// Shared resources the state reads or drives (borrowed per call)
    type Context;
    /// Per-frame input handed to `update`
    type Input;

    /// Registered name of this state
    fn name(&self) -> &'static str;

    /// Called once when the state becomes active
    ///
    /// `previous` is the name of the state that was active before, or `None`
    /// on the first activation.
    fn enter(&mut self, previous: Option<&str>, ctx: &mut Self::Context);

    /// Called once before the next state's `enter`
    fn exit(&mut self, _ctx: &mut Self::Context) {}

    /// Advance the state; returning a name requests a transition
    fn update(&mut self, dt: f32, input: &Self::Input, ctx: &mut Self::Context) -> Option<&'static str>;
}

type Factory<S> = Box<dyn Fn() -> S>;

struct Active<S> {
    name: String,
    state: S,
    elapsed: f32,
}

/// Named states with one active at a time
pub struct StateMachine<S: State> {
    factories: HashMap<String, Factory<S>>,
    current: Option<Active<S>>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    /// Create an empty machine with no active state
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            current: None,
        }
    }

    /// Register a state under `name`
    ///
    /// The factory runs on every activation, so state-local data (timers)
    /// starts fresh each time.
    pub fn add_state<F>(&mut self, name: &str, factory: F) -> Result<(), FsmError>
    where
        F: Fn() -> S + 'static,
    {
        if self.factories.contains_key(name) {
            return Err(FsmError::DuplicateState(name.to_string()));
        }
        self.factories.insert(name.to_string(), Box::new(factory));
        Ok(())
    }

    /// Make `name` the active state
    ///
    /// Re-activating the current state does nothing. Otherwise the current
    /// state's `exit` runs before the new state's `enter`.
    pub fn set_state(&mut self, name: &str, ctx: &mut S::Context) -> Result<(), FsmError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| FsmError::UnknownState(name.to_string()))?;

        if self.current_name() == Some(name) {
            return Ok(());
        }

        let previous = match self.current.take() {
            Some(mut active) => {
                active.state.exit(ctx);
                Some(active.name)
            }
            None => None,
        };

        let mut state = factory();
        state.enter(previous.as_deref(), ctx);

        log::debug!(
            "State transition: {} -> {}",
            previous.as_deref().unwrap_or("<none>"),
            name
        );

        self.current = Some(Active {
            name: name.to_string(),
            state,
            elapsed: 0.0,
        });
        Ok(())
    }

    /// Update the active state and apply any transition it requests
    ///
    /// Does nothing before the first `set_state`.
    pub fn update(&mut self, dt: f32, input: &S::Input, ctx: &mut S::Context) -> Result<(), FsmError> {
        let Some(active) = self.current.as_mut() else {
            return Ok(());
        };

        active.elapsed += dt;
        match active.state.update(dt, input, ctx) {
            Some(next) => self.set_state(next, ctx),
            None => Ok(()),
        }
    }

    /// Name of the active state
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.name.as_str())
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref().map(|a| &a.state)
    }

    /// Seconds of `update` time spent in the active state
    pub fn time_in_state(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |a| a.elapsed)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn state_count(&self) -> usize {
        self.factories.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
