//! Event dispatch for the widgets
//!
//! A widget is an immutable snapshot. Each user or timer event goes through
//! [`Widget::update`], which returns the next snapshot plus the timer commands
//! to carry out. [`Dispatcher`] owns the current snapshot and the timers, so a
//! stale timer can never touch a widget that has since been reset.

use std::fmt::Debug;

use glam::Vec2;

use crate::timer::{TimerId, Timers};

/// Discrete events a widget reacts to. Pointer positions are container-local.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    DragStart { pointer: Vec2 },
    DragMove { pointer: Vec2 },
    DragEnd,
    Charge,
    Reset,
    TimerFired(TimerId),
    FrameTick { dt: f32 },
}

/// Side effects requested by an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ScheduleTimer { id: TimerId, delay: f32 },
    CancelTimer(TimerId),
}

/// Charge of the draggable object
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChargeState {
    #[default]
    Uncharged,
    /// Being rubbed; becomes charged when `timer` fires
    Charging { timer: TimerId, elapsed: f32 },
    Charged,
}

impl ChargeState {
    pub fn is_charged(&self) -> bool {
        matches!(self, ChargeState::Charged)
    }

    pub fn is_charging(&self) -> bool {
        matches!(self, ChargeState::Charging { .. })
    }

    /// The charge button is only offered to an uncharged object
    pub fn can_charge(&self) -> bool {
        matches!(self, ChargeState::Uncharged)
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        match self {
            ChargeState::Charging { timer, .. } => Some(*timer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChargeState::Uncharged => "neutro",
            ChargeState::Charging { .. } => "frotando...",
            ChargeState::Charged => "cargado (-)",
        }
    }
}

/// Result of an update
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<W> {
    pub state: W,
    pub commands: Vec<Command>,
}

impl<W> Transition<W> {
    pub fn to(state: W) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }

    pub fn with(state: W, commands: Vec<Command>) -> Self {
        Self { state, commands }
    }
}

/// An interactive widget driven by [`Action`]s
pub trait Widget: Clone + PartialEq + Debug {
    /// Name used in log lines
    const NAME: &'static str;

    fn update(&self, action: &Action) -> Transition<Self>;

    fn charge(&self) -> ChargeState;
}

/// Serializes every event of one widget
#[derive(Debug)]
pub struct Dispatcher<W: Widget> {
    state: W,
    timers: Timers,
    revision: u64,
}

impl<W: Widget> Dispatcher<W> {
    pub fn new(initial: W) -> Self {
        Self {
            state: initial,
            timers: Timers::new(),
            revision: 0,
        }
    }

    pub fn state(&self) -> &W {
        &self.state
    }

    /// Increases every time the snapshot changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn dispatch(&mut self, action: Action) {
        let Transition { state, commands } = self.state.update(&action);

        for command in commands {
            match command {
                Command::ScheduleTimer { id, delay } => {
                    log::debug!("{}: timer {:?} in {delay}s", W::NAME, id);
                    self.timers.schedule(id, delay);
                }
                Command::CancelTimer(id) => {
                    if self.timers.cancel(id) {
                        log::debug!("{}: timer {:?} cancelled", W::NAME, id);
                    }
                }
            }
        }

        if state != self.state {
            if state.charge() != self.state.charge() && !state.charge().is_charging() {
                log::info!("{}: {}", W::NAME, state.charge().label());
            }
            self.state = state;
            self.revision += 1;
        }

        if let Action::FrameTick { dt } = action {
            for id in self.timers.advance(dt) {
                self.dispatch(Action::TimerFired(id));
            }
        }
    }

    /// Tear down: nothing scheduled may fire afterwards
    pub fn unmount(&mut self) {
        self.timers.clear();
    }
}

impl<W: Widget> Drop for Dispatcher<W> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts ticks and charges through a timer, nothing else
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Probe {
        charge: ChargeState,
        fired: u32,
    }

    impl Widget for Probe {
        const NAME: &'static str = "probe";

        fn update(&self, action: &Action) -> Transition<Self> {
            match action {
                Action::Charge if self.charge.can_charge() => {
                    let timer = TimerId(1);
                    Transition::with(
                        Probe {
                            charge: ChargeState::Charging { timer, elapsed: 0.0 },
                            ..self.clone()
                        },
                        vec![Command::ScheduleTimer { id: timer, delay: 1.0 }],
                    )
                }
                Action::TimerFired(id) if self.charge.pending_timer() == Some(*id) => Transition::to(Probe {
                    charge: ChargeState::Charged,
                    fired: self.fired + 1,
                }),
                Action::Reset => Transition::with(
                    Probe::default(),
                    self.charge.pending_timer().map(Command::CancelTimer).into_iter().collect(),
                ),
                _ => Transition::to(self.clone()),
            }
        }

        fn charge(&self) -> ChargeState {
            self.charge
        }
    }

    #[test]
    fn frame_ticks_fire_timers() {
        let mut dispatcher = Dispatcher::new(Probe::default());
        dispatcher.dispatch(Action::Charge);
        assert!(dispatcher.state().charge.is_charging());
        assert_eq!(dispatcher.timers().len(), 1);

        dispatcher.dispatch(Action::FrameTick { dt: 0.6 });
        assert!(dispatcher.state().charge.is_charging());

        dispatcher.dispatch(Action::FrameTick { dt: 0.6 });
        assert!(dispatcher.state().charge.is_charged());
        assert_eq!(dispatcher.state().fired, 1);
    }

    #[test]
    fn reset_cancels_pending_timer() {
        let mut dispatcher = Dispatcher::new(Probe::default());
        dispatcher.dispatch(Action::Charge);
        dispatcher.dispatch(Action::Reset);
        assert!(dispatcher.timers().is_empty());

        dispatcher.dispatch(Action::FrameTick { dt: 5.0 });
        assert_eq!(dispatcher.state(), &Probe::default());
    }

    #[test]
    fn revision_only_moves_on_change() {
        let mut dispatcher = Dispatcher::new(Probe::default());
        dispatcher.dispatch(Action::DragEnd);
        assert_eq!(dispatcher.revision(), 0);
        dispatcher.dispatch(Action::Charge);
        assert_eq!(dispatcher.revision(), 1);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut dispatcher = Dispatcher::new(Probe::default());
        dispatcher.dispatch(Action::TimerFired(TimerId(1)));
        assert_eq!(dispatcher.state(), &Probe::default());
    }

    #[test]
    fn unmount_drops_timers() {
        let mut dispatcher = Dispatcher::new(Probe::default());
        dispatcher.dispatch(Action::Charge);
        dispatcher.unmount();
        dispatcher.dispatch(Action::FrameTick { dt: 2.0 });
        assert!(dispatcher.state().charge.is_charging());
    }
}
