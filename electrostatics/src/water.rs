//! Ruler and water experiment
//!
//! Rubbing the ruler with wool takes a moment; once charged, dropping it beside
//! the water column bends the stream towards it.

use glam::Vec2;

use crate::constants::{CHARGING_DELAY, RULER_ANCHOR, RULER_SIZE, STREAM_TOP};
use crate::controller::{Action, ChargeState, Command, Transition, Widget};
use crate::drag::{DragSurface, Rect};
use crate::effect::{deflection, DeflectionParams, TargetPoint};
use crate::timer::TimerId;

#[derive(Debug, Clone, PartialEq)]
pub struct WaterStream {
    pub drag: DragSurface,
    pub charge: ChargeState,
    /// Top of the water column, marked affected while it bends
    pub stream: TargetPoint,
    pub curvature: f32,
    pub params: DeflectionParams,
    timer_seq: u64,
}

impl WaterStream {
    pub fn new(bounds: Option<Rect>) -> Self {
        let params = DeflectionParams::default();
        Self {
            drag: DragSurface::new(Vec2::from(RULER_ANCHOR), Vec2::from(RULER_SIZE), bounds),
            charge: ChargeState::Uncharged,
            stream: TargetPoint::new(0, Vec2::new(params.stream_x, STREAM_TOP)),
            curvature: 0.0,
            params,
            timer_seq: 0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Seconds spent rubbing so far, while charging
    pub fn rubbing_elapsed(&self) -> Option<f32> {
        match self.charge {
            ChargeState::Charging { elapsed, .. } => Some(elapsed),
            _ => None,
        }
    }

    fn recompute(&mut self) {
        if !self.charge.is_charged() || self.drag.is_dragging() {
            return;
        }
        self.curvature = deflection(self.drag.center().x, &self.params);
        self.stream.affected = self.curvature != 0.0;
        log::debug!("ruler at x={:.1}: curvature {:.2}", self.drag.center().x, self.curvature);
    }
}

impl Widget for WaterStream {
    const NAME: &'static str = "water";

    fn update(&self, action: &Action) -> Transition<Self> {
        let mut next = self.clone();
        let mut commands = Vec::new();

        match *action {
            Action::DragStart { pointer } => {
                if next.charge.is_charging() {
                    log::trace!("ruler is being rubbed, drag refused");
                } else {
                    next.drag.begin(pointer);
                }
            }
            Action::DragMove { pointer } => {
                if !next.charge.is_charging() {
                    next.drag.drag_to(pointer);
                }
            }
            Action::DragEnd => {
                if next.drag.is_dragging() {
                    next.drag.end();
                    next.recompute();
                }
            }
            Action::Charge => {
                if next.charge.can_charge() {
                    // A held ruler is dropped where it is
                    if next.drag.is_dragging() {
                        next.drag.end();
                    }
                    next.timer_seq += 1;
                    let timer = TimerId(next.timer_seq);
                    next.charge = ChargeState::Charging { timer, elapsed: 0.0 };
                    commands.push(Command::ScheduleTimer {
                        id: timer,
                        delay: CHARGING_DELAY,
                    });
                }
            }
            Action::TimerFired(id) => {
                if next.charge.pending_timer() == Some(id) {
                    next.charge = ChargeState::Charged;
                    next.recompute();
                } else {
                    log::debug!("ignoring stale timer {id:?}");
                }
            }
            Action::FrameTick { dt } => {
                if let ChargeState::Charging { timer, elapsed } = next.charge {
                    next.charge = ChargeState::Charging {
                        timer,
                        elapsed: (elapsed + dt.max(0.0)).min(CHARGING_DELAY),
                    };
                }
            }
            Action::Reset => {
                if let Some(timer) = next.charge.pending_timer() {
                    commands.push(Command::CancelTimer(timer));
                }
                next.drag.reset();
                next.charge = ChargeState::Uncharged;
                next.curvature = 0.0;
                next.stream.affected = false;
            }
        }

        Transition::with(next, commands)
    }

    fn charge(&self) -> ChargeState {
        self.charge
    }
}
