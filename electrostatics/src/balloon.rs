//! Balloon and paper experiment
//!
//! Rubbing the balloon on hair charges it at once. A charged balloon dropped near
//! the paper pieces pulls the ones within reach a little closer on every drop.

use glam::Vec2;

use crate::constants::{BALLOON_ANCHOR, BALLOON_SIZE, PAPER_HOME};
use crate::controller::{Action, ChargeState, Transition, Widget};
use crate::drag::{DragSurface, Rect};
use crate::effect::{attract_all, AttractionParams, TargetPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub drag: DragSurface,
    pub charge: ChargeState,
    pub pieces: Vec<TargetPoint>,
    pub params: AttractionParams,
}

impl Balloon {
    pub fn new(bounds: Option<Rect>) -> Self {
        Self {
            drag: DragSurface::new(Vec2::from(BALLOON_ANCHOR), Vec2::from(BALLOON_SIZE), bounds),
            charge: ChargeState::Uncharged,
            pieces: Self::home_pieces(),
            params: AttractionParams::default(),
        }
    }

    /// The paper pieces where they lie before any attraction
    pub fn home_pieces() -> Vec<TargetPoint> {
        PAPER_HOME
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TargetPoint::new(i as u32 + 1, Vec2::new(x, y)))
            .collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn affected_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.affected).count()
    }

    /// Pull the pieces, if the balloon is charged and resting
    fn recompute(&mut self) {
        if !self.charge.is_charged() || self.drag.is_dragging() {
            return;
        }
        self.pieces = attract_all(&self.pieces, self.drag.center(), &self.params);
        log::debug!(
            "balloon at {}: {} piece(s) attracted",
            self.drag.center(),
            self.affected_count()
        );
    }
}

impl Widget for Balloon {
    const NAME: &'static str = "balloon";

    fn update(&self, action: &Action) -> Transition<Self> {
        let mut next = self.clone();

        match *action {
            Action::DragStart { pointer } => {
                next.drag.begin(pointer);
            }
            Action::DragMove { pointer } => next.drag.drag_to(pointer),
            Action::DragEnd => {
                if next.drag.is_dragging() {
                    next.drag.end();
                    next.recompute();
                }
            }
            Action::Charge => {
                if next.charge.can_charge() {
                    next.charge = ChargeState::Charged;
                    next.recompute();
                }
            }
            Action::Reset => {
                next.drag.reset();
                next.charge = ChargeState::Uncharged;
                next.pieces = Self::home_pieces();
            }
            Action::TimerFired(_) | Action::FrameTick { .. } => {}
        }

        Transition::to(next)
    }

    fn charge(&self) -> ChargeState {
        self.charge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Dispatcher;

    /// A container tall enough to park the balloon on the paper
    fn tall_container() -> Option<Rect> {
        Some(Rect::from_size(600.0, 700.0))
    }

    fn move_center_to(dispatcher: &mut Dispatcher<Balloon>, target: Vec2) {
        let grab = dispatcher.state().drag.live_rect().center();
        let delta = target - dispatcher.state().drag.center();
        dispatcher.dispatch(Action::DragStart { pointer: grab });
        dispatcher.dispatch(Action::DragMove { pointer: grab + delta });
        dispatcher.dispatch(Action::DragEnd);
    }

    #[test]
    fn uncharged_balloon_attracts_nothing() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        move_center_to(&mut dispatcher, Vec2::new(110.0, 345.0));
        assert_eq!(dispatcher.state().pieces, Balloon::home_pieces());
    }

    #[test]
    fn distant_balloon_leaves_paper_alone() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        move_center_to(&mut dispatcher, Vec2::new(220.0, 120.0));
        dispatcher.dispatch(Action::Charge);

        let first = dispatcher.state().pieces[0];
        assert!(!first.affected);
        assert_eq!(first.position, Vec2::new(100.0, 350.0));
    }

    #[test]
    fn close_balloon_pulls_the_paper() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        dispatcher.dispatch(Action::Charge);
        move_center_to(&mut dispatcher, Vec2::new(110.0, 345.0));

        let center = dispatcher.state().drag.center();
        assert!((center - Vec2::new(110.0, 345.0)).length() < 1e-3);

        let piece = dispatcher.state().pieces[0];
        let home = Vec2::new(100.0, 350.0);
        let delta = center - home;
        let strength = (1.0 - delta.length() / 150.0) * 2.0;
        assert!(piece.affected);
        assert!((piece.position - (home + delta * 0.05 * strength)).length() < 1e-3);
    }

    #[test]
    fn every_drop_pulls_again() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        dispatcher.dispatch(Action::Charge);
        move_center_to(&mut dispatcher, Vec2::new(150.0, 300.0));
        let after_one = dispatcher.state().pieces[0].position;
        move_center_to(&mut dispatcher, Vec2::new(150.0, 300.0));
        let after_two = dispatcher.state().pieces[0].position;

        let target = Vec2::new(150.0, 300.0);
        assert!(after_two.distance(target) < after_one.distance(target));
    }

    #[test]
    fn dragging_suspends_attraction() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        dispatcher.dispatch(Action::Charge);
        let before = dispatcher.state().pieces.clone();

        let grab = dispatcher.state().drag.live_rect().center();
        dispatcher.dispatch(Action::DragStart { pointer: grab });
        for step in 1..=10 {
            let pointer = grab + Vec2::new(-15.0, 16.5) * step as f32;
            dispatcher.dispatch(Action::DragMove { pointer });
            dispatcher.dispatch(Action::FrameTick { dt: 0.016 });
            assert_eq!(dispatcher.state().pieces, before);
        }

        dispatcher.dispatch(Action::DragEnd);
        assert_ne!(dispatcher.state().pieces, before);
    }

    #[test]
    fn charge_only_once() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        dispatcher.dispatch(Action::Charge);
        let revision = dispatcher.revision();
        dispatcher.dispatch(Action::Charge);
        assert_eq!(dispatcher.revision(), revision);
    }

    #[test]
    fn reset_restores_everything() {
        let mut dispatcher = Dispatcher::new(Balloon::new(tall_container()));
        dispatcher.dispatch(Action::Charge);
        move_center_to(&mut dispatcher, Vec2::new(150.0, 330.0));
        assert!(dispatcher.state().affected_count() > 0);

        let grab = dispatcher.state().drag.live_rect().center();
        dispatcher.dispatch(Action::DragStart { pointer: grab });
        dispatcher.dispatch(Action::Reset);

        let state = dispatcher.state();
        assert_eq!(state.pieces, Balloon::home_pieces());
        assert_eq!(state.charge, ChargeState::Uncharged);
        assert_eq!(state.drag.offset(), Vec2::ZERO);
        assert!(!state.is_dragging());
    }
}
