use super::*;
use crate::{
    composition::{
        model::{Node, Shape, Sizing},
        motion::{Ease, Motion},
    },
    foundation::{
        clock::ManualClock,
        core::{Color, Rect, Vec2},
    },
};

fn sliding(duration: f64) -> Composition {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(
        Node::fill(
            Shape::Rect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                radius: 0.0,
            },
            Color::BLACK,
        )
        .with_motion(Motion::slide(Vec2::new(0.0, 50.0), duration, Ease::OutCubic)),
    );
    c
}

fn gate(delay: f64) -> AnimationGate {
    AnimationGate::new(Duration::from_secs_f64(delay), FontBook::system())
}

#[test]
fn waits_the_full_delay() {
    let clock = ManualClock::new();
    let mut gate = gate(3.0);
    gate.attach(sliding(2.4), Size::new(100.0, 100.0), &clock)
        .unwrap();
    assert_eq!(
        gate.state(),
        GateState::AttachedWaiting {
            until: Duration::from_secs(3)
        }
    );
    assert_eq!(gate.host().presentation_opacity(), NEAR_INVISIBLE_OPACITY);

    gate.wait(&clock).unwrap();
    assert_eq!(clock.now(), Duration::from_secs(3));
    assert_eq!(
        gate.state(),
        GateState::ReadyToCapture {
            at: Duration::from_secs(3)
        }
    );

    let settled = gate.into_settled().unwrap();
    assert_eq!(settled.nodes[0].offset, Vec2::ZERO);
    assert!(!settled.is_animated());
}

#[test]
fn short_delay_still_samples_the_settled_state() {
    let clock = ManualClock::new();
    let mut gate = gate(0.5);
    gate.attach(sliding(4.0), Size::new(100.0, 100.0), &clock)
        .unwrap();
    gate.wait(&clock).unwrap();
    assert_eq!(clock.now(), Duration::from_millis(500));
    let settled = gate.into_settled().unwrap();
    assert_eq!(settled.nodes[0].offset, Vec2::ZERO);
}

#[test]
fn out_of_order_calls_are_rejected() {
    let clock = ManualClock::new();

    let mut fresh = gate(1.0);
    assert!(matches!(
        fresh.wait(&clock),
        Err(KeepsakeError::Validation(_))
    ));
    assert!(matches!(
        gate(1.0).into_settled(),
        Err(KeepsakeError::Validation(_))
    ));

    fresh
        .attach(sliding(0.5), Size::new(10.0, 10.0), &clock)
        .unwrap();
    assert!(
        fresh
            .attach(sliding(0.5), Size::new(10.0, 10.0), &clock)
            .is_err()
    );

    let mut waiting = gate(1.0);
    waiting
        .attach(sliding(0.5), Size::new(10.0, 10.0), &clock)
        .unwrap();
    assert!(waiting.into_settled().is_err());
}

#[test]
fn wait_is_a_noop_when_the_deadline_passed() {
    let clock = ManualClock::new();
    let mut gate = gate(1.0);
    gate.attach(sliding(0.5), Size::new(10.0, 10.0), &clock)
        .unwrap();
    clock.advance(Duration::from_secs(5));
    gate.wait(&clock).unwrap();
    assert_eq!(clock.now(), Duration::from_secs(5));
}
