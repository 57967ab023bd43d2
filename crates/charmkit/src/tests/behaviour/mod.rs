//! Behavioural step definitions for status aggregation and the lifecycle
//! signals.

use std::cell::RefCell;
use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, then, when};

use super::support::TestWorld;
use crate::host::ServiceAction;
use crate::lifecycle::Hook;
use crate::status::StatusKind;

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[given("a charm requiring the relations {relations}")]
fn given_required_relations(world: &RefCell<TestWorld>, relations: String) {
    world.borrow_mut().require_relations(strip_quotes(&relations));
}

#[given("a charm requiring the options {options}")]
fn given_mandatory_options(world: &RefCell<TestWorld>, options: String) {
    world.borrow_mut().require_options(strip_quotes(&options));
}

#[given("the option {key} is set to {value}")]
fn given_option(world: &RefCell<TestWorld>, key: String, value: String) {
    world
        .borrow_mut()
        .set_option(strip_quotes(&key), strip_quotes(&value));
}

#[given("the {endpoint} relation is established")]
fn given_relation(world: &RefCell<TestWorld>, endpoint: String) {
    world.borrow().relate(strip_quotes(&endpoint));
}

#[given("the charm has been started")]
fn given_started(world: &RefCell<TestWorld>) {
    world.borrow_mut().state_mut().is_started = true;
}

#[given("the charm is paused")]
fn given_paused(world: &RefCell<TestWorld>) {
    world.borrow_mut().state_mut().is_paused = true;
}

#[given("a series upgrade is in progress")]
fn given_series_upgrade(world: &RefCell<TestWorld>) {
    world.borrow_mut().state_mut().series_upgrade = true;
}

#[given("a check reporting {kind} with message {message}")]
fn given_check(world: &RefCell<TestWorld>, kind: String, message: String) {
    let status_kind = StatusKind::from_str(strip_quotes(&kind)).expect("status kind");
    world
        .borrow_mut()
        .add_check(status_kind, strip_quotes(&message));
}

#[given("the service health probe reports {message}")]
fn given_stopped_service(world: &RefCell<TestWorld>, message: String) {
    world.borrow().stop_service(strip_quotes(&message));
}

#[when("the status is updated")]
fn when_status_updated(world: &RefCell<TestWorld>) {
    world.borrow_mut().charm().on_update_status();
}

#[when("the {hook} signal is handled")]
fn when_signal_handled(world: &RefCell<TestWorld>, hook: String) {
    let signal = Hook::from_str(strip_quotes(&hook)).expect("hook name");
    let mut w = world.borrow_mut();
    w.charm().dispatch(signal).expect("signal handled");
}

#[then("the unit is {kind} with message {message}")]
fn then_unit_status(world: &RefCell<TestWorld>, kind: String, message: String) {
    let w = world.borrow();
    let published = w.published().expect("a status was published");
    let expected_kind = StatusKind::from_str(strip_quotes(&kind)).expect("status kind");
    assert_eq!(published.kind(), expected_kind, "published {published}");
    assert_eq!(published.message(), strip_quotes(&message));
}

#[then("the services received {action} once")]
fn then_services_received(world: &RefCell<TestWorld>, action: String) {
    let expected = ServiceAction::from_str(strip_quotes(&action)).expect("service action");
    let w = world.borrow();
    let calls = w.fakes.services.calls();
    let matching = calls
        .iter()
        .filter(|(requested, _)| *requested == expected)
        .count();
    assert_eq!(matching, 1, "calls: {calls:?}");
    assert!(
        calls
            .iter()
            .all(|(_, services)| services.to_vec() == vec!["apache2", "ks-api"]),
        "calls: {calls:?}"
    );
}

mod scenarios;
