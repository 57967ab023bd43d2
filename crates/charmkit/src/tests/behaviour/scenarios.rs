//! Scenario bindings for the charm behaviour feature files.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "A started charm with everything in place is ready"
)]
fn ready_charm_is_active(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "Active check messages are merged"
)]
fn active_messages_merge(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "The first failing check stops evaluation"
)]
fn first_failing_check_wins(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "A series upgrade outranks a pause"
)]
fn series_upgrade_outranks_pause(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "Missing relations are listed in declaration order"
)]
fn missing_relations_in_order(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "A stopped service blocks the unit"
)]
fn stopped_service_blocks(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/status_aggregation.feature",
    name = "An unstarted charm is still configuring"
)]
fn unstarted_charm_waits(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/charm_lifecycle.feature",
    name = "Pausing stops the payload services"
)]
fn pause_stops_services(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/charm_lifecycle.feature",
    name = "Resuming restores the ready status"
)]
fn resume_restores_ready(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/charm_lifecycle.feature",
    name = "A series upgrade pauses and later resumes the payload"
)]
fn series_upgrade_round_trip(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/charm_lifecycle.feature",
    name = "Missing mandatory options block configuration"
)]
fn missing_options_block(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/charm_lifecycle.feature",
    name = "Installing publishes a status once packages are in place"
)]
fn install_publishes_status(world: RefCell<TestWorld>) {
    drop(world);
}
