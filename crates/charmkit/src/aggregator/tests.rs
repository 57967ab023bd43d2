//! Unit tests for status aggregation precedence.

use charmkit_config::CharmConfig;
use mockall::mock;
use rstest::{fixture, rstest};

use super::*;
use crate::checks::NoOpinion;
use crate::host::HealthReport;
use crate::testing::{MemoryRelations, StaticHealth};

mock! {
    Health {}
    impl ServiceHealth for Health {
        fn check_running(&self, services: &[String], ports: &[u16]) -> HealthReport;
    }
}

struct Inputs {
    checks: CheckRegistry,
    state: PersistedState,
    required: Vec<String>,
    services: Vec<String>,
    config: CharmConfig,
    relations: MemoryRelations,
}

impl Inputs {
    fn evaluate(&self, health: &dyn ServiceHealth) -> UnitStatus {
        let model = Model {
            app_name: "keystone",
            config: &self.config,
            relations: &self.relations,
        };
        StatusAggregator::new(&self.checks, &self.state, &self.required, &self.services)
            .evaluate(&model, health)
    }

    fn missing(&self) -> Vec<String> {
        let model = Model {
            app_name: "keystone",
            config: &self.config,
            relations: &self.relations,
        };
        StatusAggregator::new(&self.checks, &self.state, &self.required, &self.services)
            .missing_relations(&model)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

#[fixture]
fn inputs() -> Inputs {
    let relations = MemoryRelations::new();
    relations.add_relation("shared-db");
    Inputs {
        checks: CheckRegistry::new(),
        state: PersistedState {
            is_started: true,
            ..PersistedState::new()
        },
        required: vec![String::from("shared-db")],
        services: vec![String::from("apache2"), String::from("ks-api")],
        config: CharmConfig::new(),
        relations,
    }
}

fn healthy() -> StaticHealth {
    StaticHealth::new()
}

#[rstest]
fn ready_when_everything_passes(inputs: Inputs) {
    assert_eq!(inputs.evaluate(&healthy()), UnitStatus::active(READY_MESSAGE));
}

#[rstest]
fn active_check_messages_merge(mut inputs: Inputs) {
    inputs
        .checks
        .register_fn("awesome", |_m| {
            Ok(UnitStatus::active("Unit is ready and awesome"))
        })
        .expect("register");
    inputs
        .checks
        .register_fn("super", |_m| Ok(UnitStatus::active("Unit is ready and super")))
        .expect("register");
    inputs
        .checks
        .register_fn("silent", |_m| Ok(UnitStatus::active("")))
        .expect("register");
    assert_eq!(
        inputs.evaluate(&healthy()),
        UnitStatus::active("Unit is ready and super, Unit is ready and awesome")
    );
}

#[rstest]
fn first_failing_check_wins(mut inputs: Inputs) {
    inputs
        .checks
        .register_fn("maint", |_m| {
            Ok(UnitStatus::maintenance("Custom check failed"))
        })
        .expect("register");
    inputs
        .checks
        .register_fn("blocked", |_m| Ok(UnitStatus::blocked("Plugin check failed")))
        .expect("register");
    inputs.state.series_upgrade = true;
    assert_eq!(
        inputs.evaluate(&healthy()),
        UnitStatus::maintenance("Custom check failed")
    );
}

#[rstest]
fn declined_checks_are_skipped(mut inputs: Inputs) {
    inputs
        .checks
        .register_fn("not-implemented", |_m| Err(NoOpinion))
        .expect("register");
    assert_eq!(inputs.evaluate(&healthy()), UnitStatus::active(READY_MESSAGE));
}

#[rstest]
#[case::series_upgrade_only(true, false, UnitStatus::blocked(SERIES_UPGRADE_MESSAGE))]
#[case::series_upgrade_and_paused(true, true, UnitStatus::blocked(SERIES_UPGRADE_MESSAGE))]
#[case::paused_only(false, true, UnitStatus::maintenance(PAUSED_MESSAGE))]
fn upgrade_and_pause_precedence(
    mut inputs: Inputs,
    #[case] series_upgrade: bool,
    #[case] paused: bool,
    #[case] expected: UnitStatus,
) {
    inputs.state.series_upgrade = series_upgrade;
    inputs.state.is_paused = paused;
    inputs.required.push(String::from("amqp"));
    let mut health = MockHealth::new();
    health.expect_check_running().never();
    assert_eq!(inputs.evaluate(&health), expected);
}

#[rstest]
fn missing_relations_listed_in_declaration_order(mut inputs: Inputs) {
    inputs.required = vec![
        String::from("identity-service"),
        String::from("shared-db"),
        String::from("amqp"),
    ];
    assert_eq!(inputs.missing(), vec!["identity-service", "amqp"]);
    assert_eq!(
        inputs.evaluate(&healthy()),
        UnitStatus::blocked("Missing relations: identity-service, amqp")
    );
}

#[rstest]
fn missing_relations_checked_before_health(mut inputs: Inputs) {
    inputs.required.push(String::from("amqp"));
    let mut health = MockHealth::new();
    health.expect_check_running().never();
    assert_eq!(
        inputs.evaluate(&health),
        UnitStatus::blocked("Missing relations: amqp")
    );
}

#[rstest]
fn health_probe_receives_services_and_no_ports(inputs: Inputs) {
    let mut health = MockHealth::new();
    health
        .expect_check_running()
        .withf(|services, ports| services.to_vec() == vec!["apache2", "ks-api"] && ports.is_empty())
        .times(1)
        .returning(|_, _| HealthReport::healthy());
    assert_eq!(inputs.evaluate(&health), UnitStatus::active(READY_MESSAGE));
}

#[rstest]
fn stopped_services_block_the_unit(inputs: Inputs) {
    let health = healthy();
    health.set_report(HealthReport::unhealthy(
        "blocked",
        "Services not running that should be: ks-api",
    ));
    assert_eq!(
        inputs.evaluate(&health),
        UnitStatus::blocked("Services not running that should be: ks-api")
    );
}

#[rstest]
fn unstarted_charm_is_waiting(mut inputs: Inputs) {
    inputs.state.is_started = false;
    inputs
        .checks
        .register_fn("extra", |_m| Ok(UnitStatus::active("and more")))
        .expect("register");
    assert_eq!(
        inputs.evaluate(&healthy()),
        UnitStatus::waiting(CONFIGURING_MESSAGE)
    );
}

#[rstest]
fn evaluation_is_idempotent(mut inputs: Inputs) {
    inputs
        .checks
        .register_fn("super", |_m| Ok(UnitStatus::active("Unit is ready and super")))
        .expect("register");
    let health = healthy();
    let first = inputs.evaluate(&health);
    let second = inputs.evaluate(&health);
    assert_eq!(first, second);
    assert_eq!(first, UnitStatus::active("Unit is ready and super"));
}
