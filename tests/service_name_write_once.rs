//! Write-once semantics of the process-wide service name.
//!
//! Every test in this binary fixes the name to "Billing" first, so they may run
//! in any order.
use herald::{Event, EventData, EventError, EventsConfig};

fn billing() {
    herald::set_service_name("Billing").expect("setting Billing is idempotent");
}

#[test]
fn setting_same_name_twice_succeeds() {
    billing();
    herald::set_service_name("Billing").expect("second identical set");
    assert!(herald::is_service_name_set());
    assert_eq!(herald::service_name(), "Billing");
}

#[test]
fn setting_different_name_conflicts() {
    billing();
    let err = herald::set_service_name("Payments").expect_err("conflict");
    assert_eq!(
        err,
        EventError::ConflictingState { current: "Billing".into(), requested: "Payments".into() }
    );
    assert_eq!(herald::service_name(), "Billing");
}

#[test]
fn blank_name_fails_even_after_set() {
    billing();
    let err = herald::set_service_name("   ").expect_err("blank");
    assert!(err.is_invalid_argument());
}

#[test]
fn events_use_configured_name() {
    billing();
    let event = EventData::new("Invoice sent").expect("event");
    assert_eq!(event.name(), "Billing.Invoice sent");
    assert_eq!(event.data().service_name(), "Billing");
}

#[test]
fn config_apply_goes_through_the_same_rules() {
    billing();
    EventsConfig::new().with_service_name("Billing").apply().expect("same name");
    let err = EventsConfig::new().with_service_name("Payments").apply().expect_err("conflict");
    assert!(err.is_conflicting_state());
    EventsConfig::new().apply().expect("nothing to apply");
}
