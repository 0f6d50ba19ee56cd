//! The process-wide registry. Kept in its own test binary so no other test
//! claims the global slot.

use service_host::{routing, Application, ConfigurationError, Registry};

#[test]
fn create_is_once_per_process() {
    assert!(!Registry::global().is_claimed());

    let first = Application::create("Service Host API", routing::echo::router()).unwrap();
    assert!(Registry::global().is_claimed());

    let err = Application::create("Another API", routing::echo::router())
        .err()
        .unwrap();
    assert_eq!(err, ConfigurationError::AlreadyCreated);

    assert_eq!(first.title(), "Service Host API");
    assert_eq!(first.mounted_routers(), 1);
}
