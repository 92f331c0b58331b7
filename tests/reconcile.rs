mod common;

use common::Harness;
use loud_rejection::{
    Event, INSTALLED_TWICE_WARNING, InstallError, InstallOptions, PromiseId, Reason,
};

#[derive(Debug)]
struct Failure(&'static str);

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl std::error::Error for Failure {}

fn installed() -> Harness {
    let h = Harness::new();
    h.installer.install(&InstallOptions::default()).unwrap();
    h
}

fn reject_error(h: &Harness, message: &'static str) -> PromiseId {
    let p = PromiseId::next();
    h.bus
        .publish(Event::unhandled(p, Reason::from_error(&Failure(message))));
    p
}

fn reject_value(h: &Harness, reason: Reason) -> PromiseId {
    let p = PromiseId::next();
    h.bus.publish(Event::unhandled(p, reason));
    p
}

#[test]
fn no_rejections_no_output() {
    let h = installed();
    assert_eq!(h.kill(), 0);
    assert_eq!(h.stderr.text(), "");
}

#[test]
fn one_unhandled_rejection() {
    let h = installed();
    reject_error(&h, "foo123");
    h.kill();
    assert!(h.stderr.text().contains("foo123"));
}

#[test]
fn two_unhandled_rejections_in_order() {
    let h = installed();
    reject_error(&h, "foo456");
    reject_error(&h, "bar789");
    h.kill();

    let out = h.stderr.text();
    let foo = out.find("foo456").expect("foo456 reported");
    let bar = out.find("bar789").expect("bar789 reported");
    assert!(foo < bar);
}

#[test]
fn rejection_handled_before_exit() {
    let h = installed();
    let a = reject_error(&h, "foo123");
    h.bus.publish(Event::handled(a));
    assert_eq!(h.kill(), 0);
    assert_eq!(h.stderr.text(), "");
}

#[test]
fn two_rejections_first_handled() {
    let h = installed();
    let a = reject_error(&h, "foo987");
    reject_error(&h, "bar654");
    h.bus.publish(Event::handled(a));
    h.kill();

    let out = h.stderr.text();
    assert!(!out.contains("foo987"));
    assert!(out.contains("bar654"));
}

#[test]
fn two_rejections_last_handled() {
    let h = installed();
    reject_error(&h, "foo987");
    let b = reject_error(&h, "bar654");
    h.bus.publish(Event::handled(b));
    h.kill();

    let out = h.stderr.text();
    assert!(out.contains("foo987"));
    assert!(!out.contains("bar654"));
}

#[test]
fn handled_for_unknown_promise_is_ignored() {
    let h = installed();
    reject_error(&h, "still-here");
    h.bus.publish(Event::handled(PromiseId::next()));
    h.kill();
    assert!(h.stderr.text().contains("still-here"));
}

#[test]
fn rejection_with_a_string_value() {
    let h = installed();
    reject_value(&h, Reason::value("foo123"));
    h.kill();
    assert_eq!(h.stderr.text(), "Promise rejected with value: foo123\n");
}

#[test]
fn rejection_with_falsy_values() {
    let h = installed();
    reject_value(&h, Reason::value(false));
    reject_value(&h, Reason::value(0));
    h.kill();

    let out = h.stderr.text();
    assert!(out.contains("Promise rejected with value: false"));
    assert!(out.contains("Promise rejected with value: 0"));
}

#[test]
fn rejection_with_no_value() {
    let h = installed();
    reject_value(&h, Reason::absent());
    h.kill();
    assert_eq!(h.stderr.text(), "Promise rejected no value\n");
}

#[test]
fn error_stack_is_printed_verbatim() {
    let h = installed();
    reject_value(&h, Reason::stack("Error: boo\n    at fixture (fixture.rs:1:1)"));
    h.kill();
    assert_eq!(
        h.stderr.text(),
        "Error: boo\n    at fixture (fixture.rs:1:1)\n"
    );
}

#[test]
fn exit_code_defaults_to_one() {
    let h = installed();
    reject_error(&h, "boo");
    assert_eq!(h.exit_with(0), 1);
}

#[test]
fn exit_code_can_be_overridden() {
    let h = installed();
    h.installer
        .install(&InstallOptions::new().with_exit_code(20))
        .unwrap();
    reject_error(&h, "boo");
    assert_eq!(h.exit_with(0), 20);
}

#[test]
fn override_given_on_first_install() {
    let h = Harness::new();
    h.installer
        .install(&InstallOptions::new().with_exit_code(20))
        .unwrap();
    reject_error(&h, "boo");
    assert_eq!(h.exit_with(0), 20);
}

#[test]
fn nonzero_exit_codes_are_kept() {
    let h = installed();
    h.installer
        .install(&InstallOptions::new().with_exit_code(20))
        .unwrap();
    reject_error(&h, "boo");
    assert_eq!(h.exit_with(10), 10);
    assert!(h.stderr.text().contains("boo"));
}

#[test]
fn override_unused_without_rejections() {
    let h = Harness::new();
    h.installer
        .install(&InstallOptions::new().with_exit_code(20))
        .unwrap();
    assert_eq!(h.exit_with(0), 0);
}

#[test]
fn negative_exit_code_is_rejected_and_nothing_installed() {
    let h = Harness::new();
    let err = h
        .installer
        .install(&InstallOptions::new().with_exit_code(-1))
        .unwrap_err();

    assert_eq!(err, InstallError::NegativeExitCode { value: -1 });
    assert!(err.to_string().contains("opts.exitCode can't be a negative number"));
    assert!(!h.installer.is_installed());
    assert_eq!(h.bus.subscriber_count(), 0);
    assert_eq!(h.teardown.pending(), 0);
}

#[test]
fn conflicting_exit_codes_are_rejected() {
    let h = Harness::new();
    h.installer
        .install(&InstallOptions::new().with_exit_code(2))
        .unwrap();
    let err = h
        .installer
        .install(&InstallOptions::new().with_exit_code(3))
        .unwrap_err();

    assert!(
        err.to_string()
            .contains("two callers have tried to modify the exit code: 2, 3")
    );
    assert_eq!(h.installer.negotiated_exit_code(), Some(2));
}

#[test]
fn conflict_wins_over_installed_twice_warning() {
    let h = Harness::new();
    h.installer
        .install(&InstallOptions::new().with_exit_code(2))
        .unwrap();
    assert!(
        h.installer
            .install(&InstallOptions::new().with_exit_code(3))
            .is_err()
    );
    assert!(!h.stderr.text().contains(INSTALLED_TWICE_WARNING));
}

#[test]
fn same_exit_code_twice_is_fine() {
    let h = Harness::new();
    let opts = InstallOptions::new().with_exit_code(7);
    h.installer.install(&opts).unwrap();
    h.installer.install(&opts).unwrap();
    assert_eq!(h.installer.negotiated_exit_code(), Some(7));
}

#[test]
fn installed_twice_warns_and_reports_once() {
    let h = installed();
    h.installer.install(&InstallOptions::default()).unwrap();

    assert_eq!(h.bus.subscriber_count(), 1);
    assert_eq!(h.teardown.pending(), 1);

    reject_error(&h, "only-once");
    h.kill();

    let out = h.stderr.text();
    assert_eq!(out.matches(INSTALLED_TWICE_WARNING).count(), 1);
    assert_eq!(out.matches("only-once").count(), 1);
}

#[test]
fn only_the_first_install_reports_wiring() {
    let h = Harness::new();
    assert!(h.installer.install(&InstallOptions::default()).unwrap());
    assert!(!h.installer.install(&InstallOptions::default()).unwrap());
    assert!(!h.installer.install(&InstallOptions::new().with_signals(false)).unwrap());
}

#[test]
fn duplicate_rejection_events_report_once() {
    let h = installed();
    let p = PromiseId::next();
    h.bus.publish(Event::unhandled(p, Reason::value("dup")));
    h.bus.publish(Event::unhandled(p, Reason::value("dup")));
    h.kill();
    assert_eq!(h.stderr.text().matches("dup").count(), 1);
}

#[test]
fn pending_reflects_the_ledger() {
    let h = installed();
    let a = reject_value(&h, Reason::value(1));
    let b = reject_value(&h, Reason::value(2));
    h.bus.publish(Event::handled(a));

    let pending = h.installer.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].promise, b);

    h.kill();
    assert!(h.installer.pending().is_empty());
}

#[test]
fn teardown_runs_the_report_once() {
    let h = installed();
    reject_value(&h, Reason::absent());
    h.kill();
    h.kill();
    assert_eq!(h.stderr.text(), "Promise rejected no value\n");
}
