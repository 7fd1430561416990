mod common;
use common::{d, engine_at, engine_with};
use dutyroster::core::trigger::{TriggerSchedule, run_due};
use dutyroster::core::{DutyStore, EngineSettings};
use dutyroster::errors::AppError;
use dutyroster::models::{PriorityClass, QueueClass};
use chrono::NaiveTime;

fn count_log(engine: &dutyroster::core::Engine<dutyroster::db::SqliteStore>, op: &str) -> i64 {
    engine
        .store()
        .conn()
        .query_row("SELECT COUNT(*) FROM log WHERE operation = ?1", [op], |r| {
            r.get(0)
        })
        .expect("count log rows")
}

#[test]
fn test_admin_queue_drawn_on_consecutive_days() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    engine.register_person("Bob", false).unwrap();
    engine
        .add_to_queue(carol.id, QueueClass::Administrative, 3)
        .unwrap();

    let mut left = Vec::new();
    for day in ["2025-01-10", "2025-01-11", "2025-01-12"] {
        let rec = engine.ensure_duty(d(day)).unwrap();
        assert_eq!(rec.assignee, carol.id);
        assert_eq!(rec.class, PriorityClass::Administrative);
        left.push(
            engine
                .store()
                .get_queue(carol.id, QueueClass::Administrative)
                .unwrap(),
        );
    }
    assert_eq!(left, vec![2, 1, 0]);

    // queue exhausted: the fourth day falls through to the fair draw
    let rec = engine.ensure_duty(d("2025-01-13")).unwrap();
    assert_eq!(rec.class, PriorityClass::Fair);
}

#[test]
fn test_fair_draw_tie_broken_by_id_then_rotates() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();

    let first = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(first.assignee, alice.id);
    assert_eq!(first.class, PriorityClass::Fair);
    engine.complete_duty(d("2025-01-10")).unwrap();

    let second = engine.ensure_duty(d("2025-01-11")).unwrap();
    assert_eq!(second.assignee, bob.id);
}

#[test]
fn test_claim_over_fair_record_needs_no_relocation() {
    let engine = engine_at("2025-01-01");
    engine.register_person("Bob", false).unwrap();
    let carol = engine.register_person("Carol", true).unwrap();

    let fair = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(fair.class, PriorityClass::Fair);
    assert_eq!(fair.assignee_name, "Bob");

    let outcome = engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();
    assert!(outcome.relocated.is_none());

    let rec = engine.store().get_duty(d("2025-01-10")).unwrap().unwrap();
    assert_eq!(rec.assignee, carol.id);
    assert_eq!(rec.class, PriorityClass::Volunteer);
}

#[test]
fn test_claim_relocates_admin_holder_to_first_free_date() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    let dave = engine.register_person("Dave", true).unwrap();
    let erin = engine.register_person("Erin", false).unwrap();

    engine.admin_override(d("2025-01-10"), dave.id).unwrap();
    for day in ["2025-01-11", "2025-01-12", "2025-01-13", "2025-01-14"] {
        engine.volunteer_claim(d(day), erin.id).unwrap();
    }

    let outcome = engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();

    let moved = outcome.relocated.expect("admin duty relocated");
    assert_eq!(moved.date, d("2025-01-15"));
    assert_eq!(moved.assignee, dave.id);
    assert_eq!(moved.class, PriorityClass::Administrative);

    let rec = engine.store().get_duty(d("2025-01-10")).unwrap().unwrap();
    assert_eq!(rec.assignee, carol.id);
    assert_eq!(rec.class, PriorityClass::Volunteer);

    // days in between untouched
    let between = engine.store().get_duty(d("2025-01-12")).unwrap().unwrap();
    assert_eq!(between.assignee, erin.id);
}

#[test]
fn test_relocation_skips_completed_fair_and_off_duty_dates() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    let dave = engine.register_person("Dave", true).unwrap();

    engine.admin_override(d("2025-01-10"), dave.id).unwrap();

    // 11th: fair and already done, 12th: Dave is away, 13th: open fair record
    engine.ensure_duty(d("2025-01-11")).unwrap();
    engine.complete_duty(d("2025-01-11")).unwrap();
    engine.ensure_duty(d("2025-01-12")).unwrap();
    engine.ensure_duty(d("2025-01-13")).unwrap();
    engine
        .set_off_duty(dave.id, d("2025-01-12"), d("2025-01-12"))
        .unwrap();

    let outcome = engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();
    let moved = outcome.relocated.expect("admin duty relocated");
    assert_eq!(moved.date, d("2025-01-13"));
    assert_eq!(moved.assignee, dave.id);

    let kept = engine.store().get_duty(d("2025-01-11")).unwrap().unwrap();
    assert_eq!(kept.class, PriorityClass::Fair);
    assert!(kept.is_completed());
}

#[test]
fn test_relocation_failure_changes_nothing() {
    let settings = EngineSettings {
        relocation_horizon_days: 3,
        ..EngineSettings::default()
    };
    let engine = engine_with("2025-01-01", settings);
    let carol = engine.register_person("Carol", false).unwrap();
    let dave = engine.register_person("Dave", true).unwrap();
    let erin = engine.register_person("Erin", false).unwrap();

    engine.admin_override(d("2025-01-10"), dave.id).unwrap();
    for day in ["2025-01-11", "2025-01-12", "2025-01-13"] {
        engine.volunteer_claim(d(day), erin.id).unwrap();
    }
    let claims_before = count_log(&engine, "claim");

    let err = engine
        .volunteer_claim(d("2025-01-10"), carol.id)
        .unwrap_err();
    assert!(matches!(err, AppError::RelocationFailed { horizon: 3, .. }));

    let rec = engine.store().get_duty(d("2025-01-10")).unwrap().unwrap();
    assert_eq!(rec.assignee, dave.id);
    assert_eq!(rec.class, PriorityClass::Administrative);
    assert!(engine.store().get_duty(d("2025-01-14")).unwrap().is_none());
    assert_eq!(count_log(&engine, "claim"), claims_before);
}

#[test]
fn test_everyone_off_duty_leaves_date_unassigned() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();
    engine
        .set_off_duty(alice.id, d("2025-01-08"), d("2025-01-12"))
        .unwrap();
    engine
        .set_off_duty(bob.id, d("2025-01-10"), d("2025-01-10"))
        .unwrap();

    let err = engine.ensure_duty(d("2025-01-10")).unwrap_err();
    assert!(matches!(err, AppError::NoEligibleUser(date) if date == d("2025-01-10")));
    assert!(engine.store().get_duty(d("2025-01-10")).unwrap().is_none());
    assert_eq!(count_log(&engine, "ensure"), 0);
}

#[test]
fn test_ensure_is_idempotent() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    engine.add_to_queue(carol.id, QueueClass::Volunteer, 2).unwrap();

    let first = engine.ensure_duty(d("2025-01-10")).unwrap();
    let again = engine.ensure_duty(d("2025-01-10")).unwrap();

    assert_eq!(first, again);
    assert_eq!(first.class, PriorityClass::Volunteer);
    assert_eq!(
        engine
            .store()
            .get_queue(carol.id, QueueClass::Volunteer)
            .unwrap(),
        1
    );
    assert_eq!(count_log(&engine, "ensure"), 1);
}

#[test]
fn test_admin_queue_beats_volunteer_queue() {
    let engine = engine_at("2025-01-01");
    let vera = engine.register_person("Vera", false).unwrap();
    let adam = engine.register_person("Adam", false).unwrap();
    engine.add_to_queue(vera.id, QueueClass::Volunteer, 1).unwrap();
    engine
        .add_to_queue(adam.id, QueueClass::Administrative, 1)
        .unwrap();

    let rec = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(rec.assignee, adam.id);
    assert_eq!(rec.class, PriorityClass::Administrative);

    let rec = engine.ensure_duty(d("2025-01-11")).unwrap();
    assert_eq!(rec.assignee, vera.id);
    assert_eq!(rec.class, PriorityClass::Volunteer);
}

#[test]
fn test_queue_ties_use_fairness() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();
    engine.add_to_queue(alice.id, QueueClass::Volunteer, 3).unwrap();
    engine.add_to_queue(bob.id, QueueClass::Volunteer, 3).unwrap();

    let mut seen = Vec::new();
    for day in ["2025-01-10", "2025-01-11", "2025-01-12", "2025-01-13"] {
        let rec = engine.ensure_duty(d(day)).unwrap();
        engine.complete_duty(d(day)).unwrap();
        seen.push(rec.assignee);
    }
    assert_eq!(seen, vec![alice.id, bob.id, alice.id, bob.id]);

    let store = engine.store();
    assert_eq!(store.get_queue(alice.id, QueueClass::Volunteer).unwrap(), 1);
    assert_eq!(store.get_queue(bob.id, QueueClass::Volunteer).unwrap(), 1);
}

#[test]
fn test_off_duty_person_skipped_and_queue_frozen() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();
    engine
        .add_to_queue(carol.id, QueueClass::Administrative, 2)
        .unwrap();
    engine
        .set_off_duty(carol.id, d("2025-01-10"), d("2025-01-11"))
        .unwrap();

    for day in ["2025-01-10", "2025-01-11"] {
        let rec = engine.ensure_duty(d(day)).unwrap();
        assert_eq!(rec.assignee, bob.id);
        assert_eq!(rec.class, PriorityClass::Fair);
    }
    assert_eq!(
        engine
            .store()
            .get_queue(carol.id, QueueClass::Administrative)
            .unwrap(),
        2
    );

    let rec = engine.ensure_duty(d("2025-01-12")).unwrap();
    assert_eq!(rec.assignee, carol.id);
    assert_eq!(rec.class, PriorityClass::Administrative);

    engine.clear_off_duty(carol.id).unwrap();
    assert!(engine.store().get_off_duty(carol.id).unwrap().is_none());
}

#[test]
fn test_fairness_alternates_and_stays_balanced() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();

    let mut seen = Vec::new();
    for day in 1..=20u32 {
        let date = d(&format!("2025-02-{:02}", day));
        let rec = engine.ensure_duty(date).unwrap();
        engine.complete_duty(date).unwrap();
        seen.push(rec.assignee);
    }

    for (i, who) in seen.iter().enumerate() {
        let expected = if i % 2 == 0 { alice.id } else { bob.id };
        assert_eq!(*who, expected, "day {}", i + 1);
    }

    let store = engine.store();
    let a = store
        .count_non_admin_duties_in_window(alice.id, d("2025-02-07"), d("2025-02-20"))
        .unwrap();
    let b = store
        .count_non_admin_duties_in_window(bob.id, d("2025-02-07"), d("2025-02-20"))
        .unwrap();
    assert!(a.abs_diff(b) <= 1);
}

#[test]
fn test_admin_duties_do_not_count_against_fairness() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    engine.register_person("Bob", false).unwrap();

    engine.admin_override(d("2025-01-09"), alice.id).unwrap();
    engine.complete_duty(d("2025-01-09")).unwrap();

    let rec = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(rec.assignee, alice.id);
}

#[test]
fn test_admins_left_out_of_fair_draw_unless_configured() {
    let engine = engine_at("2025-01-01");
    engine.register_person("Dave", true).unwrap();

    let err = engine.ensure_duty(d("2025-01-10")).unwrap_err();
    assert!(matches!(err, AppError::NoEligibleUser(_)));

    let settings = EngineSettings {
        include_admins_in_fair_draw: true,
        ..EngineSettings::default()
    };
    let engine = engine_with("2025-01-01", settings);
    let dave = engine.register_person("Dave", true).unwrap();
    let rec = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(rec.assignee, dave.id);
}

#[test]
fn test_override_replaces_any_class_without_touching_queues() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();
    let dave = engine.register_person("Dave", true).unwrap();
    engine.add_to_queue(carol.id, QueueClass::Volunteer, 1).unwrap();

    let drawn = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(drawn.class, PriorityClass::Volunteer);

    let rec = engine.admin_override(d("2025-01-10"), dave.id).unwrap();
    assert_eq!(rec.assignee, dave.id);
    assert_eq!(rec.class, PriorityClass::Administrative);
    assert_eq!(
        engine
            .store()
            .get_queue(carol.id, QueueClass::Volunteer)
            .unwrap(),
        0
    );

    // a second override wins again
    let rec = engine.admin_override(d("2025-01-10"), carol.id).unwrap();
    assert_eq!(rec.assignee, carol.id);
    assert_eq!(engine.ensure_duty(d("2025-01-10")).unwrap().assignee, carol.id);
}

#[test]
fn test_past_dates_rejected() {
    let engine = engine_at("2025-01-10");
    let carol = engine.register_person("Carol", false).unwrap();

    let err = engine.admin_override(d("2025-01-09"), carol.id).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = engine.volunteer_claim(d("2025-01-09"), carol.id).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // today itself is fine
    engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();
}

#[test]
fn test_complete_keeps_first_timestamp() {
    let engine = engine_at("2025-01-01");
    engine.register_person("Alice", false).unwrap();

    let err = engine.complete_duty(d("2025-01-10")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    engine.ensure_duty(d("2025-01-10")).unwrap();
    let first = engine.complete_duty(d("2025-01-10")).unwrap();
    let second = engine.complete_duty(d("2025-01-10")).unwrap();

    assert!(first.completed_at.is_some());
    assert_eq!(first.completed_at, second.completed_at);
    assert_eq!(count_log(&engine, "complete"), 1);
}

#[test]
fn test_claim_by_current_volunteer_is_noop() {
    let engine = engine_at("2025-01-01");
    let carol = engine.register_person("Carol", false).unwrap();

    let first = engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();
    let again = engine.volunteer_claim(d("2025-01-10"), carol.id).unwrap();
    assert_eq!(first.record, again.record);
    assert_eq!(count_log(&engine, "claim"), 1);
}

#[test]
fn test_inactive_person_is_not_drawn_and_cannot_claim() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();
    engine.set_active(alice.id, false).unwrap();

    let rec = engine.ensure_duty(d("2025-01-10")).unwrap();
    assert_eq!(rec.assignee, bob.id);

    let err = engine.volunteer_claim(d("2025-01-11"), alice.id).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(engine.list_persons(false).unwrap().len(), 1);
    assert_eq!(engine.list_persons(true).unwrap().len(), 2);
}

#[test]
fn test_register_person_validation() {
    let engine = engine_at("2025-01-01");
    engine.register_person("Alice", false).unwrap();

    assert!(matches!(
        engine.register_person("Alice", true),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        engine.register_person("   ", false),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        engine.register_person("42", false),
        Err(AppError::Validation(_))
    ));

    let found = engine.resolve_person("Alice").unwrap();
    assert_eq!(engine.resolve_person(&found.id.to_string()).unwrap(), found);
    assert!(matches!(
        engine.resolve_person("Zoe"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_queue_and_off_duty_validation() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();

    assert!(matches!(
        engine.add_to_queue(alice.id, QueueClass::Volunteer, 0),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        engine.set_off_duty(alice.id, d("2025-01-12"), d("2025-01-10")),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        engine.add_to_queue(999, QueueClass::Volunteer, 1),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_forecast_does_not_mutate() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    let bob = engine.register_person("Bob", false).unwrap();
    engine
        .add_to_queue(bob.id, QueueClass::Administrative, 1)
        .unwrap();
    engine.volunteer_claim(d("2025-01-12"), alice.id).unwrap();

    let entries = engine.forecast(d("2025-01-10"), 4).unwrap();
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].assignee, Some(bob.id));
    assert_eq!(entries[0].class, Some(PriorityClass::Administrative));
    assert_eq!(entries[1].assignee, Some(alice.id));
    assert!(!entries[2].projected);
    assert_eq!(entries[2].class, Some(PriorityClass::Volunteer));
    assert!(entries[3].projected);

    let store = engine.store();
    assert!(store.get_duty(d("2025-01-10")).unwrap().is_none());
    assert!(store.get_duty(d("2025-01-11")).unwrap().is_none());
    assert!(!store.get_duty(d("2025-01-12")).unwrap().unwrap().is_completed());
    assert_eq!(
        store.get_queue(bob.id, QueueClass::Administrative).unwrap(),
        1
    );
}

#[test]
fn test_forecast_reports_unassigned_dates() {
    let engine = engine_at("2025-01-01");
    let alice = engine.register_person("Alice", false).unwrap();
    engine
        .set_off_duty(alice.id, d("2025-01-11"), d("2025-01-11"))
        .unwrap();

    let entries = engine.forecast(d("2025-01-10"), 3).unwrap();
    assert_eq!(entries[0].assignee, Some(alice.id));
    assert!(entries[1].assignee.is_none());
    assert_eq!(entries[2].assignee, Some(alice.id));
}

#[test]
fn test_schedule_and_person_stats() {
    let engine = engine_at("2025-01-15");
    let alice = engine.register_person("Alice", false).unwrap();

    engine.ensure_duty(d("2025-01-10")).unwrap();
    engine.complete_duty(d("2025-01-10")).unwrap();
    engine.ensure_duty(d("2025-01-20")).unwrap();
    engine.ensure_duty(d("2025-02-03")).unwrap();

    let january = engine.schedule(d("2025-01-01"), d("2025-01-31")).unwrap();
    assert_eq!(january.len(), 2);
    assert!(january[0].date < january[1].date);

    assert!(matches!(
        engine.schedule(d("2025-01-31"), d("2025-01-01")),
        Err(AppError::Validation(_))
    ));

    let stats = engine.person_stats(alice.id).unwrap();
    assert_eq!(stats.total_duties, 3);
    assert_eq!(stats.duties_this_month, 2);
    assert_eq!(stats.next_duty, Some(d("2025-01-20")));
    assert_eq!(stats.fairness_count, 1);
}

#[test]
fn test_trigger_runs_due_steps_only() {
    let engine = engine_at("2025-01-10");
    engine.register_person("Alice", false).unwrap();
    let schedule = TriggerSchedule {
        assign_at: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        complete_at: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
    };
    let today = d("2025-01-10");

    let early = run_due(&engine, schedule, today, NaiveTime::from_hms_opt(8, 0, 0).unwrap()).unwrap();
    assert!(early.ensured.is_none() && early.completed.is_none());
    assert!(engine.store().get_duty(today).unwrap().is_none());

    let noon = run_due(&engine, schedule, today, NaiveTime::from_hms_opt(12, 0, 0).unwrap()).unwrap();
    assert!(noon.ensured.is_some() && noon.completed.is_none());

    let night = run_due(&engine, schedule, today, NaiveTime::from_hms_opt(22, 0, 0).unwrap()).unwrap();
    let done = night.completed.expect("completed at night");
    assert!(done.is_completed());
    assert_eq!(night.ensured.unwrap().assignee, done.assignee);
}

#[test]
fn test_admin_holder_claiming_own_date_keeps_admin_record() {
    let engine = engine_at("2025-01-01");
    let dave = engine.register_person("Dave", true).unwrap();
    engine.admin_override(d("2025-01-10"), dave.id).unwrap();

    let outcome = engine.volunteer_claim(d("2025-01-10"), dave.id).unwrap();
    assert_eq!(outcome.record.assignee, dave.id);
    assert_eq!(outcome.record.class, PriorityClass::Administrative);
    assert!(outcome.relocated.is_none());

    assert_eq!(engine.store().duties_for_person(dave.id).unwrap().len(), 1);
    assert_eq!(count_log(&engine, "claim"), 0);
}
