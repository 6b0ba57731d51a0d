use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use super::*;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn at(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn daily(name: &str) -> Routine {
    Routine::new(
        RoutineId::new("r-1"),
        ChildId::new("c-1"),
        name,
        Recurrence::EveryDay,
    )
    .expect("valid routine")
}

fn item(id: &str, order: i64) -> RoutineItem {
    RoutineItem::new(ItemId::new(id), id, None, None, None, order).expect("valid item")
}

fn morning() -> Routine {
    let mut routine = daily("Morning routine");
    routine.register_item(item("wake", 1)).expect("wake");
    routine.register_item(item("dress", 2)).expect("dress");
    routine.register_item(item("breakfast", 3)).expect("breakfast");
    routine
}

fn ids(routine: &Routine) -> Vec<&str> {
    routine.items().iter().map(|item| item.id().as_str()).collect()
}

fn orders(routine: &Routine) -> Vec<u32> {
    routine.items().iter().map(RoutineItem::order).collect()
}

fn assert_contiguous(routine: &Routine) {
    let expected: Vec<u32> = (1..=routine.items().len() as u32).collect();
    assert_eq!(orders(routine), expected, "orders must be exactly 1..=N");
}

#[test]
fn routine_requires_a_name() {
    assert_eq!(
        Routine::new(
            RoutineId::new("r"),
            ChildId::new("c"),
            "  ",
            Recurrence::EveryDay
        ),
        Err(DomainError::EmptyRoutineName)
    );
}

#[test]
fn register_item_sorts_by_order() {
    let mut routine = daily("Evening");
    routine.register_item(item("bath", 2)).expect("bath");
    routine.register_item(item("dinner", 1)).expect("dinner");

    assert_eq!(ids(&routine), vec!["dinner", "bath"]);
    assert_contiguous(&routine);
}

#[test]
fn register_item_rejects_colliding_order_without_mutation() {
    let mut routine = morning();
    let before = routine.clone();

    assert_eq!(
        routine.register_item(item("teeth", 2)),
        Err(DomainError::DuplicateOrder(2))
    );
    assert_eq!(routine, before);
}

#[test]
fn register_item_rejects_reused_id() {
    let mut routine = morning();
    assert_eq!(
        routine.register_item(item("wake", 9)),
        Err(DomainError::DuplicateItem(ItemId::new("wake")))
    );
    assert_eq!(routine.items().len(), 3);
}

#[test]
fn register_item_compacts_sparse_orders() {
    let mut routine = daily("Evening");
    routine.register_item(item("story", 5)).expect("story");
    routine.register_item(item("bath", 3)).expect("bath");

    assert_eq!(ids(&routine), vec!["bath", "story"]);
    assert_contiguous(&routine);
}

#[test]
fn register_item_auto_appends_after_last() {
    let mut routine = morning();
    let teeth = routine
        .register_item_auto("Brush teeth", Some("two minutes".to_string()), at(7, 40), at(7, 45))
        .expect("auto item");

    let added = routine.item(&teeth).expect("item stored");
    assert_eq!(added.order(), 4);
    assert_eq!(added.description(), Some("two minutes"));
    assert_contiguous(&routine);
}

#[test]
fn register_item_auto_starts_at_one() {
    let mut routine = daily("Evening");
    let first = routine
        .register_item_auto("Dinner", None, None, None)
        .expect("auto item");
    assert_eq!(routine.item(&first).map(RoutineItem::order), Some(1));
}

#[test]
fn register_item_auto_propagates_item_validation() {
    let mut routine = morning();
    let before = routine.clone();
    assert!(matches!(
        routine.register_item_auto("Nap", None, None, at(14, 0)),
        Err(DomainError::InvalidTimeWindow(_))
    ));
    assert_eq!(routine, before);
}

#[test]
fn remove_item_reindexes_remaining() {
    let mut routine = morning();
    let removed = routine
        .remove_item(&ItemId::new("wake"))
        .expect("item removed");

    assert_eq!(removed.id().as_str(), "wake");
    assert_eq!(ids(&routine), vec!["dress", "breakfast"]);
    assert_contiguous(&routine);
}

#[test]
fn remove_item_reports_missing_id() {
    let mut routine = morning();
    assert_eq!(
        routine.remove_item(&ItemId::new("missing")),
        Err(DomainError::ItemNotFound(ItemId::new("missing")))
    );
    assert_eq!(routine.items().len(), 3);
}

#[test]
fn reorder_moves_last_item_to_front() {
    let mut routine = morning();
    routine
        .reorder_item(&ItemId::new("breakfast"), 1)
        .expect("reorder succeeds");

    assert_eq!(ids(&routine), vec!["breakfast", "wake", "dress"]);
    assert_eq!(orders(&routine), vec![1, 2, 3]);
}

#[test]
fn reorder_moves_first_item_to_middle() {
    let mut routine = morning();
    routine
        .reorder_item(&ItemId::new("wake"), 2)
        .expect("reorder succeeds");
    assert_eq!(ids(&routine), vec!["dress", "wake", "breakfast"]);
    assert_contiguous(&routine);
}

#[test]
fn reorder_to_current_position_is_idempotent() {
    let mut routine = morning();
    let before = routine.clone();
    routine
        .reorder_item(&ItemId::new("dress"), 2)
        .expect("reorder succeeds");
    assert_eq!(routine, before);
}

#[test]
fn reorder_clamps_past_the_end() {
    let mut routine = morning();
    routine
        .reorder_item(&ItemId::new("wake"), 42)
        .expect("reorder succeeds");
    assert_eq!(ids(&routine), vec!["dress", "breakfast", "wake"]);
    assert_contiguous(&routine);
}

#[test]
fn reorder_validates_order_before_lookup() {
    let mut routine = morning();
    let before = routine.clone();

    assert_eq!(
        routine.reorder_item(&ItemId::new("missing"), 0),
        Err(DomainError::InvalidOrder(0))
    );
    assert_eq!(
        routine.reorder_item(&ItemId::new("missing"), 1),
        Err(DomainError::ItemNotFound(ItemId::new("missing")))
    );
    assert_eq!(routine, before);
}

#[test]
fn orders_stay_contiguous_across_mixed_operations() {
    let mut routine = daily("Busy day");
    routine.register_item(item("a", 4)).expect("a");
    assert_contiguous(&routine);
    let b = routine
        .register_item_auto("b", None, None, None)
        .expect("b");
    assert_contiguous(&routine);
    routine.register_item(item("c", 3)).expect("c");
    assert_contiguous(&routine);
    routine.reorder_item(&b, 1).expect("move b");
    assert_contiguous(&routine);
    routine.remove_item(&ItemId::new("c")).expect("remove c");
    assert_contiguous(&routine);
    routine
        .register_item_auto("d", None, None, None)
        .expect("d");
    routine.reorder_item(&ItemId::new("a"), 3).expect("move a");
    assert_contiguous(&routine);
    assert_eq!(routine.items().len(), 3);
    assert_eq!(routine.items()[2].id().as_str(), "a");
}

#[test]
fn update_item_revalidates_fields() {
    let mut routine = morning();
    let target = ItemId::new("breakfast");
    assert!(routine
        .update_item(&target, "Breakfast", None, at(8, 0), at(7, 0))
        .is_err());
    routine
        .update_item(&target, "Big breakfast", None, at(7, 0), at(7, 30))
        .expect("valid update");

    let updated = routine.item(&target).expect("item present");
    assert_eq!(updated.name(), "Big breakfast");
    assert_eq!(updated.order(), 3);
}

#[test]
fn weekday_routine_applies_only_on_listed_days() {
    let routine = Routine::new(
        RoutineId::new("r-2"),
        ChildId::new("c-1"),
        "Therapy session",
        Recurrence::from_parts(
            RecurrenceType::SpecificWeekdays,
            None,
            &[Weekday::Mon, Weekday::Wed],
        )
        .expect("valid recurrence"),
    )
    .expect("valid routine");

    let monday = date(2025, 3, 3);
    assert_eq!(monday.weekday(), Weekday::Mon);
    for offset in 0..7 {
        let day = monday + Duration::days(offset);
        let expected = matches!(day.weekday(), Weekday::Mon | Weekday::Wed);
        assert_eq!(routine.applies_on_date(day), expected, "unexpected result for {day}");
    }
}

#[test]
fn direct_weekday_recurrence_is_normalized_and_validated() {
    let mut routine = daily("Swimming");
    assert!(matches!(
        routine.set_recurrence(Recurrence::SpecificWeekdays(Vec::new())),
        Err(DomainError::InvalidRecurrenceConfiguration(_))
    ));
    assert_eq!(routine.recurrence_type(), RecurrenceType::EveryDay);

    routine
        .set_recurrence(Recurrence::SpecificWeekdays(vec![
            Weekday::Fri,
            Weekday::Tue,
            Weekday::Fri,
        ]))
        .expect("valid recurrence");
    assert_eq!(routine.recurrence().weekdays(), &[Weekday::Tue, Weekday::Fri]);
}

#[test]
fn single_date_routine_matches_exact_day() {
    let routine = Routine::new(
        RoutineId::new("r-3"),
        ChildId::new("c-1"),
        "Dentist visit",
        Recurrence::SingleDate(date(2025, 4, 10)),
    )
    .expect("valid routine");

    assert!(routine.applies_on_date(date(2025, 4, 10)));
    assert!(!routine.applies_on_date(date(2025, 4, 11)));
    assert_eq!(routine.recurrence().scheduled_date(), Some(date(2025, 4, 10)));
}

#[test]
fn templates_are_static() {
    let templates = Routine::suggest_fixed_templates();
    assert!(templates.contains(&"Morning routine"));
    assert_eq!(templates, Routine::suggest_fixed_templates());
}

#[test]
fn execution_log_checks_schedule_and_items() {
    let mut routine = Routine::new(
        RoutineId::new("r-4"),
        ChildId::new("c-1"),
        "School preparation",
        Recurrence::weekly(&[Weekday::Mon]).expect("valid recurrence"),
    )
    .expect("valid routine");
    routine.register_item(item("backpack", 1)).expect("item");

    let tuesday = date(2025, 3, 4);
    assert_eq!(
        routine.record_execution(tuesday, &[], None),
        Err(DomainError::NotScheduled(tuesday))
    );

    let monday = date(2025, 3, 3);
    assert_eq!(
        routine.record_execution(monday, &[ItemId::new("lunchbox")], None),
        Err(DomainError::ItemNotFound(ItemId::new("lunchbox")))
    );
    assert!(routine.executions().is_empty());

    routine
        .record_execution(
            monday,
            &[ItemId::new("backpack"), ItemId::new("backpack")],
            Some("calm morning".to_string()),
        )
        .expect("execution recorded");
    let execution = &routine.executions()[0];
    assert_eq!(execution.completed_items, vec![ItemId::new("backpack")]);
    assert_eq!(execution.notes.as_deref(), Some("calm morning"));
}

#[test]
fn restore_rejects_gapped_orders() {
    let items = vec![item("a", 1), item("b", 3)];
    assert_eq!(
        Routine::restore(
            RoutineId::new("r"),
            ChildId::new("c"),
            "Stored",
            Recurrence::EveryDay,
            items,
            Vec::new(),
        ),
        Err(DomainError::InvalidOrder(3))
    );

    let items = vec![item("a", 1), item("b", 1)];
    assert_eq!(
        Routine::restore(
            RoutineId::new("r"),
            ChildId::new("c"),
            "Stored",
            Recurrence::EveryDay,
            items,
            Vec::new(),
        ),
        Err(DomainError::DuplicateOrder(1))
    );
}

#[test]
fn removed_item_leaves_the_execution_log() {
    let mut routine = morning();
    let today = date(2025, 3, 3);
    routine
        .record_execution(today, &[ItemId::new("wake"), ItemId::new("dress")], None)
        .expect("execution recorded");

    routine
        .remove_item(&ItemId::new("dress"))
        .expect("dress removed");

    assert_eq!(
        routine.executions()[0].completed_items,
        vec![ItemId::new("wake")]
    );
}

#[test]
fn restore_rejects_executions_naming_unknown_items() {
    let executions = vec![RoutineExecution {
        date: date(2025, 3, 3),
        completed_items: vec![ItemId::new("a"), ItemId::new("gone")],
        notes: None,
    }];
    assert_eq!(
        Routine::restore(
            RoutineId::new("r"),
            ChildId::new("c"),
            "Stored",
            Recurrence::EveryDay,
            vec![item("a", 1)],
            executions,
        ),
        Err(DomainError::ItemNotFound(ItemId::new("gone")))
    );
}
