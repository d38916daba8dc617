use teamcore_core::{ManualClock, NewNotification, NotificationList};

fn filled(clock: &ManualClock, count: usize) -> NotificationList<&ManualClock> {
    let mut list = NotificationList::with_clock(20, clock);
    for index in 0..count {
        clock.advance_ms(1);
        list.add(NewNotification::new(format!("n{index}"), "body"));
    }
    list
}

fn titles(list: &NotificationList<&ManualClock>) -> Vec<String> {
    list.iter().map(|item| item.title.clone()).collect()
}

#[test]
fn twenty_first_item_evicts_the_oldest() {
    let clock = ManualClock::new(0);
    let mut list = filled(&clock, 20);
    let before = titles(&list);

    list.add(NewNotification::new("n20", "body"));

    let after = titles(&list);
    assert_eq!(list.len(), 20);
    assert_eq!(after[0], "n20");
    assert_eq!(&after[1..], &before[..19]);
    assert!(!after.contains(&"n0".to_string()));
}

#[test]
fn mark_all_read_zeroes_unread_count() {
    let clock = ManualClock::new(0);
    for count in [0, 1, 7, 20] {
        let mut list = filled(&clock, count);
        let first_id = list.iter().next().map(|item| item.id);
        if let Some(first) = first_id {
            list.mark_read(first);
        }
        list.mark_all_read();
        assert_eq!(list.unread_count(), 0);
    }

    let mut demo = NotificationList::with_demo_items(20, &clock);
    assert_eq!(demo.unread_count(), 2);
    demo.mark_all_read();
    assert_eq!(demo.unread_count(), 0);
}

#[test]
fn mark_read_is_idempotent_and_ignores_unknown_ids() {
    let clock = ManualClock::new(0);
    let mut list = filled(&clock, 3);
    let target = list.iter().nth(1).map(|item| item.id).unwrap();

    list.mark_read(target);
    list.mark_read(target);
    list.mark_read(uuid::Uuid::new_v4());

    assert_eq!(list.unread_count(), 2);
    assert!(list.get(target).unwrap().read);
}

#[test]
fn clear_empties_the_list() {
    let clock = ManualClock::new(0);
    let mut list = filled(&clock, 5);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.unread_count(), 0);
}
