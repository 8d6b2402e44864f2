use crate::*;

use repeater::{Comparator, Delta, Filter, InstanceId, RepeaterOptions, SelectionMode};
use std::vec;
use std::vec::Vec;

#[derive(Clone, Debug, PartialEq)]
struct Task {
    id: u32,
    title: &'static str,
    done: bool,
}

fn task(id: u32, title: &'static str) -> Task {
    Task {
        id,
        title,
        done: false,
    }
}

fn open_tasks_by_title() -> RepeaterOptions<Task, u32> {
    RepeaterOptions::new_with_key(|t: &Task| t.id)
        .with_filter(Some(Filter::new(|t: &Task| !t.done)))
        .with_sort(Some(Comparator::by_key(|t: &Task| t.title)))
        .with_observe("done title")
}

fn titles(c: &Controller<Task, u32>) -> Vec<&'static str> {
    c.view_items().iter().map(|t| t.title).collect()
}

#[derive(Default)]
struct CountingPresenter {
    rows: Vec<InstanceId>,
    stamps: Vec<InstanceId>,
}

impl Presenter for CountingPresenter {
    fn insert(&mut self, index: usize, id: InstanceId) {
        self.rows.insert(index, id);
    }

    fn remove(&mut self, index: usize, id: InstanceId) {
        assert_eq!(self.rows.remove(index), id);
    }

    fn move_item(&mut self, from: usize, to: usize, id: InstanceId) {
        assert_eq!(self.rows.remove(from), id);
        self.rows.insert(to, id);
    }

    fn stamp(&mut self, id: InstanceId) {
        assert!(!self.stamps.contains(&id), "stamped twice: {id}");
        self.stamps.push(id);
    }
}

#[test]
fn controller_mutations_flow_into_the_view() {
    let mut c = Controller::new(
        open_tasks_by_title(),
        vec![task(1, "write"), task(2, "build"), task(3, "test")],
    );
    let mut mirror: Vec<InstanceId> = Vec::new();

    apply_delta(&c.render().unwrap(), &mut mirror);
    assert_eq!(titles(&c), ["build", "test", "write"]);

    c.push(task(4, "deploy")).unwrap();
    c.mutate(0, "done", |t| t.done = true).unwrap();
    c.mutate(1, "title", |t| t.title = "zip").unwrap();
    apply_delta(&c.render().unwrap(), &mut mirror);

    assert_eq!(titles(&c), ["deploy", "test", "zip"]);
    assert_eq!(mirror, c.repeater().view());
    assert_eq!(c.position_of(&task(1, "write")), None);
    assert_eq!(c.index_of(&task(1, "write")), Some(0));
}

#[test]
fn controller_splice_and_replace_report_changes() {
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|t: &Task| t.id),
        vec![task(1, "a"), task(2, "b"), task(3, "c")],
    );
    let mut mirror: Vec<InstanceId> = Vec::new();
    apply_delta(&c.render().unwrap(), &mut mirror);
    let kept = c.repeater().instance_of(&task(3, "c")).unwrap();

    let removed = c.splice(0..2, vec![task(5, "e")]).unwrap();
    assert_eq!(removed.len(), 2);
    let old = c.replace(1, task(6, "f")).unwrap();
    assert_eq!(old.id, 3);
    apply_delta(&c.render().unwrap(), &mut mirror);

    assert_eq!(titles(&c), ["e", "f"]);
    assert_eq!(mirror, c.repeater().view());
    assert!(c.item_for_instance(kept).is_none());
}

#[test]
fn controller_rejects_out_of_bounds_without_mutating() {
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|t: &Task| t.id),
        vec![task(1, "a")],
    );
    assert!(c.insert(3, task(2, "b")).is_err());
    assert!(c.remove(1).is_err());
    assert!(c.replace(1, task(2, "b")).is_err());
    assert!(c.splice(0..2, Vec::new()).is_err());
    assert!(c.mutate(4, "title", |t| t.title = "x").is_err());
    assert_eq!(c.items().len(), 1);
    assert_eq!(c.repeater().len(), 1);
}

#[test]
fn controller_selection_follows_removals() {
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|t: &Task| t.id),
        vec![task(1, "a"), task(2, "b"), task(3, "c")],
    );
    c.repeater_mut()
        .selection_mut()
        .set_mode(SelectionMode::Multi);
    c.select(0).unwrap();
    c.select(2).unwrap();
    assert!(c.is_selected(2));

    c.remove(0).unwrap();
    let selected: Vec<u32> = c.selected_items().iter().map(|t| t.id).collect();
    assert_eq!(selected, [3]);

    c.deselect(1).unwrap();
    assert!(c.selected_items().is_empty());
}

#[test]
fn chunked_ticks_stamp_every_instance_once() {
    let items: Vec<Task> = (0..25).map(|i| task(i, "t")).collect();
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|t: &Task| t.id)
            .with_initial_count(5)
            .with_target_framerate(60),
        items,
    );
    let mut p = CountingPresenter::default();

    apply_delta(&c.render().unwrap(), &mut p);
    assert_eq!(p.rows.len(), 25);
    assert_eq!(p.stamps.len(), 5);

    let mut now = 0;
    let mut ticks = 0;
    while c.needs_tick() {
        let delta: Delta = c.tick(now).unwrap();
        apply_delta(&delta, &mut p);
        now += 8;
        ticks += 1;
        assert!(ticks < 25, "chunking did not converge");
    }
    assert_eq!(p.stamps.len(), 25);
    assert_eq!(p.stamps, c.repeater().view());
}

#[test]
fn set_items_restarts_chunking_and_view() {
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|t: &Task| t.id).with_initial_count(2),
        (0..6).map(|i| task(i, "t")).collect(),
    );
    c.render().unwrap();
    assert_eq!(c.repeater().pending_count(), 4);

    let old = c.set_items(vec![task(10, "x")]).unwrap();
    assert_eq!(old.len(), 6);
    let delta = c.tick(0).unwrap();
    assert_eq!(delta.stamped.len(), 1);
    assert!(!c.needs_tick());
    assert_eq!(titles(&c), ["x"]);
}
