// Example: selection that follows removals, and a restamping conditional gate.
use repeater::{Change, Gate, Repeater, RepeaterOptions, SelectionMode};

fn main() {
    let mut items = vec!["inbox", "drafts", "sent"];
    let mut r = Repeater::with_source(RepeaterOptions::<&str, &str>::by_value(), &items);
    r.selection_mut().set_mode(SelectionMode::Multi);
    r.select(&"drafts");
    r.select(&"sent");
    println!("selected: {:?}", r.selection().selected());

    items.remove(1);
    r.notify_change(Change::Removed { index: 1 }).unwrap();
    println!("after removing drafts: {:?}", r.selection().selected());

    let mut details = Gate::new(true);
    for condition in [true, false, true] {
        let action = details.set_condition(condition);
        println!("condition={condition} -> {action:?} ({:?})", details.state());
    }
}
