// Example: filter + sort a caller-owned list and print the patch for each render.
use repeater::{Change, Comparator, Filter, Repeater, RepeaterOptions};

#[derive(Debug)]
struct Employee {
    id: u32,
    name: &'static str,
    kind: &'static str,
}

fn main() {
    let mut staff = vec![
        Employee { id: 1, name: "Rosa", kind: "engineer" },
        Employee { id: 2, name: "Adam", kind: "manager" },
        Employee { id: 3, name: "Mina", kind: "engineer" },
    ];

    let mut r = Repeater::with_source(
        RepeaterOptions::new_with_key(|e: &Employee| e.id)
            .with_filter(Some(Filter::new(|e: &Employee| e.kind == "engineer")))
            .with_sort(Some(Comparator::by_key(|e: &Employee| e.name)))
            .with_observe("kind"),
        &staff,
    );
    println!("first render: {:?}", r.render(&staff).unwrap().ops);

    staff[1].kind = "engineer";
    r.notify_change(Change::PathMutated { index: 1, path: "kind" }).unwrap();
    println!("after promotion: {:?}", r.render(&staff).unwrap().ops);

    let mut names = Vec::new();
    r.for_each_view_item(&staff, |_, _, e| names.push(e.name));
    println!("view: {names:?}");
}
