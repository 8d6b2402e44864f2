// Example: a host loop that mutates through a Controller and mirrors the view.
use repeater::{InstanceId, RepeaterOptions};
use repeater_adapter::{Controller, apply_delta};

fn main() {
    let mut c = Controller::new(
        RepeaterOptions::new_with_key(|s: &(u32, &'static str)| s.0).with_initial_count(2),
        vec![(1, "alpha"), (2, "beta"), (3, "gamma"), (4, "delta")],
    );
    let mut mirror: Vec<InstanceId> = Vec::new();

    c.schedule_render().unwrap();
    c.push((5, "epsilon")).unwrap();

    let mut now_ms = 0;
    while c.needs_tick() {
        let delta = c.tick(now_ms).unwrap();
        apply_delta(&delta, &mut mirror);
        println!("tick @{now_ms}ms: ops={} stamped={:?}", delta.ops.len(), delta.stamped);
        now_ms += 16;
    }
    println!("view: {:?}", c.view_items());
}
