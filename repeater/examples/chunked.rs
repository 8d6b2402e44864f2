// Example: chunked materialization driven by a simulated 60 Hz frame clock.
use repeater::{Repeater, RepeaterOptions};

fn main() {
    let items: Vec<u32> = (0..1_000).collect();
    let mut r = Repeater::with_source(
        RepeaterOptions::<u32, u32>::by_value()
            .with_initial_count(50)
            .with_target_framerate(60),
        &items,
    );

    let first = r.render(&items).unwrap();
    println!("render: view={} stamped={}", r.view().len(), first.stamped.len());

    let mut now_ms = 0;
    while r.needs_tick() {
        now_ms += 16;
        let delta = r.tick(&items, now_ms).unwrap();
        println!(
            "tick @{now_ms}ms: stamped={} chunk={} pending={}",
            delta.stamped.len(),
            r.chunk_size(),
            r.pending_count()
        );
    }
}
