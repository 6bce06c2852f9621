use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leadflow::demo::{demo_lead, demo_users};
use leadflow::models::Lead;
use leadflow::services::visible_leads;

/// Lead population spread across the demo hierarchy, with a slice of
/// cross-team escalations in the thread.
fn build_leads(count: usize) -> Vec<Lead> {
    let creators = ["clr-001", "clr-002", "clr-003", "clr-004", "clr-005", "clr-006"];
    (0..count)
        .map(|i| {
            let mut lead = demo_lead(creators[i % creators.len()]);
            if i % 10 == 0 {
                lead.add_to_thread("tl-001");
            }
            lead
        })
        .collect()
}

fn benchmark_visible_leads(c: &mut Criterion) {
    let users = demo_users();
    let leads = build_leads(500);

    let manager = users.iter().find(|u| u.id == "mgr-001").unwrap();
    let team_leader = users.iter().find(|u| u.id == "tl-001").unwrap();
    let admin = users.iter().find(|u| u.id == "admin-001").unwrap();

    let mut group = c.benchmark_group("visible_leads_500");

    group.bench_function("manager", |b| {
        b.iter(|| visible_leads(black_box(manager), black_box(&leads), black_box(&users)))
    });

    group.bench_function("team_leader", |b| {
        b.iter(|| visible_leads(black_box(team_leader), black_box(&leads), black_box(&users)))
    });

    group.bench_function("admin", |b| {
        b.iter(|| visible_leads(black_box(admin), black_box(&leads), black_box(&users)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_visible_leads);
criterion_main!(benches);
