use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gatesync_connector::ROLE;
use gatesync_connector::reconcile::role_membership_grants;
use gatesync_core::{RoleTrait, new_role_resource};
use gatesync_upstream::User;

fn users(n: usize) -> Vec<User> {
    (0..n)
        .map(|i| {
            let mut roles = vec!["access".to_string(), format!("team-{}", i % 16)];
            if i % 3 == 0 {
                roles.push("reviewer".to_string());
            }
            User::new_local(format!("user-{i}"), roles)
        })
        .collect()
}

fn bench_role_membership_grants(c: &mut Criterion) {
    let reviewer = new_role_resource("reviewer", &ROLE, "reviewer", RoleTrait::default())
        .expect("reviewer fixture");

    let mut group = c.benchmark_group("role_membership_grants");
    for n in [100usize, 1_000, 10_000] {
        let population = users(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &population, |b, users| {
            b.iter(|| role_membership_grants(black_box(&reviewer), black_box(users)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_role_membership_grants);
criterion_main!(benches);
