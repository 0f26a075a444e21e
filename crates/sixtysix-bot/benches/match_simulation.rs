use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sixtysix_bot::PolicyKind;
use sixtysix_core::game::driver::{Seats, play_match};
use sixtysix_core::game::match_state::MatchState;

fn simulate(seed: u64, south: PolicyKind, north: PolicyKind) -> u32 {
    let mut a = south.build(seed);
    let mut b = north.build(seed.wrapping_add(1));
    let mut state = MatchState::with_seed(seed);
    let mut seats: Seats<'_> = [&mut *a, &mut *b];
    match play_match(&mut state, &mut seats) {
        Ok(result) => result.rounds_played,
        Err(_) => 0,
    }
}

fn match_simulation_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_simulation");
    for (south, north) in [
        (PolicyKind::Random, PolicyKind::Random),
        (PolicyKind::Greedy, PolicyKind::Random),
        (PolicyKind::Greedy, PolicyKind::Greedy),
    ] {
        group.bench_function(format!("{south}_vs_{north}"), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(simulate(seed, south, north))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, match_simulation_bench);
criterion_main!(benches);
