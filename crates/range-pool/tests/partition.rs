use rand::{Rng, SeedableRng, rngs::StdRng};
use range_pool::{Error, Limit, PoolRecord, RangePool, WorkerId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Asserts that the pool's workers tile `[0, length)` with no gap or overlap
/// and that every cursor sits inside its worker.
fn assert_partition(pool: &RangePool) {
    if pool.workers().len() == 0 {
        return;
    }
    let mut spans: Vec<(u64, u64, u64)> = pool
        .workers()
        .map(|(_, w)| {
            let limit = w.limit_index().finite().expect("finite limit");
            (w.start_index(), w.current_index(), limit)
        })
        .collect();
    spans.sort_unstable();

    let total: u64 = spans.iter().map(|(start, _, limit)| limit - start).sum();
    assert_eq!(total, pool.length());

    let mut next = 0;
    for (start, current, limit) in spans {
        assert_eq!(start, next);
        assert!(start <= current && current <= limit);
        next = limit;
    }
    assert_eq!(next, pool.length());
}

/// Drives a pool through random claim / advance / park sequences and checks
/// coverage and monotone progress after every call.
fn churn(seed: u64, length: u64, rounds: usize) -> RangePool {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pool = RangePool::new(length).expect("valid length");
    let mut held: Vec<WorkerId> = Vec::new();
    let mut last_completed = 0;

    for _ in 0..rounds {
        match rng.random_range(0..10) {
            0..=2 => match pool.get_worker() {
                Ok(id) => {
                    assert!(pool.worker(id).is_some_and(|w| w.is_active()));
                    if !held.contains(&id) {
                        held.push(id);
                    }
                }
                Err(Error::PoolExhausted { .. }) => assert!(pool.has_completed()),
                Err(Error::PoolSaturated { remaining }) => assert!(remaining < 2),
                Err(e) => panic!("unexpected error: {e}"),
            },
            3..=7 if !held.is_empty() => {
                let id = held[rng.random_range(0..held.len())];
                let worker = pool.worker(id).expect("held handle");
                if let Limit::Finite(remaining @ 1..) = worker.remaining() {
                    let steps = rng.random_range(1..=remaining.min(length / 8 + 1));
                    pool.advance(id, steps).expect("advance within remaining");
                }
            }
            8 if !held.is_empty() => {
                let id = held.swap_remove(rng.random_range(0..held.len()));
                pool.dispose_worker(id).expect("dispose held worker");
            }
            _ => {}
        }

        assert_partition(&pool);
        let completed = pool.completed();
        assert!(completed >= last_completed);
        assert!(completed <= pool.length());
        last_completed = completed;
    }
    pool
}

#[test]
fn random_churn_keeps_the_partition() {
    init_tracing();
    for seed in 0..32 {
        let length = 1 + seed * 97;
        churn(seed, length, 400);
    }
}

#[test]
fn random_churn_survives_record_roundtrip() {
    for seed in 100..116 {
        let pool = churn(seed, 4096, 200);
        let clone = RangePool::from_record(pool.to_record()).expect("valid record");

        assert_eq!(clone.length(), pool.length());
        assert_eq!(clone.completed(), pool.completed());
        assert_eq!(clone.has_completed(), pool.has_completed());

        let triples = |p: &RangePool| {
            let mut t: Vec<_> = p
                .workers()
                .map(|(_, w)| (w.start_index(), w.limit_index(), w.current_index()))
                .collect();
            t.sort_unstable();
            t
        };
        assert_eq!(triples(&clone), triples(&pool));
        assert_partition(&clone);
    }
}

#[test]
fn drains_to_completion() {
    init_tracing();
    let mut pool = RangePool::new(10_000).expect("valid length");
    let mut held = Vec::new();
    for _ in 0..16 {
        held.push(pool.get_worker().expect("worker"));
    }

    while !pool.has_completed() {
        for &id in &held {
            let remaining = pool
                .worker(id)
                .and_then(|w| w.remaining().finite())
                .expect("finite worker");
            if remaining > 0 {
                pool.advance(id, remaining.min(37)).expect("advance");
            }
        }
    }

    assert_eq!(pool.completed(), 10_000);
    assert_eq!(pool.completion_percentage(), 100);
    assert!(!pool.has_alive_worker());
    assert_eq!(pool.get_worker(), Err(Error::PoolExhausted { length: 10_000 }));
}

#[test]
fn parked_progress_resumes_after_restore() {
    let mut pool = RangePool::new(300).expect("valid length");
    let a = pool.get_worker().expect("worker");
    let b = pool.get_worker().expect("worker");
    pool.advance(a, 40).expect("advance");
    pool.advance(b, 7).expect("advance");
    pool.dispose_worker(b).expect("dispose");

    let record: PoolRecord = (&pool).into();
    let mut restored = RangePool::try_from(record).expect("valid record");

    let resumed = restored.get_worker().expect("worker");
    assert_eq!(resumed.index(), b.index());
    assert_eq!(restored.advance(b, 1), Err(Error::UnknownWorker(b)));
    let w = restored.worker(resumed).expect("live handle");
    assert_eq!(w.start_index(), 150);
    assert_eq!(w.current_index(), 157);
}
