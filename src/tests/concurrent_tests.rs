#[cfg(test)]
mod tests {
    use crate::tests::test_utils::{assert_unique_and_monotonic, assert_unique_ids};
    use crate::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn shared_engine(method: Method) -> Arc<SnowflakeEngine> {
        let options = GeneratorOptions::builder()
            .method(method)
            .worker_id(1)
            .unwrap()
            .build()
            .unwrap();
        Arc::new(SnowflakeEngine::new(options).unwrap())
    }

    fn spawn_callers(
        generator: &Arc<SnowflakeEngine>,
        num_threads: usize,
        ids_per_thread: usize,
    ) -> Vec<i64> {
        let barrier = Arc::new(Barrier::new(num_threads));
        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let generator = Arc::clone(generator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut v = Vec::with_capacity(ids_per_thread);
                    for _ in 0..ids_per_thread {
                        v.push(generator.next_id().unwrap());
                    }
                    v
                })
            })
            .collect();

        let mut all_ids = Vec::with_capacity(num_threads * ids_per_thread);
        for h in handles {
            all_ids.extend(h.join().expect("thread panicked"));
        }
        all_ids
    }

    #[test]
    fn test_eight_callers_hundred_thousand_ids() {
        let generator = shared_engine(Method::Drift);
        let all_ids = spawn_callers(&generator, 8, 12_500);

        assert_unique_ids(&all_ids, 100_000);
        assert_eq!(generator.stats().issued, 100_000);
    }

    #[test]
    fn test_concurrent_classic() {
        let generator = shared_engine(Method::Classic);
        let all_ids = spawn_callers(&generator, 4, 2_500);
        assert_unique_and_monotonic(all_ids, 10_000);
    }

    #[test]
    fn test_each_thread_sees_increasing_ids() {
        let generator = shared_engine(Method::Classic);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || generator.next_ids(1_000).unwrap())
            })
            .collect();

        for h in handles {
            let ids = h.join().unwrap();
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_distinct_workers_never_collide() {
        let handles: Vec<_> = (0..4u16)
            .map(|worker_id| {
                thread::spawn(move || {
                    let generator = SnowflakeEngine::for_worker(worker_id).unwrap();
                    generator.next_ids(2_000).unwrap()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(ids.insert(id), "Duplicate ID generated: {id}");
            }
        }
        assert_eq!(ids.len(), 8_000);
    }
}
