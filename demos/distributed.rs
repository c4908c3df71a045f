use rand::{rng, Rng};
use snowdrift::{GeneratorOptions, SnowflakeEngine};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=snowdrift=debug shows drift terms and clock warnings
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // One engine per worker id, shared by several threads each
    let engines: Vec<Arc<SnowflakeEngine>> = (0..2u16)
        .map(|worker_id| {
            let options = GeneratorOptions::builder()
                .worker_id(worker_id)
                .unwrap()
                .generator_id(format!("worker-{worker_id}"))
                .build()
                .unwrap();
            Arc::new(SnowflakeEngine::new(options).unwrap())
        })
        .collect();

    let mut handles = vec![];
    for thread_id in 0..4 {
        let generator = Arc::clone(&engines[thread_id % engines.len()]);
        handles.push(thread::spawn(move || {
            let mut ids = HashSet::new();
            let mut rng = rng();

            for i in 0..5 {
                let id = generator.next_id().unwrap();
                let parts = generator.extract.decompose(id);
                println!(
                    "Thread {} generated ID {} (ts={}, worker={}, seq={})",
                    thread_id, i, parts.timestamp, parts.worker_id, parts.sequence
                );
                assert!(ids.insert(id), "Duplicate ID generated!");

                // Random delay to simulate work
                let delay = rng.random_range(0..=9);
                thread::sleep(Duration::from_millis(delay));
            }

            // A burst borrows future time units instead of blocking
            ids.extend(generator.next_ids(500).unwrap());
            ids
        }));
    }

    let mut all_ids = HashSet::new();
    for handle in handles {
        let thread_ids = handle.join().unwrap();
        let before = all_ids.len();
        let count = thread_ids.len();
        all_ids.extend(thread_ids);
        assert_eq!(all_ids.len(), before + count, "IDs collided across threads!");
    }

    println!("\nTotal unique IDs generated: {}", all_ids.len());
    for engine in &engines {
        println!("{}", engine.stats());
    }
}
