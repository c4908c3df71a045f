use snowdrift::SnowflakeEngine;

fn main() {
    // Create an engine with default options and worker id 1
    let generator = SnowflakeEngine::for_worker(1).unwrap();

    // Generate some IDs
    let id1 = generator.next_id().unwrap();
    let id2 = generator.next_id().unwrap();
    let id3 = generator.next_id().unwrap();

    println!("Generated IDs (method: {}):", generator.method());
    print_id(id1, &generator);
    print_id(id2, &generator);
    print_id(id3, &generator);

    // Or extract components individually
    let ts = generator.extract.timestamp(id3);
    let worker = generator.extract.worker_id(id3);
    let seq = generator.extract.sequence(id3);
    println!("\nComponents of ID3 (extracted individually):");
    println!("  Timestamp: {ts} ms since base time");
    println!("  Worker ID: {worker}");
    println!("  Sequence: {seq}");

    println!("\nString form: {}", generator.next_id_string().unwrap());
    println!("Stats: {}", generator.stats());
}

fn print_id(id: i64, generator: &SnowflakeEngine) {
    let parts = generator.extract.decompose(id);
    println!(
        "  ID: {id}, Elapsed: {}, Human date: {}, Worker ID: {}, Sequence: {}",
        parts.timestamp, parts.time, parts.worker_id, parts.sequence
    );
}
