use snowdrift::{GeneratorOptions, Method, SnowflakeEngine, TimestampUnit};

fn main() {
    // Classic layout for many workers: 10 worker bits, 12 sequence bits,
    // 3 data center bits, timestamp in seconds
    let options = GeneratorOptions::builder()
        .method(Method::Classic)
        .timestamp_unit(TimestampUnit::Seconds)
        .worker_id_bit_length(10)
        .unwrap()
        .seq_bit_length(12)
        .unwrap()
        .data_center_id_bit_length(3)
        .unwrap()
        .worker_id(42)
        .unwrap()
        .data_center_id(5)
        .unwrap()
        .id_length(12)
        .unwrap()
        .id_prefix("ORD-")
        .generator_id("orders")
        .build()
        .unwrap();

    let layout = options.layout();
    println!("Generator configuration:");
    println!("  Method: {}", options.method());
    println!("  Timestamp bits: {} ({})", layout.timestamp_bits(), options.timestamp_unit());
    println!("  Data center bits: {}", layout.data_center_bits());
    println!("  Worker bits: {} (max {})", layout.worker_bits(), options.max_worker_id());
    println!("  Sequence per unit: {}..={}", options.min_seq_number(), options.max_seq_number());

    let generator = SnowflakeEngine::new(options).unwrap();

    // Generate and analyze an ID
    let id = generator.next_id().unwrap();
    let parts = generator.extract.decompose(id);

    println!("\nGenerated ID: {}", id);
    println!("Components:");
    println!("  Time: {}", parts.time);
    println!("  Data center ID: {}", parts.data_center_id);
    println!("  Worker ID: {}", parts.worker_id);
    println!("  Sequence: {}", parts.sequence);

    let s = generator.next_id_string().unwrap();
    let parsed = generator.parse_id_string(&s).unwrap();
    println!("\nString ID: {s} -> {parsed}");

    for (key, value) in generator.stats().to_map() {
        println!("  {key}: {value}");
    }
}
