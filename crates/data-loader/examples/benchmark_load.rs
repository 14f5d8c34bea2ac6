use data_loader::{LoadOptions, Snapshot};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/snapshot"));

    println!("Loading hawker snapshot from {}...\n", data_dir.display());

    let start = Instant::now();
    let snapshot = Snapshot::load_from_files(&data_dir, &LoadOptions::default())
        .expect("Failed to load snapshot");
    let elapsed = start.elapsed();

    let (stalls, interactions) = snapshot.counts();
    let report = snapshot.report();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Stalls: {} ({} excluded)", stalls, report.stalls_excluded());
    println!("Interactions: {}", interactions);
    println!("Reviews without rating: {}", report.reviews_missing_rating);
    println!("\nPerformance: {:.0} reviews/second",
             report.reviews_read as f64 / elapsed.as_secs_f64());
}
