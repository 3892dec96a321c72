use data_loader::{Catalog, NullableColumn};
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("netflix_titles.csv");

    println!("Loading catalog...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_file(path).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Titles: {}", catalog.len());
    for column in NullableColumn::ALL {
        if let Some(stats) = catalog.imputation(column) {
            println!(
                "{:>10}: {} filled with '{}'",
                column.name(),
                stats.filled,
                stats.fill_value
            );
        }
    }
    println!(
        "\nPerformance: {:.0} rows/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );
}
