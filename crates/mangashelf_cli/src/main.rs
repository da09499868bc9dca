//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mangashelf_core` linkage.
//! - Print a deterministic layout summary of the seed collection.

use mangashelf_core::host::{default_dist_dir, LaunchMode, LaunchTarget};
use mangashelf_core::{compute_layout, seed_collection, LayoutConfig};

fn main() {
    println!("mangashelf_core ping={}", mangashelf_core::ping());
    println!("mangashelf_core version={}", mangashelf_core::core_version());

    let target = LaunchTarget::resolve(LaunchMode::from_env(), &default_dist_dir());
    println!(
        "launch mode={:?} url={} devtools={}",
        target.mode, target.url, target.open_devtools
    );

    let seed = seed_collection();
    match compute_layout(&seed, &LayoutConfig::default()) {
        Ok(layout) => {
            println!(
                "seed layout shelves={} spines={} dropped={}",
                layout.shelf_count(),
                layout.spine_count(),
                layout.dropped.len()
            );
            for shelf in &layout.shelves {
                let titles: Vec<&str> = seed
                    .iter()
                    .filter(|series| {
                        layout
                            .placements_for(&series.id)
                            .any(|placement| placement.shelf_index == shelf.index)
                    })
                    .map(|series| series.title.as_str())
                    .collect();
                println!(
                    "shelf={} y={:.2} spines={} series={}",
                    shelf.index,
                    shelf.position.y,
                    layout.placements_on_shelf(shelf.index).count(),
                    titles.join("|")
                );
            }
        }
        Err(err) => {
            eprintln!("seed layout failed: {err}");
            std::process::exit(1);
        }
    }
}
