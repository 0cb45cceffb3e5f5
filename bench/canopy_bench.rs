//! Summary: Timing harness for the tree engines, writing CSV result files.
//! Copyright (c) YOAB. All rights reserved.
//!
//! For each engine kind the harness times insert, lookup and remove at ten
//! growing sizes and writes `count,time_us` rows to
//! `bench-results/<kind>/{insert,lookup,remove}.csv`. Lookups and removals
//! run up to 100 000 uniformly random queries against a freshly populated
//! tree.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Instant;

use canopy::{Associative, BPlusTree, BTree, Record};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Upper bound on random queries per measurement step.
const MAX_QUERIES: usize = 100_000;

/// Number of growing size steps per operation.
const STEPS: usize = 10;

fn main() {
    let count = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(100_000);

    println!("=== Canopy Benchmark ({count} keys) ===");
    println!();

    if let Err(err) = run_engine::<BTree<u64, u64>>("btree", count) {
        eprintln!("btree benchmark failed: {err}");
        std::process::exit(1);
    }
    if let Err(err) = run_engine::<BPlusTree<u64, u64>>("bplustree", count) {
        eprintln!("bplustree benchmark failed: {err}");
        std::process::exit(1);
    }

    println!();
    println!("CSV written under bench-results/");
}

fn run_engine<C: Associative<u64, u64> + Default>(
    kind: &str,
    count: usize,
) -> std::io::Result<()> {
    let dir = Path::new("bench-results").join(kind);
    fs::create_dir_all(&dir)?;
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    launch_insertions::<C>(&dir, count, &mut rng)?;
    launch_lookups::<C>(&dir, count, &mut rng)?;
    launch_removals::<C>(&dir, count, &mut rng)?;
    Ok(())
}

/// Keys `0..count` in shuffled order, so every insert succeeds exactly once.
fn unique_set(count: usize, rng: &mut StdRng) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..count as u64).collect();
    keys.shuffle(rng);
    keys
}

fn launch_insertions<C: Associative<u64, u64> + Default>(
    dir: &Path,
    count: usize,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let data = unique_set(count, rng);
    let mut csv = String::from("count,time_us\n");

    for i in 1..=STEPS {
        let n = count * i / STEPS;
        let mut tree = C::default();

        let start = Instant::now();
        for &key in &data[..n] {
            let _ = tree.insert(Record::Entry(key, key));
        }
        let elapsed = start.elapsed();

        let _ = writeln!(csv, "{n},{}", elapsed.as_micros());
        if i == STEPS {
            let ops_per_sec = n as f64 / elapsed.as_secs_f64();
            println!(
                "{}: insert {n} keys: {:?} ({:.0} ops/sec)",
                dir.display(),
                elapsed,
                ops_per_sec
            );
        }
    }
    fs::write(dir.join("insert.csv"), csv)
}

fn launch_lookups<C: Associative<u64, u64> + Default>(
    dir: &Path,
    count: usize,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let data = unique_set(count, rng);
    let mut csv = String::from("count,time_us\n");

    for i in 1..=STEPS {
        let n = count * i / STEPS;
        let mut tree = C::default();
        for &key in &data[..n] {
            let _ = tree.insert(Record::Entry(key, key));
        }

        let query_count = n.min(MAX_QUERIES);
        let queries: Vec<u64> = (0..query_count)
            .map(|_| data[rng.gen_range(0..n)])
            .collect();

        let mut hits = 0usize;
        let start = Instant::now();
        for key in &queries {
            if tree.contains(key) {
                hits += 1;
            }
        }
        let elapsed = start.elapsed();
        assert_eq!(hits, query_count, "populated keys must all be found");

        let _ = writeln!(csv, "{n},{}", elapsed.as_micros());
        if i == STEPS {
            let ops_per_sec = query_count as f64 / elapsed.as_secs_f64();
            println!(
                "{}: lookup {query_count} of {n}: {:?} ({:.0} ops/sec)",
                dir.display(),
                elapsed,
                ops_per_sec
            );
        }
    }
    fs::write(dir.join("lookup.csv"), csv)
}

fn launch_removals<C: Associative<u64, u64> + Default>(
    dir: &Path,
    count: usize,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let data = unique_set(count, rng);
    let mut csv = String::from("count,time_us\n");

    for i in 1..=STEPS {
        let n = count * i / STEPS;
        let mut tree = C::default();
        for &key in &data[..n] {
            let _ = tree.insert(Record::Entry(key, key));
        }

        let query_count = n.min(MAX_QUERIES);
        // Duplicate queries are fine: removing an absent key is a no-op.
        let queries: Vec<u64> = (0..query_count)
            .map(|_| data[rng.gen_range(0..n)])
            .collect();

        let start = Instant::now();
        for key in &queries {
            let _ = tree.remove(key);
        }
        let elapsed = start.elapsed();

        let _ = writeln!(csv, "{n},{}", elapsed.as_micros());
        if i == STEPS {
            let ops_per_sec = query_count as f64 / elapsed.as_secs_f64();
            println!(
                "{}: remove {query_count} of {n}: {:?} ({:.0} ops/sec)",
                dir.display(),
                elapsed,
                ops_per_sec
            );
        }
    }
    fs::write(dir.join("remove.csv"), csv)
}
