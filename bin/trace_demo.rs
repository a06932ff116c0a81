//! Demonstration workload: a few sequential functions plus a burst of
//! threads, all instrumented. Run it, then load `results.json` at
//! `chrome://tracing`.

use colored::Colorize;
use tracelite::{profile_function, profile_scope, Instrumentor, DEFAULT_TRACE_PATH};

fn count_primes(limit: u64) -> usize {
    profile_function!();
    (2..limit)
        .filter(|&n| (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0))
        .count()
}

fn sum_of_roots(n: u64) -> f64 {
    profile_function!();
    (1..=n).map(|i| (i as f64).sqrt()).sum()
}

fn run_workloads() {
    profile_function!();

    count_primes(20_000);
    sum_of_roots(5_000_000);

    {
        profile_scope!("threaded burst");
        let handles: Vec<_> = (0..3u64)
            .map(|i| std::thread::spawn(move || count_primes(10_000 + i * 2_000)))
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}

fn main() {
    println!(
        "{}\n{}",
        "============================================================".red(),
        "Running instrumented workloads...".cyan()
    );

    Instrumentor::global().begin_session("demo");
    run_workloads();
    Instrumentor::global().end_session();

    println!(
        "{}",
        format!("Trace saved to file: {}", DEFAULT_TRACE_PATH).green()
    );
}
