// Benchmark for subject lookups against full-store scans

use graphrdf::{Namespace, RdfStore, StoreConfig, Term, Triple, TriplePattern};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const PEOPLE: usize = 2_000;

fn populate(store: &RdfStore, people: &Namespace, rels: &Namespace) {
    for i in 0..PEOPLE {
        let person = people.term(&format!("p{}", i));
        store
            .add(&Triple::new(
                person.clone(),
                rels.term("named"),
                Term::literal(format!("Person {}", i)),
            ))
            .unwrap();
        store
            .add(&Triple::new(
                person,
                rels.term("knows"),
                people.term(&format!("p{}", (i + 1) % PEOPLE)),
            ))
            .unwrap();
    }
}

fn time<F: FnMut() -> usize>(label: &str, runs: u32, mut f: F) -> Duration {
    let mut total = Duration::ZERO;
    let mut count = 0;
    for _ in 0..runs {
        let start = Instant::now();
        count = f();
        total += start.elapsed();
    }
    let average = total / runs;
    println!(
        "  {}: {:?} ({:.3} ms, {} triples)",
        label,
        average,
        average.as_secs_f64() * 1000.0,
        count
    );
    average
}

fn run(store: &RdfStore, people: &Namespace, rels: &Namespace) {
    let start = Instant::now();
    populate(store, people, rels);
    let load = start.elapsed();
    println!("  Load {} triples: {:.2} ms", PEOPLE * 2, load.as_secs_f64() * 1000.0);

    let subject = TriplePattern::new(Some(people.term("p42")), None, None);
    let lookup = time("Subject lookup (10 runs average)", 10, || {
        store.triples(&subject).unwrap().count()
    });

    let by_predicate = TriplePattern::new(None, Some(rels.term("knows")), None);
    time("Predicate scan (10 runs average)", 10, || {
        store.triples(&by_predicate).unwrap().count()
    });

    let scan = time("Full scan (10 runs average)", 10, || store.len().unwrap());
    println!(
        "  Full scan / lookup: {:.1}x\n",
        scan.as_secs_f64() / lookup.as_secs_f64().max(f64::EPSILON)
    );
}

fn main() {
    println!("=== GraphRDF Lookup Benchmark ===\n");

    let people = Namespace::new("http://www.example.org/people#");
    let rels = Namespace::new("http://www.example.org/relations/");

    println!("Memory store");
    let mut store = RdfStore::new(StoreConfig::default());
    store.open(None, true).unwrap();
    store.bind("people", people.as_str());
    run(&store, &people, &rels);

    println!("Sled store");
    let temp_dir = TempDir::new().unwrap();
    let mut store = RdfStore::new(StoreConfig::sled(temp_dir.path().join("db")));
    store.open(None, true).unwrap();
    store.bind("people", people.as_str());
    run(&store, &people, &rels);
    store.close().unwrap();
}
