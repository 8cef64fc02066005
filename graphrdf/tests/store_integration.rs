// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Integration tests for store lifecycle, persistence and graph store seams

#[cfg(test)]
mod store_integration {
    use graphrdf::{
        Attributes, Direction, GraphDataStore, GraphStore, Namespace, Node, NodeObserver,
        NodeRef, RdfError, RdfStore, Relationship, StorageDriverError, StorageType, StoreConfig,
        Term, Triple, TriplePattern,
    };
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const PEOPLE: &str = "http://www.example.org/people#";
    const THINGS: &str = "http://www.example.org/things#";
    const RELATIONS: &str = "http://www.example.org/relations/";

    fn bind_all(store: &RdfStore) {
        store.bind("people", PEOPLE);
        store.bind("things", THINGS);
        store.bind("relations", RELATIONS);
    }

    fn add_stuff(store: &RdfStore) -> Vec<Triple> {
        let p = Namespace::new(PEOPLE);
        let t = Namespace::new(THINGS);
        let r = Namespace::new(RELATIONS);
        let triples = vec![
            Triple::new(p.term("tarek"), r.term("likes"), t.term("pizza")),
            Triple::new(p.term("tarek"), r.term("likes"), t.term("cheese")),
            Triple::new(p.term("michel"), r.term("likes"), t.term("pizza")),
            Triple::new(p.term("michel"), r.term("likes"), t.term("cheese")),
            Triple::new(p.term("bob"), r.term("likes"), t.term("cheese")),
            Triple::new(p.term("bob"), r.term("hates"), t.term("pizza")),
            Triple::new(p.term("bob"), r.term("hates"), p.term("michel")),
            Triple::new(p.term("bob"), r.term("named"), Term::literal("Bob")),
        ];
        for triple in &triples {
            store.add(triple).expect("Failed to add triple");
        }
        triples
    }

    fn count(store: &RdfStore, s: Option<Term>, p: Option<Term>, o: Option<Term>) -> usize {
        store
            .triples(&TriplePattern::new(s, p, o))
            .expect("Store should be open")
            .map(|t| t.expect("Query should succeed"))
            .count()
    }

    #[test]
    fn test_pattern_counts() {
        let mut store = RdfStore::new(StoreConfig::default());
        store.open(None, true).unwrap();
        bind_all(&store);
        let triples = add_stuff(&store);

        let p = Namespace::new(PEOPLE);
        let t = Namespace::new(THINGS);
        let r = Namespace::new(RELATIONS);
        let any = None;

        assert_eq!(count(&store, any.clone(), Some(r.term("likes")), Some(t.term("pizza"))), 2);
        assert_eq!(count(&store, any.clone(), Some(r.term("hates")), Some(t.term("pizza"))), 1);
        assert_eq!(count(&store, any.clone(), Some(r.term("likes")), Some(t.term("cheese"))), 3);
        assert_eq!(count(&store, any.clone(), Some(r.term("hates")), Some(t.term("cheese"))), 0);

        assert_eq!(count(&store, Some(p.term("michel")), Some(r.term("likes")), any.clone()), 2);
        assert_eq!(count(&store, Some(p.term("bob")), Some(r.term("likes")), any.clone()), 1);

        assert_eq!(count(&store, Some(p.term("michel")), any.clone(), Some(t.term("cheese"))), 1);
        assert_eq!(count(&store, Some(p.term("bob")), any.clone(), Some(p.term("michel"))), 1);

        assert_eq!(count(&store, any.clone(), Some(r.term("hates")), any.clone()), 2);
        assert_eq!(count(&store, any.clone(), Some(r.term("likes")), any.clone()), 5);

        assert_eq!(count(&store, Some(p.term("michel")), any.clone(), any.clone()), 2);
        assert_eq!(count(&store, Some(p.term("bob")), any.clone(), any.clone()), 4);

        assert_eq!(count(&store, any.clone(), any.clone(), Some(t.term("cheese"))), 3);
        assert_eq!(count(&store, any.clone(), any.clone(), Some(p.term("michel"))), 1);

        assert_eq!(store.len().unwrap(), 8);
        for triple in &triples {
            assert_eq!(store.remove(&TriplePattern::from(triple)).unwrap(), 1);
        }
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_sled_store_persists_across_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::sled(temp_dir.path().join("graph"));

        let mut store = RdfStore::new(config.clone());
        store.open(None, true).unwrap();
        bind_all(&store);
        add_stuff(&store);
        store.close().unwrap();
        assert!(matches!(store.len(), Err(RdfError::StoreClosed)));

        let mut store = RdfStore::new(config.clone());
        store.open(None, false).unwrap();
        // bindings live with the store instance, data with the graph
        bind_all(&store);
        assert_eq!(store.len().unwrap(), 8);
        assert_eq!(
            count(
                &store,
                Some(Namespace::new(PEOPLE).term("bob")),
                None,
                Some(Term::literal("Bob"))
            ),
            1
        );
        store.close().unwrap();

        let mut store = RdfStore::new(config);
        store.open(None, true).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_unbound_namespace_found_after_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::sled(temp_dir.path().join("graph"));
        let bob = Term::uri("http://ex.org/p#bob");
        let likes = Term::uri("http://ex.org/rel/likes");
        let alice = Term::uri("http://ex.org/p#alice");

        let mut store = RdfStore::new(config.clone());
        store.open(None, true).unwrap();
        store
            .add(&Triple::new(bob.clone(), likes.clone(), alice.clone()))
            .unwrap();
        store.close().unwrap();

        let mut store = RdfStore::new(config);
        store.open(None, false).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        let found: Vec<Triple> = store
            .triples(&TriplePattern::new(Some(bob.clone()), None, None))
            .unwrap()
            .collect::<graphrdf::Result<_>>()
            .unwrap();
        assert_eq!(found, vec![Triple::new(bob, likes, alice)]);
        store.close().unwrap();
    }

    #[test]
    fn test_reopening_an_open_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::sled(temp_dir.path().join("graph"));

        let mut store = RdfStore::new(config);
        store.open(None, true).unwrap();
        bind_all(&store);
        add_stuff(&store);

        store.open(None, false).expect("Reopening should release the old store");
        assert_eq!(store.len().unwrap(), 8);

        store.open(None, true).expect("Recreating should release the old store");
        assert!(store.is_empty().unwrap());
        store.close().unwrap();
    }

    #[test]
    fn test_open_from_settings() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings: HashMap<String, String> = [
            ("graphrdf.storage", "sled"),
            ("graphrdf.path", temp_dir.path().to_str().unwrap()),
            ("graphrdf.rdf_node_namespace_base", "http://nodes.example.org/"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config = StoreConfig::from_settings(&settings).unwrap();

        let mut store = RdfStore::new(StoreConfig::default());
        store.open(Some(config), true).unwrap();
        assert_eq!(store.config().storage, StorageType::Sled);
        assert_eq!(
            store.namespace("node"),
            Some("http://nodes.example.org/".to_string())
        );
        assert_eq!(
            store.node_to_uri(&NodeRef::new("people", "bob")),
            "http://nodes.example.org/people#bob"
        );
    }

    #[test]
    fn test_sled_requires_path() {
        let mut store = RdfStore::new(StoreConfig {
            storage: StorageType::Sled,
            ..StoreConfig::default()
        });
        let err = store.open(None, true).unwrap_err();
        assert!(matches!(err, RdfError::StoreUnavailable(_)));
        assert!(!store.is_open());
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl NodeObserver for Recorder {
        fn on_create(&self, node: &Node) {
            self.events.lock().push(format!("create {}", node.node_ref));
        }

        fn on_delete(&self, node: &Node) {
            self.events.lock().push(format!("delete {}", node.node_ref));
        }

        fn on_modify(&self, node: &Node) {
            self.events.lock().push(format!("modify {}", node.node_ref));
        }
    }

    #[test]
    fn test_mutations_notify_observers() {
        let data_store = Arc::new(GraphDataStore::in_memory().unwrap());
        let recorder = Arc::new(Recorder::default());
        data_store.add_observer(recorder.clone());

        let store = RdfStore::with_data_store(StoreConfig::default(), data_store);
        bind_all(&store);
        let p = Namespace::new(PEOPLE);
        let r = Namespace::new(RELATIONS);
        store
            .add(&Triple::new(p.term("bob"), r.term("named"), Term::literal("Bob")))
            .unwrap();
        store
            .remove(&TriplePattern::new(Some(p.term("bob")), Some(r.term("named")), None))
            .unwrap();

        assert_eq!(
            *recorder.events.lock(),
            vec!["create people/bob", "modify people/bob", "modify people/bob"]
        );
    }

    /// Graph store wrapper that counts node reads and can be told to fail
    struct InstrumentedStore {
        inner: GraphDataStore,
        node_reads: AtomicUsize,
        fail: AtomicBool,
    }

    impl InstrumentedStore {
        fn new() -> Self {
            Self {
                inner: GraphDataStore::in_memory().unwrap(),
                node_reads: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }

        fn check(&self) -> graphrdf::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageDriverError::BackendSpecific("store is down".to_string()).into());
            }
            Ok(())
        }
    }

    impl GraphStore for InstrumentedStore {
        fn get_node(&self, node_type: &str, key: &str) -> graphrdf::Result<Node> {
            self.node_reads.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.get_node(node_type, key)
        }

        fn get_nodes(&self, node_type: &str, keys: &[String]) -> graphrdf::Result<Vec<Node>> {
            self.inner.get_nodes(node_type, keys)
        }

        fn create_node(
            &self,
            node_type: &str,
            key: &str,
            attributes: Attributes,
        ) -> graphrdf::Result<Node> {
            self.inner.create_node(node_type, key, attributes)
        }

        fn get_reference_node(&self, node_type: Option<&str>) -> graphrdf::Result<Node> {
            self.inner.get_reference_node(node_type)
        }

        fn save_node(&self, node: &Node) -> graphrdf::Result<()> {
            self.inner.save_node(node)
        }

        fn delete_node(&self, node: &NodeRef) -> graphrdf::Result<()> {
            self.inner.delete_node(node)
        }

        fn create_relationship(
            &self,
            rel_type: &str,
            source: &NodeRef,
            target: &NodeRef,
            attributes: Attributes,
        ) -> graphrdf::Result<Relationship> {
            self.inner
                .create_relationship(rel_type, source, target, attributes)
        }

        fn get_relationship(&self, rel_type: &str, key: &str) -> graphrdf::Result<Relationship> {
            self.inner.get_relationship(rel_type, key)
        }

        fn relationships(
            &self,
            node: &NodeRef,
            rel_type: Option<&str>,
            direction: Direction,
        ) -> graphrdf::Result<Vec<Relationship>> {
            self.check()?;
            self.inner.relationships(node, rel_type, direction)
        }

        fn save_relationship(&self, rel: &Relationship) -> graphrdf::Result<()> {
            self.inner.save_relationship(rel)
        }

        fn delete_relationship(&self, rel: &Relationship) -> graphrdf::Result<()> {
            self.inner.delete_relationship(rel)
        }

        fn add_observer(&self, observer: Arc<dyn NodeObserver>) {
            self.inner.add_observer(observer)
        }

        fn truncate(&self) -> graphrdf::Result<()> {
            self.inner.truncate()
        }

        fn flush(&self) -> graphrdf::Result<()> {
            self.inner.flush()
        }
    }

    fn instrumented() -> (Arc<InstrumentedStore>, RdfStore) {
        let data_store = Arc::new(InstrumentedStore::new());
        let store = RdfStore::with_data_store(StoreConfig::default(), data_store.clone());
        bind_all(&store);
        add_stuff(&store);
        data_store.node_reads.store(0, Ordering::SeqCst);
        (data_store, store)
    }

    #[test]
    fn test_scan_is_lazy() {
        let (data_store, store) = instrumented();

        let mut iter = store.triples(&TriplePattern::any()).unwrap();
        assert_eq!(data_store.node_reads.load(Ordering::SeqCst), 0);

        iter.next().unwrap().unwrap();
        let after_first = data_store.node_reads.load(Ordering::SeqCst);
        assert!(after_first >= 1);
        drop(iter);

        let total: usize = store.triples(&TriplePattern::any()).unwrap().count();
        assert_eq!(total, 8);
        let full = data_store.node_reads.load(Ordering::SeqCst) - after_first;
        assert!(after_first < full, "{} reads for one triple, {} for all", after_first, full);
    }

    #[test]
    fn test_store_failure_is_yielded_once() {
        let (data_store, store) = instrumented();
        data_store.fail.store(true, Ordering::SeqCst);

        let results: Vec<graphrdf::Result<Triple>> =
            store.triples(&TriplePattern::any()).unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(RdfError::StoreUnavailable(_))));

        assert!(store.len().is_err());
        data_store.fail.store(false, Ordering::SeqCst);
        assert_eq!(store.len().unwrap(), 8);
    }

    #[test]
    fn test_truncate_empties_the_view() {
        let (data_store, store) = instrumented();
        data_store.truncate().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
