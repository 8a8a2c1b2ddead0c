use std::collections::BTreeSet;
use std::thread;

use provenant_core::{
    ContentHash, Identity, ItemId, MemorySink, NewItem, Price, Registry, RegistryConfig,
    RegistryError, SharedRegistry, SystemClock,
};

fn id(s: &str) -> Identity {
    Identity::parse(s).unwrap()
}

fn item(n: usize) -> NewItem {
    NewItem {
        name: format!("Item {}", n),
        description: "bronze".into(),
        origin: "Benin".into(),
        year_of_creation: 1600,
        doc_hash: ContentHash::parse("hashB").unwrap(),
    }
}

fn shared() -> SharedRegistry {
    SharedRegistry::new(
        Registry::create(
            id("human:admin"),
            RegistryConfig::default(),
            Box::new(SystemClock),
            MemorySink::new(),
        )
        .unwrap(),
    )
}

#[test]
fn test_concurrent_registrations_get_distinct_sequential_ids() {
    let registry = shared();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let registry = registry.clone();
            thread::spawn(move || {
                let caller = Identity::parse(format!("agent:worker{}", t)).unwrap();
                (0..25)
                    .map(|n| registry.register_item(&caller, item(n)).unwrap().get())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        for raw in handle.join().unwrap() {
            assert!(ids.insert(raw), "id {} assigned twice", raw);
        }
    }
    assert_eq!(ids, (1..=200).collect::<BTreeSet<u64>>());
    assert_eq!(registry.get_total_items(), 200);
    registry.read(|r| assert_eq!(r.sink().events().len(), 201));
}

#[test]
fn test_racing_verifiers_verify_exactly_once() {
    let registry = shared();
    let admin = id("human:admin");
    let item_id = registry.register_item(&id("human:owner"), item(0)).unwrap();
    let verifiers: Vec<Identity> = (0..6)
        .map(|n| Identity::parse(format!("org:lab{}", n)).unwrap())
        .collect();
    for v in &verifiers {
        registry.authorize_verifier(&admin, v).unwrap();
    }

    let handles: Vec<_> = verifiers
        .into_iter()
        .map(|v| {
            let registry = registry.clone();
            thread::spawn(move || registry.verify_item(&v, item_id))
        })
        .collect();

    let results: Vec<Result<(), RegistryError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RegistryError::AlreadyVerified(_))));
    assert!(registry.get_verification_status(item_id).unwrap().verified);
}

#[test]
fn test_racing_transfers_from_same_owner_apply_once() {
    let registry = shared();
    let owner = id("human:owner");
    let item_id = registry.register_item(&owner, item(0)).unwrap();

    let handles: Vec<_> = (0..6)
        .map(|n| {
            let registry = registry.clone();
            let owner = owner.clone();
            thread::spawn(move || {
                let buyer = Identity::parse(format!("human:buyer{}", n)).unwrap();
                registry.transfer_ownership(&owner, item_id, &buyer, Price::new(n as u64))
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();
    assert_eq!(successes, 1);

    let history = registry.get_ownership_history(ItemId::new(1)).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[1].owner,
        registry.get_item(item_id).unwrap().current_owner
    );
}
