use provenant_canonical::{
    compute_event_id, ContentHash, Digest, DigestAlg, Identity, Price, Timestamp,
};
use serde_json::json;

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest {
        alg: DigestAlg::Sha256,
        b64: "Zm9vYmFy".into(),
    };

    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","b64":"Zm9vYmFy"}"#
    );
}

#[test]
fn identifiers_serialize_transparently() {
    let value = json!({
        "owner": Identity::parse("human:alice").unwrap(),
        "doc_hash": ContentHash::parse("hashA").unwrap(),
        "at": Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap(),
        "price": Price::new(500),
    });

    assert_eq!(
        value,
        json!({
            "owner": "human:alice",
            "doc_hash": "hashA",
            "at": "2024-01-01T00:00:00.000Z",
            "price": "500"
        })
    );
}

#[test]
fn event_id_is_stable_for_golden_input() {
    let event = json!({
        "seq": 1,
        "occurred_at": "2024-01-01T00:00:00.000Z",
        "actor": "human:admin",
        "payload": { "kind": "registry_created", "admin": "human:admin" }
    });

    let first = compute_event_id(&event).unwrap();
    let second = compute_event_id(&event).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.alg, DigestAlg::Sha256);
    assert!(Digest::new(DigestAlg::Sha256, first.b64.clone()).is_ok());
}
