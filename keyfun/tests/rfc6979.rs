use keyfun::{Curve, Scalar, hash::sha256, nonce::{Deterministic, NonceGen, deterministic_nonce}};
use num_bigint::BigUint;

// (secret, k) where the digest is SHA-256 of the secret written in decimal.
const VECTORS: [(u32, &str); 10] = [
    (0, "32783320859482229023646250050688645858316445811207841524283044428614360139869"),
    (1, "109592113955144883013243055602231029997040992035200230706187150761552110229971"),
    (2, "65765393578006003630736298397268097590176526363988568884298609868706232621488"),
    (3, "85563144787585457107933685459469453513056530050186673491900346620874099325918"),
    (4, "99829559501561741463404068005537785834525504175465914981205926165214632019533"),
    (5, "7755945018790142325513649272940177083855222863968691658328003977498047013576"),
    (6, "81516639518483202269820502976089105897400159721845694286620077204726637043798"),
    (7, "52824159213002398817852821148973968315579759063230697131029801896913602807019"),
    (8, "44033460667645047622273556650595158811264350043302911918907282441675680538675"),
    (9, "32396602643737403620316035551493791485834117358805817054817536312402837398361"),
];

fn secret_bytes(i: u32) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&i.to_be_bytes());
    bytes
}

#[test]
fn raw_nonce_vectors() {
    for (i, expected) in VECTORS {
        let digest = sha256(i.to_string().as_bytes());
        let k = deterministic_nonce(&digest, &secret_bytes(i));
        assert_eq!(k.to_string(), expected, "secret {}", i);
    }
}

#[test]
fn deterministic_stream_starts_with_raw_nonce() {
    let curve = Curve::secp256k1();
    for (i, expected) in VECTORS.into_iter().skip(1) {
        let secret = Scalar::from_biguint(&curve, BigUint::from(i));
        let digest = sha256(i.to_string().as_bytes());
        let k = Deterministic
            .nonces(&curve, &secret, &digest)
            .next()
            .unwrap();
        assert_eq!(k.as_biguint().to_string(), expected);
    }
}

#[test]
fn small_order_nonces_are_truncated() {
    // 14-bit order: every candidate must be below it
    let curve = Curve::new(
        BigUint::from(10007u32),
        BigUint::from(9871u32),
        BigUint::from(3u32),
        BigUint::from(17u32),
        BigUint::from(3u32),
        BigUint::from(8790u32),
    )
    .unwrap();
    let secret = Scalar::from_biguint(&curve, BigUint::from(1234u32));
    let digest = sha256(b"truncate me");
    let nonces: Vec<_> = Deterministic.nonces(&curve, &secret, &digest).take(20).collect();
    assert!(nonces.iter().all(|k| !k.is_zero() && k.as_biguint() < curve.n()));
    assert!(nonces.windows(2).any(|pair| pair[0] != pair[1]));
}
