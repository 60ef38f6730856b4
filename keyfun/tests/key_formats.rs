#![allow(non_snake_case)]
use keyfun::{
    Curve,
    keys::*,
    proptest::{non_zero_scalar as any_secret, point, private_key_format, public_key_format},
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn private_key_format_is_detected(x in any_secret(), format in private_key_format()) {
        let curve = Curve::secp256k1();
        let encoded = encode_private_key(&x, format, 0x00).unwrap();
        prop_assert_eq!(detect_private_key_format(&encoded).unwrap(), format);
        prop_assert_eq!(decode_private_key(&curve, &encoded, None).unwrap(), x.clone());
        prop_assert!(is_private_key(&curve, &encoded));
    }

    #[test]
    fn conversion_keeps_the_scalar(
        x in any_secret(),
        from in private_key_format(),
        to in private_key_format(),
    ) {
        let curve = Curve::secp256k1();
        let encoded = encode_private_key(&x, from, 0x00).unwrap();
        let converted = convert_private_key(&curve, &encoded, to).unwrap();
        prop_assert_eq!(&converted, &encode_private_key(&x, to, 0x00).unwrap());
    }

    #[test]
    fn public_key_format_is_detected(X in point(), format in public_key_format()) {
        let curve = Curve::secp256k1();
        let encoded = encode_public_key(&X, format);
        prop_assert_eq!(detect_public_key_format(&encoded).unwrap(), format);
        prop_assert_eq!(decode_public_key(&curve, &encoded, None).unwrap(), X);
    }

    #[test]
    fn compression_is_idempotent(X in point(), format in public_key_format()) {
        let curve = Curve::secp256k1();
        let encoded = encode_public_key(&X, format);
        let compressed = compress_public_key(&curve, &encoded).unwrap();
        prop_assert!(detect_public_key_format(&compressed).unwrap().is_compressed());
        prop_assert_eq!(&compress_public_key(&curve, &compressed).unwrap(), &compressed);
        let decompressed = decompress_public_key(&curve, &compressed).unwrap();
        prop_assert_eq!(decode_public_key(&curve, &decompressed, None).unwrap(), X);
        prop_assert_eq!(&decompress_public_key(&curve, &decompressed).unwrap(), &decompressed);
    }

    #[test]
    fn derived_public_key_matches_compression(x in any_secret(), format in private_key_format()) {
        let curve = Curve::secp256k1();
        let encoded = encode_private_key(&x, format, 0x00).unwrap();
        let public_key = private_key_to_public_key(&curve, &encoded).unwrap();
        let public_format = detect_public_key_format(&public_key).unwrap();
        prop_assert_eq!(public_format, format.public_key_format());
        prop_assert_eq!(public_format.is_compressed(), format.is_compressed());
    }
}
