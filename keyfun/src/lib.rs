#![doc = include_str!("../README.md")]
#![allow(non_snake_case)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
pub mod base58;
pub mod hash;
pub mod hex;
pub mod keys;
pub mod modular;
pub mod nonce;
pub mod op;

pub use digest;
pub use num_bigint;
pub use rand_core;

mod backend;
mod curve;
mod error;
mod point;
mod scalar;

pub use curve::{Curve, MAX_BITS};
#[cfg(feature = "serde")]
pub use curve::CurveParams;
pub use error::{ChecksumError, DomainError, Error};
pub use point::Point;
pub use scalar::Scalar;

#[cfg(feature = "serde")]
pub extern crate serde;

#[cfg(feature = "proptest")]
#[cfg_attr(docsrs, doc(cfg(feature = "proptest")))]
pub mod proptest;
