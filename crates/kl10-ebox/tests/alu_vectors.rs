//! ALU slice tests against pre-computed 10181 vectors.
//!
//! `test-data/alu10181.json` holds 512 vectors: every function code
//! against four operand patterns with both carry-in values, generated
//! from the reference chip's truth table. Word values are octal strings,
//! the way a listing would print them.

use kl10_ebox::alu;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Vector {
    f: String,
    a: String,
    b: String,
    cin: u8,
    value: String,
    cout: u8,
}

fn octal(s: &str) -> u64 {
    u64::from_str_radix(s, 8).expect("octal literal in vector file")
}

#[test]
fn slice_matches_the_reference_vectors() {
    let vectors: Vec<Vector> =
        serde_json::from_str(include_str!("../test-data/alu10181.json")).expect("vector file");
    assert_eq!(vectors.len(), 512);

    for v in &vectors {
        let f = octal(&v.f) as u8;
        let out = alu::eval(f, octal(&v.a), octal(&v.b), v.cin != 0, 36);
        assert_eq!(
            out.value,
            octal(&v.value),
            "code {f:02o} a={} b={} cin={}",
            v.a,
            v.b,
            v.cin
        );
        assert_eq!(
            u8::from(out.cout),
            v.cout,
            "carry of code {f:02o} a={} b={} cin={}",
            v.a,
            v.b,
            v.cin
        );
    }
}

#[test]
fn boolean_half_of_the_vectors_never_carries() {
    let vectors: Vec<Vector> =
        serde_json::from_str(include_str!("../test-data/alu10181.json")).expect("vector file");
    for v in vectors.iter().filter(|v| octal(&v.f) >= 0o40) {
        assert_eq!(v.cout, 0);
    }
}
