//! Output → input type compatibility.
//!
//! Anything not on the allow-list is a mismatch. Pairs that an explicit
//! conversion could bridge are still mismatches, flagged `Convertible`.

use crate::parse::types::ParamType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    Convertible,
    Incompatible,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self == Compatibility::Compatible
    }
}

/// Inputs of this custom type accept any output.
const ANY_TYPE: &str = "AnyStruct";

pub fn compatibility(output: &ParamType, input: &ParamType) -> Compatibility {
    use ParamType::*;

    if output == input {
        return Compatibility::Compatible;
    }

    match (output, input) {
        (_, Custom(name)) if name == ANY_TYPE => Compatibility::Compatible,

        (UInt64, UFix64) | (UInt64, Int) => Compatibility::Compatible,
        (Address | UFix64 | Int | UInt64 | Bool, String) => Compatibility::Compatible,

        (UFix64, UInt64 | Int) | (Int, UInt64 | UFix64) => Compatibility::Convertible,
        (String, Address | UFix64 | Int | UInt64 | Bool) => Compatibility::Convertible,

        (Array(out), Array(inp)) => match (out, inp) {
            (Some(out), Some(inp)) => compatibility(out, inp),
            _ => Compatibility::Compatible,
        },
        (Dictionary(out), Dictionary(inp)) => match (out, inp) {
            (Some((out_k, out_v)), Some((in_k, in_v))) => {
                weakest(compatibility(out_k, in_k), compatibility(out_v, in_v))
            }
            _ => Compatibility::Compatible,
        },

        _ => Compatibility::Incompatible,
    }
}

fn weakest(a: Compatibility, b: Compatibility) -> Compatibility {
    match (a, b) {
        (Compatibility::Incompatible, _) | (_, Compatibility::Incompatible) => {
            Compatibility::Incompatible
        }
        (Compatibility::Convertible, _) | (_, Compatibility::Convertible) => {
            Compatibility::Convertible
        }
        _ => Compatibility::Compatible,
    }
}
