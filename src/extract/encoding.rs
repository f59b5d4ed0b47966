//! Tile-distribution encoding extraction
//!
//! `tile_distribution_encoding<RsLengths, HsLengthss, Ps2RHssMajor,
//! Ps2RHssMinor, Ys2RHsMajor, Ys2RHsMinor>` is pure compile-time state: the
//! whole model comes from the type signature, no live fields involved.
//! Standalone sequences and tuples interleave, so classification is
//! positional: the first standalone sequence is RsLengths, the tuples are
//! HsLengthss then the two P mappings, and the last two standalone sequences
//! are the Y mappings.

use super::sequence_values;
use crate::model::DistributionEncoding;
use crate::parse::TypeNode;

/// Extract a [`DistributionEncoding`] from a parsed type signature.
pub fn extract_encoding(ty: &TypeNode) -> DistributionEncoding {
    let Some(node) = ty.find("tile_distribution_encoding") else {
        return DistributionEncoding::default();
    };

    let mut encoding = DistributionEncoding::default();

    let mut standalone: Vec<&TypeNode> = Vec::new();
    let mut tuples: Vec<&TypeNode> = Vec::new();
    for arg in &node.args {
        match arg.base_name() {
            "sequence" => standalone.push(arg),
            "tuple" => tuples.push(arg),
            _ => {}
        }
    }

    if let Some(rs) = standalone.first() {
        encoding.rs_lengths = sequence_values(rs);
    }
    // The trailing pair of standalone sequences is the Y mapping; with fewer
    // than three sequences the encoding is truncated and the Ys stay empty.
    if standalone.len() >= 3 {
        encoding.ys_to_rhs_major = sequence_values(standalone[standalone.len() - 2]);
        encoding.ys_to_rhs_minor = sequence_values(standalone[standalone.len() - 1]);
    }

    if let Some(hs) = tuples.first() {
        encoding.hs_lengthss = hs.args.iter().map(sequence_values).collect();
    }
    if let Some(ps_major) = tuples.get(1) {
        encoding.ps_to_rhs_major = ps_major.args.iter().map(sequence_values).collect();
    }
    if let Some(ps_minor) = tuples.get(2) {
        encoding.ps_to_rhs_minor = ps_minor.args.iter().map(sequence_values).collect();
    }

    encoding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_type;

    const ENCODING: &str = "ck_tile::tile_distribution_encoding<\
        ck_tile::sequence<1>, \
        ck_tile::tuple<ck_tile::sequence<4, 64>, ck_tile::sequence<4, 64>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<2>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<1>>, \
        ck_tile::sequence<1, 2>, \
        ck_tile::sequence<0, 0>>";

    #[test]
    fn test_full_encoding() {
        let ty = parse_type(ENCODING).unwrap();
        let encoding = extract_encoding(&ty.root);

        assert_eq!(encoding.rs_lengths, vec![1]);
        assert_eq!(encoding.hs_lengthss, vec![vec![4, 64], vec![4, 64]]);
        assert_eq!(encoding.ps_to_rhs_major, vec![vec![1], vec![2]]);
        assert_eq!(encoding.ps_to_rhs_minor, vec![vec![1], vec![1]]);
        assert_eq!(encoding.ys_to_rhs_major, vec![1, 2]);
        assert_eq!(encoding.ys_to_rhs_minor, vec![0, 0]);

        assert_eq!(encoding.ndim_r(), 1);
        assert_eq!(encoding.ndim_x(), 2);
        assert_eq!(encoding.ndim_p(), 2);
        assert_eq!(encoding.ndim_y(), 2);
    }

    #[test]
    fn test_rh_length_resolution() {
        let ty = parse_type(ENCODING).unwrap();
        let encoding = extract_encoding(&ty.root);

        // Major 0 selects R, major n selects H sequence n-1
        assert_eq!(encoding.rh_length(0, 0), Some(1));
        assert_eq!(encoding.rh_length(1, 1), Some(64));
        assert_eq!(encoding.rh_length(2, 0), Some(4));
    }

    #[test]
    fn test_nested_inside_other_type() {
        let sig = format!("ck_tile::tile_distribution<{ENCODING}, void>");
        let ty = parse_type(&sig).unwrap();
        let encoding = extract_encoding(&ty.root);
        assert_eq!(encoding.rs_lengths, vec![1]);
    }

    #[test]
    fn test_truncated_encoding_degrades() {
        let ty = parse_type("ck_tile::tile_distribution_encoding<ck_tile::sequence<2>>").unwrap();
        let encoding = extract_encoding(&ty.root);
        assert_eq!(encoding.rs_lengths, vec![2]);
        assert!(encoding.ys_to_rhs_major.is_empty());
        assert!(encoding.hs_lengthss.is_empty());
    }

    #[test]
    fn test_missing_encoding_is_default() {
        let ty = parse_type("ck_tile::tuple<int>").unwrap();
        let encoding = extract_encoding(&ty.root);
        assert_eq!(encoding, DistributionEncoding::default());
    }
}
