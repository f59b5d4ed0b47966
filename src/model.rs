//! Domain model for extracted tile-transformation state
//!
//! These types are what the extractor recovers from a live value: a
//! [`Descriptor`] is a chain of [`Transform`]s mapping bottom storage
//! dimensions to top logical dimensions. Everything here is transient,
//! built per inspection request and discarded after rendering. All fields
//! that are independently extractable carry `Option` so a single unreadable
//! field never poisons its siblings.

use serde::Serialize;

/// The closed set of dimension-transform kinds in the tile library.
///
/// `Unknown` is the documented fallback arm: unrecognized transform types
/// degrade to raw field dumps instead of failing the whole descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransformKind {
    PassThrough,
    Embed,
    Unmerge,
    Merge,
    MergeV2,
    Replicate,
    Pad,
    LeftPad,
    RightPad,
    Slice,
    Freeze,
    Xor,
    Unknown,
}

impl TransformKind {
    /// Classify a transform type's base name.
    ///
    /// Ordering is load-bearing: `merge_v2_magic_division` must be checked
    /// before `merge`, and `left_pad`/`right_pad` before `pad`, or the generic
    /// name swallows the specific one.
    pub fn from_type_name(base_name: &str) -> Self {
        const PATTERNS: &[(&str, TransformKind)] = &[
            ("merge_v2_magic_division", TransformKind::MergeV2),
            ("merge_v2", TransformKind::MergeV2),
            ("pass_through", TransformKind::PassThrough),
            ("embed", TransformKind::Embed),
            ("unmerge", TransformKind::Unmerge),
            ("merge", TransformKind::Merge),
            ("replicate", TransformKind::Replicate),
            ("right_pad", TransformKind::RightPad),
            ("left_pad", TransformKind::LeftPad),
            ("pad", TransformKind::Pad),
            ("slice", TransformKind::Slice),
            ("freeze", TransformKind::Freeze),
            ("xor", TransformKind::Xor),
        ];
        for (pattern, kind) in PATTERNS {
            if base_name.starts_with(pattern) {
                return *kind;
            }
        }
        TransformKind::Unknown
    }

    /// Stable display label, matching the library's own naming
    pub fn label(&self) -> &'static str {
        match self {
            TransformKind::PassThrough => "pass_through",
            TransformKind::Embed => "embed",
            TransformKind::Unmerge => "unmerge",
            TransformKind::Merge => "merge",
            TransformKind::MergeV2 => "merge_v2",
            TransformKind::Replicate => "replicate",
            TransformKind::Pad => "pad",
            TransformKind::LeftPad => "left_pad",
            TransformKind::RightPad => "right_pad",
            TransformKind::Slice => "slice",
            TransformKind::Freeze => "freeze",
            TransformKind::Xor => "xor",
            TransformKind::Unknown => "unknown",
        }
    }
}

/// One dimension-remapping step within a descriptor's chain.
///
/// `lower_dims`/`upper_dims` are hidden dimension ids; the optional parameter
/// lists are populated per kind when the live value exposes them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transform {
    pub kind: TransformKind,
    pub lower_dims: Vec<i64>,
    pub upper_dims: Vec<i64>,
    pub up_lengths: Option<Vec<i64>>,
    pub low_lengths: Option<Vec<i64>>,
    pub coefficients: Option<Vec<i64>>,
    pub left_pad_length: Option<i64>,
    pub right_pad_length: Option<i64>,
}

impl Transform {
    /// A bare transform of the given kind with no parameters resolved yet
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            lower_dims: Vec::new(),
            upper_dims: Vec::new(),
            up_lengths: None,
            low_lengths: None,
            coefficients: None,
            left_pad_length: None,
            right_pad_length: None,
        }
    }

    /// Placeholder substituted when a single transform's extraction fails;
    /// the rest of the descriptor keeps extracting.
    pub fn placeholder() -> Self {
        Self::new(TransformKind::Unknown)
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == TransformKind::Unknown
            && self.lower_dims.is_empty()
            && self.upper_dims.is_empty()
    }
}

/// How a set of bottom storage dimensions maps, through a transform chain,
/// to a set of top logical dimensions.
///
/// Transforms are in storage order, which is also topological order: every
/// dimension id a transform references was produced by an earlier transform
/// or is a bottom/top id. Count fields are `Option` because each live field
/// is independently extractable-or-unavailable; the id lists likewise, so an
/// empty-but-read list (`Some(vec![])`) stays distinct from an unreadable one.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Descriptor {
    pub element_space_size: Option<i64>,
    pub ntransform: Option<i64>,
    pub ndim_hidden: Option<i64>,
    pub ndim_top: Option<i64>,
    pub ndim_bottom: Option<i64>,
    pub bottom_dimension_ids: Option<Vec<i64>>,
    pub top_dimension_ids: Option<Vec<i64>>,
    pub transforms: Vec<Transform>,
}

impl Descriptor {
    /// Bottom ids for flow analysis; unavailable reads as empty
    pub fn bottom_ids(&self) -> &[i64] {
        self.bottom_dimension_ids.as_deref().unwrap_or(&[])
    }

    /// Top ids for flow analysis; unavailable reads as empty
    pub fn top_ids(&self) -> &[i64] {
        self.top_dimension_ids.as_deref().unwrap_or(&[])
    }
}

/// A coordinate inside a descriptor's hidden dimension space.
///
/// `hidden_index` holds the raw per-hidden-dimension values; the top and
/// bottom projections select from it by dimension id.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Coordinate {
    pub ndim_hidden: Option<i64>,
    pub bottom_dimension_ids: Vec<i64>,
    pub top_dimension_ids: Vec<i64>,
    pub hidden_index: Vec<i64>,
}

impl Coordinate {
    /// Hidden-index values selected by the top dimension ids
    pub fn top_index(&self) -> Vec<i64> {
        project(&self.hidden_index, &self.top_dimension_ids)
    }

    /// Hidden-index values selected by the bottom dimension ids
    pub fn bottom_index(&self) -> Vec<i64> {
        project(&self.hidden_index, &self.bottom_dimension_ids)
    }
}

fn project(values: &[i64], ids: &[i64]) -> Vec<i64> {
    ids.iter()
        .filter_map(|&id| usize::try_from(id).ok())
        .filter_map(|id| values.get(id).copied())
        .collect()
}

/// Static tile-distribution encoding, recovered entirely from the type
/// signature: how replicated (R), hierarchical (H), partition (P) and yield
/// (Y) dimensions relate.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DistributionEncoding {
    pub rs_lengths: Vec<i64>,
    pub hs_lengthss: Vec<Vec<i64>>,
    pub ps_to_rhs_major: Vec<Vec<i64>>,
    pub ps_to_rhs_minor: Vec<Vec<i64>>,
    pub ys_to_rhs_major: Vec<i64>,
    pub ys_to_rhs_minor: Vec<i64>,
}

impl DistributionEncoding {
    pub fn ndim_r(&self) -> usize {
        self.rs_lengths.len()
    }

    pub fn ndim_x(&self) -> usize {
        self.hs_lengthss.len()
    }

    pub fn ndim_p(&self) -> usize {
        self.ps_to_rhs_major.len()
    }

    pub fn ndim_y(&self) -> usize {
        self.ys_to_rhs_major.len()
    }

    /// Resolve an (RH-major, RH-minor) pair to its length: major 0 selects
    /// the R lengths, major n > 0 selects H sequence n-1.
    pub fn rh_length(&self, major: i64, minor: i64) -> Option<i64> {
        let minor = usize::try_from(minor).ok()?;
        if major == 0 {
            self.rs_lengths.get(minor).copied()
        } else {
            let h = usize::try_from(major - 1).ok()?;
            self.hs_lengthss.get(h)?.get(minor).copied()
        }
    }
}
