//! Filter configuration: the (type, channel-width) pairs a sub-block can be
//! transformed under, and the policy that picks between them.

/// Which structural transform a sub-block was filtered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// No transform; bytes pass through unchanged.
    Raw,
    /// Per-channel first difference after reordering into channel groups.
    Delta,
    /// Per-channel linear predictor with an adaptive weight.
    Lpc,
    /// Per-lane first difference without reordering.
    InlineDelta,
}

impl FilterType {
    /// Decode from the 2-bit tag stored in a sub-block header.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(FilterType::Raw),
            1 => Some(FilterType::Delta),
            2 => Some(FilterType::Lpc),
            3 => Some(FilterType::InlineDelta),
            _ => None,
        }
    }

    /// Encode as the 2-bit tag stored in a sub-block header.
    pub fn tag(self) -> u8 {
        match self {
            FilterType::Raw => 0,
            FilterType::Delta => 1,
            FilterType::Lpc => 2,
            FilterType::InlineDelta => 3,
        }
    }
}

/// Channel width in `1..=32`; `Raw` configurations ignore it.
pub type Width = u8;

/// Minimum channel width a non-raw filter may use.
pub const MIN_WIDTH: Width = 1;
/// Maximum channel width a non-raw filter may use.
pub const MAX_WIDTH: Width = 32;

/// A sub-block's chosen transform: `Raw`, or one of the three filter kinds
/// at a specific channel width. 1 (raw) + 3 kinds x 32 widths = 97 total
/// configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// The transform applied.
    pub filter_type: FilterType,
    /// Channel width in bytes (`1..=32`); meaningless for `Raw`.
    pub width: Width,
}

impl FilterConfig {
    /// The always-available fallback configuration.
    pub const RAW: Self = Self {
        filter_type: FilterType::Raw,
        width: 1,
    };

    /// A non-raw configuration at the given width.
    pub fn new(filter_type: FilterType, width: Width) -> Self {
        debug_assert!((MIN_WIDTH..=MAX_WIDTH).contains(&width));
        Self { filter_type, width }
    }

    /// All 97 configurations: raw, then every (type, width) pair.
    pub fn all() -> impl Iterator<Item = FilterConfig> {
        std::iter::once(FilterConfig::RAW).chain(
            [FilterType::Delta, FilterType::Lpc, FilterType::InlineDelta]
                .into_iter()
                .flat_map(|ty| (MIN_WIDTH..=MAX_WIDTH).map(move |w| FilterConfig::new(ty, w))),
        )
    }

    /// Serialize the 2-byte per-sub-block header: `{type, width}`.
    pub fn to_header(self) -> [u8; 2] {
        [self.filter_type.tag(), self.width]
    }

    /// Parse the 2-byte per-sub-block header.
    pub fn from_header(bytes: [u8; 2]) -> Option<FilterConfig> {
        let filter_type = FilterType::from_tag(bytes[0])?;
        let width = bytes[1];
        if filter_type != FilterType::Raw && !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return None;
        }
        Some(FilterConfig { filter_type, width })
    }
}

/// How aggressively to search for a good filter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Always use `Raw`; no analysis.
    AlwaysRaw,
    /// Estimate stride and projection cheaply, score a handful of
    /// candidates, smooth against the previous sub-block's choice.
    Heuristic,
    /// Score every one of the 97 configurations and keep the best.
    BruteForce,
}

impl SelectionPolicy {
    /// Build from the CLI's `-f{0,1,2}` numeric selector.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(SelectionPolicy::AlwaysRaw),
            1 => Some(SelectionPolicy::Heuristic),
            2 => Some(SelectionPolicy::BruteForce),
            _ => None,
        }
    }
}
