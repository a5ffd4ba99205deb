//! Point → duration and point → T-shirt size conversions
//!
//! Both are step functions over ascending, exclusive upper bounds: a value
//! lands in the first bucket whose bound it is below, or in the last bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

fn bucket_index(points: u32, upper_bounds: &[u32]) -> usize {
    upper_bounds
        .iter()
        .position(|&bound| points < bound)
        .unwrap_or(upper_bounds.len())
}

/// Human-readable duration range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HoursBucket {
    /// Under half a day
    UpToFourHours,
    /// About a day
    FourToEightHours,
    /// 1-2 days
    OneToTwoDays,
    /// 2-3 days
    TwoToThreeDays,
    /// 3-5 days
    ThreeToFiveDays,
    /// 1-2 weeks
    OneToTwoWeeks,
    /// 2-3 weeks
    TwoToThreeWeeks,
    /// Longer
    ThreePlusWeeks,
}

impl HoursBucket {
    /// All buckets, shortest first
    pub const ALL: [HoursBucket; 8] = [
        HoursBucket::UpToFourHours,
        HoursBucket::FourToEightHours,
        HoursBucket::OneToTwoDays,
        HoursBucket::TwoToThreeDays,
        HoursBucket::ThreeToFiveDays,
        HoursBucket::OneToTwoWeeks,
        HoursBucket::TwoToThreeWeeks,
        HoursBucket::ThreePlusWeeks,
    ];

    /// Exclusive upper bound of each bucket but the last
    const UPPER_BOUNDS: [u32; 7] = [2, 4, 8, 13, 21, 34, 55];

    /// Bucket for a point value
    #[must_use]
    pub fn for_points(points: u32) -> Self {
        Self::ALL[bucket_index(points, &Self::UPPER_BOUNDS)]
    }

    /// Ordinal position, shortest is 0
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HoursBucket::UpToFourHours => "Up to 4 hours",
            HoursBucket::FourToEightHours => "4-8 hours",
            HoursBucket::OneToTwoDays => "1-2 days",
            HoursBucket::TwoToThreeDays => "2-3 days",
            HoursBucket::ThreeToFiveDays => "3-5 days",
            HoursBucket::OneToTwoWeeks => "1-2 weeks",
            HoursBucket::TwoToThreeWeeks => "2-3 weeks",
            HoursBucket::ThreePlusWeeks => "3+ weeks",
        }
    }
}

impl fmt::Display for HoursBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse size label
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TShirtSize {
    /// Extra small
    XS,
    /// Small
    S,
    /// Medium
    M,
    /// Large
    L,
    /// Extra large
    XL,
    /// Needs splitting
    XXL,
}

impl TShirtSize {
    /// All sizes, smallest first
    pub const ALL: [TShirtSize; 6] = [
        TShirtSize::XS,
        TShirtSize::S,
        TShirtSize::M,
        TShirtSize::L,
        TShirtSize::XL,
        TShirtSize::XXL,
    ];

    const UPPER_BOUNDS: [u32; 5] = [3, 8, 16, 30, 50];

    /// Size for a point value
    #[must_use]
    pub fn for_points(points: u32) -> Self {
        Self::ALL[bucket_index(points, &Self::UPPER_BOUNDS)]
    }

    /// Ordinal position, smallest is 0
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TShirtSize::XS => "XS",
            TShirtSize::S => "S",
            TShirtSize::M => "M",
            TShirtSize::L => "L",
            TShirtSize::XL => "XL",
            TShirtSize::XXL => "XXL",
        }
    }
}

impl fmt::Display for TShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Duration label for a point value
#[inline]
#[must_use]
pub fn estimate_to_hours(points: u32) -> &'static str {
    HoursBucket::for_points(points).label()
}

/// T-shirt label for a point value
#[inline]
#[must_use]
pub fn estimate_to_tshirt_size(points: u32) -> &'static str {
    TShirtSize::for_points(points).label()
}
