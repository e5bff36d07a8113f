//! The fixed operation catalog.
//!
//! Each operation carries a [`Policy`] telling dispatch how its raw result is
//! turned back into host instances, whether it needs a terminal action
//! (predicate, key function, transform) to run eagerly, and whether it takes
//! a positional operation argument such as a count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use samekind_core::{Arg, MapOp, RewrapError};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How an operation's raw result is rewrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// One sequence, one host instance.
    Single,
    /// Two sequences, a pair of host instances.
    MultiSplit,
    /// Keyed sub-sequences, each a host instance, in encounter order.
    Keyed,
    /// A restartable lazy sequence of host instances.
    LazyChunks,
    /// A raw element, no reconstruction.
    Scalar,
    /// Rewrapped only when configured (and gated) for the host type.
    MappingFamily,
}

/// Positional operation argument an operation accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Positional {
    None,
    /// An optional count; its presence switches the policy to [`Policy::Single`].
    OptionalCount,
    RequiredCount,
}

// ---------------------------------------------------------------------------
// OpName
// ---------------------------------------------------------------------------

/// Every operation in the catalog, synonyms included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpName {
    Select,
    Filter,
    Reject,
    Sort,
    SortBy,
    Take,
    TakeWhile,
    Drop,
    DropWhile,
    Uniq,
    UniqBy,
    Grep,
    GrepV,
    First,
    Min,
    Max,
    MinBy,
    MaxBy,
    Partition,
    GroupBy,
    Chunk,
    ChunkWhile,
    SliceWhen,
    SliceBefore,
    SliceAfter,
    EachSlice,
    EachCons,
    Map,
    Collect,
    FlatMap,
    CollectConcat,
}

impl OpName {
    pub const ALL: [OpName; 31] = [
        OpName::Select,
        OpName::Filter,
        OpName::Reject,
        OpName::Sort,
        OpName::SortBy,
        OpName::Take,
        OpName::TakeWhile,
        OpName::Drop,
        OpName::DropWhile,
        OpName::Uniq,
        OpName::UniqBy,
        OpName::Grep,
        OpName::GrepV,
        OpName::First,
        OpName::Min,
        OpName::Max,
        OpName::MinBy,
        OpName::MaxBy,
        OpName::Partition,
        OpName::GroupBy,
        OpName::Chunk,
        OpName::ChunkWhile,
        OpName::SliceWhen,
        OpName::SliceBefore,
        OpName::SliceAfter,
        OpName::EachSlice,
        OpName::EachCons,
        OpName::Map,
        OpName::Collect,
        OpName::FlatMap,
        OpName::CollectConcat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Filter => "filter",
            Self::Reject => "reject",
            Self::Sort => "sort",
            Self::SortBy => "sort_by",
            Self::Take => "take",
            Self::TakeWhile => "take_while",
            Self::Drop => "drop",
            Self::DropWhile => "drop_while",
            Self::Uniq => "uniq",
            Self::UniqBy => "uniq_by",
            Self::Grep => "grep",
            Self::GrepV => "grep_v",
            Self::First => "first",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinBy => "min_by",
            Self::MaxBy => "max_by",
            Self::Partition => "partition",
            Self::GroupBy => "group_by",
            Self::Chunk => "chunk",
            Self::ChunkWhile => "chunk_while",
            Self::SliceWhen => "slice_when",
            Self::SliceBefore => "slice_before",
            Self::SliceAfter => "slice_after",
            Self::EachSlice => "each_slice",
            Self::EachCons => "each_cons",
            Self::Map => "map",
            Self::Collect => "collect",
            Self::FlatMap => "flat_map",
            Self::CollectConcat => "collect_concat",
        }
    }

    /// The static descriptor of this operation.
    pub fn descriptor(self) -> OpDescriptor {
        use OpName::*;
        let (policy, requires_action, positional) = match self {
            Select | Filter | Reject | SortBy | TakeWhile | DropWhile | UniqBy => {
                (Policy::Single, true, Positional::None)
            }
            Sort | Uniq | Grep | GrepV => (Policy::Single, false, Positional::None),
            Take | Drop => (Policy::Single, false, Positional::RequiredCount),
            First | Min | Max => (Policy::Scalar, false, Positional::OptionalCount),
            MinBy | MaxBy => (Policy::Scalar, true, Positional::OptionalCount),
            Partition => (Policy::MultiSplit, true, Positional::None),
            GroupBy | Chunk => (Policy::Keyed, true, Positional::None),
            ChunkWhile | SliceWhen | SliceBefore | SliceAfter => {
                (Policy::LazyChunks, true, Positional::None)
            }
            EachSlice | EachCons => (Policy::LazyChunks, true, Positional::RequiredCount),
            Map | Collect | FlatMap | CollectConcat => {
                (Policy::MappingFamily, true, Positional::None)
            }
        };
        OpDescriptor {
            name: self,
            policy,
            requires_action,
            positional,
        }
    }

    /// The mapping operation this name stands for, if any.
    pub fn map_op(self) -> Option<MapOp> {
        match self {
            Self::Map | Self::Collect => Some(MapOp::Map),
            Self::FlatMap | Self::CollectConcat => Some(MapOp::FlatMap),
            _ => None,
        }
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpName {
    type Err = RewrapError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| RewrapError::Configuration(format!("unknown operation '{name}'")))
    }
}

// ---------------------------------------------------------------------------
// OpDescriptor
// ---------------------------------------------------------------------------

/// Static description of one catalog operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpDescriptor {
    pub name: OpName,
    pub policy: Policy,
    pub requires_action: bool,
    pub positional: Positional,
}

impl OpDescriptor {
    /// The policy in effect given the operation arguments actually supplied.
    ///
    /// A count turns a [`Policy::Scalar`] operation into [`Policy::Single`].
    pub fn policy_with(&self, operation_args: &[Arg]) -> Policy {
        match (self.policy, self.positional) {
            (Policy::Scalar, Positional::OptionalCount) if !operation_args.is_empty() => {
                Policy::Single
            }
            (policy, _) => policy,
        }
    }

    pub fn takes_operation_args(&self) -> bool {
        self.positional != Positional::None
    }
}

/// Descriptors of every catalog operation, in declaration order.
pub fn catalog() -> impl Iterator<Item = OpDescriptor> {
    OpName::ALL.into_iter().map(OpName::descriptor)
}
