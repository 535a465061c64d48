mod error;
mod frame;
mod index;
mod sequence;
mod series;
mod snapshot;
mod sort;
mod source;
mod value;
mod view;

pub use crate::frame::{DataFrame, FrameConfig};
pub use crate::series::{Series, SeriesConfig};
pub use crate::value::{Row, Value};

pub use crate::frame::{Aggregator, Column, OrderedFrame, PivotValues};
pub use crate::series::{Frequency, Numeric, OrderedSeries};

pub use crate::index::{Index, IndexKey, IndexOrder, IndexType};
pub use crate::sequence::{pair_value, Element, SeqIter, Sequence, Source};
pub use crate::sort::{SortChain, SortDirection, SortSpec};

pub use crate::snapshot::FrameSnapshot;
pub use crate::source::{FusedRecordSource, IterRecordSource, RecordSource};

pub use crate::error::{FrameError, FrameResult};
