//! Views derived from a [`FilteredView`](crate::data::filter::FilteredView):
//! the highlighted table model and the chart projection. Both are pure.

pub mod chart;
pub mod table;
