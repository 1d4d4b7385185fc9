pub mod record;
pub mod table;

pub use record::{
    open_point_lines, open_point_reader, project_point, PointLines, ProjectedPoint, POINT_FIELDS,
};
pub use table::{PointTable, SampledRow};
