mod shape;

pub use shape::{ShapeCriteria, ShapeFilter};
