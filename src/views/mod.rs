// Chart-facing compositions, one module per dashboard page. Each view is a
// pure function from typed dataset rows plus the user's selections to the
// plain structures the rendering layer consumes.

pub mod hunger_trends;
pub mod poverty;
pub mod prices;
pub mod worst_affected;
