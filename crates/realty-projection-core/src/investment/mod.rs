pub mod comparison;
pub mod composition;
pub mod compounding;
pub mod merge;
pub mod record;
pub mod series;
pub mod summary;

pub use comparison::{
    compare_investments, project_investment, ComparisonInput, ComparisonOutput,
    ComparisonSummary, ProjectionInput, ProjectionOutput,
};
pub use composition::{compose, ValueComponents};
pub use compounding::{ProjectionContext, ProjectionState};
pub use merge::{merge_series, ChartRow};
pub use record::{
    CalculationMethod, InvestmentKind, InvestmentRecord, ProjectionParameters, YearlyDataPoint,
    MAX_PROJECTION_YEARS,
};
pub use series::{generate_entity_series, generate_series, trace_projection, EntitySeries};
pub use summary::{generate_summary, SummaryResult};
