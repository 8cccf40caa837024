use serde::{Deserialize, Serialize};

use super::composition::compose;
use super::compounding::{ProjectionContext, ProjectionState};
use super::record::{InvestmentRecord, ProjectionParameters, YearlyDataPoint};
use crate::RealtyResult;

/// One entity's series, labelled with its chart key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySeries {
    pub key: String,
    pub points: Vec<YearlyDataPoint>,
}

/// Year-by-year reported values, `params.years + 1` points starting at year 0.
pub fn generate_series(
    record: &InvestmentRecord,
    params: &ProjectionParameters,
) -> RealtyResult<Vec<YearlyDataPoint>> {
    let ctx = ProjectionContext::resolve(record, params)?;
    log::debug!(
        "series: record {} ({:?}, {:?}) over {} years",
        record.id,
        ctx.kind,
        ctx.method,
        ctx.years
    );

    let mut state = ProjectionState::initial(&ctx);
    let mut points = Vec::with_capacity(ctx.years as usize + 1);
    points.push(YearlyDataPoint {
        year: 0,
        value: ctx.initial_amount,
    });

    for _ in 0..ctx.years {
        state.advance(&ctx)?;
        points.push(YearlyDataPoint {
            year: state.year,
            value: compose(ctx.kind, ctx.method, &state.components())?,
        });
    }

    Ok(points)
}

pub fn generate_entity_series(
    record: &InvestmentRecord,
    params: &ProjectionParameters,
) -> RealtyResult<EntitySeries> {
    Ok(EntitySeries {
        key: record.series_key(),
        points: generate_series(record, params)?,
    })
}

/// Raw accumulator states for years 0..=N, before composition.
pub fn trace_projection(
    record: &InvestmentRecord,
    params: &ProjectionParameters,
) -> RealtyResult<Vec<ProjectionState>> {
    let ctx = ProjectionContext::resolve(record, params)?;
    let mut state = ProjectionState::initial(&ctx);
    let mut states = Vec::with_capacity(ctx.years as usize + 1);
    states.push(state.clone());

    for _ in 0..ctx.years {
        state.advance(&ctx)?;
        states.push(state.clone());
    }

    Ok(states)
}
