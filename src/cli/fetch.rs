//! Data commands: one per provider

use clap::Args;

use super::emit::{emit, OutputOptions};
use super::CliError;
use crate::query::{FaoQuery, IndicatorQuery, QueryExecutor, UnhcrQuery};
use crate::YearFilter;

/// Country and year selection shared by every data command
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Countries as ISO2 or ISO3 codes, comma separated (default: SDN)
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// First year to include
    #[arg(long)]
    pub year_start: Option<i32>,

    /// Last year to include
    #[arg(long)]
    pub year_end: Option<i32>,
}

impl SelectionArgs {
    /// Year filter from the flags
    ///
    /// # Errors
    /// `InvalidArgument` when the start year is after the end year.
    pub fn years(&self) -> Result<YearFilter, CliError> {
        if let (Some(start), Some(end)) = (self.year_start, self.year_end) {
            if start > end {
                return Err(CliError::InvalidArgument(format!(
                    "year start ({start}) must not be after year end ({end})"
                )));
            }
        }
        Ok(YearFilter::new(self.year_start, self.year_end))
    }
}

/// Arguments of the `worldbank`, `who` and `ilo` commands
#[derive(Args, Debug, Clone)]
pub struct IndicatorArgs {
    /// Indicator code (e.g. SP.POP.TOTL, WHOSIS_000001, UNE_DEAP_SEX_AGE_RT)
    pub indicator: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl IndicatorArgs {
    /// Validated query
    pub fn query(&self) -> Result<IndicatorQuery, CliError> {
        Ok(IndicatorQuery::new(&self.indicator)?
            .with_countries(&self.selection.countries)
            .with_years(self.selection.years()?))
    }
}

/// Arguments of the `fao` command
#[derive(Args, Debug, Clone)]
pub struct FaoArgs {
    /// Dataset code (e.g. QCL)
    pub dataset: String,

    /// Element name, matched as a case-insensitive substring (e.g. Production)
    pub element: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments of the `unhcr` command
#[derive(Args, Debug, Clone)]
pub struct UnhcrArgs {
    /// Population type (refugees, idps, asylum_seekers, returned_refugees, stateless)
    pub population_type: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// World Bank observations
pub async fn worldbank(
    executor: &QueryExecutor,
    args: &IndicatorArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let results = executor.worldbank(&args.query()?).await;
    emit(results, output)
}

/// WHO observations
pub async fn who(
    executor: &QueryExecutor,
    args: &IndicatorArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let results = executor.who(&args.query()?).await;
    emit(results, output)
}

/// ILO observations
pub async fn ilo(
    executor: &QueryExecutor,
    args: &IndicatorArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let results = executor.ilo(&args.query()?).await;
    emit(results, output)
}

/// FAOSTAT observations
pub async fn fao(
    executor: &QueryExecutor,
    args: &FaoArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let query = FaoQuery::new(&args.dataset, &args.element)?
        .with_countries(&args.selection.countries)
        .with_years(args.selection.years()?);
    emit(executor.fao(&query).await, output)
}

/// UNHCR population figures
pub async fn unhcr(
    executor: &QueryExecutor,
    args: &UnhcrArgs,
    output: &OutputOptions,
) -> Result<(), CliError> {
    let query = UnhcrQuery::new(&args.population_type)?
        .with_countries(&args.selection.countries)
        .with_years(args.selection.years()?);
    emit(executor.unhcr(&query).await, output)
}
