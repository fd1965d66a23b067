use polars::prelude::{col, lit, DataType, Expr, LazyFrame, Literal, NamedFrom, Series};

/// Row filters for tables returned by [`crate::Nrel`].
///
/// All filters are lazy; a missing column or a type mismatch is reported when
/// the frame is collected.
pub trait NrelFrameFilterExt {
    /// Keeps rows whose string `column` is one of `values`.
    fn filter_in(self, column: &str, values: &[&str]) -> LazyFrame;

    /// Keeps rows where `column` equals `value`.
    fn filter_eq<L: Literal>(self, column: &str, value: L) -> LazyFrame;

    /// Keeps rows where the numeric `column` lies in `[low, high]` (inclusive).
    fn filter_between(self, column: &str, low: f64, high: f64) -> LazyFrame;

    /// ATB: keeps the given technologies (e.g. `"LandbasedWind"`).
    fn filter_technology(self, technologies: &[&str]) -> LazyFrame;

    /// ATB: keeps the given metrics (e.g. `"CAPEX"`, `"LCOE"`).
    fn filter_core_metric_parameter(self, parameters: &[&str]) -> LazyFrame;

    /// ATB: keeps the given scenarios (e.g. `"Moderate"`).
    fn filter_scenario(self, scenarios: &[&str]) -> LazyFrame;

    /// ATB: keeps projection years in `[start_year, end_year]` (inclusive).
    fn filter_core_metric_variable(self, start_year: i32, end_year: i32) -> LazyFrame;
}

fn is_in(column: &str, values: &[&str]) -> Expr {
    let set = Series::new("".into(), values);
    col(column).is_in(lit(set))
}

impl NrelFrameFilterExt for LazyFrame {
    fn filter_in(self, column: &str, values: &[&str]) -> LazyFrame {
        self.filter(is_in(column, values))
    }

    fn filter_eq<L: Literal>(self, column: &str, value: L) -> LazyFrame {
        self.filter(col(column).eq(lit(value)))
    }

    fn filter_between(self, column: &str, low: f64, high: f64) -> LazyFrame {
        let value = col(column).cast(DataType::Float64);
        self.filter(value.clone().gt_eq(lit(low)).and(value.lt_eq(lit(high))))
    }

    fn filter_technology(self, technologies: &[&str]) -> LazyFrame {
        self.filter_in("technology", technologies)
    }

    fn filter_core_metric_parameter(self, parameters: &[&str]) -> LazyFrame {
        self.filter_in("core_metric_parameter", parameters)
    }

    fn filter_scenario(self, scenarios: &[&str]) -> LazyFrame {
        self.filter_in("scenario", scenarios)
    }

    fn filter_core_metric_variable(self, start_year: i32, end_year: i32) -> LazyFrame {
        self.filter_between(
            "core_metric_variable",
            f64::from(start_year),
            f64::from(end_year),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn atb() -> LazyFrame {
        df!(
            "technology" => ["LandbasedWind", "UtilityPV", "LandbasedWind", "Nuclear"],
            "core_metric_parameter" => ["CAPEX", "CAPEX", "LCOE", "CAPEX"],
            "scenario" => ["Moderate", "Advanced", "Moderate", "Moderate"],
            "core_metric_variable" => [2022i64, 2030, 2040, 2050],
            "value" => [1500.0f64, 1100.0, 32.5, 7000.0],
        )
        .expect("Failed to build frame")
        .lazy()
    }

    #[test]
    fn test_filter_in() -> PolarsResult<()> {
        let frame = atb()
            .filter_technology(&["LandbasedWind", "Nuclear"])
            .collect()?;
        assert_eq!(frame.height(), 3);
        Ok(())
    }

    #[test]
    fn test_chained_atb_filters() -> PolarsResult<()> {
        let frame = atb()
            .filter_core_metric_parameter(&["CAPEX"])
            .filter_scenario(&["Moderate"])
            .filter_core_metric_variable(2022, 2040)
            .collect()?;
        assert_eq!(frame.height(), 1);
        assert_eq!(frame.column("technology")?.str()?.get(0), Some("LandbasedWind"));
        Ok(())
    }

    #[test]
    fn test_filter_between_is_inclusive() -> PolarsResult<()> {
        let frame = atb().filter_between("value", 32.5, 1500.0).collect()?;
        assert_eq!(frame.height(), 3);
        Ok(())
    }

    #[test]
    fn test_filter_eq() -> PolarsResult<()> {
        let frame = atb().filter_eq("scenario", "Advanced").collect()?;
        assert_eq!(frame.height(), 1);
        assert_eq!(frame.column("value")?.f64()?.get(0), Some(1100.0));
        Ok(())
    }
}
