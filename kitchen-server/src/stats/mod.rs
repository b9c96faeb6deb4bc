//! Admin statistics (date ranges in the business timezone)

pub mod calculator;
pub mod range;

pub use calculator::{AdditionalStat, DailyStat, HourlyStat, MenuStat, StatsData, StatusCounts, TypeCounts};
pub use range::{DateRange, DateRangeType};
