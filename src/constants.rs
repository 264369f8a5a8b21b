/// Calendar months scored by a sweep.
pub const N_MONTHS: usize = 12;
/// Minimum number of distinct feature rows needed to fit a model.
pub const MIN_TRAINING_ROWS: usize = 10;
/// Share of rows held out for reporting.
pub const TEST_FRACTION: f64 = 0.25;
/// Seed used by the original release-month model.
pub const DEFAULT_SEED: u64 = 42;
/// Hard cap on boosting rounds regardless of configuration.
pub const ITER_LIMIT: usize = 10_000;
/// Literal prefix used by tagged external identifiers.
pub const TAGGED_ID_PREFIX: &str = "tt";
/// Minimum digit width of a rendered tagged identifier.
pub const TAGGED_ID_WIDTH: usize = 7;
/// Sentinel used by the movie table for titles without genres.
pub const NO_GENRES_LISTED: &str = "(no genres listed)";
/// Budgets offered to the collaborating surface by default.
pub const DEFAULT_BUDGET_OPTIONS: [f64; 3] = [20_000_000.0, 50_000_000.0, 100_000_000.0];
