//! Release Month Planner
//! =====================
//! Train the revenue model once on a movie catalogue and ask, for a few
//! genre mixes and budgets, which calendar month promises the most revenue.
//!
//! The data directory must hold `movies.csv`, `links.csv` and
//! `movies_metadata.csv`. It defaults to the small fixtures in `resources/`.
//!
//! ```bash
//! cargo run --release --example release_planner -- resources "Comedy|Romance" 20000000
//! ```

use release_planner::sweep::RevenueCurve;
use release_planner::{ConfigIO, PlannerConfig, RevenuePlanner};
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let data_dir = args.get(1).map(String::as_str).unwrap_or("resources");
    let genres: Vec<String> = args
        .get(2)
        .map(|g| g.split('|').map(String::from).collect())
        .unwrap_or_else(|| vec!["Comedy".to_string()]);
    let budget: f64 = match args.get(3) {
        Some(b) => b.parse()?,
        None => 20_000_000.0,
    };

    // ------------------------------------------------------------------
    // 1. Configure & train once
    // ------------------------------------------------------------------
    let config = PlannerConfig::default().with_data_dir(data_dir);
    println!("Configuration:\n{}\n", config.json_dump()?);
    let planner = RevenuePlanner::from_config(&config)?;

    let report = planner.drop_report();
    println!("Kept {} of {} movies.", report.kept, report.movies_in);
    if let Some(h) = planner.holdout() {
        println!(
            "Holdout ({} rows): RMSE {:.0}, MAE {:.0}, R2 {:.3}",
            h.n_holdout, h.rmse, h.mae, h.r2
        );
    }

    // ------------------------------------------------------------------
    // 2. Sweep the twelve months for the requested release
    // ------------------------------------------------------------------
    let curve = planner.predict_months(&genres, budget)?;
    println!("\nPredicted revenue for {:?} at a budget of {:.0}:", genres, budget);
    for (month, revenue) in curve.points() {
        println!("  {:<10} {:>16.0}", month, revenue);
    }
    println!(
        "Best month: {} ({:.0})",
        RevenueCurve::month_name(curve.best_month()).unwrap_or("?"),
        curve.best_revenue()
    );

    // ------------------------------------------------------------------
    // 3. Best month of every genre at the configured budgets
    // ------------------------------------------------------------------
    let vocabulary = planner.vocabulary().unwrap_or_default();
    let grid = planner.predict_grid(vocabulary.names())?;
    println!("\n{:<18} {:>12} {:>10}", "Genre", "Budget", "Month");
    for point in grid {
        println!(
            "{:<18} {:>12.0} {:>10}",
            point.genre,
            point.budget,
            RevenueCurve::month_name(point.curve.best_month()).unwrap_or("?")
        );
    }
    Ok(())
}
