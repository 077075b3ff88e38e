use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use plan_advisor::catalog::sample::sample_catalog;
use plan_advisor::catalog::{CatalogSnapshot, PlanId, PlanType};
use plan_advisor::config::{Config, ConfigOverrides};
use plan_advisor::cost::{try_compute_cost, CostBreakdown};
use plan_advisor::output::csv::{cost_to_csv, ranking_to_csv};
use plan_advisor::output::json::{render_json, render_json_line};
use plan_advisor::output::table::{
    render_cost_table, render_ranking_table, render_switching_table,
};
use plan_advisor::ranking::{rank_plans, PlanFilters, RankingRequest, RankingResult};
use plan_advisor::scoring::preferences::PreferenceWeights;
use plan_advisor::switching::{analyze_switching_with, CurrentPlan, SwitchingAnalysis};
use plan_advisor::usage::UsageProjection;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    JsonLine,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "plan-advisor",
    about = "Rank energy plans for a household and time the switch"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON catalog snapshot; the built-in demo catalog is used when absent.
    #[arg(long)]
    catalog: Option<String>,
    #[arg(short, long)]
    region: Option<String>,
    #[arg(long = "annual-kwh")]
    annual_kwh: Option<Decimal>,
    #[arg(long)]
    confidence: Option<f64>,
    /// Preference weights as cost,flexibility,renewable,rating summing to 100.
    #[arg(short, long)]
    weights: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rank {
        #[arg(long)]
        top: Option<usize>,
        #[arg(long = "max-contract-months")]
        max_contract_months: Option<u32>,
        #[arg(long = "min-renewable")]
        min_renewable_pct: Option<f64>,
        /// Comma-separated plan types, e.g. fixed,tou
        #[arg(long = "types")]
        plan_types: Option<String>,
    },
    Cost {
        #[arg(long)]
        plan: String,
    },
    Switch {
        #[arg(long)]
        rate: Option<Decimal>,
        #[arg(long = "monthly-fee")]
        monthly_fee: Option<Decimal>,
        #[arg(long)]
        etf: Option<Decimal>,
        #[arg(long = "contract-end")]
        contract_end: Option<NaiveDate>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        region: cli.region.clone(),
        annual_kwh: cli.annual_kwh,
        confidence: cli.confidence,
        catalog_path: cli.catalog.clone(),
        preferences: cli.weights.as_deref().map(parse_weights).transpose()?,
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }

    let catalog = load_catalog(&config)?;
    let usage = UsageProjection::from_annual(
        config.household.annual_kwh,
        config.household.confidence,
        config.household.profile,
    )?;

    match &cli.command {
        Commands::Rank {
            top,
            max_contract_months,
            min_renewable_pct,
            plan_types,
        } => {
            let filters = PlanFilters {
                max_contract_months: *max_contract_months,
                min_renewable_pct: *min_renewable_pct,
                plan_types: plan_types
                    .as_deref()
                    .map(parse_plan_types)
                    .transpose()?
                    .unwrap_or_default(),
            };
            let mut request = build_request(&config, usage)?
                .with_filters(filters)
                .with_top_n(top.unwrap_or(config.ranking.top_n));
            if let Some(current) = config.current_plan.clone() {
                request = request.with_current_plan(current);
            }
            let result = rank_plans(&catalog, &request, &config.ranking_params())?;
            print_ranking(&result, cli.output)?;
        }
        Commands::Cost { plan } => {
            let plan_id = PlanId::new(plan.as_str());
            let plan = catalog
                .plan(&plan_id)
                .ok_or_else(|| anyhow!("plan {plan_id} not found in catalog"))?;
            let cost = try_compute_cost(plan, &usage, &config.cost)?;
            print_cost(&cost, cli.output)?;
        }
        Commands::Switch {
            rate,
            monthly_fee,
            etf,
            contract_end,
            today,
        } => {
            let current = resolve_current_plan(
                config.current_plan.clone(),
                *rate,
                *monthly_fee,
                *etf,
                *contract_end,
            )?;
            let request = build_request(&config, usage)?
                .with_top_n(1)
                .with_current_plan(current.clone());
            let result = rank_plans(&catalog, &request, &config.ranking_params())?;
            let Some(top) = result.top() else {
                warn!("no eligible plans in {}", config.household.region);
                print_ranking(&result, cli.output)?;
                return Ok(());
            };
            info!(plan = %top.plan.id, "analyzing switch to top-ranked plan");
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let analysis =
                analyze_switching_with(&top.cost, &current, today, &config.switching)?;
            print_switching(&analysis, cli.output)?;
        }
        Commands::Config { .. } => unreachable!("config command handled before dispatch"),
    }

    Ok(())
}

fn build_request(config: &Config, usage: UsageProjection) -> Result<RankingRequest> {
    let preferences = config.user_preferences()?;
    Ok(RankingRequest::new(
        config.household.region.clone(),
        usage,
        preferences,
        Utc::now(),
    ))
}

fn load_catalog(config: &Config) -> Result<CatalogSnapshot> {
    match config.resolved_catalog_path() {
        Some(path) => CatalogSnapshot::load(&path),
        None => {
            warn!("no catalog configured, using the built-in demo catalog");
            Ok(sample_catalog())
        }
    }
}

fn resolve_current_plan(
    configured: Option<CurrentPlan>,
    rate: Option<Decimal>,
    monthly_fee: Option<Decimal>,
    etf: Option<Decimal>,
    contract_end: Option<NaiveDate>,
) -> Result<CurrentPlan> {
    let mut current = match (configured, rate) {
        (Some(current), _) => current,
        (None, Some(rate)) => CurrentPlan {
            name: "current".to_string(),
            rate_per_kwh: rate,
            monthly_fee: Decimal::ZERO,
            early_termination_fee: Decimal::ZERO,
            contract_end_date: None,
        },
        (None, None) => {
            return Err(anyhow!(
                "current plan required: add [current_plan] to the config or pass --rate"
            ))
        }
    };
    if let Some(rate) = rate {
        current.rate_per_kwh = rate;
    }
    if let Some(fee) = monthly_fee {
        current.monthly_fee = fee;
    }
    if let Some(etf) = etf {
        current.early_termination_fee = etf;
    }
    if contract_end.is_some() {
        current.contract_end_date = contract_end;
    }
    Ok(current)
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &PathBuf,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn parse_weights(raw: &str) -> Result<PreferenceWeights> {
    let parts = raw
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .with_context(|| format!("invalid weight {p:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let [cost, flexibility, renewable, rating] = parts[..] else {
        return Err(anyhow!(
            "expected four weights (cost,flexibility,renewable,rating), got {}",
            parts.len()
        ));
    };
    Ok(PreferenceWeights {
        cost,
        flexibility,
        renewable,
        rating,
    })
}

fn parse_plan_types(raw: &str) -> Result<std::collections::BTreeSet<PlanType>> {
    let mut out = std::collections::BTreeSet::new();
    for piece in raw.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.insert(PlanType::from_str(trimmed)?);
    }
    if out.is_empty() {
        return Err(anyhow!("plan type filter is empty"));
    }
    Ok(out)
}

fn print_ranking(result: &RankingResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_ranking_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::JsonLine => println!("{}", render_json_line(result)?),
        OutputFormat::Csv => print!("{}", ranking_to_csv(result)?),
    }
    Ok(())
}

fn print_cost(cost: &CostBreakdown, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_cost_table(cost)),
        OutputFormat::Json => println!("{}", render_json(cost)?),
        OutputFormat::JsonLine => println!("{}", render_json_line(cost)?),
        OutputFormat::Csv => print!("{}", cost_to_csv(cost)?),
    }
    Ok(())
}

fn print_switching(analysis: &SwitchingAnalysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_switching_table(analysis)),
        OutputFormat::Json => println!("{}", render_json(analysis)?),
        OutputFormat::JsonLine => println!("{}", render_json_line(analysis)?),
        OutputFormat::Csv => {
            warn!("CSV output for switch not implemented, using JSON");
            println!("{}", render_json(analysis)?);
        }
    }
    Ok(())
}
