use clap::Parser;
use table_scout::core::report;
use table_scout::utils::logger;
use table_scout::utils::validation::Validate;
use table_scout::{CheckEngine, CliConfig, Directory, ProviderSet, RequestTemplate};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        eprintln!("❌ {}", e);
        // Validation, directory-load and configuration failures are the
        // only fatal paths; provider-side failures surface inside the
        // report and the process still exits 0.
        std::process::exit(1);
    }
}

async fn run(config: CliConfig) -> table_scout::Result<()> {
    config.validate()?;
    let settings = config.resolved()?;
    let provider = config.provider_filter()?;

    let directory = Directory::load(&settings.csv_path)?;
    tracing::debug!(
        restaurants = directory.len(),
        csv = %settings.csv_path,
        "directory loaded"
    );

    if config.list {
        for record in directory.list_all() {
            if provider.map_or(true, |p| record.provider == p) {
                println!("{}  [{} {}]", record.name, record.provider.tag(), record.id);
            }
        }
        return Ok(());
    }

    let template = RequestTemplate::new(
        config.date.clone().unwrap_or_default(),
        config.times.clone(),
        config.people,
    )?;

    let router = ProviderSet::new(&settings.providers)?;
    let engine = CheckEngine::new(directory, router);

    let batch_report = if config.batch {
        engine
            .run_batch(&template, provider, settings.workers)
            .await?
    } else {
        let query = config.restaurant.as_deref().unwrap_or_default();
        engine.run_single(query, provider, &template).await?
    };

    if config.raw {
        println!("{}", batch_report.to_json()?);
    } else if config.batch {
        println!("{}", batch_report.to_summary());
    } else if let Some(result) = batch_report.results.first() {
        println!("{}", report::render_single(result, template.date()));
    }

    if batch_report.any_available() {
        tracing::info!("availability found");
    } else {
        tracing::info!("no availability found");
    }

    Ok(())
}
