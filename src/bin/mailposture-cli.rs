use anyhow::{Context, Result};
use clap::Parser;
use mailposture_lib::{CheckOptions, DomainAuthReport, Grade, ScoringResult, system_resolver};

#[derive(Parser)]
#[command(name = "mailposture-cli")]
struct Cli {
    /// domaine à auditer (ex: example.com)
    domain: String,

    /// sélecteur DKIM supplémentaire (répétable)
    #[arg(long = "selector")]
    selectors: Vec<String>,

    /// n'interroge que les sélecteurs passés via --selector
    #[arg(long)]
    selectors_only: bool,

    /// format: human|json
    #[arg(long, default_value = "human")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut options = CheckOptions::new();
    if cli.selectors_only {
        options = options.dkim_selectors_only(cli.selectors.iter().cloned());
    } else {
        options = options.with_dkim_selectors(cli.selectors.iter().cloned());
    }

    let resolver = system_resolver().context("resolver init")?;
    let discovery = options.selector_discovery();
    let report = mailposture_lib::check_domain_with(&resolver, &cli.domain, &discovery)
        .await
        .with_context(|| format!("check failed for '{}'", cli.domain))?;

    match cli.format.as_str() {
        "human" => print_human(&report),
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=json nécessite la feature 'with-serde'");
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("unknown --format '{}', use: human|json", other);
            std::process::exit(1);
        }
    }

    // codes de sortie : 0 OK, 2 au moins un pilier noté F, 1 fatal
    let any_failing = [
        &report.spf.scoring,
        &report.dkim.scoring,
        &report.dmarc.scoring,
    ]
    .iter()
    .any(|scoring| scoring.grade == Grade::F);
    if any_failing {
        std::process::exit(2);
    }
    Ok(())
}

fn print_human(report: &DomainAuthReport) {
    println!("domain: {}", report.domain);
    print_scoring("SPF", &report.spf.scoring);
    for error in &report.spf.report.syntax_validation.errors {
        println!("        issue: [{}] {}", error.occurrence.domain, error.message);
    }
    print_scoring("DKIM", &report.dkim.scoring);
    for issue in &report.dkim.validation.issues {
        println!("        issue: {issue}");
    }
    print_scoring("DMARC", &report.dmarc.scoring);
    for issue in &report.dmarc.validation.issues {
        println!("        issue: {}", issue.message);
    }
}

fn print_scoring(label: &str, scoring: &ScoringResult) {
    println!(
        "  {label:<5} {}/{} ({}%, grade {})",
        scoring.total_score, scoring.max_possible_score, scoring.percentage, scoring.grade
    );
    for item in &scoring.items {
        let mark = if item.passed { "OK " } else { "!! " };
        match &item.details {
            Some(details) => println!("        [{mark}] {} :: {}", item.name, details),
            None => println!("        [{mark}] {}", item.name),
        }
    }
}
