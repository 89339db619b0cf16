//! `sts list` and `sts dashboard`.

use std::collections::BTreeMap;
use std::process;

use sts_client::listing::current_year;
use sts_client::{dashboard, Listing, ProxyClient, StsConfig};
use sts_core::FormKind;

use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_list(
    kind: FormKind,
    year: Option<i32>,
    config: &StsConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let year = year.unwrap_or_else(current_year);
    let client = ProxyClient::new(&config.proxy_url);
    let listing = match client.list(kind, year) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!(form = kind.slug(), year, error = %e, "listing failed");
            report_error(&e.user_message(), output, quiet);
            process::exit(1);
        }
    };
    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "form": kind.slug(),
            "year": year,
            "entries": listing.entries,
            "years": listing.years,
            "counts": counts_json(&listing),
        })),
        OutputFormat::Text => {
            println!("{} -- {} ({})", kind.slug(), kind.title(), year);
            if listing.entries.is_empty() {
                println!("no records");
            }
            for entry in &listing.entries {
                println!(
                    "  {:<16} {:<10} {} / {}  {}",
                    entry.operation_ref,
                    entry.status.as_str(),
                    dash(&entry.constant_heading_ship),
                    dash(&entry.manoeuvring_ship),
                    dash(&entry.transfer_date),
                );
            }
            if !listing.years.is_empty() {
                let years: Vec<String> = listing.years.iter().map(|y| y.to_string()).collect();
                println!("years with records: {}", years.join(", "));
            }
        }
    }
}

pub(crate) fn cmd_dashboard(
    year: Option<i32>,
    config: &StsConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let year = year.unwrap_or_else(current_year);
    let client = ProxyClient::new(&config.proxy_url);
    let rows = dashboard(&client, year);
    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            let forms: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| match &row.outcome {
                    Ok(listing) => serde_json::json!({
                        "form": row.kind.slug(),
                        "title": row.kind.title(),
                        "total": listing.entries.len(),
                        "counts": counts_json(listing),
                    }),
                    Err(message) => serde_json::json!({
                        "form": row.kind.slug(),
                        "title": row.kind.title(),
                        "error": message,
                    }),
                })
                .collect();
            print_json(&serde_json::json!({ "year": year, "forms": forms }));
        }
        OutputFormat::Text => {
            println!("STS checklists, {}", year);
            for row in &rows {
                match &row.outcome {
                    Ok(listing) => {
                        let counts: Vec<String> = listing
                            .status_counts()
                            .iter()
                            .map(|(status, n)| format!("{} {}", status, n))
                            .collect();
                        println!(
                            "  {}  {:<40} {:>3}  {}",
                            row.kind.slug(),
                            row.kind.title(),
                            listing.entries.len(),
                            counts.join(", ")
                        );
                    }
                    Err(message) => {
                        println!("  {}  {:<40}   -  {}", row.kind.slug(), row.kind.title(), message);
                    }
                }
            }
        }
    }
}

fn counts_json(listing: &Listing) -> BTreeMap<&'static str, usize> {
    listing
        .status_counts()
        .into_iter()
        .map(|(status, n)| (status.as_str(), n))
        .collect()
}

fn dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
