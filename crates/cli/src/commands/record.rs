//! `sts template` and `sts show`.

use std::process;

use serde_json::Value;
use sts_client::{FormSession, ProxyClient, ProxyError, StsConfig};
use sts_core::{ChecklistForm, ChecklistRecord, FormKind, OperationRef, PageQuery, SignatureRole};

use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_template(
    kind: FormKind,
    operation_ref: Option<&str>,
    payload: bool,
    output: OutputFormat,
    quiet: bool,
) {
    with_form!(kind, F => print_template::<F>(operation_ref, payload, output, quiet))
}

fn print_template<F: ChecklistForm>(
    operation_ref: Option<&str>,
    payload: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let operation_ref = operation_ref.and_then(OperationRef::parse);
    let record = ChecklistRecord::<F>::defaults(operation_ref.as_ref());
    let rendered = if payload {
        record.to_payload()
    } else {
        record.to_json()
    };
    match rendered {
        Ok(value) => print_json(&value),
        Err(e) => {
            report_error(&format!("serialization error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn cmd_show(
    kind: FormKind,
    operation_ref: &str,
    config: &StsConfig,
    output: OutputFormat,
    quiet: bool,
) {
    with_form!(kind, F => show::<F>(operation_ref, config, output, quiet))
}

/// Open the form in update mode, exactly as the edit page would.
fn show<F: ChecklistForm>(operation_ref: &str, config: &StsConfig, output: OutputFormat, quiet: bool) {
    let query = PageQuery::new(Some(operation_ref), true);
    if query.operation_ref.is_none() {
        report_error(&ProxyError::MissingOperationRef.user_message(), output, quiet);
        process::exit(1);
    }

    let client = ProxyClient::new(&config.proxy_url);
    let mut session = FormSession::<F>::new(query);
    session.mount(&client);
    if let Some(message) = session.error_message() {
        report_error(message, output, quiet);
        process::exit(1);
    }
    if quiet {
        return;
    }

    let record = session.record();
    match output {
        OutputFormat::Json => match record.to_json() {
            Ok(mut value) => {
                let urls: serde_json::Map<String, Value> = SignatureRole::ALL
                    .iter()
                    .map(|&role| {
                        let image = record.signatures.image(role);
                        (role.key().to_string(), Value::String(image.resolve(&config.api_base_url)))
                    })
                    .collect();
                if let Value::Object(map) = &mut value {
                    map.insert("signatureUrls".to_string(), Value::Object(urls));
                }
                print_json(&value);
            }
            Err(e) => {
                report_error(&format!("serialization error: {}", e), output, quiet);
                process::exit(1);
            }
        },
        OutputFormat::Text => print_summary(record, &config.api_base_url),
    }
}

fn print_summary<F: ChecklistForm>(record: &ChecklistRecord<F>, api_base_url: &str) {
    println!("{} ({})", F::TITLE, F::DOCUMENT.form_no);
    println!("Operation ref: {}", record.operation_ref);
    println!("Status: {}", record.status);
    if let Some(id) = &record.id {
        println!("Id: {}", id);
    }

    let transfer = &record.transfer_info;
    println!(
        "Transfer: {} {} at {}",
        or_dash(&transfer.date),
        transfer.time,
        or_dash(&transfer.location)
    );
    println!(
        "Vessels: {} (CHS) / {} (MS)",
        or_dash(&record.vessels.constant_heading.ship_name),
        or_dash(&record.vessels.manoeuvring.ship_name)
    );

    println!("Checklist:");
    for item in &record.checklist {
        println!(
            "  {:>2}. [{}] [{}] {}{}",
            item.item_no,
            tick(item.constant_heading),
            tick(item.manoeuvring),
            item.description,
            if item.remarks.is_empty() {
                String::new()
            } else {
                format!(" -- {}", item.remarks)
            }
        );
    }

    if let Ok(Value::Object(details)) = serde_json::to_value(&record.details) {
        println!("{}:", F::DETAILS_KEY);
        for (key, value) in details {
            let shown = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            println!("  {}: {}", key, shown);
        }
    }

    if !record.general_remarks.is_empty() {
        println!("Remarks: {}", record.general_remarks);
    }

    for role in SignatureRole::ALL {
        let image = record.signatures.image(role);
        if !image.is_empty() {
            println!("Signature {}: {}", role.key(), image.resolve(api_base_url));
        }
    }
}

fn tick(checked: bool) -> char {
    if checked {
        'x'
    } else {
        ' '
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
