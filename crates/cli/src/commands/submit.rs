//! `sts submit`: the create/update page flow driven from a JSON file.

use std::path::{Path, PathBuf};
use std::process;

use sts_client::{capture_image, FormSession, ProxyClient, ProxyError, StsConfig};
use sts_core::lenient::text;
use sts_core::{
    ChecklistForm, ChecklistRecord, FormKind, Mode, OperationRef, PageQuery, SignatureImage,
    SignatureRole,
};

use crate::{print_json, report_error, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_submit(
    kind: FormKind,
    file: &Path,
    operation_ref: Option<&str>,
    update: bool,
    signatures: &[String],
    config: &StsConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let json_str = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", file.display(), e);
            exit_with(&msg, output, quiet);
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&json_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", file.display(), e);
            exit_with(&msg, output, quiet);
        }
    };

    let mut images = Vec::with_capacity(signatures.len());
    for spec in signatures {
        match parse_signature_arg(spec) {
            Ok((role, path)) => match capture_image(&path) {
                Ok(image) => images.push((role, image)),
                Err(e) => exit_with(&e.to_string(), output, quiet),
            },
            Err(msg) => exit_with(&msg, output, quiet),
        }
    }

    // Without --operation-ref an update targets the reference in the file.
    let page_ref = match operation_ref {
        Some(op) => Some(op.to_string()),
        None if update => Some(text(&value, "operationRef")),
        None => None,
    };
    if update && page_ref.as_deref().and_then(OperationRef::parse).is_none() {
        exit_with(&ProxyError::MissingOperationRef.user_message(), output, quiet);
    }

    let query = PageQuery::new(page_ref.as_deref(), update);
    with_form!(kind, F => submit::<F>(query, &value, images, config, output, quiet))
}

fn submit<F: ChecklistForm>(
    query: PageQuery,
    value: &serde_json::Value,
    images: Vec<(SignatureRole, SignatureImage)>,
    config: &StsConfig,
    output: OutputFormat,
    quiet: bool,
) {
    let client = ProxyClient::new(&config.proxy_url);
    let page_ref = query.operation_ref.clone();
    let mut session = FormSession::<F>::new(query);
    let mode = session.mode();

    session.mount(&client);
    if let Some(message) = session.error_message() {
        exit_with(message, output, quiet);
    }

    let mut incoming = ChecklistRecord::<F>::from_backend(value);
    if incoming.operation_ref.is_empty() {
        if let Some(op) = &page_ref {
            incoming.operation_ref = op.as_str().to_string();
        }
    }
    for (role, image) in images {
        *incoming.signatures.image_mut(role) = image;
    }
    let submitted_ref = incoming.operation_ref.clone();
    session.edit(move |record| *record = incoming);

    if !session.submit(&client) {
        let message = session.error_message().unwrap_or("submission was not sent");
        exit_with(message, output, quiet);
    }
    if quiet {
        return;
    }
    let message = session.success_message().unwrap_or_default();
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "success": true,
            "message": message,
            "form": F::KIND.slug(),
            "operationRef": submitted_ref,
            "mode": if mode == Mode::Update { "update" } else { "create" },
            "location": session.location(),
        })),
        OutputFormat::Text => {
            println!("{}", message);
            println!("{} {} ({})", F::KIND.slug(), submitted_ref, session.location());
        }
    }
}

fn exit_with(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

/// Parse `ROLE=PATH`.
fn parse_signature_arg(spec: &str) -> Result<(SignatureRole, PathBuf), String> {
    let (role, path) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid --sign '{}': expected ROLE=PATH", spec))?;
    let role = SignatureRole::parse(role).ok_or_else(|| {
        format!(
            "invalid --sign role '{}': expected chs, ms or stamp",
            role.trim()
        )
    })?;
    if path.trim().is_empty() {
        return Err(format!("invalid --sign '{}': missing path", spec));
    }
    Ok((role, PathBuf::from(path.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_args() {
        let (role, path) = parse_signature_arg("chs=sig/master.png").unwrap();
        assert_eq!(role, SignatureRole::ConstantHeading);
        assert_eq!(path, PathBuf::from("sig/master.png"));

        let (role, _) = parse_signature_arg("stamp=stamp.svg").unwrap();
        assert_eq!(role, SignatureRole::Stamp);

        assert!(parse_signature_arg("chs").is_err());
        assert!(parse_signature_arg("captain=a.png").is_err());
        assert!(parse_signature_arg("ms=").is_err());
    }
}
