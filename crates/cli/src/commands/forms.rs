use sts_core::FormKind;

use crate::{print_json, OutputFormat};

pub(crate) fn cmd_forms(output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let forms: Vec<serde_json::Value> = FormKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "slug": kind.slug(),
                        "title": kind.title(),
                        "items": kind.item_count(),
                        "path": kind.page_path(),
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(forms));
        }
        OutputFormat::Text => {
            for kind in FormKind::ALL {
                println!(
                    "{}  {}  ({} items)",
                    kind.slug(),
                    kind.title(),
                    kind.item_count()
                );
            }
        }
    }
}
